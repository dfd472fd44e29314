//! Report rendering. Purely presentational: everything here reads scores that
//! the runner already computed.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::types::{CaseRow, ExtractionResult};

/// Ordered record of one evaluation run; row order equals dataset order.
#[derive(Debug, Serialize)]
pub struct Report {
    rows: Vec<CaseRow>,
}

/// Column selection for `render`. Everything is on by default.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub include_input: bool,
    pub include_output: bool,
    pub include_expected_output: bool,
    pub include_scores: bool,
    pub include_durations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            include_input: true,
            include_output: true,
            include_expected_output: true,
            include_scores: true,
            include_durations: true,
        }
    }
}

impl Report {
    pub fn new(rows: Vec<CaseRow>) -> Self {
        Report { rows }
    }

    pub fn rows(&self) -> &[CaseRow] {
        &self.rows
    }

    /// Mean score per field across all rows, field order as first seen.
    pub fn field_means(&self) -> Vec<(String, f64)> {
        let mut order = Vec::new();
        let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for row in &self.rows {
            for score in &row.scores {
                if !sums.contains_key(score.field.as_str()) {
                    order.push(score.field.clone());
                }
                let entry = sums.entry(score.field.as_str()).or_insert((0.0, 0));
                entry.0 += score.score;
                entry.1 += 1;
            }
        }
        order
            .into_iter()
            .map(|field| {
                let (sum, n) = sums[field.as_str()];
                (field, sum / n as f64)
            })
            .collect()
    }

    /// Mean of all field scores in the report, 0.0 when empty.
    pub fn overall_mean(&self) -> f64 {
        let mut sum = 0.0;
        let mut n = 0usize;
        for row in &self.rows {
            for score in &row.scores {
                sum += score.score;
                n += 1;
            }
        }
        if n == 0 {
            0.0
        } else {
            sum / n as f64
        }
    }

    /// Human-readable rendering with the columns selected in `opts`.
    pub fn render(&self, opts: &RenderOptions) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Evaluation report ({} cases)", self.rows.len());

        for row in &self.rows {
            let _ = writeln!(out, "\ncase {}", row.case.name);
            if opts.include_input {
                let _ = writeln!(out, "  input:    {}", row.case.input.display());
            }
            if opts.include_expected_output {
                let _ = writeln!(
                    out,
                    "  expected: {}",
                    serde_json::Value::Object(row.case.expected_output.clone())
                );
            }
            if opts.include_output {
                match &row.output {
                    ExtractionResult::Fields(map) => {
                        let _ = writeln!(out, "  output:   {}", serde_json::Value::Object(map.clone()));
                    }
                    ExtractionResult::Error(reason) => {
                        let _ = writeln!(out, "  output:   <error: {reason}>");
                    }
                }
            }
            if opts.include_scores {
                for score in &row.scores {
                    let _ = writeln!(out, "  {:<9} {:.3}", format!("{}:", score.field), score.score);
                }
            }
            if opts.include_durations {
                let _ = writeln!(out, "  duration: {:.1?}", row.duration);
            }
        }

        if opts.include_scores && !self.rows.is_empty() {
            let _ = writeln!(out, "\nmean score per field");
            for (field, mean) in self.field_means() {
                let _ = writeln!(out, "  {:<9} {:.3}", format!("{field}:"), mean);
            }
            let _ = writeln!(out, "  {:<9} {:.3}", "overall:", self.overall_mean());
        }
        out
    }

    pub fn print(&self, opts: &RenderOptions) {
        print!("{}", self.render(opts));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Case, FieldMap, FieldScore};
    use serde_json::json;
    use std::path::PathBuf;
    use std::time::Duration;

    fn row(name: &str, score: f64) -> CaseRow {
        let mut expected = FieldMap::new();
        expected.insert("name".into(), json!("JOHN"));
        let mut output = FieldMap::new();
        output.insert("name".into(), json!("JON"));
        CaseRow {
            case: Case {
                name: name.into(),
                input: PathBuf::from(format!("test/{name}.jpg")),
                expected_output: expected,
                metadata: FieldMap::new(),
            },
            output: ExtractionResult::Fields(output),
            scores: vec![FieldScore::new(name, "name", score)],
            duration: Duration::from_millis(120),
        }
    }

    #[test]
    fn render_preserves_row_order() {
        let report = Report::new(vec![row("b.jpg", 1.0), row("a.jpg", 0.5)]);
        let text = report.render(&RenderOptions::default());
        let b = text.find("case b.jpg").unwrap();
        let a = text.find("case a.jpg").unwrap();
        assert!(b < a);
    }

    #[test]
    fn render_honors_column_options() {
        let report = Report::new(vec![row("a.jpg", 0.5)]);
        let opts = RenderOptions {
            include_input: false,
            include_output: false,
            include_expected_output: false,
            include_scores: true,
            include_durations: false,
        };
        let text = report.render(&opts);
        assert!(!text.contains("input:"));
        assert!(!text.contains("output:"));
        assert!(!text.contains("duration:"));
        assert!(text.contains("name:"));
    }

    #[test]
    fn field_means_average_across_rows() {
        let report = Report::new(vec![row("a", 1.0), row("b", 0.0)]);
        let means = report.field_means();
        assert_eq!(means, vec![("name".to_string(), 0.5)]);
        assert_eq!(report.overall_mean(), 0.5);
    }

    #[test]
    fn empty_report_renders_and_means_are_zero() {
        let report = Report::new(vec![]);
        assert_eq!(report.overall_mean(), 0.0);
        let text = report.render(&RenderOptions::default());
        assert!(text.contains("0 cases"));
    }
}
