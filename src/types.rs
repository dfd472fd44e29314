use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured output as a field-name -> value mapping. Values are strings for
/// most fields, but the service is free to return numbers (receipt totals).
pub type FieldMap = serde_json::Map<String, Value>;

/// One labeled test instance: an input artifact plus its expected structured
/// output. Immutable once loaded; names are unique within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    pub input: PathBuf,
    pub expected_output: FieldMap,
    #[serde(default)]
    pub metadata: FieldMap,
}

/// Per-case output of the extraction service, or the failure sentinel when the
/// call or its response could not be turned into fields. A failed case is
/// scored as zero, never aborted on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractionResult {
    Fields(FieldMap),
    Error(String),
}

impl ExtractionResult {
    pub fn error(reason: impl Into<String>) -> Self {
        ExtractionResult::Error(reason.into())
    }

    /// Look up one extracted field. Always `None` on the error sentinel, so a
    /// failed extraction scores 0.0 on every field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            ExtractionResult::Fields(map) => map.get(name),
            ExtractionResult::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExtractionResult::Error(_))
    }
}

/// Score for one field of one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldScore {
    pub case_name: String,
    pub field: String,
    pub score: f64,
}

impl FieldScore {
    /// Scores live in [0, 1]; anything an evaluator produces outside that
    /// range (NaN included) is clamped here.
    pub fn new(case_name: impl Into<String>, field: impl Into<String>, score: f64) -> Self {
        let score = if score.is_finite() { score.clamp(0.0, 1.0) } else { 0.0 };
        FieldScore {
            case_name: case_name.into(),
            field: field.into(),
            score,
        }
    }
}

/// One fully evaluated case: what went in, what came back, how it scored and
/// how long the extraction call took.
#[derive(Debug, Clone, Serialize)]
pub struct CaseRow {
    pub case: Case,
    pub output: ExtractionResult,
    pub scores: Vec<FieldScore>,
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_lookup_on_error_sentinel_is_none() {
        let res = ExtractionResult::error("Unable to parse");
        assert!(res.field("name").is_none());
        assert!(res.is_error());
    }

    #[test]
    fn field_score_clamps_out_of_range_values() {
        assert_eq!(FieldScore::new("c", "f", 1.7).score, 1.0);
        assert_eq!(FieldScore::new("c", "f", -0.3).score, 0.0);
        assert_eq!(FieldScore::new("c", "f", f64::NAN).score, 0.0);
    }

    #[test]
    fn fields_lookup_returns_value() {
        let mut map = FieldMap::new();
        map.insert("total".into(), json!("12.50"));
        let res = ExtractionResult::Fields(map);
        assert_eq!(res.field("total"), Some(&json!("12.50")));
        assert!(res.field("company").is_none());
    }
}
