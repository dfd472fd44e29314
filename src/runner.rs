//! Evaluation runner: fans extraction calls out over the cases under a
//! bounded-concurrency policy and applies every registered field evaluator to
//! each result.
//!
//! Completion order is whatever the network gives us; rows are re-sorted by
//! the original case index so the report always reads in input order.

use std::time::Instant;

use futures::{stream, StreamExt};
use tracing::info;

use crate::client::Extractor;
use crate::evaluators::FieldEvaluator;
use crate::report::Report;
use crate::types::{Case, CaseRow, ExtractionResult, FieldScore};

/// Run every case through `client` with at most `concurrency` calls in flight
/// and score the results. A failed extraction or field never aborts the run;
/// the case keeps its row with zero scores.
pub async fn run(
    cases: Vec<Case>,
    client: &dyn Extractor,
    evaluators: &[Box<dyn FieldEvaluator>],
    concurrency: usize,
) -> Report {
    let total = cases.len();
    info!(cases = total, concurrency, "starting evaluation");

    let calls = cases.iter().enumerate().map(|(idx, case)| async move {
        let start = Instant::now();
        let output = client.extract(&case.input).await;
        (idx, output, start.elapsed())
    });

    let mut done = stream::iter(calls)
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;
    done.sort_by_key(|(idx, _, _)| *idx);

    let rows = cases
        .into_iter()
        .zip(done)
        .map(|(case, (_, output, duration))| {
            let scores = score_case(&case, &output, evaluators);
            CaseRow {
                case,
                output,
                scores,
                duration,
            }
        })
        .collect();

    info!(cases = total, "evaluation finished");
    Report::new(rows)
}

fn score_case(
    case: &Case,
    output: &ExtractionResult,
    evaluators: &[Box<dyn FieldEvaluator>],
) -> Vec<FieldScore> {
    evaluators
        .iter()
        .map(|ev| {
            let expected = case.expected_output.get(ev.field());
            let actual = output.field(ev.field());
            FieldScore::new(case.name.clone(), ev.field(), ev.score(expected, actual))
        })
        .collect()
}
