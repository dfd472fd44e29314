//! Accuracy evaluation harness for the AXIA document-extraction API.
//!
//! Labeled cases are loaded from a dataset source, pushed through the
//! extraction endpoint under a bounded concurrency limit, and scored with
//! field-specific similarity functions (fuzzy text, calendar-aware binary
//! dates, tolerance-banded totals). The output is an input-ordered report of
//! per-case, per-field scores.

pub mod client;
pub mod config;
pub mod dataset;
pub mod evaluators;
pub mod report;
pub mod runner;
pub mod similarity;
pub mod types;

pub use client::{AxiaClient, Extractor};
pub use config::EvalConfig;
pub use evaluators::{handwriting_evaluators, receipt_evaluators, FieldEvaluator};
pub use report::{RenderOptions, Report};
pub use types::{Case, CaseRow, ExtractionResult, FieldMap, FieldScore};
