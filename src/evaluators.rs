//! Field evaluators: each one scores a single named output field against its
//! expected value. Evaluators are total. A missing field or a value of the
//! wrong shape scores 0.0 with a diagnostic, never a panic, so no single
//! field can take down a run.

use std::borrow::Cow;

use serde_json::Value;
use tracing::warn;

use crate::similarity::{date_similarity, numeric_similarity, text_similarity};

/// Capability: compare one field. A fixed registry of these is built per
/// dataset at startup.
pub trait FieldEvaluator: Send + Sync {
    /// Name of the output field this evaluator scores.
    fn field(&self) -> &str;

    /// Score expected vs. actual for this field; `None` on either side means
    /// the field was absent and scores 0.0.
    fn score(&self, expected: Option<&Value>, actual: Option<&Value>) -> f64;
}

/// The service may return numbers where the annotation holds strings (receipt
/// totals, mostly). Stringify scalars; anything structured is unusable.
fn value_text(v: &Value) -> Option<Cow<'_, str>> {
    match v {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// Fuzzy text comparison for name, company and address fields. An empty
/// extracted string is replaced by a sentinel token so it still compares as a
/// defined, non-matching value.
pub struct TextFieldEvaluator {
    field: &'static str,
}

impl TextFieldEvaluator {
    pub fn new(field: &'static str) -> Self {
        TextFieldEvaluator { field }
    }
}

impl FieldEvaluator for TextFieldEvaluator {
    fn field(&self) -> &str {
        self.field
    }

    fn score(&self, expected: Option<&Value>, actual: Option<&Value>) -> f64 {
        let (Some(expected), Some(actual)) = (expected, actual) else {
            warn!(field = self.field, "missing field on one side");
            return 0.0;
        };
        let (Some(expected), Some(actual)) = (value_text(expected), value_text(actual)) else {
            warn!(field = self.field, "non-text value");
            return 0.0;
        };
        let actual = if actual.is_empty() {
            warn!(field = self.field, "extracted value is empty");
            Cow::Borrowed("EMPTY")
        } else {
            actual
        };
        text_similarity(&expected, &actual)
    }
}

/// Binary date comparison with day/month transposition tolerance.
pub struct DateFieldEvaluator {
    field: &'static str,
}

impl DateFieldEvaluator {
    pub fn new(field: &'static str) -> Self {
        DateFieldEvaluator { field }
    }
}

impl FieldEvaluator for DateFieldEvaluator {
    fn field(&self) -> &str {
        self.field
    }

    fn score(&self, expected: Option<&Value>, actual: Option<&Value>) -> f64 {
        let (Some(expected), Some(actual)) = (expected, actual) else {
            warn!(field = self.field, "missing field on one side");
            return 0.0;
        };
        let (Some(expected), Some(actual)) = (value_text(expected), value_text(actual)) else {
            warn!(field = self.field, "non-text value");
            return 0.0;
        };
        date_similarity(&expected, &actual)
    }
}

/// Relative-error comparison for monetary totals.
pub struct TotalFieldEvaluator {
    field: &'static str,
}

impl TotalFieldEvaluator {
    pub fn new(field: &'static str) -> Self {
        TotalFieldEvaluator { field }
    }
}

impl FieldEvaluator for TotalFieldEvaluator {
    fn field(&self) -> &str {
        self.field
    }

    fn score(&self, expected: Option<&Value>, actual: Option<&Value>) -> f64 {
        let (Some(expected), Some(actual)) = (expected, actual) else {
            warn!(field = self.field, "missing field on one side");
            return 0.0;
        };
        let (Some(expected), Some(actual)) = (value_text(expected), value_text(actual)) else {
            warn!(field = self.field, "non-numeric value");
            return 0.0;
        };
        numeric_similarity(&expected, &actual)
    }
}

/// Registry for the handwritten-names dataset.
pub fn handwriting_evaluators() -> Vec<Box<dyn FieldEvaluator>> {
    vec![Box::new(TextFieldEvaluator::new("name"))]
}

/// Registry for the SROIE 2019 receipts dataset.
pub fn receipt_evaluators() -> Vec<Box<dyn FieldEvaluator>> {
    vec![
        Box::new(TextFieldEvaluator::new("company")),
        Box::new(TextFieldEvaluator::new("address")),
        Box::new(DateFieldEvaluator::new("date")),
        Box::new(TotalFieldEvaluator::new("total")),
    ]
}
