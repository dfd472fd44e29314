//! Dataset loading. Both loaders are deterministic, preserve source order and
//! fail loudly on a malformed source: a run cannot proceed with a broken
//! dataset.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{Case, FieldMap};

/// Load the handwritten-names dataset from a CSV file with `FILENAME` and
/// `IDENTITY` columns. Inputs resolve to `images_dir/FILENAME`; the expected
/// output is the single `name` field.
pub fn load_handwriting(csv_path: &Path, images_dir: &Path) -> Result<Vec<Case>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("cannot open dataset {}", csv_path.display()))?;

    let headers = reader.headers()?.clone();
    let filename_col = column(&headers, "FILENAME", csv_path)?;
    let identity_col = column(&headers, "IDENTITY", csv_path)?;

    let mut cases = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad row {} in {}", i + 1, csv_path.display()))?;
        let filename = record.get(filename_col).unwrap_or_default().to_string();
        let identity = record.get(identity_col).unwrap_or_default().to_string();
        if filename.is_empty() {
            bail!("row {} in {} has an empty FILENAME", i + 1, csv_path.display());
        }
        let mut expected = FieldMap::new();
        expected.insert("name".into(), json!(identity));
        cases.push(Case {
            name: filename.clone(),
            input: images_dir.join(&filename),
            expected_output: expected,
            metadata: FieldMap::new(),
        });
    }
    reject_duplicates(&cases)?;
    Ok(cases)
}

fn column(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("{} is missing the {name} column", path.display()))
}

#[derive(Debug, Deserialize)]
struct ReceiptManifest {
    cases: Vec<ReceiptCase>,
}

#[derive(Debug, Deserialize)]
struct ReceiptCase {
    name: String,
    inputs: PathBuf,
    /// Path to a JSON file holding the expected field mapping.
    expected_output: PathBuf,
    #[serde(default)]
    metadata: FieldMap,
}

/// Load the receipts dataset from a YAML manifest. Each descriptor points at
/// an input image and a JSON file with the expected `company` / `address` /
/// `date` / `total` mapping; the JSON is read eagerly so a broken label file
/// surfaces before any network call.
pub fn load_receipts(yaml_path: &Path) -> Result<Vec<Case>> {
    let text = std::fs::read_to_string(yaml_path)
        .with_context(|| format!("cannot open dataset {}", yaml_path.display()))?;
    let manifest: ReceiptManifest = serde_yaml::from_str(&text)
        .with_context(|| format!("malformed dataset {}", yaml_path.display()))?;

    let mut cases = Vec::with_capacity(manifest.cases.len());
    for desc in manifest.cases {
        let label_text = std::fs::read_to_string(&desc.expected_output).with_context(|| {
            format!(
                "cannot read expected output {} for case {}",
                desc.expected_output.display(),
                desc.name
            )
        })?;
        let expected: Value = serde_json::from_str(&label_text).with_context(|| {
            format!(
                "expected output {} for case {} is not valid JSON",
                desc.expected_output.display(),
                desc.name
            )
        })?;
        let Value::Object(expected) = expected else {
            bail!(
                "expected output {} for case {} is not a JSON object",
                desc.expected_output.display(),
                desc.name
            );
        };
        cases.push(Case {
            name: desc.name,
            input: desc.inputs,
            expected_output: expected,
            metadata: desc.metadata,
        });
    }
    reject_duplicates(&cases)?;
    Ok(cases)
}

fn reject_duplicates(cases: &[Case]) -> Result<()> {
    let mut seen = HashSet::new();
    for case in cases {
        if !seen.insert(case.name.as_str()) {
            bail!("duplicate case name: {}", case.name);
        }
    }
    Ok(())
}
