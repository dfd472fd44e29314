//! Client for the AXIA extraction API.
//!
//! One multipart POST per input image, one credential header, no retries. A
//! failed call is converted into the error sentinel so the runner can score
//! the case as zero instead of aborting the run.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::error;

use crate::config::EvalConfig;
use crate::types::ExtractionResult;

#[async_trait]
pub trait Extractor: Send + Sync {
    /// Issue exactly one extraction request for the artifact at `input`.
    /// Infallible by contract: every failure mode becomes the error sentinel.
    async fn extract(&self, input: &Path) -> ExtractionResult;
}

pub struct AxiaClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl AxiaClient {
    /// `doc_type` selects the extraction endpoint, e.g. `Name` or
    /// `SROIEReceipt`.
    pub fn new(cfg: &EvalConfig, doc_type: &str) -> Result<Self> {
        let http = Client::builder().timeout(cfg.timeout).build()?;
        Ok(AxiaClient {
            http,
            endpoint: format!("{}/api/extract/{}", cfg.base_url.trim_end_matches('/'), doc_type),
            api_key: cfg.api_key.clone(),
        })
    }

    async fn call(&self, input: &Path) -> Result<ExtractionResult> {
        let bytes = tokio::fs::read(input).await?;
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let form = Form::new().part("uploaded_file", Part::bytes(bytes).file_name(file_name));

        let resp = self
            .http
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = resp.json().await?;
        match body.get("data") {
            Some(Value::Object(map)) => Ok(ExtractionResult::Fields(map.clone())),
            _ => Ok(ExtractionResult::error("response has no data object")),
        }
    }
}

#[async_trait]
impl Extractor for AxiaClient {
    async fn extract(&self, input: &Path) -> ExtractionResult {
        match self.call(input).await {
            Ok(result) => result,
            Err(e) => {
                error!(input = %input.display(), "extraction call failed: {e:#}");
                ExtractionResult::error(format!("extraction call failed: {e:#}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cfg() -> EvalConfig {
        EvalConfig {
            base_url: "http://localhost:8000/".into(),
            api_key: "k".into(),
            timeout: Duration::from_secs(30),
            concurrency: 20,
        }
    }

    #[test]
    fn endpoint_joins_base_url_and_doc_type() {
        let client = AxiaClient::new(&cfg(), "SROIEReceipt").unwrap();
        assert_eq!(client.endpoint, "http://localhost:8000/api/extract/SROIEReceipt");
    }

    #[tokio::test]
    async fn missing_input_file_becomes_error_sentinel() {
        let client = AxiaClient::new(&cfg(), "Name").unwrap();
        let result = client.extract(Path::new("/nonexistent/image.jpg")).await;
        assert!(result.is_error());
    }
}
