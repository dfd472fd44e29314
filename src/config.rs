use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Run-wide configuration, built once at process start and read-only
/// afterwards. The credential is required up front: a run without one fails
/// before any evaluation begins.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub concurrency: usize,
}

impl EvalConfig {
    pub fn from_env(base_url: Option<String>, timeout: Duration, concurrency: usize) -> Result<Self> {
        let api_key = std::env::var("AXIA_API_KEY")
            .context("AXIA_API_KEY environment variable is not set")?;
        let base_url = base_url
            .or_else(|| std::env::var("AXIA_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(EvalConfig {
            base_url,
            api_key,
            timeout,
            concurrency,
        })
    }
}
