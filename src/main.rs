use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use axia_evals::config::DEFAULT_CONCURRENCY;
use axia_evals::{
    dataset, handwriting_evaluators, receipt_evaluators, runner, AxiaClient, EvalConfig,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "axia-evals", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
    /// Extraction service base URL (falls back to AXIA_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
    /// Maximum extraction calls in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
    /// Per-call request timeout
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,
}

#[derive(Subcommand)]
enum Cmd {
    /// Evaluate the handwritten-names dataset
    Handwriting {
        #[arg(long, default_value = "HANDWRITING/written_name_test_short.csv")]
        dataset: PathBuf,
        #[arg(long, default_value = "HANDWRITING/test")]
        images_dir: PathBuf,
    },
    /// Evaluate the SROIE 2019 receipts dataset
    Receipts {
        #[arg(long, default_value = "SROIE2019/cases.yaml")]
        dataset: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let cfg = EvalConfig::from_env(
        cli.base_url,
        Duration::from_millis(cli.timeout_ms),
        cli.concurrency,
    )?;

    let (cases, client, evaluators) = match cli.cmd {
        Cmd::Handwriting { dataset, images_dir } => (
            dataset::load_handwriting(&dataset, &images_dir)?,
            AxiaClient::new(&cfg, "Name")?,
            handwriting_evaluators(),
        ),
        Cmd::Receipts { dataset } => (
            dataset::load_receipts(&dataset)?,
            AxiaClient::new(&cfg, "SROIEReceipt")?,
            receipt_evaluators(),
        ),
    };

    let report = runner::run(cases, &client, &evaluators, cfg.concurrency).await;
    report.print(&RenderOptions::default());
    Ok(())
}
