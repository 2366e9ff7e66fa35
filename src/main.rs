use anyhow::{Context, Result};
use mimic_parquet::{config::PipelineConfig, pipeline};
use std::{env, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config = match env::args().nth(1) {
        Some(path) => {
            PipelineConfig::load(&path).with_context(|| format!("loading config {}", path))?
        }
        None => PipelineConfig::default(),
    };
    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        tables = config.tables.len(),
        "configured"
    );

    // ─── 3) convert each table ───────────────────────────────────────
    let summary = pipeline::run(&config).context("setting up output")?;

    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "all done"
    );
    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        for (table, err) in &summary.failed {
            error!("{} not converted: {}", table, err);
        }
        Ok(ExitCode::FAILURE)
    }
}
