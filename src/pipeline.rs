// src/pipeline.rs

use std::{fs, path::PathBuf, time::Instant};
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::io::{output_path, read_csv, ParquetSink};
use crate::process::clean;
use crate::schema::Table;

/// Outcome of converting one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableReport {
    pub table: Table,
    pub rows_in: usize,
    pub rows_out: usize,
    pub bytes: u64,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<TableReport>,
    pub failed: Vec<(Table, Error)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Read, clean and persist a single table.
#[tracing::instrument(level = "info", skip_all, fields(table = %table))]
pub fn process_table(
    table: Table,
    config: &PipelineConfig,
    sink: &ParquetSink,
) -> Result<TableReport> {
    let source = config.data_dir.join(table.source_file());
    let raw = read_csv(&source, config.normalize_headers)?;
    let cleaned = clean(table, &raw, &config.cleaning)?;

    let path = output_path(&config.output_dir, table);
    let bytes = sink.write(table, &cleaned, &path)?;

    Ok(TableReport {
        table,
        rows_in: raw.num_rows(),
        rows_out: cleaned.num_rows(),
        bytes,
        path,
    })
}

/// Convert every configured table in order.
///
/// A table that fails is logged and recorded in the summary; the remaining
/// tables are still processed. Only sink setup errors abort the run.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let sink = ParquetSink::new(config.parquet.clone())?;
    fs::create_dir_all(&config.output_dir)?;

    let mut summary = RunSummary::default();
    for &table in &config.tables {
        info!("processing {}...", table);
        let start = Instant::now();
        match process_table(table, config, &sink) {
            Ok(report) => {
                info!(
                    table = %table,
                    rows_in = report.rows_in,
                    rows_out = report.rows_out,
                    elapsed = ?start.elapsed(),
                    "saved to {}",
                    report.path.display()
                );
                summary.succeeded.push(report);
            }
            Err(e) => {
                error!(table = %table, "processing failed: {}", e);
                summary.failed.push((table, e));
            }
        }
    }
    Ok(summary)
}
