// src/config.rs

use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::io::ParquetOptions;
use crate::process::CleanOptions;
use crate::schema::Table;

/// Run configuration. Every field has a default, so an empty file (or no
/// file at all) converts every table from `./data` into `./output`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Processed in this order.
    pub tables: Vec<Table>,
    /// Trim and lowercase CSV header names before cleaning.
    pub normalize_headers: bool,
    pub cleaning: CleanOptions,
    pub parquet: ParquetOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            output_dir: PathBuf::from("./output"),
            tables: Table::ALL.to_vec(),
            normalize_headers: true,
            cleaning: CleanOptions::default(),
            parquet: ParquetOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // an empty document deserializes to unit, not to an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tables.is_empty() {
            return Err(Error::Config("no tables configured".into()));
        }
        for (i, table) in self.tables.iter().enumerate() {
            if self.tables[..i].contains(table) {
                warn!(%table, "table listed more than once");
            }
        }
        self.parquet.validate()
    }
}
