// src/error.rs

use arrow::datatypes::DataType;

/// Everything the library can fail with.
///
/// Lookup misses and absent required columns are fatal for the table being
/// processed; the driver decides whether to carry on with the next one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("{table}: required column `{column}` is missing")]
    MissingColumn { table: String, column: String },

    #[error("column `{column}` row {row}: cannot read {value:?} as {expected}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    #[error("{table}: output does not match registered schema: {detail}")]
    SchemaMismatch { table: String, detail: String },

    #[error("column `{column}` row {row}: timestamp would lose precision")]
    TruncatedTimestamp { column: String, row: usize },

    #[error("column `{column}`: unsupported data type {data_type}")]
    UnsupportedType { column: String, data_type: DataType },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
