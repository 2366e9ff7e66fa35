//! Clean the MIMIC clinical CSV tables and persist them as Spark-readable
//! Parquet with fixed, per-table schemas.

pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod process;
pub mod schema;

pub use error::{Error, Result};
pub use process::{clean, clean_by_name, CleanOptions};
pub use schema::{schema_for, SemanticType, Table, TableSchema};
