// src/io/reader.rs

use arrow::{
    compute::concat_batches,
    csv::ReaderBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fs::File, io::BufReader, path::Path, sync::Arc};
use tracing::debug;

use crate::error::Result;

const BATCH_ROWS: usize = 64 * 1024;

/// Cells read as null: empty plus the usual spreadsheet/pandas tokens.
static NULL_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(|NA|N/A|n/a|NaN|nan|-NaN|-nan|NULL|null|None|<NA>|#N/A)$")
        .expect("null token pattern is valid")
});

/// Header names from the first CSV record.
fn read_headers(path: &Path, normalize: bool) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    let headers = rdr
        .headers()?
        .iter()
        .map(|h| {
            if normalize {
                h.trim().to_lowercase()
            } else {
                h.to_string()
            }
        })
        .collect();
    Ok(headers)
}

/// Load a whole CSV file into one batch with every column as nullable Utf8.
///
/// With `normalize_headers` the column names are trimmed and lowercased.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv<P: AsRef<Path>>(path: P, normalize_headers: bool) -> Result<RecordBatch> {
    let path = path.as_ref();
    let headers = read_headers(path, normalize_headers)?;

    let fields: Vec<Field> = headers
        .iter()
        .map(|n| Field::new(n, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let file = File::open(path)?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_ROWS)
        .with_quote(b'"')
        .with_delimiter(b',')
        .with_null_regex(NULL_TOKENS.clone())
        .build(BufReader::new(file))?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;
    debug!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded csv"
    );
    Ok(batch)
}
