// src/process/conform.rs

use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::{Error, Result};
use crate::process::{
    convert::{coerce_to, Coercion},
    frame::Frame,
};
use crate::schema::{arrow_schema, Table};

/// Project a frame onto its table's registered schema.
///
/// Columns come out in schema order with the schema's physical types; extra
/// columns are dropped and a schema column the frame lacks is
/// `MissingColumn`.
pub fn conform(frame: &Frame) -> Result<RecordBatch> {
    let table = frame.table();
    let columns = table
        .schema()
        .columns
        .iter()
        .map(|col| coerce_to(col.name, frame.require(col.name)?, col.ty, Coercion::Strict))
        .collect::<Result<Vec<_>>>()?;

    let options = RecordBatchOptions::new().with_row_count(Some(frame.num_rows()));
    RecordBatch::try_new_with_options(arrow_schema(table), columns, &options).map_err(Into::into)
}

/// Check that a batch already has exactly the registered layout.
pub fn validate(table: Table, batch: &RecordBatch) -> Result<()> {
    let expected = arrow_schema(table);
    let actual = batch.schema();
    if actual.fields().len() != expected.fields().len() {
        return Err(Error::SchemaMismatch {
            table: table.to_string(),
            detail: format!(
                "expected {} columns, found {}",
                expected.fields().len(),
                actual.fields().len()
            ),
        });
    }
    for (want, got) in expected.fields().iter().zip(actual.fields()) {
        if want.name() != got.name() || want.data_type() != got.data_type() {
            return Err(Error::SchemaMismatch {
                table: table.to_string(),
                detail: format!(
                    "expected {}: {}, found {}: {}",
                    want.name(),
                    want.data_type(),
                    got.name(),
                    got.data_type()
                ),
            });
        }
    }
    Ok(())
}
