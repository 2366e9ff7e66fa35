use tracing::trace;

use crate::error::Result;
use crate::process::{
    convert::{to_timestamp_micros, Coercion},
    frame::Frame,
};

/// Reparse each listed column as a naive timestamp floored to microseconds.
///
/// Names the frame does not have are skipped, so one call can cover the
/// optional date columns of several tables.
pub fn normalize_timestamps(frame: &mut Frame, columns: &[&str]) -> Result<()> {
    for &name in columns {
        let Some(column) = frame.get(name) else {
            trace!(column = name, "no such column, skipping normalization");
            continue;
        };
        let normalized = to_timestamp_micros(name, column, Coercion::Strict)?;
        frame.insert(name, normalized);
    }
    Ok(())
}
