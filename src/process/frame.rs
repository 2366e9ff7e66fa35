// src/process/frame.rs

use arrow::{
    array::{Array, ArrayRef, BooleanArray, StringArray},
    compute::filter,
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::trace;

use crate::error::{Error, Result};
use crate::process::convert::{self, Coercion};
use crate::schema::{SemanticType, Table};

/// Mutable working copy of a raw table.
///
/// Columns are reference-counted Arrow arrays, so taking the copy is cheap and
/// the caller's batch is never touched.
#[derive(Debug, Clone)]
pub struct Frame {
    table: Table,
    columns: Vec<(String, ArrayRef)>,
    num_rows: usize,
}

impl Frame {
    pub fn new(table: Table, raw: &RecordBatch) -> Self {
        let columns = raw
            .schema()
            .fields()
            .iter()
            .zip(raw.columns())
            .map(|(f, c)| (f.name().clone(), c.clone()))
            .collect();
        Self {
            table,
            columns,
            num_rows: raw.num_rows(),
        }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ArrayRef> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Like `get`, but an absent column is a `MissingColumn` error.
    pub fn require(&self, name: &str) -> Result<&ArrayRef> {
        self.get(name).ok_or_else(|| Error::MissingColumn {
            table: self.table.to_string(),
            column: name.to_string(),
        })
    }

    /// Replace a column in place, or append it if new.
    pub fn insert(&mut self, name: &str, column: ArrayRef) {
        debug_assert_eq!(column.len(), self.num_rows);
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = column,
            None => self.columns.push((name.to_string(), column)),
        }
    }

    pub fn drop_if_present(&mut self, names: &[&str]) {
        self.columns.retain(|(n, _)| {
            let drop = names.contains(&n.as_str());
            if drop {
                trace!(column = %n, "dropping column");
            }
            !drop
        });
    }

    /// Coerce a required column in place.
    pub fn coerce(&mut self, name: &str, ty: SemanticType, mode: Coercion) -> Result<()> {
        let converted = convert::coerce_to(name, self.require(name)?, ty, mode)?;
        self.insert(name, converted);
        Ok(())
    }

    /// Replace nulls in each listed column with `placeholder`. Absent columns
    /// are skipped.
    pub fn fill_null_str(&mut self, names: &[&str], placeholder: &str) -> Result<()> {
        for &name in names {
            let Some(column) = self.get(name) else {
                trace!(column = name, "fill skipped, column absent");
                continue;
            };
            if column.null_count() == 0 {
                continue;
            }
            let sarr = convert::to_utf8(name, column)?;
            let filled: StringArray = sarr
                .iter()
                .map(|v| Some(v.unwrap_or(placeholder)))
                .collect();
            self.insert(name, Arc::new(filled));
        }
        Ok(())
    }

    /// Keep only rows where `mask` is true.
    pub fn retain_rows(&mut self, mask: &BooleanArray) -> Result<()> {
        for (_, column) in self.columns.iter_mut() {
            *column = filter(column.as_ref(), mask)?;
        }
        self.num_rows = mask.true_count();
        Ok(())
    }
}
