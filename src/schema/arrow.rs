// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use once_cell::sync::Lazy;
use std::{collections::HashMap, sync::Arc};

use super::{SemanticType, Table, TableSchema};

/// Map a registry type onto the Arrow type the cleaned column carries.
///
/// - Int64     → Int64
/// - String    → Utf8
/// - Timestamp → Timestamp(µs, no zone)
/// - Boolean   → Boolean
pub fn map_to_arrow_type(ty: SemanticType) -> DataType {
    match ty {
        SemanticType::Int64 => DataType::Int64,
        SemanticType::String => DataType::Utf8,
        SemanticType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
        SemanticType::Boolean => DataType::Boolean,
    }
}

fn build_arrow_schema(schema: &TableSchema) -> SchemaRef {
    let fields: Vec<Field> = schema
        .columns
        .iter()
        .map(|col| Field::new(col.name, map_to_arrow_type(col.ty), /* nullable = */ true))
        .collect();

    Arc::new(Schema::new(fields))
}

static ARROW_SCHEMAS: Lazy<HashMap<Table, SchemaRef>> = Lazy::new(|| {
    Table::ALL
        .into_iter()
        .map(|t| (t, build_arrow_schema(t.schema())))
        .collect()
});

/// Arrow schema for a registered table, built once and shared.
pub fn arrow_schema(table: Table) -> SchemaRef {
    ARROW_SCHEMAS
        .get(&table)
        .cloned()
        .unwrap_or_else(|| build_arrow_schema(table.schema()))
}
