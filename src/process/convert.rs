use arrow::{
    array::{
        Array, ArrayRef, AsArray, BooleanBuilder, Int64Builder, StringArray,
        TimestampMicrosecondBuilder,
    },
    compute::cast,
    datatypes::{
        DataType, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
        TimestampNanosecondType, TimestampSecondType,
    },
};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::process::{date_parser, utils};
use crate::schema::SemanticType;

/// What to do with a value that cannot be read as the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Fail with `Error::InvalidValue`.
    Strict,
    /// Store a null.
    Lenient,
}

impl Coercion {
    fn resolve<T>(
        self,
        parsed: Option<T>,
        column: &str,
        row: usize,
        raw: &str,
        expected: &'static str,
    ) -> Result<Option<T>> {
        match (parsed, self) {
            (Some(v), _) => Ok(Some(v)),
            (None, Coercion::Lenient) => Ok(None),
            (None, Coercion::Strict) => Err(Error::InvalidValue {
                column: column.to_string(),
                row,
                value: raw.to_string(),
                expected,
            }),
        }
    }
}

/// Render any column as text, keeping nulls.
pub fn to_utf8(column: &str, array: &ArrayRef) -> Result<StringArray> {
    let casted = match array.data_type() {
        DataType::Utf8 => array.clone(),
        _ => cast(array, &DataType::Utf8)?,
    };
    casted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| Error::UnsupportedType {
            column: column.to_string(),
            data_type: array.data_type().clone(),
        })
}

pub fn to_string_column(column: &str, array: &ArrayRef) -> Result<ArrayRef> {
    if array.data_type() == &DataType::Utf8 {
        return Ok(array.clone());
    }
    Ok(Arc::new(to_utf8(column, array)?))
}

/// Nullable Int64. Missing stays null; it is never turned into zero.
pub fn to_int64(column: &str, array: &ArrayRef, mode: Coercion) -> Result<ArrayRef> {
    match array.data_type() {
        DataType::Int64 => return Ok(array.clone()),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => return Ok(cast(array, &DataType::Int64)?),
        _ => {}
    }

    let sarr = to_utf8(column, array)?;
    let mut b = Int64Builder::with_capacity(sarr.len());
    for (row, opt) in sarr.iter().enumerate() {
        let v = match opt {
            Some(s) => mode.resolve(utils::parse_i64(s), column, row, s, "integer")?,
            None => None,
        };
        b.append_option(v);
    }
    Ok(Arc::new(b.finish()))
}

/// Tri-state boolean: true, false or null.
pub fn to_boolean(column: &str, array: &ArrayRef, mode: Coercion) -> Result<ArrayRef> {
    if array.data_type() == &DataType::Boolean {
        return Ok(array.clone());
    }

    let sarr = to_utf8(column, array)?;
    let mut b = BooleanBuilder::with_capacity(sarr.len());
    for (row, opt) in sarr.iter().enumerate() {
        let v = match opt {
            Some(s) => mode.resolve(utils::parse_bool(s), column, row, s, "boolean")?,
            None => None,
        };
        b.append_option(v);
    }
    Ok(Arc::new(b.finish()))
}

/// Naive Timestamp(µs). Finer inputs are floored; zones are dropped.
pub fn to_timestamp_micros(column: &str, array: &ArrayRef, mode: Coercion) -> Result<ArrayRef> {
    let scaled: Option<Vec<Option<i64>>> = match array.data_type() {
        DataType::Timestamp(TimeUnit::Microsecond, None) => return Ok(array.clone()),
        DataType::Timestamp(TimeUnit::Second, _) => Some(
            array
                .as_primitive::<TimestampSecondType>()
                .iter()
                .map(|v| v.and_then(|s| s.checked_mul(1_000_000)))
                .collect(),
        ),
        DataType::Timestamp(TimeUnit::Millisecond, _) => Some(
            array
                .as_primitive::<TimestampMillisecondType>()
                .iter()
                .map(|v| v.and_then(|ms| ms.checked_mul(1_000)))
                .collect(),
        ),
        DataType::Timestamp(TimeUnit::Microsecond, _) => Some(
            array
                .as_primitive::<TimestampMicrosecondType>()
                .iter()
                .collect(),
        ),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => Some(
            array
                .as_primitive::<TimestampNanosecondType>()
                .iter()
                .map(|v| v.map(|ns| ns.div_euclid(1_000)))
                .collect(),
        ),
        DataType::Date32 | DataType::Date64 => {
            return Ok(cast(array, &DataType::Timestamp(TimeUnit::Microsecond, None))?)
        }
        _ => None,
    };

    let mut b = TimestampMicrosecondBuilder::new();
    match scaled {
        Some(values) => {
            for (row, v) in values.into_iter().enumerate() {
                if v.is_none() && array.is_valid(row) {
                    let raw = format!("{:?}", array.slice(row, 1));
                    mode.resolve::<i64>(None, column, row, &raw, "timestamp")?;
                }
                b.append_option(v);
            }
        }
        None => {
            let sarr = to_utf8(column, array)?;
            for (row, opt) in sarr.iter().enumerate() {
                let v = match opt {
                    Some(s) => mode.resolve(
                        date_parser::parse_timestamp_micros(s),
                        column,
                        row,
                        s,
                        "timestamp",
                    )?,
                    None => None,
                };
                b.append_option(v);
            }
        }
    }
    Ok(Arc::new(b.finish()))
}

/// Coerce a column to the physical type a schema asks for.
pub fn coerce_to(
    column: &str,
    array: &ArrayRef,
    ty: SemanticType,
    mode: Coercion,
) -> Result<ArrayRef> {
    match ty {
        SemanticType::Int64 => to_int64(column, array, mode),
        SemanticType::String => to_string_column(column, array),
        SemanticType::Timestamp => to_timestamp_micros(column, array, mode),
        SemanticType::Boolean => to_boolean(column, array, mode),
    }
}
