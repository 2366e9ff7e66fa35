// src/io/writer.rs

use arrow::{
    array::{Array, ArrayRef, AsArray, TimestampMillisecondArray},
    datatypes::{DataType, Field, Int64Type, Schema, TimeUnit, TimestampMicrosecondType},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::ArrowWriter,
    basic::{
        BrotliLevel, Compression, ConvertedType, GzipLevel, LogicalType, Repetition,
        Type as PhysicalType, ZstdLevel,
    },
    data_type::{BoolType, ByteArray, ByteArrayType, Int64Type as ParquetInt64, Int96, Int96Type},
    errors::ParquetError,
    file::{
        properties::{WriterProperties, WriterVersion},
        writer::{SerializedColumnWriter, SerializedFileWriter},
    },
    schema::types::{Type, TypePtr},
};
use serde::Deserialize;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::process::conform::validate;
use crate::schema::Table;

/// Upper bound on rows per row group.
pub const ROW_GROUP_ROWS: usize = 1_000_000;

const MICROS_PER_DAY: i64 = 86_400_000_000;
const JULIAN_DAY_OF_EPOCH: i64 = 2_440_588;

/// Characters Spark refuses in column names.
const SPARK_RESERVED: &[char] = &[' ', ',', ';', '{', '}', '(', ')', '\n', '\t', '='];

/// Persistence options, named after the pyarrow `write_table` arguments they
/// stand in for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParquetOptions {
    pub compression: String,
    /// "ms" or "us"; ignored when writing INT96.
    pub coerce_timestamps: String,
    /// `None` means "only for the spark flavor".
    pub use_deprecated_int96_timestamps: Option<bool>,
    pub allow_truncated_timestamps: bool,
    pub version: String,
    pub use_dictionary: bool,
    pub flavor: Option<String>,
}

impl Default for ParquetOptions {
    fn default() -> Self {
        Self {
            compression: "SNAPPY".into(),
            coerce_timestamps: "us".into(),
            use_deprecated_int96_timestamps: Some(true),
            allow_truncated_timestamps: true,
            version: "2.6".into(),
            use_dictionary: true,
            flavor: Some("spark".into()),
        }
    }
}

impl ParquetOptions {
    pub fn compression(&self) -> Result<Compression> {
        Ok(match self.compression.to_ascii_uppercase().as_str() {
            "SNAPPY" => Compression::SNAPPY,
            "GZIP" => Compression::GZIP(GzipLevel::default()),
            "ZSTD" => Compression::ZSTD(ZstdLevel::default()),
            "BROTLI" => Compression::BROTLI(BrotliLevel::default()),
            "LZ4" => Compression::LZ4_RAW,
            "NONE" | "UNCOMPRESSED" => Compression::UNCOMPRESSED,
            other => return Err(Error::Config(format!("unknown compression {other:?}"))),
        })
    }

    pub fn writer_version(&self) -> Result<WriterVersion> {
        match self.version.as_str() {
            "1.0" => Ok(WriterVersion::PARQUET_1_0),
            "2.4" | "2.6" => Ok(WriterVersion::PARQUET_2_0),
            other => Err(Error::Config(format!("unsupported format version {other:?}"))),
        }
    }

    pub fn timestamp_unit(&self) -> Result<TimeUnit> {
        match self.coerce_timestamps.as_str() {
            "ms" => Ok(TimeUnit::Millisecond),
            "us" => Ok(TimeUnit::Microsecond),
            other => Err(Error::Config(format!(
                "coerce_timestamps must be \"ms\" or \"us\", got {other:?}"
            ))),
        }
    }

    pub fn is_spark(&self) -> bool {
        self.flavor
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("spark"))
    }

    pub fn writes_int96(&self) -> bool {
        self.use_deprecated_int96_timestamps
            .unwrap_or_else(|| self.is_spark())
    }

    pub fn validate(&self) -> Result<()> {
        self.compression()?;
        self.writer_version()?;
        self.timestamp_unit()?;
        match self.flavor.as_deref() {
            None => Ok(()),
            Some(_) if self.is_spark() => Ok(()),
            Some(other) => Err(Error::Config(format!("unknown flavor {other:?}"))),
        }
    }

    pub fn writer_properties(&self) -> Result<WriterProperties> {
        Ok(WriterProperties::builder()
            .set_compression(self.compression()?)
            .set_dictionary_enabled(self.use_dictionary)
            .set_writer_version(self.writer_version()?)
            .set_max_row_group_size(ROW_GROUP_ROWS)
            .build())
    }
}

/// `<output_dir>/<table>/<table>.parquet`
pub fn output_path(output_dir: &Path, table: Table) -> PathBuf {
    output_dir
        .join(table.name())
        .join(format!("{}.parquet", table.name()))
}

/// Writes cleaned tables as Parquet files.
#[derive(Debug, Clone)]
pub struct ParquetSink {
    options: ParquetOptions,
    props: WriterProperties,
}

impl ParquetSink {
    pub fn new(options: ParquetOptions) -> Result<Self> {
        options.validate()?;
        let props = options.writer_properties()?;
        Ok(Self { options, props })
    }

    pub fn options(&self) -> &ParquetOptions {
        &self.options
    }

    /// Write `batch` to `path` and return the file size in bytes.
    ///
    /// The batch must match `table`'s registered schema. Data goes to a
    /// temporary file next to `path` and is renamed into place once closed;
    /// a failed write leaves nothing behind.
    #[tracing::instrument(level = "info", skip_all, fields(table = %table, rows = batch.num_rows()))]
    pub fn write(&self, table: Table, batch: &RecordBatch, path: &Path) -> Result<u64> {
        validate(table, batch)?;
        let batch = if self.options.is_spark() {
            sanitize_field_names(batch)?
        } else {
            batch.clone()
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut temp = NamedTempFile::new_in(dir)?;

        if self.options.writes_int96() {
            self.write_int96(temp.as_file_mut(), &batch)?;
        } else {
            let batch = coerce_timestamps(
                &batch,
                self.options.timestamp_unit()?,
                self.options.allow_truncated_timestamps,
            )?;
            let mut writer =
                ArrowWriter::try_new(temp.as_file_mut(), batch.schema(), Some(self.props.clone()))?;
            writer.write(&batch)?;
            writer.close()?;
        }

        temp.persist(path).map_err(|e| e.error)?;
        let bytes = fs::metadata(path)?.len();
        info!(path = %path.display(), bytes, "wrote parquet");
        Ok(bytes)
    }

    /// Column-at-a-time writer that stores timestamps as legacy INT96.
    fn write_int96<W: Write + Send>(&self, out: W, batch: &RecordBatch) -> Result<()> {
        let schema = int96_schema(batch)?;
        let mut writer = SerializedFileWriter::new(out, schema, Arc::new(self.props.clone()))?;

        let mut offset = 0;
        while offset < batch.num_rows() {
            let len = ROW_GROUP_ROWS.min(batch.num_rows() - offset);
            let slice = batch.slice(offset, len);
            let mut row_group = writer.next_row_group()?;
            for (field, column) in slice.schema().fields().iter().zip(slice.columns()) {
                let mut col_writer = row_group.next_column()?.ok_or_else(|| {
                    ParquetError::General(format!("no column writer for {}", field.name()))
                })?;
                write_column(field.name(), column, &mut col_writer)?;
                col_writer.close()?;
            }
            row_group.close()?;
            debug!(offset, rows = len, "wrote row group");
            offset += len;
        }

        writer.close()?;
        Ok(())
    }
}

fn spark_field_name(name: &str) -> String {
    name.chars()
        .map(|c| if SPARK_RESERVED.contains(&c) { '_' } else { c })
        .collect()
}

fn sanitize_field_names(batch: &RecordBatch) -> Result<RecordBatch> {
    let fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone().with_name(spark_field_name(f.name())))
        .collect();
    Ok(RecordBatch::try_new(
        Arc::new(Schema::new(fields)),
        batch.columns().to_vec(),
    )?)
}

/// Bring µs timestamp columns to `unit`, refusing to drop precision unless
/// `allow_truncated` is set.
fn coerce_timestamps(batch: &RecordBatch, unit: TimeUnit, allow_truncated: bool) -> Result<RecordBatch> {
    if unit == TimeUnit::Microsecond {
        return Ok(batch.clone());
    }

    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());
    for (field, column) in batch.schema().fields().iter().zip(batch.columns()) {
        if !matches!(field.data_type(), DataType::Timestamp(TimeUnit::Microsecond, _)) {
            fields.push(field.as_ref().clone());
            columns.push(column.clone());
            continue;
        }
        let micros = column.as_primitive::<TimestampMicrosecondType>();
        let mut millis = Vec::with_capacity(micros.len());
        for (row, v) in micros.iter().enumerate() {
            if let Some(v) = v {
                if !allow_truncated && v.rem_euclid(1_000) != 0 {
                    return Err(Error::TruncatedTimestamp {
                        column: field.name().clone(),
                        row,
                    });
                }
            }
            millis.push(v.map(|v| v.div_euclid(1_000)));
        }
        fields.push(Field::new(
            field.name(),
            DataType::Timestamp(TimeUnit::Millisecond, None),
            field.is_nullable(),
        ));
        columns.push(Arc::new(TimestampMillisecondArray::from(millis)));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

fn int96_schema(batch: &RecordBatch) -> Result<TypePtr> {
    let mut fields = Vec::with_capacity(batch.num_columns());
    for field in batch.schema().fields() {
        let name = field.name().as_str();
        let builder = match field.data_type() {
            DataType::Int64 => Type::primitive_type_builder(name, PhysicalType::INT64),
            DataType::Boolean => Type::primitive_type_builder(name, PhysicalType::BOOLEAN),
            DataType::Utf8 => Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
                .with_logical_type(Some(LogicalType::String))
                .with_converted_type(ConvertedType::UTF8),
            DataType::Timestamp(TimeUnit::Microsecond, _) => {
                Type::primitive_type_builder(name, PhysicalType::INT96)
            }
            other => {
                return Err(Error::UnsupportedType {
                    column: field.name().clone(),
                    data_type: other.clone(),
                })
            }
        };
        fields.push(Arc::new(builder.with_repetition(Repetition::OPTIONAL).build()?));
    }
    Ok(Arc::new(
        Type::group_type_builder("schema").with_fields(fields).build()?,
    ))
}

/// Nanoseconds of day in the first 8 bytes, Julian day in the last 4.
fn micros_to_int96(micros: i64) -> Int96 {
    let day = micros.div_euclid(MICROS_PER_DAY) + JULIAN_DAY_OF_EPOCH;
    let nanos = micros.rem_euclid(MICROS_PER_DAY) * 1_000;
    let mut v = Int96::new();
    v.set_data(nanos as u32, (nanos >> 32) as u32, day as u32);
    v
}

fn write_column(name: &str, column: &ArrayRef, writer: &mut SerializedColumnWriter<'_>) -> Result<()> {
    let def_levels: Vec<i16> = (0..column.len())
        .map(|i| i16::from(column.is_valid(i)))
        .collect();

    match column.data_type() {
        DataType::Int64 => {
            let values: Vec<i64> = column.as_primitive::<Int64Type>().iter().flatten().collect();
            writer
                .typed::<ParquetInt64>()
                .write_batch(&values, Some(&def_levels), None)?;
        }
        DataType::Boolean => {
            let values: Vec<bool> = column.as_boolean().iter().flatten().collect();
            writer
                .typed::<BoolType>()
                .write_batch(&values, Some(&def_levels), None)?;
        }
        DataType::Utf8 => {
            let values: Vec<ByteArray> = column
                .as_string::<i32>()
                .iter()
                .flatten()
                .map(ByteArray::from)
                .collect();
            writer
                .typed::<ByteArrayType>()
                .write_batch(&values, Some(&def_levels), None)?;
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            let values: Vec<Int96> = column
                .as_primitive::<TimestampMicrosecondType>()
                .iter()
                .flatten()
                .map(micros_to_int96)
                .collect();
            writer
                .typed::<Int96Type>()
                .write_batch(&values, Some(&def_levels), None)?;
        }
        other => {
            return Err(Error::UnsupportedType {
                column: name.to_string(),
                data_type: other.clone(),
            })
        }
    }
    Ok(())
}
