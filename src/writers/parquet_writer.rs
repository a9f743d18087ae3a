use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_BATCH_SIZE, DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDateTime};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Days between 0001-01-01 and the Unix epoch, for Date32 values.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
    batch_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Write the unified table, one record batch per `batch_size` rows.
    pub fn write_observations(&self, observations: &[Observation], path: &Path) -> Result<()> {
        let schema = observation_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in observations.chunks(self.batch_size) {
            let batch = observations_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        info!(
            path = %path.display(),
            rows = observations.len(),
            "Wrote observations to Parquet"
        );
        Ok(())
    }

    /// Get file metadata without reading the data
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)
            .map_err(|e| ProcessingError::InputFile(path.to_path_buf(), e))?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let columns = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let row_group_sizes = metadata.row_groups().iter().map(|rg| rg.num_rows()).collect();
        let compression = metadata
            .row_groups()
            .first()
            .and_then(|rg| rg.columns().first())
            .map(|c| c.compression());

        Ok(ParquetFileInfo {
            total_rows: file_metadata.num_rows(),
            row_groups: metadata.num_row_groups(),
            row_group_sizes,
            columns,
            file_size: std::fs::metadata(path)?.len(),
            compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn observation_schema() -> Arc<Schema> {
    let timestamp = DataType::Timestamp(TimeUnit::Microsecond, None);
    Arc::new(Schema::new(vec![
        Field::new("start_station_id", DataType::Utf8, false),
        Field::new("station_name", DataType::Utf8, false),
        Field::new("duration_minutes", DataType::Int64, true),
        Field::new("started_at", timestamp.clone(), false),
        Field::new("hour", DataType::UInt32, false),
        Field::new("day_of_week", DataType::UInt32, false),
        Field::new("is_weekend", DataType::Boolean, false),
        Field::new("date", DataType::Date32, false),
        Field::new("date_hour", DataType::Utf8, false),
        Field::new("weather_datetime", timestamp, true),
        Field::new("temp", DataType::Float64, true),
        Field::new("windspeed", DataType::Float64, true),
        Field::new("preciptype", DataType::Utf8, false),
        Field::new("windspeed_ms", DataType::Float64, true),
        Field::new("wind_bin", DataType::Utf8, true),
        Field::new("temp_bin", DataType::Utf8, true),
    ]))
}

fn micros(ts: &NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

fn observations_to_batch(rows: &[Observation], schema: Arc<Schema>) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.start_station_id.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.station_name.as_str()),
        )),
        Arc::new(Int64Array::from_iter(rows.iter().map(|r| r.duration_minutes))),
        Arc::new(TimestampMicrosecondArray::from_iter_values(
            rows.iter().map(|r| micros(&r.started_at)),
        )),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.time.hour))),
        Arc::new(UInt32Array::from_iter_values(
            rows.iter().map(|r| r.time.day_of_week),
        )),
        Arc::new(BooleanArray::from_iter(
            rows.iter().map(|r| Some(r.time.is_weekend)),
        )),
        Arc::new(Date32Array::from_iter_values(
            rows.iter()
                .map(|r| r.time.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
        )),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.time.date_hour.as_str()),
        )),
        Arc::new(TimestampMicrosecondArray::from_iter(
            rows.iter().map(|r| r.weather_datetime.as_ref().map(micros)),
        )),
        Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.temp))),
        Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.windspeed))),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.preciptype.as_str()),
        )),
        Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.windspeed_ms))),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.wind_bin.map(|b| b.as_str())),
        )),
        Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.temp_bin.map(|b| b.as_str())),
        )),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub row_group_sizes: Vec<i64>,
    pub columns: Vec<String>,
    pub file_size: u64,
    /// Codec of the first column chunk; `None` for a file without row groups.
    pub compression: Option<Compression>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };
        let compression = self
            .compression
            .map_or_else(|| "-".to_string(), |c| format!("{:?}", c));

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Columns: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.columns.join(", "),
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            compression,
            avg_rows
        )
    }
}
