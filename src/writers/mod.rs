pub mod aggregate_writer;
pub mod parquet_writer;

pub use aggregate_writer::{AggregateWriter, RunSummary};
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
