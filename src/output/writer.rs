//! Parquet encoding
//!
//! Encodes Arrow RecordBatches as Parquet bytes. Files are assembled in
//! memory and handed to the storage layer for upload.

use crate::error::{Error, Result};
use crate::types::SinkCompression;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

/// Configuration for Parquet encoding
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder =
                builder.set_statistics_enabled(parquet::file::properties::EnabledStatistics::None);
        }

        builder.build()
    }
}

impl From<SinkCompression> for ParquetWriterConfig {
    fn from(compression: SinkCompression) -> Self {
        let compression = match compression {
            SinkCompression::Snappy => Compression::SNAPPY,
            SinkCompression::Zstd => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            SinkCompression::Gzip => Compression::GZIP(parquet::basic::GzipLevel::default()),
            SinkCompression::Uncompressed => Compression::UNCOMPRESSED,
        };
        Self::default().with_compression(compression)
    }
}

/// In-memory Parquet writer
pub struct ParquetWriter {
    writer: ArrowWriter<Vec<u8>>,
    rows_written: usize,
}

impl ParquetWriter {
    /// Create a new Parquet writer for the given schema
    pub fn new(schema: &Schema, config: &ParquetWriterConfig) -> Result<Self> {
        let props = config.build_properties();
        let writer = ArrowWriter::try_new(Vec::new(), Arc::new(schema.clone()), Some(props))
            .map_err(|e| Error::Output {
                message: format!("Failed to create Parquet writer: {e}"),
            })?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write a RecordBatch
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch).map_err(|e| Error::Output {
            message: format!("Failed to write batch: {e}"),
        })?;

        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Finalize the file and return the encoded bytes
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        self.writer.into_inner().map_err(|e| Error::Output {
            message: format!("Failed to close Parquet writer: {e}"),
        })
    }
}

/// Encode a single RecordBatch as a Parquet file
pub fn write_batch_to_bytes(
    batch: &RecordBatch,
    config: Option<&ParquetWriterConfig>,
) -> Result<Vec<u8>> {
    let default_config = ParquetWriterConfig::default();
    let config = config.unwrap_or(&default_config);

    let mut writer = ParquetWriter::new(batch.schema().as_ref(), config)?;
    writer.write(batch)?;
    writer.into_bytes()
}
