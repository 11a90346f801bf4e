//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet encoding.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Building the output Arrow schema from the declared field mappings
//! - Converting transformed JSON records to Arrow RecordBatches
//! - Encoding RecordBatches as Parquet bytes for upload

mod schema;
mod writer;

pub use schema::{arrow_type, output_schema, records_to_batch};
pub use writer::{write_batch_to_bytes, ParquetWriter, ParquetWriterConfig};
