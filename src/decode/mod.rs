//! Source file decoders
//!
//! Supports: CSV, JSON, JSONL
//!
//! # Overview
//!
//! The decode module turns raw file contents from a catalogued table into
//! JSON records. The decoder for a table is chosen from its declared
//! storage format.

mod decoders;
mod types;

pub use decoders::{CsvDecoder, JsonDecoder, JsonlDecoder};
pub use types::RecordDecoder;

use crate::types::DataFormat;

/// Build the decoder for a table's declared storage format
pub fn decoder_for(format: &DataFormat) -> Box<dyn RecordDecoder> {
    match format {
        DataFormat::Csv { delimiter, header } => {
            Box::new(CsvDecoder::with_options(*delimiter, *header))
        }
        DataFormat::Json => Box::new(JsonDecoder),
        DataFormat::Jsonl => Box::new(JsonlDecoder),
    }
}

#[cfg(test)]
mod tests;
