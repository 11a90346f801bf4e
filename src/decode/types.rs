//! Decoder trait
//!
//! Defines the core decoding abstraction.

use crate::error::Result;
use serde_json::Value;

/// Trait for decoding raw file contents into records
pub trait RecordDecoder: Send + Sync {
    /// Decode file contents into a list of JSON object records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;
}
