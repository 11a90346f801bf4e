//! Error types for trendsift
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for trendsift
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Catalog Errors
    // ============================================================================
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Table '{database}.{table}' not found in catalog")]
    TableNotFound { database: String, table: String },

    // ============================================================================
    // Predicate Errors
    // ============================================================================
    #[error("Predicate error at position {position}: {message}")]
    PredicateParse { position: usize, message: String },

    #[error("Predicate evaluation failed: {message}")]
    PredicateEval { message: String },

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Source error for table '{table}': {message}")]
    Source { table: String, message: String },

    #[error("Failed to decode {format} data: {message}")]
    Decode { format: String, message: String },

    // ============================================================================
    // Transform Errors
    // ============================================================================
    #[error("Mapping error: {message}")]
    Mapping { message: String },

    #[error("Unresolved choice type on field '{field}': observed {observed}")]
    UnresolvedChoice { field: String, observed: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },

    // ============================================================================
    // Job Errors
    // ============================================================================
    #[error("Job error: {message}")]
    Job { message: String },

    #[error("Commit failed for run '{run_id}': {message}")]
    Commit { run_id: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a table-not-found error
    pub fn table_not_found(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self::TableNotFound {
            database: database.into(),
            table: table.into(),
        }
    }

    /// Create a predicate parse error
    pub fn predicate_parse(position: usize, message: impl Into<String>) -> Self {
        Self::PredicateParse {
            position,
            message: message.into(),
        }
    }

    /// Create a predicate evaluation error
    pub fn predicate_eval(message: impl Into<String>) -> Self {
        Self::PredicateEval {
            message: message.into(),
        }
    }

    /// Create a source error
    pub fn source(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a mapping error
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::Mapping {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a job error
    pub fn job(message: impl Into<String>) -> Self {
        Self::Job {
            message: message.into(),
        }
    }
}

/// Result type alias for trendsift
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::table_not_found("data_youtube_raw", "raw_statistics");
        assert_eq!(
            err.to_string(),
            "Table 'data_youtube_raw.raw_statistics' not found in catalog"
        );

        let err = Error::predicate_parse(12, "unexpected token");
        assert_eq!(
            err.to_string(),
            "Predicate error at position 12: unexpected token"
        );

        let err = Error::decode("csv", "unterminated quote");
        assert_eq!(
            err.to_string(),
            "Failed to decode csv data: unterminated quote"
        );
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
