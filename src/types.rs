//! Common types used throughout trendsift

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Convenience alias for JSON values
pub type JsonValue = serde_json::Value;

/// Convenience alias for JSON objects
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Field Types
// ============================================================================

/// Scalar type of a record field
///
/// These are the types a field can be declared as in a mapping, and also
/// the types the resolver can observe in flight. Ordering is alphabetical
/// by wire name so choice structs have a stable child order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Boolean (true/false)
    Boolean,
    /// 64-bit float
    Double,
    /// 64-bit integer
    Long,
    /// UTF-8 string
    String,
}

impl FieldType {
    /// Wire name of this type, used in configs and choice struct keys
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Double => "double",
            FieldType::Long => "long",
            FieldType::String => "string",
        }
    }

    /// Observe the scalar type of an in-flight value
    ///
    /// Nulls have no observable type. Arrays and objects are observed as
    /// strings since they are rendered to their JSON text downstream.
    pub fn observed(value: &Value) -> Option<FieldType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(FieldType::Boolean),
            Value::Number(n) => {
                if n.is_i64() {
                    Some(FieldType::Long)
                } else {
                    Some(FieldType::Double)
                }
            }
            Value::String(_) => Some(FieldType::String),
            Value::Array(_) | Value::Object(_) => Some(FieldType::String),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Data Formats
// ============================================================================

/// Storage format of a catalogued table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataFormat {
    /// Delimiter-separated values
    Csv {
        /// Field delimiter (default: comma)
        #[serde(default = "default_delimiter")]
        delimiter: char,
        /// Whether the first row is a header
        #[serde(default = "default_true")]
        header: bool,
    },
    /// A JSON document per file (array or single object)
    Json,
    /// One JSON object per line
    Jsonl,
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

impl Default for DataFormat {
    fn default() -> Self {
        DataFormat::Csv {
            delimiter: ',',
            header: true,
        }
    }
}

impl DataFormat {
    /// Short name for error messages and logs
    pub fn name(&self) -> &'static str {
        match self {
            DataFormat::Csv { .. } => "csv",
            DataFormat::Json => "json",
            DataFormat::Jsonl => "jsonl",
        }
    }
}

// ============================================================================
// Sink Formats
// ============================================================================

/// Output file format of a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    /// Apache Parquet (default)
    #[default]
    Parquet,
}

/// Compression codec for sink files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkCompression {
    /// Snappy (default)
    #[default]
    Snappy,
    /// Zstandard
    Zstd,
    /// Gzip
    Gzip,
    /// No compression
    Uncompressed,
}

impl SinkCompression {
    /// File name infix for this codec (Spark-style), empty when uncompressed
    pub fn file_infix(self) -> &'static str {
        match self {
            SinkCompression::Snappy => ".snappy",
            SinkCompression::Zstd => ".zstd",
            SinkCompression::Gzip => ".gz",
            SinkCompression::Uncompressed => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_names() {
        assert_eq!(FieldType::String.name(), "string");
        assert_eq!(FieldType::Long.name(), "long");
        assert_eq!(FieldType::Double.name(), "double");
        assert_eq!(FieldType::Boolean.name(), "boolean");
    }

    #[test]
    fn test_field_type_yaml_round_trip() {
        let ft: FieldType = serde_yaml::from_str("long").unwrap();
        assert_eq!(ft, FieldType::Long);
        assert_eq!(serde_yaml::to_string(&ft).unwrap().trim(), "long");
    }

    #[test]
    fn test_field_type_ordering_is_alphabetical() {
        let mut types = vec![FieldType::String, FieldType::Long, FieldType::Boolean];
        types.sort();
        assert_eq!(
            types,
            vec![FieldType::Boolean, FieldType::Long, FieldType::String]
        );
    }

    #[test]
    fn test_observed_types() {
        assert_eq!(FieldType::observed(&json!(null)), None);
        assert_eq!(FieldType::observed(&json!(true)), Some(FieldType::Boolean));
        assert_eq!(FieldType::observed(&json!(42)), Some(FieldType::Long));
        assert_eq!(FieldType::observed(&json!(4.2)), Some(FieldType::Double));
        assert_eq!(FieldType::observed(&json!("ca")), Some(FieldType::String));
        assert_eq!(FieldType::observed(&json!([1, 2])), Some(FieldType::String));
    }

    #[test]
    fn test_data_format_default_csv() {
        let format: DataFormat = serde_yaml::from_str("type: csv").unwrap();
        assert_eq!(
            format,
            DataFormat::Csv {
                delimiter: ',',
                header: true
            }
        );
        assert_eq!(format.name(), "csv");
    }

    #[test]
    fn test_data_format_custom_delimiter() {
        let yaml = "type: csv\ndelimiter: \"\\t\"\nheader: false\n";
        let format: DataFormat = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            format,
            DataFormat::Csv {
                delimiter: '\t',
                header: false
            }
        );
    }

    #[test]
    fn test_sink_compression_infix() {
        assert_eq!(SinkCompression::Snappy.file_infix(), ".snappy");
        assert_eq!(SinkCompression::Uncompressed.file_infix(), "");
    }
}
