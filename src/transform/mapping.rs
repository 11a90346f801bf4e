//! Declarative schema mapping
//!
//! Applies an ordered list of field mappings to every record: the output
//! record carries exactly the mapped target fields. Values are coerced to
//! the declared target type on a best-effort basis; a value that cannot
//! be coerced keeps its observed value so the choice resolver sees the
//! divergence instead of losing it.

use crate::config::FieldMapping;
use crate::error::{Error, Result};
use crate::types::FieldType;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Applies a declared field mapping to records
pub struct SchemaMapper {
    mappings: Vec<FieldMapping>,
}

impl SchemaMapper {
    /// Create a mapper, validating the mapping list
    pub fn new(mappings: Vec<FieldMapping>) -> Result<Self> {
        if mappings.is_empty() {
            return Err(Error::mapping("Mapping list cannot be empty"));
        }

        let mut targets: HashSet<&str> = HashSet::new();
        for mapping in &mappings {
            if !targets.insert(mapping.target.as_str()) {
                return Err(Error::mapping(format!(
                    "Duplicate mapping target '{}'",
                    mapping.target
                )));
            }
        }

        Ok(Self { mappings })
    }

    /// The declared mappings, in output order
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Map every record to the declared shape
    ///
    /// Unmapped incoming fields are discarded; a missing source field
    /// becomes a null target field.
    pub fn apply(&self, records: Vec<Value>) -> Result<Vec<Value>> {
        let mut mapped = Vec::with_capacity(records.len());

        for record in records {
            let Value::Object(mut obj) = record else {
                return Err(Error::mapping("Expected an object record"));
            };

            let mut out = Map::new();
            for mapping in &self.mappings {
                let value = obj.remove(&mapping.source).unwrap_or(Value::Null);
                out.insert(mapping.target.clone(), coerce(value, mapping.target_type));
            }

            mapped.push(Value::Object(out));
        }

        Ok(mapped)
    }
}

/// Best-effort coercion to a declared type
///
/// Uncoercible scalars are returned unchanged. Arrays and objects that
/// fail coercion are rendered to their JSON text so the value stream
/// stays scalar.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn coerce(value: Value, target: FieldType) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    match target {
        FieldType::String => match value {
            Value::String(_) => value,
            Value::Bool(b) => Value::String(b.to_string()),
            Value::Number(n) => Value::String(n.to_string()),
            other => Value::String(other.to_string()),
        },

        FieldType::Long => match &value {
            Value::Number(n) => {
                if n.is_i64() {
                    value
                } else if let Some(f) = n.as_f64() {
                    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                        Value::Number((f as i64).into())
                    } else {
                        value
                    }
                } else {
                    value
                }
            }
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => value,
            },
            Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
            _ => value,
        },

        FieldType::Double => match &value {
            Value::Number(n) => {
                if n.is_f64() {
                    value
                } else if let Some(f) = n.as_i64().map(|i| i as f64) {
                    serde_json::Number::from_f64(f).map_or(value, Value::Number)
                } else {
                    value
                }
            }
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(f) => serde_json::Number::from_f64(f).map_or(value, Value::Number),
                Err(_) => value,
            },
            Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
            _ => value,
        },

        FieldType::Boolean => match &value {
            Value::Bool(_) => value,
            Value::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" => Value::Bool(true),
                "false" | "no" => Value::Bool(false),
                _ => value,
            },
            Value::Number(n) => match n.as_i64() {
                Some(0) => Value::Bool(false),
                Some(1) => Value::Bool(true),
                _ => value,
            },
            Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
            _ => value,
        },
    }
}
