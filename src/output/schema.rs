//! Declared schema to Arrow conversion
//!
//! The output schema comes from the field mappings, not from the data:
//! column order follows the mapping order, types follow the declared
//! target types. Choice fields become struct columns with one child per
//! observed type.

use crate::config::FieldMapping;
use crate::error::{Error, Result};
use crate::transform::ChoiceReport;
use crate::types::FieldType;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray, StructArray};
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::sync::Arc;

/// Arrow data type for a declared field type
#[must_use]
pub fn arrow_type(field_type: FieldType) -> DataType {
    match field_type {
        FieldType::Boolean => DataType::Boolean,
        FieldType::Double => DataType::Float64,
        FieldType::Long => DataType::Int64,
        FieldType::String => DataType::Utf8,
    }
}

/// Build the output schema from the declared mappings
///
/// Fields appear in mapping order; names in `exclude` (dropped columns,
/// partition keys) are skipped. A field named in the choice report
/// becomes a struct with one nullable child per observed type, in
/// type-name order. Every field is nullable.
pub fn output_schema(
    mappings: &[FieldMapping],
    choices: &ChoiceReport,
    exclude: &[String],
) -> Schema {
    let mut fields: Vec<Field> = Vec::new();

    for mapping in mappings {
        if exclude.iter().any(|name| name == &mapping.target) {
            continue;
        }

        let data_type = match choices.observed(&mapping.target) {
            Some(types) => {
                let children: Vec<Field> = types
                    .iter()
                    .map(|t| Field::new(t.name(), arrow_type(*t), true))
                    .collect();
                DataType::Struct(Fields::from(children))
            }
            None => arrow_type(mapping.target_type),
        };

        fields.push(Field::new(&mapping.target, data_type, true));
    }

    Schema::new(fields)
}

/// Convert transformed records to an Arrow RecordBatch
///
/// Column values are taken by field name; a value that does not match
/// the column type becomes null.
pub fn records_to_batch(records: &[Value], schema: &Schema) -> Result<RecordBatch> {
    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema.clone())));
    }

    let mut columns: Vec<ArrayRef> = Vec::new();

    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records
            .iter()
            .map(|record| {
                if let Value::Object(obj) = record {
                    obj.get(field.name())
                } else {
                    None
                }
            })
            .collect();

        let array = build_array(&values, field.data_type())?;
        columns.push(array);
    }

    RecordBatch::try_new(Arc::new(schema.clone()), columns).map_err(|e| Error::Output {
        message: format!("Failed to create RecordBatch: {e}"),
    })
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            #[allow(clippy::cast_precision_loss)]
            let arr: Float64Array = values
                .iter()
                .map(|v| v.and_then(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64))))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| v.and_then(Value::as_str).map(ToString::to_string))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Struct(fields) => build_struct_array(values, fields),

        other => Err(Error::Output {
            message: format!("Unsupported output column type: {other}"),
        }),
    }
}

/// Build a struct array from single-key wrapper objects
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut child_arrays: Vec<ArrayRef> = Vec::new();

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| {
                v.and_then(|v| {
                    if let Value::Object(obj) = v {
                        obj.get(field.name())
                    } else {
                        None
                    }
                })
            })
            .collect();

        let child_array = build_array(&child_values, field.data_type())?;
        child_arrays.push(child_array);
    }

    let struct_array = StructArray::new(fields.clone(), child_arrays, None);
    Ok(Arc::new(struct_array))
}
