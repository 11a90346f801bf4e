//! Null column removal
//!
//! Drops fields that are null (or absent) in every record. The decision
//! is made per column over the whole record set, never per record, so
//! all surviving records keep an identical field set.

use serde_json::Value;
use std::collections::BTreeSet;

/// Remove columns that carry no data anywhere in the record set
///
/// Returns the filtered records and the sorted names of dropped columns.
/// An empty record set drops nothing.
pub fn drop_null_fields(mut records: Vec<Value>) -> (Vec<Value>, Vec<String>) {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut non_null: BTreeSet<String> = BTreeSet::new();

    for record in &records {
        if let Value::Object(obj) = record {
            for (field, value) in obj {
                seen.insert(field.clone());
                if !value.is_null() {
                    non_null.insert(field.clone());
                }
            }
        }
    }

    let dropped: Vec<String> = seen.difference(&non_null).cloned().collect();
    if dropped.is_empty() {
        return (records, dropped);
    }

    for record in &mut records {
        if let Value::Object(obj) = record {
            obj.retain(|field, _| non_null.contains(field));
        }
    }

    tracing::debug!("Dropped all-null columns: {}", dropped.join(", "));
    (records, dropped)
}
