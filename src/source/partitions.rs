//! Hive-style partition discovery
//!
//! Partitioned tables lay data out as one directory level per partition
//! key, named `key=value`. Discovery walks one level per declared key and
//! collects the value tuple and storage path of every leaf partition.

use crate::error::Result;
use crate::storage::StorageLocation;
use std::collections::HashMap;

/// One discovered partition of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRef {
    /// Partition key values in key order
    pub values: Vec<(String, String)>,
    /// Path of the partition directory relative to the table location
    pub path: String,
}

impl PartitionRef {
    /// Values as a map for predicate evaluation
    pub fn value_map(&self) -> HashMap<String, String> {
        self.values.iter().cloned().collect()
    }

    /// Human-readable `k=v/…` spec for logs
    pub fn spec(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Parse a `key=value` directory name
pub fn parse_partition_dir(name: &str) -> Option<(String, String)> {
    let (key, value) = name.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

/// Discover all leaf partitions under a table location
///
/// Walks one directory level per partition key; directories that do not
/// match `key=value` for the expected key are ignored.
pub async fn discover_partitions(
    storage: &StorageLocation,
    partition_keys: &[String],
) -> Result<Vec<PartitionRef>> {
    let mut found = vec![PartitionRef {
        values: Vec::new(),
        path: String::new(),
    }];

    for expected_key in partition_keys {
        let mut next = Vec::new();

        for parent in &found {
            for dir in storage.list_dirs(&parent.path).await? {
                let Some((key, value)) = parse_partition_dir(&dir) else {
                    tracing::debug!("Skipping non-partition directory '{dir}'");
                    continue;
                };
                if key != *expected_key {
                    tracing::debug!(
                        "Skipping directory '{dir}': expected partition key '{expected_key}'"
                    );
                    continue;
                }

                let mut values = parent.values.clone();
                values.push((key, value));
                let path = if parent.path.is_empty() {
                    dir
                } else {
                    format!("{}/{dir}", parent.path)
                };
                next.push(PartitionRef { values, path });
            }
        }

        found = next;
    }

    Ok(found)
}
