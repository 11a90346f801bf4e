//! Partitioned Parquet sink
//!
//! Writes transformed records to the configured storage location as
//! Hive-partitioned Parquet files. Records are grouped by their partition
//! key values, partition columns are stripped from the file data (they
//! live in the directory names), and each group is coalesced into at
//! most the configured number of files.

use crate::config::{FieldMapping, SinkConfig};
use crate::error::Result;
use crate::output::{output_schema, records_to_batch, write_batch_to_bytes, ParquetWriterConfig};
use crate::storage::StorageLocation;
use crate::transform::ChoiceReport;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Directory value for records missing a partition key
pub const HIVE_DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// One data file written by the sink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrittenFile {
    /// Path relative to the sink location
    pub path: String,
    /// Full storage URL
    pub url: String,
    /// Rows in the file
    pub rows: usize,
    /// Encoded size in bytes
    pub bytes: usize,
}

/// Summary of one sink run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkReport {
    /// Written files, in partition then file order
    pub files: Vec<WrittenFile>,
    /// Partition directories written, sorted
    pub partitions: Vec<String>,
    /// Total rows across all files
    pub rows_written: usize,
}

/// Writes record sets as partitioned Parquet
pub struct SinkWriter {
    config: SinkConfig,
    storage: StorageLocation,
}

impl SinkWriter {
    /// Create a writer over an already-opened storage location
    pub fn new(config: SinkConfig, storage: StorageLocation) -> Self {
        Self { config, storage }
    }

    /// Open the configured sink location
    pub fn open(config: &SinkConfig) -> Result<Self> {
        let storage = StorageLocation::parse(&config.path)?;
        Ok(Self::new(config.clone(), storage))
    }

    /// Write the record set
    ///
    /// The file schema is the mapped schema minus partition keys and
    /// dropped columns. File names carry the run id so reruns never
    /// collide. An empty record set writes nothing.
    pub async fn write(
        &self,
        records: Vec<Value>,
        mappings: &[FieldMapping],
        choices: &ChoiceReport,
        dropped: &[String],
        run_id: &str,
    ) -> Result<SinkReport> {
        if records.is_empty() {
            tracing::warn!("No records to write, sink is a no-op");
            return Ok(SinkReport::default());
        }

        let mut exclude: Vec<String> = self.config.partition_keys.clone();
        exclude.extend(dropped.iter().cloned());
        let schema = output_schema(mappings, choices, &exclude);

        let groups = self.group_by_partition(records);
        let writer_config = ParquetWriterConfig::from(self.config.compression);
        let infix = self.config.compression.file_infix();

        let mut report = SinkReport::default();

        for (dir, group) in groups {
            let files = coalesce_chunks(group, self.config.coalesce);
            tracing::debug!(
                partition = %display_partition(&dir),
                files = files.len(),
                "Writing partition group"
            );

            for (index, chunk) in files.into_iter().enumerate() {
                let batch = records_to_batch(&chunk, &schema)?;
                let bytes = write_batch_to_bytes(&batch, Some(&writer_config))?;

                let name = format!("part-{index:05}-{run_id}{infix}.parquet");
                let path = if dir.is_empty() {
                    name
                } else {
                    format!("{dir}/{name}")
                };

                let size = bytes.len();
                let url = self.storage.put(&path, Bytes::from(bytes)).await?;
                tracing::info!(url = %url, rows = chunk.len(), bytes = size, "Wrote data file");

                report.rows_written += chunk.len();
                report.files.push(WrittenFile {
                    path,
                    url,
                    rows: chunk.len(),
                    bytes: size,
                });
            }

            if !dir.is_empty() {
                report.partitions.push(dir);
            }
        }

        Ok(report)
    }

    /// Group records by partition directory, removing partition columns
    fn group_by_partition(&self, records: Vec<Value>) -> BTreeMap<String, Vec<Value>> {
        let mut groups: BTreeMap<String, Vec<Value>> = BTreeMap::new();

        for mut record in records {
            let dir = match record.as_object_mut() {
                Some(obj) => {
                    let mut parts: Vec<String> = Vec::new();
                    for key in &self.config.partition_keys {
                        let value = obj.remove(key).unwrap_or(Value::Null);
                        parts.push(format!("{key}={}", partition_value(&value)));
                    }
                    parts.join("/")
                }
                None => String::new(),
            };

            groups.entry(dir).or_default().push(record);
        }

        groups
    }
}

/// Render a partition value for use in a directory name
fn partition_value(value: &Value) -> String {
    let raw = match value {
        Value::Null => return HIVE_DEFAULT_PARTITION.to_string(),
        Value::String(s) if s.is_empty() => return HIVE_DEFAULT_PARTITION.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };

    escape_partition_value(&raw)
}

/// Percent-encode the characters that would break a directory name
fn escape_partition_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '/' | '\\' | '=' | '%' | '#' => {
                out.push('%');
                out.push_str(&format!("{:02X}", u32::from(c)));
            }
            c if c.is_control() => {
                out.push('%');
                out.push_str(&format!("{:02X}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out
}

/// Split a group into at most `coalesce` near-even chunks
fn coalesce_chunks(records: Vec<Value>, coalesce: usize) -> Vec<Vec<Value>> {
    let files = coalesce.max(1).min(records.len().max(1));
    let per_file = records.len().div_ceil(files);

    let mut chunks: Vec<Vec<Value>> = Vec::with_capacity(files);
    let mut current: Vec<Value> = Vec::with_capacity(per_file);

    for record in records {
        current.push(record);
        if current.len() == per_file {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn display_partition(dir: &str) -> &str {
    if dir.is_empty() {
        "(unpartitioned)"
    } else {
        dir
    }
}
