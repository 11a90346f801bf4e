//! Source reader
//!
//! # Overview
//!
//! Reads a catalogued table into memory with partition-predicate pushdown:
//! partitions whose key values fail the predicate are pruned before any
//! data file is listed or fetched. Records from surviving partitions get
//! their partition columns attached, since hive-layout data files do not
//! carry them.

mod partitions;

pub use partitions::{discover_partitions, parse_partition_dir, PartitionRef};

use crate::catalog::TableDef;
use crate::decode::{decoder_for, RecordDecoder};
use crate::error::{Error, Result};
use crate::predicate::Predicate;
use crate::storage::StorageLocation;
use serde_json::Value;

/// Result of scanning a table
#[derive(Debug, Default)]
pub struct ScanResult {
    /// All matching records
    pub records: Vec<Value>,
    /// Scan counters
    pub summary: ScanSummary,
}

/// Counters describing one table scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Partitions whose data was read
    pub partitions_scanned: usize,
    /// Partitions pruned by the pushdown predicate
    pub partitions_pruned: usize,
    /// Data files fetched and decoded
    pub files_read: usize,
}

/// Reads records from one catalogued table
pub struct SourceReader {
    table: TableDef,
    storage: StorageLocation,
}

impl SourceReader {
    /// Create a reader over a table definition and its parsed location
    pub fn new(table: TableDef, storage: StorageLocation) -> Self {
        Self { table, storage }
    }

    /// Open a reader by parsing the table's storage location
    pub fn open(table: &TableDef) -> Result<Self> {
        let storage = StorageLocation::parse(&table.location)?;
        Ok(Self::new(table.clone(), storage))
    }

    /// Scan the table, pruning partitions with the pushdown predicate
    pub async fn read(&self, predicate: Option<&Predicate>) -> Result<ScanResult> {
        if let Some(predicate) = predicate {
            check_predicate_columns(&self.table, predicate)?;
        }

        let decoder = decoder_for(&self.table.format);

        if self.table.is_partitioned() {
            self.read_partitioned(predicate, decoder.as_ref()).await
        } else {
            self.read_unpartitioned(decoder.as_ref()).await
        }
    }

    async fn read_partitioned(
        &self,
        predicate: Option<&Predicate>,
        decoder: &dyn RecordDecoder,
    ) -> Result<ScanResult> {
        let partitions = discover_partitions(&self.storage, &self.table.partition_keys).await?;
        let mut result = ScanResult::default();

        for partition in &partitions {
            let keep = match predicate {
                Some(predicate) => predicate.evaluate(&partition.value_map())?,
                None => true,
            };

            if !keep {
                tracing::debug!("Pruned partition {}", partition.spec());
                result.summary.partitions_pruned += 1;
                continue;
            }

            let before = result.records.len();
            self.read_partition_files(partition, decoder, &mut result)
                .await?;
            result.summary.partitions_scanned += 1;

            tracing::debug!(
                "Scanned partition {} ({} records)",
                partition.spec(),
                result.records.len() - before
            );
        }

        tracing::info!(
            "Scanned table {}: {} partitions read, {} pruned, {} files, {} records",
            self.table.qualified_name(),
            result.summary.partitions_scanned,
            result.summary.partitions_pruned,
            result.summary.files_read,
            result.records.len()
        );

        Ok(result)
    }

    async fn read_unpartitioned(&self, decoder: &dyn RecordDecoder) -> Result<ScanResult> {
        let mut result = ScanResult::default();
        let files = self.storage.list_files("").await?;

        for file in files.iter().filter(|f| is_data_file(f)) {
            self.decode_file(file, decoder, &[], &mut result.records)
                .await?;
            result.summary.files_read += 1;
        }

        tracing::info!(
            "Scanned table {}: {} files, {} records",
            self.table.qualified_name(),
            result.summary.files_read,
            result.records.len()
        );

        Ok(result)
    }

    async fn read_partition_files(
        &self,
        partition: &PartitionRef,
        decoder: &dyn RecordDecoder,
        result: &mut ScanResult,
    ) -> Result<()> {
        let files = self.storage.list_files(&partition.path).await?;

        for file in files.iter().filter(|f| is_data_file(f)) {
            self.decode_file(file, decoder, &partition.values, &mut result.records)
                .await?;
            result.summary.files_read += 1;
        }

        Ok(())
    }

    /// Fetch and decode one data file, attaching partition columns
    async fn decode_file(
        &self,
        file: &str,
        decoder: &dyn RecordDecoder,
        partition_values: &[(String, String)],
        records: &mut Vec<Value>,
    ) -> Result<()> {
        let bytes = self.storage.get(file).await?;
        let body = std::str::from_utf8(&bytes).map_err(|_| {
            Error::source(
                self.table.qualified_name(),
                format!("file '{file}' is not valid UTF-8"),
            )
        })?;

        for mut record in decoder.decode(body)? {
            let Some(obj) = record.as_object_mut() else {
                return Err(Error::source(
                    self.table.qualified_name(),
                    format!("file '{file}' contains a non-object record"),
                ));
            };

            for (key, value) in partition_values {
                obj.insert(key.clone(), Value::String(value.clone()));
            }

            records.push(record);
        }

        Ok(())
    }
}

/// A pushdown predicate may only reference partition columns
///
/// Static check against the table definition, no data access.
pub fn check_predicate_columns(table: &TableDef, predicate: &Predicate) -> Result<()> {
    for column in predicate.columns() {
        if !table.partition_keys.iter().any(|k| k == column) {
            return Err(Error::source(
                table.qualified_name(),
                format!("pushdown predicate references non-partition column '{column}'"),
            ));
        }
    }
    Ok(())
}

/// Marker and hidden files are not data
fn is_data_file(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    !(name.is_empty() || name.starts_with('.') || name.starts_with('_'))
}
