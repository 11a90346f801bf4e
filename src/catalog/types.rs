//! Catalog table definitions

use crate::error::{Error, Result};
use crate::types::{DataFormat, FieldType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A declared column of a catalogued table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Declared scalar type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// A table definition in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    /// Database the table belongs to
    pub database: String,

    /// Table name
    pub name: String,

    /// Storage location URL of the table's data
    pub location: String,

    /// Storage format of the data files
    #[serde(default)]
    pub format: DataFormat,

    /// Partition key column names, outermost first
    #[serde(default)]
    pub partition_keys: Vec<String>,

    /// Declared data columns (partition keys are not listed here)
    #[serde(default)]
    pub columns: Vec<ColumnDef>,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

impl TableDef {
    /// Fully qualified `database.table` name
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }

    /// Whether the table is partitioned
    pub fn is_partitioned(&self) -> bool {
        !self.partition_keys.is_empty()
    }

    /// Validate the definition
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(Error::catalog("Table database cannot be empty"));
        }

        if self.name.is_empty() {
            return Err(Error::catalog("Table name cannot be empty"));
        }

        if self.location.is_empty() {
            return Err(Error::catalog(format!(
                "Table '{}' has no storage location",
                self.qualified_name()
            )));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for key in &self.partition_keys {
            if !seen.insert(key.as_str()) {
                return Err(Error::catalog(format!(
                    "Table '{}' repeats partition key '{key}'",
                    self.qualified_name()
                )));
            }
        }

        for column in &self.columns {
            if seen.contains(column.name.as_str()) {
                return Err(Error::catalog(format!(
                    "Table '{}' declares '{}' as both a column and a partition key",
                    self.qualified_name(),
                    column.name
                )));
            }
        }

        Ok(())
    }
}
