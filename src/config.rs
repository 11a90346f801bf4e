//! Job definition configuration
//!
//! This module contains the configuration structures that define an ETL
//! job in YAML format, plus the loader that resolves built-in job names
//! or file paths.

use crate::error::{Error, Result};
use crate::jobs;
use crate::predicate::Predicate;
use crate::types::{FieldType, SinkCompression, SinkFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// ============================================================================
// Top-Level Job Config
// ============================================================================

/// Complete job configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Kind of config (always "job")
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Config version
    #[serde(default = "default_version")]
    pub version: String,

    /// Unique job definition name (e.g. "raw-statistics-cleansed")
    pub name: String,

    /// Description of the job
    #[serde(default)]
    pub description: Option<String>,

    /// Source table and pushdown predicate
    pub source: SourceConfig,

    /// Field mappings applied to every record, in output order
    pub mappings: Vec<FieldMapping>,

    /// How fields observed with multiple types are resolved
    #[serde(default)]
    pub resolve_choice: ChoicePolicy,

    /// Whether columns that are null in every record are dropped
    #[serde(default = "default_true")]
    pub drop_null_fields: bool,

    /// Output destination
    pub sink: SinkConfig,
}

fn default_kind() -> String {
    "job".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Source Config
// ============================================================================

/// Source side of a job: a catalogued table plus an optional predicate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Catalog database name
    pub database: String,

    /// Catalog table name
    pub table: String,

    /// Pushdown predicate over partition columns
    #[serde(default)]
    pub push_down_predicate: Option<String>,
}

// ============================================================================
// Mappings
// ============================================================================

/// One field mapping: source field and type to target field and type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Source field name
    pub source: String,

    /// Declared source type
    pub source_type: FieldType,

    /// Target field name
    pub target: String,

    /// Declared target type
    pub target_type: FieldType,
}

// ============================================================================
// Choice Policy
// ============================================================================

/// Strategy for fields observed with more than one type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ChoicePolicy {
    /// Wrap ambiguous values in a struct keyed by type name (default)
    #[default]
    MakeStruct,
    /// Project every ambiguous value to one type, nulling mismatches
    Cast {
        /// Type to project to
        #[serde(rename = "type")]
        to: FieldType,
    },
    /// Fail the run when any field is ambiguous
    Strict,
}

// ============================================================================
// Sink Config
// ============================================================================

/// Output destination of a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Storage location URL for output files
    pub path: String,

    /// Output file format
    #[serde(default)]
    pub format: SinkFormat,

    /// Compression codec
    #[serde(default)]
    pub compression: SinkCompression,

    /// Target fields used to partition the output, outermost first
    #[serde(default)]
    pub partition_keys: Vec<String>,

    /// Maximum data files per partition group
    #[serde(default = "default_coalesce")]
    pub coalesce: usize,
}

fn default_coalesce() -> usize {
    1
}

// ============================================================================
// Loading and Validation
// ============================================================================

/// Load a job definition from a built-in name or a file path
///
/// The input is first checked against the built-in job registry (e.g.
/// "raw-statistics-cleansed"), then treated as a path to a YAML file.
pub fn load_job(path: impl AsRef<Path>) -> Result<JobConfig> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    // Built-in job names carry no path separators or extension
    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = jobs::get_builtin(&path_str) {
            return load_job_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            let builtin_list = jobs::list_builtin().join(", ");
            Error::config(format!(
                "Job '{}' not found. Built-in jobs: {}. Or provide a path to a YAML file.",
                path.display(),
                builtin_list
            ))
        } else {
            Error::config(format!(
                "Failed to read job file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_job_from_str(&content)
}

/// Load a job definition from a YAML string
pub fn load_job_from_str(yaml: &str) -> Result<JobConfig> {
    let config: JobConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse job YAML: {e}")))?;

    validate_job(&config)?;
    Ok(config)
}

/// Validate a job configuration
fn validate_job(config: &JobConfig) -> Result<()> {
    if config.name.is_empty() {
        return Err(Error::config("Job name cannot be empty"));
    }

    if config.source.database.is_empty() || config.source.table.is_empty() {
        return Err(Error::config(
            "Job source must name a catalog database and table",
        ));
    }

    if config.mappings.is_empty() {
        return Err(Error::config("Job must declare at least one mapping"));
    }

    let mut targets: HashSet<&str> = HashSet::new();
    for mapping in &config.mappings {
        if mapping.source.is_empty() || mapping.target.is_empty() {
            return Err(Error::config("Mapping fields cannot be empty"));
        }
        if !targets.insert(mapping.target.as_str()) {
            return Err(Error::config(format!(
                "Duplicate mapping target '{}'",
                mapping.target
            )));
        }
    }

    if let Some(text) = &config.source.push_down_predicate {
        Predicate::parse(text)?;
    }

    if config.sink.path.is_empty() {
        return Err(Error::config("Sink path cannot be empty"));
    }

    for key in &config.sink.partition_keys {
        if !targets.contains(key.as_str()) {
            return Err(Error::config(format!(
                "Sink partition key '{key}' is not a mapping target"
            )));
        }
    }

    if config.sink.coalesce == 0 {
        return Err(Error::InvalidConfigValue {
            field: "sink.coalesce".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    Ok(())
}
