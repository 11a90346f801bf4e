//! Run manifest types

use crate::pipeline::PipelineStats;
use crate::sink::WrittenFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal status recorded in a manifest
///
/// Manifests are written at commit only, so this is always `Committed`;
/// the field makes the file self-describing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The run finished and its output is complete
    Committed,
}

/// The committed record of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Job name supplied at init
    pub job_name: String,
    /// Unique run identifier
    pub run_id: String,
    /// Terminal status
    pub status: RunStatus,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run committed
    pub committed_at: DateTime<Utc>,
    /// Run counters
    pub stats: PipelineStats,
    /// Choice field descriptions, `field(type, type)` form
    pub choice_fields: Vec<String>,
    /// Columns dropped for being null everywhere
    pub dropped_columns: Vec<String>,
    /// Partition directories written
    pub partitions: Vec<String>,
    /// Data files written
    pub files: Vec<WrittenFile>,
}
