//! Pipeline types
//!
//! Counters and the per-run report handed to the job commit.

use crate::sink::SinkReport;
use serde::{Deserialize, Serialize};

/// Counters for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Records decoded from the source table
    pub records_read: usize,
    /// Rows written across all output files
    pub records_written: usize,
    /// Source partitions whose data was read
    pub partitions_scanned: usize,
    /// Source partitions pruned by the pushdown predicate
    pub partitions_pruned: usize,
    /// Source data files fetched
    pub source_files: usize,
    /// Output data files written
    pub output_files: usize,
    /// Fields left choice-typed after resolution
    pub choice_fields: usize,
    /// Columns dropped for being null everywhere
    pub dropped_columns: usize,
    /// Wall-clock duration of the run
    pub duration_ms: u64,
}

/// Full result of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    /// Run counters
    pub stats: PipelineStats,
    /// Choice field descriptions, `field(type, type)` form
    pub choice_fields: Vec<String>,
    /// Columns dropped for being null everywhere, sorted
    pub dropped_columns: Vec<String>,
    /// What the sink wrote
    pub sink: SinkReport,
}
