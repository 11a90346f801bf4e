//! Pipeline module
//!
//! Runs a job definition end to end: scan the catalogued source with the
//! pushdown predicate, impose the declared schema, resolve choice types,
//! drop all-null columns, write partitioned Parquet.
//!
//! # Overview
//!
//! The pipeline module provides:
//! - `Pipeline` - Stage orchestration over one in-memory record set
//! - `PipelineStats` - Per-run counters
//! - `PipelineReport` - Counters plus what was dropped, resolved, written

mod types;

pub use types::{PipelineReport, PipelineStats};

use crate::catalog::Catalog;
use crate::config::{JobConfig, SinkConfig};
use crate::error::Result;
use crate::job::JobContext;
use crate::predicate::Predicate;
use crate::sink::SinkWriter;
use crate::source::SourceReader;
use crate::transform::{drop_null_fields, ChoiceResolver, SchemaMapper};
use std::time::Instant;

/// Runs one job definition against a catalog
pub struct Pipeline {
    /// The job definition
    config: JobConfig,
    /// Table catalog for source lookup
    catalog: Catalog,
    /// Sink path override for this run
    sink_path: Option<String>,
}

impl Pipeline {
    /// Create a pipeline for a job definition
    pub fn new(config: JobConfig, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            sink_path: None,
        }
    }

    /// Replace the job's sink path for this run
    #[must_use]
    pub fn with_sink_path(mut self, path: Option<String>) -> Self {
        self.sink_path = path;
        self
    }

    /// The job definition this pipeline runs
    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run all stages in order over the full record set
    ///
    /// The first stage error aborts the run; commit stays with the
    /// caller, so a failed run never produces a manifest.
    pub async fn run(&self, ctx: &JobContext) -> Result<PipelineReport> {
        let start = Instant::now();
        let config = &self.config;

        tracing::info!(job = %config.name, run_id = %ctx.run_id(), "Starting pipeline");

        // Stage 1: scan the source table, pruning with the predicate
        let table = self
            .catalog
            .table(&config.source.database, &config.source.table)?;
        let predicate = match &config.source.push_down_predicate {
            Some(text) => Some(Predicate::parse(text)?),
            None => None,
        };
        let reader = SourceReader::open(table)?;
        let scan = reader.read(predicate.as_ref()).await?;
        let records_read = scan.records.len();
        tracing::info!(
            records = records_read,
            partitions_scanned = scan.summary.partitions_scanned,
            partitions_pruned = scan.summary.partitions_pruned,
            files = scan.summary.files_read,
            "Stage 1/5: source scan complete"
        );

        // Stage 2: impose the declared schema
        let mapper = SchemaMapper::new(config.mappings.clone())?;
        let records = mapper.apply(scan.records)?;
        tracing::info!(
            fields = config.mappings.len(),
            "Stage 2/5: schema mapping complete"
        );

        // Stage 3: resolve fields observed with more than one type
        let resolver = ChoiceResolver::new(config.resolve_choice);
        let (records, choices) = resolver.apply(records)?;
        tracing::info!(
            choice_fields = choices.fields.len(),
            "Stage 3/5: choice resolution complete"
        );

        // Stage 4: drop columns that are null everywhere
        let (records, dropped) = if config.drop_null_fields {
            drop_null_fields(records)
        } else {
            (records, Vec::new())
        };
        tracing::info!(
            dropped_columns = dropped.len(),
            "Stage 4/5: null column filter complete"
        );

        // Stage 5: write partitioned output
        let sink_config = self.effective_sink();
        let writer = SinkWriter::open(&sink_config)?;
        let sink = writer
            .write(records, &config.mappings, &choices, &dropped, ctx.run_id())
            .await?;
        tracing::info!(
            files = sink.files.len(),
            rows = sink.rows_written,
            "Stage 5/5: sink complete"
        );

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = start.elapsed().as_millis() as u64;

        let stats = PipelineStats {
            records_read,
            records_written: sink.rows_written,
            partitions_scanned: scan.summary.partitions_scanned,
            partitions_pruned: scan.summary.partitions_pruned,
            source_files: scan.summary.files_read,
            output_files: sink.files.len(),
            choice_fields: choices.fields.len(),
            dropped_columns: dropped.len(),
            duration_ms,
        };

        tracing::info!(
            records_read = stats.records_read,
            records_written = stats.records_written,
            output_files = stats.output_files,
            duration_ms = stats.duration_ms,
            "Pipeline complete"
        );

        Ok(PipelineReport {
            stats,
            choice_fields: choices.describe(),
            dropped_columns: dropped,
            sink,
        })
    }

    /// The sink configuration for this run, with any path override applied
    fn effective_sink(&self) -> SinkConfig {
        let mut sink = self.config.sink.clone();
        if let Some(path) = &self.sink_path {
            sink.path = path.clone();
        }
        sink
    }
}
