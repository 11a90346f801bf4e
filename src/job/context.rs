//! Job context implementation
//!
//! Provides run identity and the commit step, with atomic manifest writes.

use super::manifest::{RunManifest, RunStatus};
use crate::error::{Error, Result};
use crate::pipeline::PipelineReport;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes runs started within the same second and process
static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identity and lifecycle of one job run
#[derive(Debug)]
pub struct JobContext {
    /// Job name supplied by the caller
    job_name: String,
    /// Unique run identifier
    run_id: String,
    /// Directory for run manifests
    run_dir: PathBuf,
    /// When the run started
    started_at: DateTime<Utc>,
}

impl JobContext {
    /// Start a run
    ///
    /// The job name is required and names the manifest directory. The
    /// run id combines the start instant, the process id and a sequence
    /// number, so concurrent and repeated runs never collide.
    pub fn init(job_name: &str, run_dir: impl AsRef<Path>) -> Result<Self> {
        let job_name = job_name.trim();
        if job_name.is_empty() {
            return Err(Error::job("A job name is required"));
        }

        let started_at = Utc::now();
        let sequence = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let run_id = format!(
            "{}-{}-{sequence:04}",
            started_at.format("%Y%m%dT%H%M%SZ"),
            std::process::id()
        );

        tracing::info!(job = job_name, run_id = %run_id, "Job initialized");

        Ok(Self {
            job_name: job_name.to_string(),
            run_id,
            run_dir: run_dir.as_ref().to_path_buf(),
            started_at,
        })
    }

    /// Job name supplied at init
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// Unique run identifier
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// When the run started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Where the manifest will be written on commit
    pub fn manifest_path(&self) -> PathBuf {
        self.run_dir
            .join(&self.job_name)
            .join(format!("{}.json", self.run_id))
    }

    /// Commit the run
    ///
    /// Writes the manifest to a temp file and renames it into place, so
    /// a partially written manifest is never observable. Consumes the
    /// context; a run commits at most once.
    pub async fn commit(self, report: &PipelineReport) -> Result<RunManifest> {
        let manifest = RunManifest {
            job_name: self.job_name.clone(),
            run_id: self.run_id.clone(),
            status: RunStatus::Committed,
            started_at: self.started_at,
            committed_at: Utc::now(),
            stats: report.stats.clone(),
            choice_fields: report.choice_fields.clone(),
            dropped_columns: report.dropped_columns.clone(),
            partitions: report.sink.partitions.clone(),
            files: report.sink.files.clone(),
        };

        let path = self.manifest_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.commit_error(format!("Failed to create run directory: {e}")))?;
        }

        let contents = serde_json::to_string_pretty(&manifest)
            .map_err(|e| self.commit_error(format!("Failed to serialize manifest: {e}")))?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| self.commit_error(format!("Failed to write manifest: {e}")))?;

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| self.commit_error(format!("Failed to rename manifest: {e}")))?;

        tracing::info!(path = %path.display(), "Run committed");
        Ok(manifest)
    }

    fn commit_error(&self, message: String) -> Error {
        Error::Commit {
            run_id: self.run_id.clone(),
            message,
        }
    }
}
