//! Tests for job module

use super::*;
use crate::pipeline::{PipelineReport, PipelineStats};
use crate::sink::{SinkReport, WrittenFile};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn sample_report() -> PipelineReport {
    PipelineReport {
        stats: PipelineStats {
            records_read: 10,
            records_written: 8,
            partitions_scanned: 2,
            partitions_pruned: 1,
            source_files: 2,
            output_files: 2,
            choice_fields: 1,
            dropped_columns: 1,
            duration_ms: 42,
        },
        choice_fields: vec!["category_id(long, string)".to_string()],
        dropped_columns: vec!["description".to_string()],
        sink: SinkReport {
            files: vec![WrittenFile {
                path: "region=ca/part-00000-r1.snappy.parquet".to_string(),
                url: "file:///out/region=ca/part-00000-r1.snappy.parquet".to_string(),
                rows: 8,
                bytes: 1024,
            }],
            partitions: vec!["region=ca".to_string()],
            rows_written: 8,
        },
    }
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_requires_job_name() {
    let dir = tempdir().unwrap();
    assert!(JobContext::init("", dir.path()).is_err());
    assert!(JobContext::init("   ", dir.path()).is_err());
}

#[test]
fn test_init_trims_job_name() {
    let dir = tempdir().unwrap();
    let ctx = JobContext::init("  nightly  ", dir.path()).unwrap();
    assert_eq!(ctx.job_name(), "nightly");
}

#[test]
fn test_run_ids_are_unique() {
    let dir = tempdir().unwrap();
    let a = JobContext::init("job", dir.path()).unwrap();
    let b = JobContext::init("job", dir.path()).unwrap();
    assert_ne!(a.run_id(), b.run_id());
}

#[test]
fn test_manifest_path_layout() {
    let dir = tempdir().unwrap();
    let ctx = JobContext::init("nightly", dir.path()).unwrap();

    let path = ctx.manifest_path();
    assert_eq!(path.parent().unwrap(), dir.path().join("nightly"));
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        format!("{}.json", ctx.run_id())
    );
}

// ============================================================================
// Commit Tests
// ============================================================================

#[tokio::test]
async fn test_commit_writes_manifest() {
    let dir = tempdir().unwrap();
    let ctx = JobContext::init("nightly", dir.path()).unwrap();
    let path = ctx.manifest_path();

    assert!(!path.exists());
    let manifest = ctx.commit(&sample_report()).await.unwrap();
    assert!(path.exists());

    let contents = std::fs::read_to_string(&path).unwrap();
    let read_back: RunManifest = serde_json::from_str(&contents).unwrap();

    assert_eq!(read_back.job_name, "nightly");
    assert_eq!(read_back.run_id, manifest.run_id);
    assert_eq!(read_back.status, RunStatus::Committed);
    assert_eq!(read_back.stats.records_written, 8);
    assert_eq!(read_back.dropped_columns, vec!["description".to_string()]);
    assert_eq!(read_back.files.len(), 1);
    assert_eq!(read_back.partitions, vec!["region=ca".to_string()]);
}

#[tokio::test]
async fn test_commit_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let ctx = JobContext::init("nightly", dir.path()).unwrap();
    let temp = ctx.manifest_path().with_extension("tmp");

    ctx.commit(&sample_report()).await.unwrap();
    assert!(!temp.exists());
}

#[tokio::test]
async fn test_commit_creates_run_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("runs");
    assert!(!nested.exists());

    let ctx = JobContext::init("nightly", &nested).unwrap();
    ctx.commit(&sample_report()).await.unwrap();

    assert!(nested.join("nightly").is_dir());
}

#[tokio::test]
async fn test_commit_timestamps_ordered() {
    let dir = tempdir().unwrap();
    let ctx = JobContext::init("nightly", dir.path()).unwrap();

    let manifest = ctx.commit(&sample_report()).await.unwrap();
    assert!(manifest.committed_at >= manifest.started_at);
}

#[test]
fn test_status_serializes_lowercase() {
    let json = serde_json::to_string(&RunStatus::Committed).unwrap();
    assert_eq!(json, "\"committed\"");
}
