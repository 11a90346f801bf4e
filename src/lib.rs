// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Trendsift
//!
//! A catalog-driven ETL job runner that cleanses regional trending-video
//! statistics into partitioned Parquet.
//!
//! ## Features
//!
//! - **Catalogued Sources**: Table locations, formats and partition keys
//!   come from YAML table definitions, never from the job
//! - **Predicate Pushdown**: Partition predicates prune directories before
//!   a single data file is fetched
//! - **Declared Schemas**: An ordered field mapping imposes names and types
//!   on every record
//! - **Choice Resolution**: Fields observed with more than one type are
//!   wrapped in type-keyed structs, projected, or rejected
//! - **Partitioned Parquet**: Hive-layout output, coalesced to a bounded
//!   file count per partition
//! - **Explicit Commit**: A run manifest is written only when the whole
//!   pipeline has succeeded
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trendsift::{load_job, Catalog, JobContext, Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_job("raw-statistics-cleansed")?;
//!     let catalog = Catalog::open("catalog")?;
//!
//!     let ctx = JobContext::init("nightly-cleanse", "runs")?;
//!     let report = Pipeline::new(config, catalog).run(&ctx).await?;
//!     ctx.commit(&report).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           Pipeline                              │
//! │  source → mapping → choice resolution → null filter → sink      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Catalog  │  Source   │   Transform   │  Output   │    Job      │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ YAML     │ Hive dirs │ SchemaMapper  │ Arrow     │ init        │
//! │ tables   │ Predicate │ ChoiceResolver│ Parquet   │ commit      │
//! │          │ pushdown  │ Null columns  │ Coalesce  │ manifest    │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Storage locations over object stores
pub mod storage;

/// Data file decoders (CSV, JSON, JSONL)
pub mod decode;

/// Partition predicate parsing and evaluation
pub mod predicate;

/// Table catalog
pub mod catalog;

/// Job definitions and validation
pub mod config;

/// Built-in job definitions
pub mod jobs;

/// Source table scanning with pushdown
pub mod source;

/// Record transforms: mapping, choice resolution, null columns
pub mod transform;

/// Arrow/Parquet output
pub mod output;

/// Partitioned Parquet sink
pub mod sink;

/// Job lifecycle and run manifests
pub mod job;

/// Stage orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

// Re-export commonly used types
pub use catalog::{Catalog, TableDef};
pub use config::{load_job, load_job_from_str, JobConfig};
pub use job::{JobContext, RunManifest};
pub use pipeline::{Pipeline, PipelineReport, PipelineStats};
pub use predicate::Predicate;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
