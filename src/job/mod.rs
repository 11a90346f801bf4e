//! Job lifecycle module
//!
//! A run begins with `JobContext::init` and ends with an explicit
//! `commit`. Commit writes the run manifest; the manifest file is the
//! only success marker, so a run that errors before commit leaves
//! nothing behind.
//!
//! # Overview
//!
//! The job module provides:
//! - `JobContext` - Run identity, init and commit
//! - `RunManifest` - The committed record of one run

mod context;
mod manifest;

pub use context::JobContext;
pub use manifest::{RunManifest, RunStatus};

#[cfg(test)]
mod tests;
