//! CLI module
//!
//! Command-line interface for running jobs.
//!
//! # Commands
//!
//! - `run` - Execute a job end to end and commit it
//! - `validate` - Check a job definition and its catalog references
//! - `show` - Print the resolved job definition
//! - `list` - List built-in job definitions

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
