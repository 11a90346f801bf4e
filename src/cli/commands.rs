//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trendsift ETL job runner CLI
#[derive(Parser, Debug)]
#[command(name = "trendsift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Job definition: a built-in name or a YAML file path
    #[arg(short, long, global = true, default_value = "raw-statistics-cleansed")]
    pub job: String,

    /// Directory of table definitions, one `<database>/<table>.yaml` per table
    #[arg(short, long, global = true, default_value = "catalog")]
    pub catalog: PathBuf,

    /// Directory where run manifests are committed
    #[arg(short, long, global = true, default_value = "runs")]
    pub run_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a job end to end and commit it
    Run {
        /// Name for this run, recorded in the manifest
        #[arg(long)]
        job_name: String,

        /// Replace the job's sink path for this run
        /// Supports: /path, s3://bucket/path, gs://bucket/path, az://container/path
        #[arg(long)]
        sink_path: Option<String>,
    },

    /// Validate the job definition and its catalog references
    Validate,

    /// Show the resolved job definition as YAML
    Show,

    /// List built-in job definitions
    List,
}
