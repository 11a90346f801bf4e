//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands};
use crate::config::{load_job, load_job_from_str, JobConfig};
use crate::error::{Error, Result};
use crate::job::JobContext;
use crate::jobs;
use crate::pipeline::Pipeline;
use crate::predicate::Predicate;
use crate::source::check_predicate_columns;
use serde_json::{json, Value};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                job_name,
                sink_path,
            } => self.run_job(job_name, sink_path.clone()).await,
            Commands::Validate => self.validate(),
            Commands::Show => self.show(),
            Commands::List => self.list_jobs(),
        }
    }

    /// Load the job definition named by the CLI
    fn load_job(&self) -> Result<JobConfig> {
        load_job(&self.cli.job)
    }

    /// Open the table catalog named by the CLI
    fn open_catalog(&self) -> Result<Catalog> {
        Catalog::open(&self.cli.catalog)
    }

    /// Execute the job and commit the run
    async fn run_job(&self, job_name: &str, sink_path: Option<String>) -> Result<()> {
        let config = self.load_job()?;
        let catalog = self.open_catalog()?;

        let ctx = JobContext::init(job_name, &self.cli.run_dir)?;
        let manifest_path = ctx.manifest_path();

        let pipeline = Pipeline::new(config, catalog).with_sink_path(sink_path);
        let report = pipeline.run(&ctx).await?;
        let manifest = ctx.commit(&report).await?;

        self.output_message(&json!({
            "type": "RUN_SUMMARY",
            "summary": {
                "job": manifest.job_name,
                "run_id": manifest.run_id,
                "status": manifest.status,
                "manifest": manifest_path.display().to_string(),
                "stats": manifest.stats,
                "partitions": manifest.partitions,
                "files": manifest.files.iter().map(|f| f.url.as_str()).collect::<Vec<_>>(),
                "choice_fields": manifest.choice_fields,
                "dropped_columns": manifest.dropped_columns,
            }
        }));

        Ok(())
    }

    /// Validate the definition and its catalog references without reading data
    fn validate(&self) -> Result<()> {
        let config = self.load_job()?;
        let catalog = self.open_catalog()?;

        let table = catalog.table(&config.source.database, &config.source.table)?;
        if let Some(text) = &config.source.push_down_predicate {
            let predicate = Predicate::parse(text)?;
            check_predicate_columns(table, &predicate)?;
        }

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Job '{}' is valid: {} -> {} ({} mappings)",
                    config.name,
                    table.qualified_name(),
                    config.sink.path,
                    config.mappings.len()
                )
            }
        }));

        Ok(())
    }

    /// Print the resolved job definition as YAML
    fn show(&self) -> Result<()> {
        let config = self.load_job()?;
        print!("{}", serde_yaml::to_string(&config)?);
        Ok(())
    }

    /// List built-in job definitions
    fn list_jobs(&self) -> Result<()> {
        let mut entries: Vec<Value> = Vec::new();

        for name in jobs::list_builtin() {
            let yaml = jobs::get_builtin(name)
                .ok_or_else(|| Error::config(format!("Unknown built-in job '{name}'")))?;
            let config = load_job_from_str(yaml)?;

            entries.push(json!({
                "name": config.name,
                "description": config.description,
                "source": format!("{}.{}", config.source.database, config.source.table),
                "sink": config.sink.path,
                "partition_keys": config.sink.partition_keys,
            }));
        }

        self.output_message(&json!({
            "type": "JOB_LIST",
            "jobs": entries
        }));

        Ok(())
    }

    /// Output a message to stdout
    fn output_message(&self, msg: &Value) {
        println!("{}", serde_json::to_string(msg).unwrap_or_default());
    }
}
