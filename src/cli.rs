use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::config::{Config, OutputFormat};
use crate::detail::DetailCoordinator;
use crate::model::JobRef;
use crate::output::{self, FetchProgress};
use crate::providers::{DetailFetcher, PushIndex, TreeherderClient};

#[derive(Parser)]
#[command(name = "jobscope")]
#[command(author, version, about = "CI Job Inspection Tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect one CI job: details, logs, performance data and failure
    /// suggestions
    Inspect {
        #[arg(short, long, env = "TREEHERDER_URL")]
        server: Option<String>,

        #[arg(short = 'P', long)]
        project: Option<String>,

        /// Id of the job to inspect
        job_id: u64,

        /// Print the detail view as JSON instead of tables
        #[arg(short, long, default_value_t = false)]
        json: bool,
    },
}

impl Cli {
    async fn execute_inspect(
        &self,
        config: &Config,
        server: Option<&str>,
        project: Option<&str>,
        job_id: u64,
        json: bool,
    ) -> Result<()> {
        let server = server.unwrap_or(&config.server.base_url);
        let project = match project.or(config.server.project.as_deref()) {
            Some(project) => project,
            None => anyhow::bail!(
                "No project given; pass --project or set server.project in the config file"
            ),
        };

        info!("Inspecting job {job_id} in project: {project}");

        let client = TreeherderClient::new(server)?;
        let origin = client.origin();

        let progress = FetchProgress::start_phase_1(job_id);
        let job = client.job(project, job_id).await?;
        let push = client.push(project, job.result_set_id).await?;
        let pushes = PushIndex::from_pushes([push]);

        let progress = progress.finish_phase_1_start_phase_2();
        let coordinator = DetailCoordinator::new(client, pushes, project, &origin);
        coordinator.select_job(&JobRef::from(&job)).await?;
        progress.finish_phase_2();

        let state = coordinator.snapshot();

        if json || config.output.format == OutputFormat::Json {
            let json_output = if self.pretty || config.output.pretty {
                serde_json::to_string_pretty(&state)?
            } else {
                serde_json::to_string(&state)?
            };

            if let Some(output_path) = &self.output {
                std::fs::write(output_path, json_output)?;
                info!("Detail view written to: {}", output_path.display());
            } else {
                println!("{}", json_output);
            }
        } else {
            output::print_view(&state);
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Inspect {
                server,
                project,
                job_id,
                json,
            } => {
                self.execute_inspect(
                    &config,
                    server.as_deref(),
                    project.as_deref(),
                    *job_id,
                    *json,
                )
                .await
            }
        }
    }
}
