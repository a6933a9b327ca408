use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, OutputFormat};
use crate::error;
use crate::mcp::{self, McpServer};
use crate::output::{self, FetchProgress};
use crate::provider::AdoProvider;

#[derive(Parser)]
#[command(name = "adolens")]
#[command(author, version, about = "Azure DevOps Server insights", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./adolens.toml or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Collection URL, e.g. http://tfs.local/DefaultCollection
    #[arg(short, long, global = true, env = "ADO_SERVER_URL")]
    url: Option<String>,

    /// Personal access token
    #[arg(short, long, global = true, env = "ADO_PAT", hide_env_values = true)]
    token: Option<String>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the projects of the collection
    Projects,

    /// Most recently changed work items of a project
    WorkItems {
        #[arg(short = 'P', long)]
        project: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Most recent builds of a project with their success rate
    Pipelines {
        #[arg(short = 'P', long)]
        project: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Expose the operations as MCP tools on stdin/stdout
    Serve,
}

/// Stop the spinner according to how the request ended.
fn track<T>(progress: FetchProgress, result: error::Result<T>, done: &str) -> error::Result<T> {
    match result {
        Ok(value) => {
            progress.finish(done);
            Ok(value)
        }
        Err(e) => {
            progress.fail();
            Err(e)
        }
    }
}

impl Cli {
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve)
    }

    fn write_output<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        if let Some(output_path) = &self.output {
            let mut file = std::fs::File::create(output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?;
            write(&mut file)?;
            info!("Output written to: {}", output_path.display());
        } else {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write(&mut handle)?;
        }
        Ok(())
    }

    fn emit<T, F>(&self, config: &Config, value: &T, render_table: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        let format = self.format.unwrap_or(config.output.format);
        let pretty = self.pretty || config.output.pretty;

        match format {
            OutputFormat::Json => self.write_output(|out| output::export_json(value, pretty, out)),
            OutputFormat::Table => {
                let rendered = render_table();
                self.write_output(|out| {
                    writeln!(out, "{rendered}")?;
                    Ok(())
                })
            }
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let server = config.server_config(self.url.as_deref(), self.token.as_deref())?;
        let provider = AdoProvider::new(&server)?;
        let limit = |requested: Option<usize>| requested.unwrap_or(config.defaults.limit);

        match &self.command {
            Commands::Projects => {
                let progress = FetchProgress::start("Fetching projects");
                let projects = track(progress, provider.list_projects().await, "Fetched projects")?;
                self.emit(&config, &projects, || output::render_projects(&projects))
            }
            Commands::WorkItems {
                project,
                limit: requested,
            } => {
                let progress = FetchProgress::start(&format!("Fetching work items for {project}"));
                let items = track(
                    progress,
                    provider
                        .get_recent_work_items(project, limit(*requested))
                        .await,
                    "Fetched work items",
                )?;
                self.emit(&config, &items, || output::render_work_items(project, &items))
            }
            Commands::Pipelines {
                project,
                limit: requested,
            } => {
                let progress = FetchProgress::start(&format!("Fetching builds for {project}"));
                let aggregate = track(
                    progress,
                    provider.get_recent_pipelines(project, limit(*requested)).await,
                    "Fetched builds",
                )?;
                self.emit(&config, &aggregate, || output::render_pipelines(&aggregate))
            }
            Commands::Serve => {
                let server = McpServer::new(provider, config.defaults.limit);
                mcp::run_stdio(&server).await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_work_items() {
        let cli = Cli::try_parse_from([
            "adolens",
            "--url",
            "http://tfs.local/Coll",
            "--token",
            "pat",
            "work-items",
            "-P",
            "Fabrikam",
            "--limit",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://tfs.local/Coll"));
        assert!(!cli.is_serve());
        match cli.command {
            Commands::WorkItems { project, limit } => {
                assert_eq!(project, "Fabrikam");
                assert_eq!(limit, Some(10));
            }
            _ => panic!("expected work-items"),
        }
    }

    #[test]
    fn test_parse_pipelines_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "adolens",
            "pipelines",
            "--project",
            "Fabrikam",
            "--format",
            "table",
            "--pretty",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Table));
        assert!(cli.pretty);
        assert!(matches!(cli.command, Commands::Pipelines { limit: None, .. }));
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["adolens", "serve"]).unwrap();
        assert!(cli.is_serve());
    }

    #[test]
    fn test_work_items_requires_project() {
        assert!(Cli::try_parse_from(["adolens", "work-items"]).is_err());
    }
}
