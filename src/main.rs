// Hashtopolis Console - command line entry point

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use hashtopolis_console::services::agents::{load_assignable_tasks, AgentWorkload};
use hashtopolis_console::services::{
    ChunkAggregator, ChunksDataSource, HttpEntityFetcher, LoadOutcome, SpeedScope, TasksDataSource,
};
use hashtopolis_console::{ConfigService, ConsoleConfig, EntityFetcher};

#[derive(Parser)]
#[command(author, version, about = "Hashtopolis console data layer", long_about = None)]
struct Cli {
    /// Backend API base URL (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List merged task rows with their metrics
    Tasks {
        /// Show archived tasks instead of active ones
        #[arg(long)]
        archived: bool,
        /// Only the row set, without per-row chunk metrics
        #[arg(long)]
        no_metrics: bool,
    },
    /// List chunks with their assigned agent
    Chunks {
        #[arg(long)]
        agent: Option<i64>,
    },
    /// Current speed of a task or an agent
    Speed(SpeedArgs),
    /// Workload and assignable tasks of one agent
    Agent {
        id: i64,
    },
}

#[derive(Args)]
struct SpeedArgs {
    #[arg(long, conflicts_with = "agent", required_unless_present = "agent")]
    task: Option<i64>,
    #[arg(long)]
    agent: Option<i64>,
    /// Activity window in seconds (defaults to the configured window)
    #[arg(long)]
    window: Option<i64>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(api_url: Option<String>) -> anyhow::Result<ConsoleConfig> {
    let service = ConfigService::new().context("failed to open console config")?;
    let mut config = service.get_config_clone();
    if let Some(url) = api_url {
        config.api_url = url;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
    Ok(config)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.api_url)?;
    let fetcher: Arc<dyn EntityFetcher> = Arc::new(HttpEntityFetcher::new(&config)?);

    match cli.command {
        Commands::Tasks {
            archived,
            no_metrics,
        } => {
            let source = TasksDataSource::new(fetcher, &config);
            if source.load_all(archived).await == LoadOutcome::Failed {
                anyhow::bail!("failed to load tasks, see log for details");
            }
            let table = source.table().await;
            let rows = table.data().to_vec();
            drop(table);

            let mut out = Vec::with_capacity(rows.len());
            for row in rows {
                let metrics = if no_metrics {
                    None
                } else {
                    Some(source.row_metrics(&row).await)
                };
                out.push(json!({ "row": row, "metrics": metrics }));
            }
            print_json(&json!(out))?;
        }
        Commands::Chunks { agent } => {
            let source = ChunksDataSource::new(fetcher, &config);
            let rows = source.try_load(agent).await?;
            let out: Vec<_> = rows
                .iter()
                .map(|row| {
                    json!({
                        "chunk": row,
                        "agent": row.agent_label(),
                        "state": row.state().map(|s| s.label()),
                        "checkpointPercent": row.checkpoint_percent(),
                        "timeSpent": row.time_spent_display(),
                        "lastActivity": row.last_activity_display(&config.time_format),
                    })
                })
                .collect();
            print_json(&json!(out))?;
        }
        Commands::Speed(args) => {
            let aggregator = ChunkAggregator::new(fetcher, config.aggregator_config());
            let window = args.window.unwrap_or(config.chunk_time_window_secs);
            let (id, scope) = match (args.task, args.agent) {
                (Some(id), _) => (id, SpeedScope::Task),
                (None, Some(id)) => (id, SpeedScope::Agent),
                (None, None) => anyhow::bail!("one of --task or --agent is required"),
            };
            let speed = aggregator.try_get_speed(id, window, scope).await?;
            print_json(&json!({ "id": id, "scope": scope, "speed": speed }))?;
        }
        Commands::Agent { id } => {
            let aggregator = ChunkAggregator::new(fetcher.clone(), config.aggregator_config());
            let workload = AgentWorkload::load(fetcher.as_ref(), &aggregator, id).await?;
            let assignable = load_assignable_tasks(fetcher.as_ref(), config.max_results_cap).await?;
            print_json(&json!({ "workload": workload, "assignableTasks": assignable }))?;
        }
    }

    Ok(())
}
