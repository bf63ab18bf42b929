mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod plan;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::sweep::{self, SweepCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::infra::linear::LinearClient;
use crate::plan::RunPlan;

#[derive(Parser)]
#[command(
    name = "sweep",
    author,
    version,
    about = "Bulk-transition issue tracker tickets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move every ticket in a plan to the target workflow state.
    Run(RunArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct RunArgs {
    /// TOML file listing the phases and their tickets.
    #[arg(short, long)]
    plan: PathBuf,
    /// Override the team key that owns the target state.
    #[arg(short, long)]
    team: Option<String>,
    /// Override the target workflow state name.
    #[arg(short, long)]
    state: Option<String>,
    /// Override the delay between tickets, in milliseconds.
    #[arg(long)]
    pace_ms: Option<u64>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Run(args) => run_sweep(args).await,
    }
}

async fn run_sweep(args: RunArgs) -> AppResult<()> {
    let config = AppConfig::load()?;
    let plan = RunPlan::load(&args.plan)?;

    let api_key = config.api_key.clone().ok_or_else(|| {
        AppError::Configuration(
            "API key not configured; run `sweep config init` or set SWEEP_API_KEY".to_string(),
        )
    })?;
    let issue_tracker = Arc::new(LinearClient::new(config.api_url.clone(), &api_key)?);
    let context = AppContext::new(config, issue_tracker);

    let result = sweep::run(
        &context,
        &plan,
        SweepCommandArgs {
            team: args.team,
            state: args.state,
            pace_ms: args.pace_ms,
        },
    )
    .await?;

    println!("{}", result.render_summary());
    Ok(())
}
