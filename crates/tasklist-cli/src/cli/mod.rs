//! CLI entry and dispatch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tasklist_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(version)]
#[command(about = "Terminal task list with inline action menus")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of $TASKLIST_HOME/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Options for the interactive list.
#[derive(clap::Args, Debug, Clone, Default)]
struct RunArgs {
    /// JSON file with an array of tasks (overrides [store] tasks_file)
    #[arg(long, value_name = "FILE")]
    tasks: Option<PathBuf>,

    /// Artificial fetch latency in milliseconds (overrides [store] latency_ms)
    #[arg(long, value_name = "N")]
    latency_ms: Option<u64>,

    /// Make every fetch fail with this message
    #[arg(long, value_name = "MSG", conflicts_with = "tasks")]
    fail: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the task list (default)
    Run(RunArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::paths::config_path);

    match cli.command {
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path(&config_path);
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(&config_path),
        },
        Some(Commands::Run(args)) => run_list(&config_path, &args),
        None => run_list(&config_path, &RunArgs::default()),
    }
}

fn run_list(config_path: &Path, args: &RunArgs) -> Result<()> {
    let config = config::Config::load_from(config_path).context("load config")?;

    // one tokio runtime for fetches and timers; the terminal loop blocks this thread
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let _enter = rt.enter();

    commands::run::run(
        &config,
        commands::run::RunOptions {
            tasks_file: args.tasks.as_deref(),
            latency_ms: args.latency_ms,
            fail: args.fail.as_deref(),
        },
    )
}
