//! Tuneforge CLI - replay and simulate streamed training/deployment logs
//!
//! This CLI provides a `tune` command that feeds log fragments through the
//! tuneforge interpreter and renders log lines, loss metrics and job status
//! as they arrive.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{ReplayArgs, SimulateArgs, replay, simulate};
use config::CliConfig;

/// Tuneforge CLI - Live interpreter for training and deployment logs
#[derive(Parser, Debug)]
#[command(
    name = "tune",
    author,
    version,
    about = "Tuneforge - Live interpreter for training and deployment logs",
    long_about = "Tuneforge (tune) reassembles streamed log fragments into lines, separates loss metrics from narration,\nand tracks the job status announced by tagged lines such as [TRAIN] and [DEPLOY]."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Configuration file (applied over ~/.tuneforge/config.toml and ./.tuneforgerc)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a log file or stdin through one session
    ///
    /// Reads the input in fixed-size chunks, prints every line as soon as it
    /// is complete and reports the final job status.
    Replay(ReplayArgs),

    /// Run concurrent sessions over a built-in demo transcript
    ///
    /// Each project replays the transcript word by word, the way a
    /// generative service streams its reply.
    Simulate(SimulateArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cli_config =
        CliConfig::discover_and_load(args.config.as_deref()).context("Failed to load configuration")?;

    let level_name = args.log_level.as_deref().or(cli_config.log_level.as_deref()).unwrap_or("warn");
    let level = match level_name {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Replay(cmd) => {
            replay::execute(cmd, &cli_config).await?;
        }
        Command::Simulate(cmd) => {
            simulate::execute(cmd, &cli_config).await?;
        }
    }

    Ok(())
}
