//! Command argument definitions shared between main.rs and the commands.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tuneforge_sources::{DEFAULT_CHUNK_SIZE, Scenario};

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Log file to replay, or `-` for stdin
    pub path: PathBuf,

    /// Bytes read per fragment
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Treat a stream without a [SUCCESS] line as failed
    #[arg(long)]
    pub require_marker: bool,

    /// Output the final project record as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Demo transcript to replay
    #[arg(long, value_enum, default_value_t = ScenarioArg::Deployment)]
    pub scenario: ScenarioArg,

    /// Number of concurrent projects
    #[arg(long, default_value_t = 1)]
    pub projects: usize,

    /// Pause before each word, in milliseconds
    #[arg(long, default_value_t = 40)]
    pub delay_ms: u64,

    /// Make the last project's source fail after this many fragments
    #[arg(long)]
    pub fail_after: Option<usize>,

    /// Output all project records as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioArg {
    /// Provisioning, pre-training, fine-tuning and endpoint deployment
    Deployment,
    /// Adapter fine-tuning only
    FineTuning,
}

impl From<ScenarioArg> for Scenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Deployment => Self::Deployment,
            ScenarioArg::FineTuning => Self::FineTuning,
        }
    }
}
