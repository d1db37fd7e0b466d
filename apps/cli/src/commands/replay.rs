//! Replay command implementation.

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::debug;
use tuneforge_abstraction::LogSource;
use tuneforge_sources::{FileSource, StdinSource};
use tuneforge_training::config::DEFAULT_SUCCESS_MARKER;
use tuneforge_training::{CompletionPolicy, InterpreterConfig, ProjectChannel, ProjectStore, Session};

use super::render::{LiveRenderer, print_record_summary};
use super::types::ReplayArgs;
use crate::config::CliConfig;

pub async fn execute(args: ReplayArgs, cli_config: &CliConfig) -> Result<()> {
    if args.chunk_size == 0 {
        bail!("--chunk-size must be at least 1");
    }

    let interpreter = interpreter_for(&args, cli_config);
    let json_output = args.json || cli_config.wants_json();

    let (name, source): (String, Box<dyn LogSource>) = if args.path.as_os_str() == "-" {
        ("stdin".to_string(), Box::new(StdinSource::new(args.chunk_size)))
    } else {
        (
            args.path.display().to_string(),
            Box::new(FileSource::new(&args.path).with_chunk_size(args.chunk_size)),
        )
    };

    let mut store = ProjectStore::new();
    let project_id = store.create(name.clone());
    debug!(project_id = %project_id, source = source.source_id(), "Starting replay");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let sink = ProjectChannel::new(project_id.clone(), tx);
    let session = Session::new(project_id.to_string(), &interpreter);
    let handle = tokio::spawn(async move { session.run_source(source.as_ref(), &sink).await });

    let mut renderer = LiveRenderer::new();
    while let Some(msg) = rx.recv().await {
        if !json_output {
            renderer.render(&msg.update);
        }
        store.apply(msg)?;
    }

    let outcome = handle.await.context("Replay session panicked")?;
    let record = store.get(&project_id).context("Replay project record missing")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        print_record_summary(record);
    }

    outcome.with_context(|| format!("Replay of {name} failed"))?;
    Ok(())
}

/// Config-file policy, tightened by `--require-marker`.
fn interpreter_for(args: &ReplayArgs, cli_config: &CliConfig) -> InterpreterConfig {
    let mut interpreter = cli_config.interpreter();
    if args.require_marker && !matches!(interpreter.completion, CompletionPolicy::RequireMarker { .. }) {
        interpreter.completion =
            CompletionPolicy::RequireMarker { marker: DEFAULT_SUCCESS_MARKER.to_string() };
    }
    interpreter
}
