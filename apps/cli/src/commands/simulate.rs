//! Simulate command implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tuneforge_sources::Scenario;
use tuneforge_training::{ProjectChannel, ProjectId, ProjectRecord, ProjectStore, Session, run_state_owner};

use super::render::print_store_table;
use super::types::SimulateArgs;
use crate::config::CliConfig;

pub async fn execute(args: SimulateArgs, cli_config: &CliConfig) -> Result<()> {
    if args.projects == 0 {
        bail!("--projects must be at least 1");
    }

    let interpreter = cli_config.interpreter();
    let json_output = args.json || cli_config.wants_json();
    let scenario = Scenario::from(args.scenario);
    let delay = Duration::from_millis(args.delay_ms);

    let mut store = ProjectStore::new();
    let ids: Vec<ProjectId> =
        (1..=args.projects).map(|i| store.create(format!("{scenario}-{i}"))).collect();

    let (tx, rx) = mpsc::unbounded_channel();
    let owner = tokio::spawn(run_state_owner(store, rx));

    let mut handles = Vec::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        let mut source = scenario.source().with_delay(delay);
        if i + 1 == ids.len() {
            if let Some(fragments) = args.fail_after {
                source = source.fail_after(fragments);
            }
        }

        let sink = ProjectChannel::new(id.clone(), tx.clone());
        let session = Session::new(id.to_string(), &interpreter);
        handles.push(tokio::spawn(async move { session.run_source(&source, &sink).await }));
    }
    drop(tx);

    let results = futures::future::join_all(handles).await;
    let store = owner.await.context("State owner panicked")?;

    let mut failed = 0usize;
    for (id, result) in ids.iter().zip(results) {
        match result.context("Simulated session panicked")? {
            Ok(summary) => info!(project_id = %id, status = %summary.status, metrics = summary.metrics, "Project finished"),
            Err(e) => {
                failed += 1;
                warn!(project_id = %id, error = %e, "Project failed");
            }
        }
    }

    if json_output {
        let records: Vec<&ProjectRecord> = store.projects().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_store_table(&store);
    }

    if failed > 0 {
        bail!("{failed} of {} projects failed", ids.len());
    }
    Ok(())
}
