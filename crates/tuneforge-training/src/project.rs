//! Project records and the state owner that applies session updates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::classify::MetricEvent;
use crate::error::{TrainingError, TrainingResult};
use crate::status::JobStatus;
use crate::update::{SessionUpdate, UpdateSink};

/// Identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    #[must_use]
    pub fn new() -> Self {
        Self(format!("proj_{}", Uuid::new_v4().simple()))
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Accumulated, append-only view of one project's run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
    pub log_lines: Vec<String>,
    pub metrics: Vec<MetricEvent>,
}

impl ProjectRecord {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            created_at: Utc::now(),
            status: JobStatus::Configuring,
            log_lines: Vec::new(),
            metrics: Vec::new(),
        }
    }

    /// Applies one batch: lines, then metrics, then status.
    pub fn apply(&mut self, update: SessionUpdate) {
        self.log_lines.extend(update.display_lines);
        self.metrics.extend(update.metrics);
        self.status = update.status;
    }

    #[must_use]
    pub fn latest_loss(&self) -> Option<f64> {
        self.metrics.last().map(|m| m.loss)
    }
}

/// A session update addressed to a project.
#[derive(Debug, Clone)]
pub struct ProjectUpdate {
    pub project_id: ProjectId,
    pub update: SessionUpdate,
}

/// Sink forwarding a session's updates to the state owner over a channel.
#[derive(Debug, Clone)]
pub struct ProjectChannel {
    project_id: ProjectId,
    tx: mpsc::UnboundedSender<ProjectUpdate>,
}

impl ProjectChannel {
    #[must_use]
    pub fn new(project_id: ProjectId, tx: mpsc::UnboundedSender<ProjectUpdate>) -> Self {
        Self { project_id, tx }
    }
}

impl UpdateSink for ProjectChannel {
    fn on_update(&self, update: SessionUpdate) {
        let msg = ProjectUpdate { project_id: self.project_id.clone(), update };
        if self.tx.send(msg).is_err() {
            warn!(project_id = %self.project_id, "State owner gone, dropping update");
        }
    }
}

/// Owns every project record. Only the owner mutates records.
#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: HashMap<ProjectId, ProjectRecord>,
    order: Vec<ProjectId>,
}

impl ProjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record in `Configuring` state and returns its id.
    pub fn create(&mut self, name: impl Into<String>) -> ProjectId {
        let record = ProjectRecord::new(name);
        let id = record.id.clone();
        self.order.push(id.clone());
        self.projects.insert(id.clone(), record);
        id
    }

    #[must_use]
    pub fn get(&self, id: &ProjectId) -> Option<&ProjectRecord> {
        self.projects.get(id)
    }

    /// Records in creation order.
    pub fn projects(&self) -> impl Iterator<Item = &ProjectRecord> {
        self.order.iter().filter_map(|id| self.projects.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn apply(&mut self, msg: ProjectUpdate) -> TrainingResult<()> {
        let record = self
            .projects
            .get_mut(&msg.project_id)
            .ok_or_else(|| TrainingError::UnknownProject(msg.project_id.to_string()))?;
        debug!(
            project_id = %msg.project_id,
            lines = msg.update.display_lines.len(),
            metrics = msg.update.metrics.len(),
            status = %msg.update.status,
            "Applying session update"
        );
        record.apply(msg.update);
        Ok(())
    }
}

/// Applies updates from `rx` until every sender is dropped, then returns the store.
///
/// Updates for unknown projects are logged and skipped.
pub async fn run_state_owner(
    mut store: ProjectStore,
    mut rx: mpsc::UnboundedReceiver<ProjectUpdate>,
) -> ProjectStore {
    while let Some(msg) = rx.recv().await {
        if let Err(e) = store.apply(msg) {
            warn!(error = %e, "Skipping session update");
        }
    }
    store
}
