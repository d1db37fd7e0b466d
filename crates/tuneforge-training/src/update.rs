use serde::{Deserialize, Serialize};

use crate::classify::MetricEvent;
use crate::status::JobStatus;

/// Where in the session lifecycle an update was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdatePhase {
    Started,
    Round,
    Completed,
    Failed { error: String },
}

/// One immutable batch of session output.
///
/// A receiver applies it as a unit: append `display_lines`, append
/// `metrics`, then set `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub phase: UpdatePhase,
    pub display_lines: Vec<String>,
    pub metrics: Vec<MetricEvent>,
    pub status: JobStatus,
}

impl SessionUpdate {
    #[must_use]
    pub fn new(phase: UpdatePhase, status: JobStatus) -> Self {
        Self { phase, display_lines: Vec::new(), metrics: Vec::new(), status }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.phase, UpdatePhase::Failed { .. })
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self.phase, UpdatePhase::Completed | UpdatePhase::Failed { .. })
    }
}

/// Receives session updates in production order.
pub trait UpdateSink: Send + Sync {
    fn on_update(&self, update: SessionUpdate);
}

impl<F> UpdateSink for F
where
    F: Fn(SessionUpdate) + Send + Sync,
{
    fn on_update(&self, update: SessionUpdate) {
        self(update);
    }
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl UpdateSink for NullSink {
    fn on_update(&self, _update: SessionUpdate) {}
}
