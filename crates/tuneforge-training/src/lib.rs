//! Tuneforge Training
//!
//! Incremental interpreter for streamed training/deployment logs:
//! - Reassembling lines from arbitrarily cut fragments (`LineSplitter`)
//! - Separating metric telemetry from status narration (`Classifier`)
//! - Deriving a coarse job status from narration tags (`StatusRules`)
//! - Running one stream to completion as a `Session` that emits `SessionUpdate` batches
//! - Applying those batches to project records (`ProjectStore`)

pub mod classify;
pub mod config;
pub mod error;
pub mod project;
pub mod session;
pub mod splitter;
pub mod status;
pub mod update;

pub use classify::{Classification, Classifier, LineKind, MetricEvent, decode_metric};
pub use config::{CompletionPolicy, InterpreterConfig};
pub use error::{TrainingError, TrainingResult};
pub use project::{ProjectChannel, ProjectId, ProjectRecord, ProjectStore, ProjectUpdate, run_state_owner};
pub use session::{Session, SessionSummary};
pub use splitter::LineSplitter;
pub use status::{JobStatus, StatusRule, StatusRules};
pub use update::{NullSink, SessionUpdate, UpdatePhase, UpdateSink};
