//! Whole-stream consumption for one project run.

use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};
use tuneforge_abstraction::{LogSource, SourceError};

use crate::classify::{Classifier, LineKind};
use crate::config::{CompletionPolicy, InterpreterConfig};
use crate::error::{TrainingError, TrainingResult};
use crate::splitter::LineSplitter;
use crate::status::JobStatus;
use crate::update::{SessionUpdate, UpdatePhase, UpdateSink};

/// Final tallies of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub status: JobStatus,
    pub fragments: usize,
    pub lines: usize,
    pub display_lines: usize,
    pub metrics: usize,
}

/// One stream-consumption episode.
///
/// Owns the line buffer and the running status; nothing is shared with other
/// sessions. Rounds are strictly sequential: a fragment is split, classified
/// and turned into one `SessionUpdate` before the next one is requested.
///
/// Dropping a session (or the future returned by [`Session::run`]) abandons it
/// and discards any unterminated text still buffered.
#[derive(Debug)]
pub struct Session {
    label: String,
    splitter: LineSplitter,
    classifier: Classifier,
    completion: CompletionPolicy,
    preamble: String,
    failure_line: String,
    status: JobStatus,
    marker_seen: bool,
    fragments: usize,
    lines: usize,
    display_lines: usize,
    metrics: usize,
}

impl Session {
    #[must_use]
    pub fn new(label: impl Into<String>, config: &InterpreterConfig) -> Self {
        Self {
            label: label.into(),
            splitter: LineSplitter::new(),
            classifier: config.classifier(),
            completion: config.completion.clone(),
            preamble: config.preamble.clone(),
            failure_line: config.failure_line.clone(),
            status: JobStatus::Configuring,
            marker_seen: false,
            fragments: 0,
            lines: 0,
            display_lines: 0,
            metrics: 0,
        }
    }

    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Text received but not yet part of a complete line.
    #[must_use]
    pub fn pending(&self) -> &str {
        self.splitter.pending()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            status: self.status,
            fragments: self.fragments,
            lines: self.lines,
            display_lines: self.display_lines,
            metrics: self.metrics,
        }
    }

    /// Opens the session: status becomes `Provisioning` and the preamble, if
    /// any, is the first log line.
    pub fn start(&mut self) -> SessionUpdate {
        self.status = JobStatus::Provisioning;
        let mut update = SessionUpdate::new(UpdatePhase::Started, self.status);
        if !self.preamble.is_empty() {
            update.display_lines.push(self.preamble.clone());
        }
        self.display_lines += update.display_lines.len();
        update
    }

    /// Processes one fragment.
    ///
    /// Returns `None` when the round changed nothing observable (no complete
    /// line, or only empty lines with no status change).
    pub fn process_fragment(&mut self, fragment: &str) -> Option<SessionUpdate> {
        self.fragments += 1;
        let before = self.status;
        let lines = self.splitter.feed(fragment);
        let mut update = SessionUpdate::new(UpdatePhase::Round, before);
        for line in &lines {
            self.absorb_line(line, &mut update);
        }

        debug!(
            session = %self.label,
            fragment_len = fragment.len(),
            lines = lines.len(),
            pending = self.splitter.pending().len(),
            status = %update.status,
            "Processed fragment"
        );

        let changed = !update.display_lines.is_empty()
            || !update.metrics.is_empty()
            || update.status != before;
        changed.then_some(update)
    }

    /// Flushes the trailing partial line and applies the completion policy.
    pub fn finish(&mut self) -> SessionUpdate {
        let mut update = SessionUpdate::new(UpdatePhase::Completed, self.status);
        if let Some(tail) = self.splitter.flush() {
            self.absorb_line(&tail, &mut update);
        }

        match &self.completion {
            CompletionPolicy::RequireMarker { marker } if !self.marker_seen => {
                let error = TrainingError::MissingSuccessMarker { marker: marker.clone() };
                self.status = JobStatus::Failed;
                update.phase = UpdatePhase::Failed { error: error.to_string() };
                if !self.failure_line.is_empty() {
                    update.display_lines.push(self.failure_line.clone());
                    self.display_lines += 1;
                }
            }
            _ => self.status = JobStatus::Active,
        }
        update.status = self.status;
        update
    }

    /// Marks the session failed after a source error. Buffered text is dropped.
    pub fn fail(&mut self, error: &SourceError) -> SessionUpdate {
        let dropped = self.splitter.flush().map_or(0, |tail| tail.len());
        if dropped > 0 {
            debug!(session = %self.label, dropped, "Discarding partial line after source failure");
        }

        self.status = JobStatus::Failed;
        let mut update =
            SessionUpdate::new(UpdatePhase::Failed { error: error.to_string() }, self.status);
        if !self.failure_line.is_empty() {
            update.display_lines.push(self.failure_line.clone());
        }
        self.display_lines += update.display_lines.len();
        update
    }

    fn absorb_line(&mut self, line: &str, update: &mut SessionUpdate) {
        self.lines += 1;
        let out = self.classifier.classify(line, self.status);
        if out.kind == LineKind::Narration {
            if let CompletionPolicy::RequireMarker { marker } = &self.completion {
                self.marker_seen |= line.contains(marker.as_str());
            }
        }

        self.status = out.new_status;
        self.display_lines += out.display_lines.len();
        self.metrics += out.metrics.len();
        update.display_lines.extend(out.display_lines);
        update.metrics.extend(out.metrics);
        update.status = self.status;
    }

    /// Consumes `fragments` to exhaustion, delivering every update to `sink`.
    ///
    /// A source error delivers a `Failed` update, stops consumption and is
    /// returned as `TrainingError::Source`.
    pub async fn run<S>(mut self, fragments: S, sink: &dyn UpdateSink) -> TrainingResult<SessionSummary>
    where
        S: Stream<Item = Result<String, SourceError>>,
    {
        futures::pin_mut!(fragments);
        sink.on_update(self.start());

        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => {
                    if let Some(update) = self.process_fragment(&fragment) {
                        sink.on_update(update);
                    }
                }
                Err(e) => {
                    warn!(session = %self.label, error = %e, "Log source failed");
                    sink.on_update(self.fail(&e));
                    return Err(TrainingError::Source(e));
                }
            }
        }

        let update = self.finish();
        let failure = update.is_failure();
        sink.on_update(update);

        if failure {
            if let CompletionPolicy::RequireMarker { marker } = &self.completion {
                warn!(session = %self.label, marker = %marker, "Log stream closed without success marker");
                return Err(TrainingError::MissingSuccessMarker { marker: marker.clone() });
            }
        }

        let summary = self.summary();

        info!(
            session = %self.label,
            fragments = summary.fragments,
            lines = summary.lines,
            metrics = summary.metrics,
            status = %summary.status,
            "Session completed"
        );
        Ok(summary)
    }

    /// Opens `source` and runs the session over it.
    ///
    /// Failing to open counts as a source failure.
    pub async fn run_source(
        mut self,
        source: &dyn LogSource,
        sink: &dyn UpdateSink,
    ) -> TrainingResult<SessionSummary> {
        match source.open().await {
            Ok(stream) => self.run(stream, sink).await,
            Err(e) => {
                warn!(session = %self.label, source = source.source_id(), error = %e, "Failed to open log source");
                sink.on_update(self.start());
                sink.on_update(self.fail(&e));
                Err(TrainingError::Source(e))
            }
        }
    }
}
