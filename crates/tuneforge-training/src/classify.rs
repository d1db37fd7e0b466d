//! Line classification: metric telemetry vs. status narration.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::status::{JobStatus, StatusRules};

/// One epoch/loss telemetry point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricEvent {
    pub epoch: u64,
    pub loss: f64,
}

impl MetricEvent {
    /// Human-readable log line for this metric.
    #[must_use]
    pub fn display_line(&self) -> String {
        format!("Epoch {}: Training Loss = {:.4}", self.epoch, self.loss)
    }
}

/// Single-line structured records the log source may emit.
///
/// Wire shape: `{"type":"metric","epoch":<int>,"loss":<number>}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TelemetryRecord {
    Metric { epoch: u64, loss: f64 },
}

/// Decodes `line` as a metric record.
///
/// Anything else, including malformed JSON, other record types and
/// negative losses, yields `None`.
#[must_use]
pub fn decode_metric(line: &str) -> Option<MetricEvent> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<TelemetryRecord>(trimmed) {
        Ok(TelemetryRecord::Metric { epoch, loss }) if loss.is_finite() && loss >= 0.0 => {
            Some(MetricEvent { epoch, loss })
        }
        Ok(TelemetryRecord::Metric { loss, .. }) => {
            trace!(loss, "Metric record with out-of-range loss treated as narration");
            None
        }
        Err(e) => {
            trace!(error = %e, "Line is not a metric record");
            None
        }
    }
}

/// Which rule a line was classified by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Empty,
    Metric,
    Narration,
}

/// Output of classifying one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: LineKind,
    pub display_lines: Vec<String>,
    pub metrics: Vec<MetricEvent>,
    pub new_status: JobStatus,
}

impl Classification {
    fn unchanged(kind: LineKind, status: JobStatus) -> Self {
        Self { kind, display_lines: Vec::new(), metrics: Vec::new(), new_status: status }
    }
}

/// Classifies lines and derives status from narration tags.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: StatusRules,
    allow_regression: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(StatusRules::default(), true)
    }
}

impl Classifier {
    #[must_use]
    pub fn new(rules: StatusRules, allow_regression: bool) -> Self {
        Self { rules, allow_regression }
    }

    #[must_use]
    pub fn rules(&self) -> &StatusRules {
        &self.rules
    }

    pub fn classify(&self, line: &str, current: JobStatus) -> Classification {
        if line.is_empty() {
            return Classification::unchanged(LineKind::Empty, current);
        }

        if let Some(metric) = decode_metric(line) {
            return Classification {
                kind: LineKind::Metric,
                display_lines: vec![metric.display_line()],
                metrics: vec![metric],
                new_status: current,
            };
        }

        let mut out = Classification::unchanged(LineKind::Narration, current);
        out.display_lines.push(line.to_string());
        if let Some(next) = self.rules.match_line(line) {
            if self.allow_regression || !current.is_regression_to(next) {
                out.new_status = next;
            } else {
                trace!(%current, %next, "Ignoring backward status tag");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(StatusRules::default(), true)
    }

    #[test]
    fn test_metric_line_yields_event_and_display_line() {
        let out = classifier()
            .classify(r#"{"type":"metric","epoch":3,"loss":1.25}"#, JobStatus::Training);
        assert_eq!(out.kind, LineKind::Metric);
        assert_eq!(out.metrics, vec![MetricEvent { epoch: 3, loss: 1.25 }]);
        assert_eq!(out.display_lines.len(), 1);
        assert!(out.display_lines[0].contains("Epoch 3"));
        assert!(out.display_lines[0].contains("1.2500"));
        assert_eq!(out.new_status, JobStatus::Training);
    }

    #[test]
    fn test_metric_with_spaces_and_padding() {
        let out = classifier()
            .classify("  {\"type\": \"metric\", \"epoch\": 1, \"loss\": 2}  ", JobStatus::Provisioning);
        assert_eq!(out.metrics, vec![MetricEvent { epoch: 1, loss: 2.0 }]);
        assert_eq!(out.display_lines, vec!["Epoch 1: Training Loss = 2.0000"]);
    }

    #[test]
    fn test_truncated_json_falls_back_to_raw_line() {
        let line = r#"{"type":"metric","epoch":3,"#;
        let out = classifier().classify(line, JobStatus::Training);
        assert_eq!(out.kind, LineKind::Narration);
        assert!(out.metrics.is_empty());
        assert_eq!(out.display_lines, vec![line]);
    }

    #[test]
    fn test_record_missing_fields_is_narration() {
        let line = r#"{"type":"metric","epoch":3}"#;
        let out = classifier().classify(line, JobStatus::Training);
        assert!(out.metrics.is_empty());
        assert_eq!(out.display_lines, vec![line]);
    }

    #[test]
    fn test_other_record_type_is_narration_and_scanned_for_tags() {
        let line = r#"{"type":"event","msg":"[DEPLOY] go"}"#;
        let out = classifier().classify(line, JobStatus::Training);
        assert!(out.metrics.is_empty());
        assert_eq!(out.display_lines, vec![line]);
        assert_eq!(out.new_status, JobStatus::Deploying);
    }

    #[test]
    fn test_negative_loss_and_fractional_epoch_rejected() {
        assert_eq!(decode_metric(r#"{"type":"metric","epoch":1,"loss":-0.5}"#), None);
        assert_eq!(decode_metric(r#"{"type":"metric","epoch":1.5,"loss":0.5}"#), None);
        assert_eq!(decode_metric(r#"{"type":"metric","epoch":-1,"loss":0.5}"#), None);
        assert_eq!(decode_metric(r#"{"type":"metric","epoch":"1","loss":0.5}"#), None);
    }

    #[test]
    fn test_empty_line_produces_nothing() {
        let out = classifier().classify("", JobStatus::Deploying);
        assert_eq!(out.kind, LineKind::Empty);
        assert!(out.display_lines.is_empty());
        assert!(out.metrics.is_empty());
        assert_eq!(out.new_status, JobStatus::Deploying);
    }

    #[test]
    fn test_whitespace_line_is_narration() {
        let out = classifier().classify("   ", JobStatus::Training);
        assert_eq!(out.kind, LineKind::Narration);
        assert_eq!(out.display_lines, vec!["   "]);
    }

    #[test]
    fn test_metric_line_does_not_change_status_even_with_tag_text() {
        let out = classifier().classify(
            r#"{"type":"metric","epoch":2,"loss":0.5,"note":"[DEPLOY]"}"#,
            JobStatus::Training,
        );
        assert_eq!(out.kind, LineKind::Metric);
        assert_eq!(out.new_status, JobStatus::Training);
    }

    #[test]
    fn test_regression_allowed_by_default() {
        let out = classifier().classify("[TRAIN] late line", JobStatus::Deploying);
        assert_eq!(out.new_status, JobStatus::Training);
    }

    #[test]
    fn test_regression_blocked_when_disabled() {
        let strict = Classifier::new(StatusRules::default(), false);
        let out = strict.classify("[TRAIN] late line", JobStatus::Deploying);
        assert_eq!(out.new_status, JobStatus::Deploying);
        assert_eq!(out.display_lines, vec!["[TRAIN] late line"]);

        let out = strict.classify("[DEPLOY] forward", JobStatus::Training);
        assert_eq!(out.new_status, JobStatus::Deploying);
    }

    #[test]
    fn test_display_line_rounds_to_four_places() {
        let metric = MetricEvent { epoch: 7, loss: 0.123_456 };
        assert_eq!(metric.display_line(), "Epoch 7: Training Loss = 0.1235");
    }
}
