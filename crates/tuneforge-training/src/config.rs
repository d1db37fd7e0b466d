//! Caller-owned interpretation policy.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::error::{TrainingError, TrainingResult};
use crate::status::StatusRules;

pub const DEFAULT_SUCCESS_MARKER: &str = "[SUCCESS]";
pub const DEFAULT_PREAMBLE: &str = "[INFO] Initiating deployment process...";
pub const DEFAULT_FAILURE_LINE: &str = "[ERROR] The deployment process failed.";

fn default_marker() -> String {
    DEFAULT_SUCCESS_MARKER.to_string()
}

/// How a cleanly closed stream is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Clean close means success.
    #[default]
    OnStreamEnd,
    /// Clean close is success only if some narration line contained `marker`.
    RequireMarker {
        #[serde(default = "default_marker")]
        marker: String,
    },
}

/// Interpreter settings, loadable from TOML.
///
/// ```toml
/// allow_regression = false
/// completion = { mode = "require_marker", marker = "[SUCCESS]" }
///
/// [[status_rules]]
/// tag = "[DEPLOY]"
/// status = "deploying"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub status_rules: StatusRules,
    pub allow_regression: bool,
    pub completion: CompletionPolicy,
    /// First log line of a session. Empty disables it.
    pub preamble: String,
    /// Line appended when the source fails. Empty disables it.
    pub failure_line: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            status_rules: StatusRules::default(),
            allow_regression: true,
            completion: CompletionPolicy::default(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            failure_line: DEFAULT_FAILURE_LINE.to_string(),
        }
    }
}

impl InterpreterConfig {
    pub fn from_toml_str(content: &str) -> TrainingResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> TrainingResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> TrainingResult<()> {
        for (idx, rule) in self.status_rules.rules().iter().enumerate() {
            if rule.tag.is_empty() {
                return Err(TrainingError::InvalidConfig(format!("status_rules[{idx}].tag is empty")));
            }
            if rule.status.is_terminal() {
                return Err(TrainingError::InvalidConfig(format!(
                    "status_rules[{idx}] maps {:?} to terminal status {}",
                    rule.tag, rule.status
                )));
            }
        }
        if let CompletionPolicy::RequireMarker { marker } = &self.completion {
            if marker.is_empty() {
                return Err(TrainingError::InvalidConfig("completion.marker is empty".to_string()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.status_rules.clone(), self.allow_regression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{JobStatus, StatusRule};
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = InterpreterConfig::default();
        assert!(config.allow_regression);
        assert_eq!(config.completion, CompletionPolicy::OnStreamEnd);
        assert_eq!(config.status_rules, StatusRules::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = InterpreterConfig::from_toml_str("").unwrap();
        assert_eq!(config, InterpreterConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let toml = r#"
            allow_regression = false
            preamble = ""
            completion = { mode = "require_marker" }

            [[status_rules]]
            tag = "[PROVISION]"
            status = "provisioning"

            [[status_rules]]
            tag = "[TRAIN]"
            status = "training"
        "#;
        let config = InterpreterConfig::from_toml_str(toml).unwrap();
        assert!(!config.allow_regression);
        assert!(config.preamble.is_empty());
        assert_eq!(config.failure_line, DEFAULT_FAILURE_LINE);
        assert_eq!(
            config.completion,
            CompletionPolicy::RequireMarker { marker: DEFAULT_SUCCESS_MARKER.to_string() }
        );
        assert_eq!(
            config.status_rules.rules(),
            &[
                StatusRule::new("[PROVISION]", JobStatus::Provisioning),
                StatusRule::new("[TRAIN]", JobStatus::Training),
            ]
        );
    }

    #[test]
    fn test_rejects_empty_tag_and_terminal_status() {
        let toml = r#"
            [[status_rules]]
            tag = ""
            status = "training"
        "#;
        assert!(matches!(
            InterpreterConfig::from_toml_str(toml),
            Err(TrainingError::InvalidConfig(_))
        ));

        let toml = r#"
            [[status_rules]]
            tag = "[SUCCESS]"
            status = "active"
        "#;
        assert!(matches!(
            InterpreterConfig::from_toml_str(toml),
            Err(TrainingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_status_is_parse_error() {
        let toml = r#"
            [[status_rules]]
            tag = "[X]"
            status = "exploding"
        "#;
        assert!(matches!(InterpreterConfig::from_toml_str(toml), Err(TrainingError::Toml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("interpreter.toml");
        std::fs::write(&path, "allow_regression = false\n").unwrap();
        let config = InterpreterConfig::load_from_file(&path).unwrap();
        assert!(!config.allow_regression);
    }
}
