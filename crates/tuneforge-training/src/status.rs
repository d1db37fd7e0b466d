use serde::{Deserialize, Serialize};

/// Coarse phase of a project's training/deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Project record exists, no session has started yet.
    #[default]
    Configuring,
    Provisioning,
    Training,
    Deploying,
    Active,
    Failed,
}

impl JobStatus {
    /// Position in the forward order. `Failed` sits outside it.
    #[must_use]
    pub fn rank(self) -> Option<u8> {
        match self {
            Self::Configuring => Some(0),
            Self::Provisioning => Some(1),
            Self::Training => Some(2),
            Self::Deploying => Some(3),
            Self::Active => Some(4),
            Self::Failed => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Active | Self::Failed)
    }

    /// Whether moving from `self` to `next` goes backward in the forward order.
    #[must_use]
    pub fn is_regression_to(self, next: Self) -> bool {
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to < from,
            _ => self == Self::Failed && next != Self::Failed,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Configuring => "Configuring",
            Self::Provisioning => "Provisioning",
            Self::Training => "Training",
            Self::Deploying => "Deploying",
            Self::Active => "Active",
            Self::Failed => "Failed",
        };
        f.write_str(s)
    }
}

/// Maps a substring tag found in a narration line to a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRule {
    pub tag: String,
    pub status: JobStatus,
}

impl StatusRule {
    #[must_use]
    pub fn new(tag: impl Into<String>, status: JobStatus) -> Self {
        Self { tag: tag.into(), status }
    }
}

/// Ordered tag rules. The first rule whose tag occurs in a line wins.
///
/// Matching is a case-sensitive substring search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusRules(Vec<StatusRule>);

impl StatusRules {
    #[must_use]
    pub fn new(rules: Vec<StatusRule>) -> Self {
        Self(rules)
    }

    /// Returns the status of the first rule whose tag occurs in `line`.
    #[must_use]
    pub fn match_line(&self, line: &str) -> Option<JobStatus> {
        self.0
            .iter()
            .find(|rule| !rule.tag.is_empty() && line.contains(rule.tag.as_str()))
            .map(|rule| rule.status)
    }

    #[must_use]
    pub fn rules(&self) -> &[StatusRule] {
        &self.0
    }
}

impl Default for StatusRules {
    /// `[DEPLOY]` ahead of `[TRAIN]`: a line carrying both reads as deploying.
    fn default() -> Self {
        Self(vec![
            StatusRule::new("[DEPLOY]", JobStatus::Deploying),
            StatusRule::new("[TRAIN]", JobStatus::Training),
        ])
    }
}
