use thiserror::Error;
use tuneforge_abstraction::SourceError;

pub type TrainingResult<T> = std::result::Result<T, TrainingError>;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("invalid interpreter config: {0}")]
    InvalidConfig(String),

    #[error("log source failed: {0}")]
    Source(#[from] SourceError),

    #[error("log stream closed without success marker {marker:?}")]
    MissingSuccessMarker { marker: String },

    #[error("unknown project: {0}")]
    UnknownProject(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
