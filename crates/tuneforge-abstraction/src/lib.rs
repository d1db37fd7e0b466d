//! Log source abstraction layer for Tuneforge.
//!
//! This module defines the seam between the log interpreter and whatever
//! produces the text it consumes. A source is nothing more than an ordered,
//! eventually exhausted (or failed) sequence of text fragments. Fragment
//! boundaries carry no meaning: they need not align with lines, words or
//! records.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents an error raised by a log source while producing fragments.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceError {
    /// The source could not be opened (missing file, rejected request, ...).
    #[error("Open Error: {0}")]
    Open(String),

    /// The source failed after it started producing fragments.
    #[error("Stream Error: {0}")]
    Stream(String),

    /// The source produced bytes that are not valid UTF-8.
    #[error("Decode Error: {0}")]
    Decode(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Stream(err.to_string())
    }
}

/// A stream of text fragments in arrival order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, SourceError>> + Send>>;

/// A trait for anything that can supply a fragment stream.
///
/// All sources must be `Send + Sync` so one source description can be
/// opened by several concurrent sessions.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Opens a fresh fragment stream.
    ///
    /// # Errors
    /// Returns a `SourceError` if the stream cannot be started.
    async fn open(&self) -> Result<FragmentStream, SourceError>;

    /// Returns a short identifier for logging.
    fn source_id(&self) -> &str;
}
