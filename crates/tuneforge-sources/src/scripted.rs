//! In-memory scripted source.
//!
//! Replays a fixed transcript as a fragment stream, the way a generative
//! service streams its reply: word by word with a short pause in between.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tuneforge_abstraction::{FragmentStream, LogSource, SourceError};

/// Delay between fragments used by the simulated typing effect.
pub const DEFAULT_WORD_DELAY: Duration = Duration::from_millis(40);

/// How a transcript is cut into fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "size", rename_all = "snake_case")]
pub enum Chunking {
    /// Alternating runs of non-whitespace and whitespace, delimiters kept.
    #[default]
    Words,
    /// Fixed-size runs of `n` characters (the last one may be shorter).
    Chars(usize),
    /// The whole transcript as a single fragment.
    Whole,
}

impl Chunking {
    /// Cuts `text` into fragments. Concatenating the result yields `text`.
    #[must_use]
    pub fn split(self, text: &str) -> Vec<String> {
        match self {
            Self::Words => split_words(text),
            Self::Chars(n) => split_chars(text, n.max(1)),
            Self::Whole if text.is_empty() => Vec::new(),
            Self::Whole => vec![text.to_string()],
        }
    }
}

fn split_words(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_space = None;

    for ch in text.chars() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            out.push(std::mem::take(&mut current));
        }
        in_space = Some(space);
        current.push(ch);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn split_chars(text: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(n).map(|c| c.iter().collect()).collect()
}

/// A source that replays a fixed transcript.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    id: String,
    text: String,
    chunking: Chunking,
    delay: Duration,
    fail_after: Option<usize>,
}

impl ScriptedSource {
    /// Creates a word-chunked source with no delay.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            chunking: Chunking::Words,
            delay: Duration::ZERO,
            fail_after: None,
        }
    }

    #[must_use]
    pub fn with_chunking(mut self, chunking: Chunking) -> Self {
        self.chunking = chunking;
        self
    }

    /// Pause before each fragment is yielded.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the stream after `fragments` fragments have been yielded.
    #[must_use]
    pub fn fail_after(mut self, fragments: usize) -> Self {
        self.fail_after = Some(fragments);
        self
    }

    /// The fragments this source yields, in order, before any injected failure.
    #[must_use]
    pub fn fragments(&self) -> Vec<String> {
        let mut fragments = self.chunking.split(&self.text);
        if let Some(limit) = self.fail_after {
            fragments.truncate(limit);
        }
        fragments
    }
}

#[async_trait]
impl LogSource for ScriptedSource {
    async fn open(&self) -> Result<FragmentStream, SourceError> {
        let mut items: Vec<Result<String, SourceError>> =
            self.fragments().into_iter().map(Ok).collect();
        if let Some(limit) = self.fail_after {
            items.push(Err(SourceError::Stream(format!(
                "scripted failure after {limit} fragments"
            ))));
        }

        debug!(source = %self.id, fragments = items.len(), "Opening scripted source");

        let delay = self.delay;
        let stream = futures::stream::iter(items).then(move |item| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            item
        });
        Ok(Box::pin(stream))
    }

    fn source_id(&self) -> &str {
        &self.id
    }
}
