//! Byte-reader sources (log files, stdin).
//!
//! Reads arbitrary-size chunks and decodes them as UTF-8. A multi-byte
//! character split across two reads is held back until it is complete, so
//! every yielded fragment is valid text.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;
use tuneforge_abstraction::{FragmentStream, LogSource, SourceError};

/// Default read size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

struct ReadState<R> {
    reader: R,
    buf: Vec<u8>,
    pending: Vec<u8>,
    /// Decode error held back until the valid text before it has been yielded.
    deferred: Option<SourceError>,
    done: bool,
}

/// Turns any async reader into a fragment stream of decoded text.
pub fn reader_stream<R>(reader: R, chunk_size: usize) -> FragmentStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let state = ReadState {
        reader,
        buf: vec![0; chunk_size.max(1)],
        pending: Vec::new(),
        deferred: None,
        done: false,
    };

    Box::pin(futures::stream::unfold(state, |mut st| async move {
        loop {
            if let Some(err) = st.deferred.take() {
                st.done = true;
                return Some((Err(err), st));
            }
            if st.done {
                return None;
            }

            let n = match st.reader.read(&mut st.buf).await {
                Ok(n) => n,
                Err(e) => {
                    st.done = true;
                    return Some((Err(SourceError::from(e)), st));
                }
            };

            if n == 0 {
                st.done = true;
                if st.pending.is_empty() {
                    return None;
                }
                let err = SourceError::Decode(format!(
                    "input ended inside a UTF-8 sequence ({} dangling bytes)",
                    st.pending.len()
                ));
                return Some((Err(err), st));
            }

            st.pending.extend_from_slice(&st.buf[..n]);
            let (text, invalid) = take_decoded(&mut st.pending);
            st.deferred = invalid;
            if let Some(text) = text {
                return Some((Ok(text), st));
            }
        }
    }))
}

/// Removes and returns the longest valid UTF-8 prefix of `pending`.
///
/// The prefix is `None` when only an incomplete trailing sequence is
/// buffered. The error is set when the prefix is followed by invalid bytes;
/// the text before them is still returned.
fn take_decoded(pending: &mut Vec<u8>) -> (Option<String>, Option<SourceError>) {
    let (valid, invalid) = match std::str::from_utf8(pending) {
        Ok(_) => (pending.len(), None),
        Err(e) if e.error_len().is_some() => (e.valid_up_to(), Some(SourceError::Decode(e.to_string()))),
        Err(e) => (e.valid_up_to(), None),
    };

    if valid == 0 {
        return (None, invalid);
    }

    let rest = pending.split_off(valid);
    let bytes = std::mem::replace(pending, rest);
    (Some(String::from_utf8_lossy(&bytes).into_owned()), invalid)
}

/// A log file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    id: String,
    path: PathBuf,
    chunk_size: usize,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self { id: format!("file:{}", path.display()), path, chunk_size: DEFAULT_CHUNK_SIZE }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

#[async_trait]
impl LogSource for FileSource {
    async fn open(&self) -> Result<FragmentStream, SourceError> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| SourceError::Open(format!("{}: {}", self.path.display(), e)))?;
        debug!(path = %self.path.display(), chunk_size = self.chunk_size, "Opened log file");
        Ok(reader_stream(file, self.chunk_size))
    }

    fn source_id(&self) -> &str {
        &self.id
    }
}

/// The process's standard input.
#[derive(Debug, Clone)]
pub struct StdinSource {
    chunk_size: usize,
}

impl StdinSource {
    #[must_use]
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

#[async_trait]
impl LogSource for StdinSource {
    async fn open(&self) -> Result<FragmentStream, SourceError> {
        Ok(reader_stream(tokio::io::stdin(), self.chunk_size))
    }

    fn source_id(&self) -> &str {
        "stdin"
    }
}
