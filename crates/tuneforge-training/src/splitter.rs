//! Reassembles newline-delimited lines from arbitrarily cut text fragments.

/// Line splitter for one stream.
///
/// Holds the unterminated tail of everything fed so far. Every complete line
/// is handed out exactly once, in input order, without its `\n`. Empty lines
/// are handed out too; filtering is the classifier's job.
#[derive(Debug, Default, Clone)]
pub struct LineSplitter {
    buffer: String,
}

impl LineSplitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `fragment` and returns every line it completed.
    pub fn feed(&mut self, fragment: &str) -> Vec<String> {
        if fragment.is_empty() {
            return Vec::new();
        }
        self.buffer.push_str(fragment);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let tail = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, tail);
        // `complete` ends with '\n'; drop it so the split yields no trailing piece.
        complete[..last_newline].split('\n').map(str::to_string).collect()
    }

    /// Returns the unterminated tail, if any, and clears it.
    ///
    /// Call once when the source is exhausted.
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Text received but not yet part of a complete line.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_fragment_is_retained() {
        let mut splitter = LineSplitter::new();
        assert!(splitter.feed("[SETUP] load").is_empty());
        assert_eq!(splitter.pending(), "[SETUP] load");
        assert_eq!(splitter.feed("ing\nnext"), vec!["[SETUP] loading"]);
        assert_eq!(splitter.pending(), "next");
    }

    #[test]
    fn test_fragment_ending_on_boundary_leaves_empty_buffer() {
        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.feed("a\nb\n"), vec!["a", "b"]);
        assert_eq!(splitter.pending(), "");
        assert_eq!(splitter.flush(), None);
    }

    #[test]
    fn test_newlines_only_yield_empty_lines() {
        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.feed("\n\n"), vec!["", ""]);
        assert_eq!(splitter.flush(), None);
    }

    #[test]
    fn test_empty_fragment_is_noop() {
        let mut splitter = LineSplitter::new();
        splitter.feed("abc");
        assert!(splitter.feed("").is_empty());
        assert_eq!(splitter.pending(), "abc");
    }

    #[test]
    fn test_flush_returns_tail_once() {
        let mut splitter = LineSplitter::new();
        splitter.feed("x\ntail");
        assert_eq!(splitter.flush(), Some("tail".to_string()));
        assert_eq!(splitter.flush(), None);
    }

    #[test]
    fn test_carriage_returns_are_kept() {
        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.feed("a\r\n"), vec!["a\r"]);
    }

    #[test]
    fn test_multibyte_text_around_newlines() {
        let mut splitter = LineSplitter::new();
        assert_eq!(splitter.feed("héllo\nwörld"), vec!["héllo"]);
        assert_eq!(splitter.flush(), Some("wörld".to_string()));
    }
}
