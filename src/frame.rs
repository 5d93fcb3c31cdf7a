//! Line framing for the event stream.
//!
//! Decoded text arrives in fragments that rarely align with line
//! boundaries. [`LineFramer`] buffers the unterminated tail and hands
//! back whole lines, dropping the blank keep-alive separators between
//! events.

/// Reassembles newline-delimited lines from arbitrary text fragments.
///
/// Lines are split on `\n`; a trailing `\r` is trimmed away with the
/// surrounding whitespace, so CRLF streams work unchanged.
#[derive(Debug, Default)]
pub struct LineFramer {
    carry: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one fragment, returning every line it completes. Blank lines
    /// are separators and are not returned.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        self.carry.push_str(fragment);

        let mut lines = Vec::new();
        while let Some(pos) = self.carry.find('\n') {
            let line = self.carry[..pos].trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
            self.carry.drain(..=pos);
        }
        lines
    }

    /// Consume the framer at end of stream, returning the unterminated
    /// final line if a non-blank one was pending.
    pub fn finish(self) -> Option<String> {
        let line = self.carry.trim();
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_lines_in_one_fragment() {
        let mut framer = LineFramer::new();
        assert_eq!(
            framer.push("data: a\ndata: b\n\n"),
            vec!["data: a".to_string(), "data: b".to_string()]
        );
    }

    #[test]
    fn test_line_split_across_fragments() {
        let mut framer = LineFramer::new();
        assert!(framer.push("data: hel").is_empty());
        assert_eq!(framer.push("lo\n"), vec!["data: hello".to_string()]);
    }

    #[test]
    fn test_crlf_terminators() {
        let mut framer = LineFramer::new();
        assert_eq!(
            framer.push("data: a\r\ndata: b\r\n"),
            vec!["data: a".to_string(), "data: b".to_string()]
        );
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let mut framer = LineFramer::new();
        assert!(framer.push("\n\r\n   \n").is_empty());
    }

    #[test]
    fn test_finish_returns_pending_line() {
        let mut framer = LineFramer::new();
        assert!(framer.push("data: tail").is_empty());
        assert_eq!(framer.finish(), Some("data: tail".to_string()));
    }

    #[test]
    fn test_finish_ignores_whitespace_tail() {
        let mut framer = LineFramer::new();
        assert!(framer.push("  ").is_empty());
        assert_eq!(framer.finish(), None);
    }
}
