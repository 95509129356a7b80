//! Per-call diagnostic text accumulator.
//!
//! One [`ErrorSink`] is created for each encode call and threaded by reference
//! through every step that can report a problem. Entries are tagged `Warn:` or
//! `Err:` and joined with ` - `, so a failure message carries the full history
//! of what went wrong in that call. Every entry is also forwarded to the `log`
//! facade.

use std::fmt;

const SEPARATOR: &str = " - ";
const WARN_TAG: &str = "Warn: ";
const ERR_TAG: &str = "Err: ";

/// Accumulated warnings and errors for a single encode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSink {
    text: String,
    warnings: usize,
    errors: usize,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recoverable warning. Never aborts the call.
    pub fn warn(&mut self, msg: &str) {
        self.warn_at(log::Level::Warn, msg);
    }

    /// Record a recoverable warning, forwarding it to the log at `level`.
    ///
    /// The sink text is the same as for [`ErrorSink::warn`]; only the log
    /// level differs.
    pub fn warn_at(&mut self, level: log::Level, msg: &str) {
        log::log!(level, "{msg}");
        self.push(WARN_TAG, msg);
        self.warnings += 1;
    }

    /// Record a fatal error.
    pub fn error(&mut self, msg: &str) {
        log::error!("{msg}");
        self.push(ERR_TAG, msg);
        self.errors += 1;
    }

    fn push(&mut self, tag: &str, msg: &str) {
        if !self.text.is_empty() {
            self.text.push_str(SEPARATOR);
        }
        self.text.push_str(tag);
        self.text.push_str(msg);
    }

    /// All entries so far, in the order they were recorded.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sink() {
        let sink = ErrorSink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.as_str(), "");
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 0);
    }

    #[test]
    fn test_first_entry_has_no_separator() {
        let mut sink = ErrorSink::new();
        sink.warn("low memory");
        assert_eq!(sink.as_str(), "Warn: low memory");
    }

    #[test]
    fn test_entries_are_joined_in_order() {
        let mut sink = ErrorSink::new();
        sink.warn("first");
        sink.error("second");
        sink.warn("third");
        assert_eq!(sink.as_str(), "Warn: first - Err: second - Warn: third");
        assert_eq!(sink.warning_count(), 2);
        assert!(sink.has_errors());
    }

    #[test]
    fn test_warnings_alone_are_not_errors() {
        let mut sink = ErrorSink::new();
        sink.warn("a");
        sink.warn("b");
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_warn_at_records_like_warn() {
        let mut quiet = ErrorSink::new();
        quiet.warn_at(log::Level::Debug, "padded frame");
        quiet.error("disk full");

        let mut loud = ErrorSink::new();
        loud.warn("padded frame");
        loud.error("disk full");

        assert_eq!(quiet, loud);
        assert_eq!(quiet.as_str(), "Warn: padded frame - Err: disk full");
        assert_eq!(quiet.warning_count(), 1);
    }

    #[test]
    fn test_display_matches_text() {
        let mut sink = ErrorSink::new();
        sink.error("bad CRC");
        assert_eq!(sink.to_string(), "Err: bad CRC");
        assert_eq!(sink.into_string(), "Err: bad CRC");
    }
}
