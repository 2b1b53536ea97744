//! Clipboard access through the OSC 52 terminal escape.
//!
//! The terminal emulator owns the system clipboard, so this works the same
//! over SSH and needs no platform library. Terminals that do not support
//! OSC 52 ignore the sequence.

use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;
use std::time::{Duration, Instant};

/// How long the prompt shows the "copied" marker.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// Build the escape sequence that puts `text` on the clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Send `text` to the terminal clipboard.
pub fn copy_to_clipboard(text: &str, out: &mut impl Write) -> Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()?;
    tracing::debug!(bytes = text.len(), "Sent document to clipboard");
    Ok(())
}

/// Transient "copied" indicator that reverts on its own.
#[derive(Debug, Default)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    /// Create an inactive indicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copy that just happened.
    pub fn mark(&mut self) {
        self.mark_at(Instant::now());
    }

    fn mark_at(&mut self, at: Instant) {
        self.copied_at = Some(at);
    }

    /// Whether the indicator is showing.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Instant::now())
    }

    fn is_active_at(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_FEEDBACK_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_copy_writes_sequence() {
        let mut out = Vec::new();
        copy_to_clipboard("\\documentclass{report}", &mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.starts_with("\x1b]52;c;"));
        assert!(written.ends_with('\x07'));
    }

    #[test]
    fn test_feedback_reverts() {
        let mut feedback = CopyFeedback::new();
        let start = Instant::now();
        assert!(!feedback.is_active_at(start));

        feedback.mark_at(start);
        assert!(feedback.is_active_at(start + Duration::from_millis(1900)));
        assert!(!feedback.is_active_at(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_feedback_restarts_on_second_copy() {
        let mut feedback = CopyFeedback::new();
        let start = Instant::now();
        feedback.mark_at(start);
        feedback.mark_at(start + Duration::from_millis(1500));
        assert!(feedback.is_active_at(start + Duration::from_millis(3000)));
    }
}
