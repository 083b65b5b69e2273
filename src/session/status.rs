use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Info)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Success)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Warning)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Error)
    }
}

/// The most recent status message, hidden once it is older than `ttl`.
/// A newer message replaces the old one and restarts the timer.
#[derive(Clone, Debug)]
pub struct StatusLine {
    ttl: Duration,
    current: Option<(StatusMessage, Instant)>,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn show(&mut self, message: StatusMessage, now: Instant) {
        self.current = Some((message, now));
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref().map(|(message, _)| message)
    }

    /// Drop the message if it has expired. Returns true if one was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|(_, shown_at)| now.saturating_duration_since(*shown_at) >= self.ttl);
        if expired {
            self.current = None;
        }
        expired
    }
}
