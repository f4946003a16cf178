//! User-visible status messages.
//!
//! Every failure that reaches the session boundary ends up here instead of
//! propagating to the caller.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
    Processing,
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLevel::Info => write!(f, "info"),
            StatusLevel::Success => write!(f, "success"),
            StatusLevel::Error => write!(f, "error"),
            StatusLevel::Processing => write!(f, "processing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.text)
    }
}

/// Ordered log of messages produced during a session
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    messages: Vec<StatusMessage>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: StatusLevel, text: impl Into<String>) {
        let message = StatusMessage {
            level,
            text: text.into(),
        };
        if level == StatusLevel::Error {
            tracing::warn!("{}", message.text);
        } else {
            tracing::debug!("{}", message.text);
        }
        self.messages.push(message);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(StatusLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(StatusLevel::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(StatusLevel::Error, text);
    }

    pub fn processing(&mut self, text: impl Into<String>) {
        self.push(StatusLevel::Processing, text);
    }

    pub fn messages(&self) -> &[StatusMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&StatusMessage> {
        self.messages.last()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == StatusLevel::Error)
    }

    /// Remove and return everything logged so far
    pub fn drain(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.messages)
    }
}
