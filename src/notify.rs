//! Notices
//!
//! One-shot success and error messages shown after a user action: the
//! console's equivalent of a toast. A failed request produces exactly one
//! notice and is never retried.

use serde::Serialize;

use crate::client::ClientError;
use crate::i18n::{Language, Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Marker printed before the message
    pub fn icon(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "✓",
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Warning => "⚠",
            NoticeLevel::Error => "✕",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Error notice for a failed request: the server's message when it
    /// sent one, otherwise a generic fallback
    pub fn from_client_error(err: &ClientError, language: Language) -> Self {
        let message = match err {
            ClientError::Validation(e) => format!(
                "{}: {}",
                language.text(&Message::ValidationFailed),
                e
            ),
            ClientError::Unavailable(_) => language.text(&Message::Unavailable),
            ClientError::Timeout => language.text(&Message::Timeout),
            other => other
                .user_message()
                .unwrap_or_else(|| language.text(&Message::GenericFailure)),
        };
        Self::error(message)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.level.icon(), self.message)
    }
}

/// Where notices are shown
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Prints notices to stderr, keeping stdout for data
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, notice: Notice) {
        eprintln!("{}", notice);
    }
}

/// Keeps notices in memory
#[derive(Debug, Default)]
pub struct NoticeLog {
    pub notices: Vec<Notice>,
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
