//! Short-lived user-facing messages.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created: Instant,
}

/// Newest-last queue of notices.
#[derive(Debug, Default)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    /// Queue a notice. A message identical to one still showing is dropped.
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        if self
            .items
            .iter()
            .any(|n| n.level == level && n.message == message)
        {
            return;
        }

        match level {
            NoticeLevel::Error => tracing::error!(%message, "notice"),
            NoticeLevel::Warning => tracing::warn!(%message, "notice"),
            NoticeLevel::Info | NoticeLevel::Success => tracing::debug!(%message, "notice"),
        }

        if self.items.len() == MAX_NOTICES {
            self.items.pop_front();
        }
        self.items.push_back(Notice {
            level,
            message,
            created: Instant::now(),
        });
    }

    /// Drop notices older than `ttl` at `now`.
    pub fn expire(&mut self, now: Instant, ttl: Duration) {
        self.items
            .retain(|n| now.saturating_duration_since(n.created) < ttl);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
