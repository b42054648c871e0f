//! Short-lived notifications shown on every page.
//!
//! Notices expire after a fixed lifetime or when dismissed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct NoticeQueue {
    next_id: u64,
    entries: Vec<Notice>,
}

pub struct Notices {
    ttl: Duration,
    queue: Mutex<NoticeQueue>,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            queue: Mutex::new(NoticeQueue::default()),
        }
    }

    pub fn push(&self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Utc::now())
    }

    pub fn push_at(&self, kind: NoticeKind, message: impl Into<String>, now: DateTime<Utc>) -> u64 {
        let Ok(mut queue) = self.queue.lock() else {
            return 0;
        };
        queue.next_id += 1;
        let id = queue.next_id;
        queue.entries.push(Notice {
            id,
            kind,
            message: message.into(),
            expires_at: now + self.ttl,
        });
        id
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NoticeKind::Error, message)
    }

    /// Unexpired notices, oldest first. Expired ones are dropped.
    pub fn active(&self) -> Vec<Notice> {
        self.active_at(Utc::now())
    }

    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Notice> {
        let Ok(mut queue) = self.queue.lock() else {
            return Vec::new();
        };
        queue.entries.retain(|n| n.expires_at > now);
        queue.entries.clone()
    }

    pub fn dismiss(&self, id: u64) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.entries.retain(|n| n.id != id);
        }
    }
}
