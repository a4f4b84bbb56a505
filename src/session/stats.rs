//! Per-session counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use uuid::Uuid;

/// Unique identifier of a state session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Snapshot of a session's activity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    /// Messages taken from the broadcast channel.
    pub received: u64,
    /// States queued for the consumer.
    pub emitted: u64,
    /// Transitions that returned the current state instance.
    pub unchanged: u64,
    /// Messages the transition function declined.
    pub unhandled: u64,
    /// Whether the session ended on a transition failure.
    pub failed: bool,
}

pub(crate) struct Counters {
    session_id: SessionId,
    started_at: DateTime<Utc>,
    received: AtomicU64,
    emitted: AtomicU64,
    unchanged: AtomicU64,
    unhandled: AtomicU64,
    failed: AtomicBool,
}

impl Counters {
    pub(crate) fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            started_at: Utc::now(),
            received: AtomicU64::new(0),
            emitted: AtomicU64::new(0),
            unchanged: AtomicU64::new(0),
            unhandled: AtomicU64::new(0),
            failed: AtomicBool::new(false),
        }
    }

    pub(crate) fn received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn emitted(&self) {
        self.emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn unchanged(&self) {
        self.unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn unhandled(&self) {
        self.unhandled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failed(&self) {
        self.failed.store(true, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SessionStats {
        SessionStats {
            session_id: self.session_id,
            started_at: self.started_at,
            received: self.received.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            unhandled: self.unhandled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
