//! State sessions.
//!
//! Each session owns one evolving state. A dedicated task reads the session's
//! broadcast reader, runs the transition adapter one message at a time, and
//! queues every newly produced state for the consumer.
//!
//! ```text
//! Reader ──► TransitionAdapter ──► same instance?  ── yes ──► (skip)
//!                 │   │                  │
//!                 │   │                  no ──► output queue ──► subscriptions ──► consumer
//!                 │   └─ Unhandled ──► fallback
//!                 └─ pending ──► tokio task ──► submit ──► Broadcast Channel
//! ```

mod adapter;
mod stats;
mod stream;

pub use stats::{SessionId, SessionStats};
pub use stream::StateSession;

use crate::core::TransitionError;

/// Errors that end a session's stream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Transition failed on message '{message_id}': {source}")]
    Transition {
        message_id: String,
        #[source]
        source: TransitionError,
    },

    #[error("No tokio runtime available to run the session")]
    NoRuntime,
}

impl SessionError {
    /// Identifier of the message that triggered the failure.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Transition { message_id, .. } => Some(message_id),
            Self::NoRuntime => None,
        }
    }
}
