//! Cloneable submission entry point.

use std::fmt;
use std::sync::Arc;

use super::dispatch::Dispatch;
use crate::core::{Message, PendingMessage};

/// Handle for feeding messages into an actuator.
///
/// Cheap to clone and safe to move into subscriptions, background tasks, or
/// a child actuator's fallback.
pub struct Submitter<M> {
    dispatch: Arc<Dispatch<M>>,
}

impl<M: Message> Submitter<M> {
    pub(crate) fn new(dispatch: Arc<Dispatch<M>>) -> Self {
        Self { dispatch }
    }

    /// Broadcast `msg` to every registered session.
    ///
    /// Returns the number of sessions notified.
    pub fn submit(&self, msg: M) -> usize {
        self.dispatch.submit(msg)
    }

    /// Submit the message produced by `pending` once it resolves.
    ///
    /// Failures go to the actuator's rejection handler.
    pub fn spawn(&self, pending: PendingMessage<M>) {
        self.dispatch.schedule(pending);
    }
}

impl<M> Clone for Submitter<M> {
    fn clone(&self) -> Self {
        Self {
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<M> fmt::Debug for Submitter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submitter").finish_non_exhaustive()
    }
}
