//! Shared submission path used by the facade, sessions, and pending tasks.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use futures::FutureExt;
use tracing::{debug, trace, warn};

use crate::broadcast::BroadcastChannel;
use crate::builder::ActuatorConfig;
use crate::core::{panic_message, Message, PendingError, PendingMessage};

/// Receives messages no session's transition claimed.
pub type Fallback<M> = Arc<dyn Fn(M) + Send + Sync>;

/// Receives pending messages that failed to resolve.
pub type RejectionHandler = Arc<dyn Fn(&PendingError) + Send + Sync>;

pub(crate) struct Dispatch<M> {
    label: String,
    log_unhandled: bool,
    channel: BroadcastChannel<M>,
    fallback: RwLock<Option<Fallback<M>>>,
    on_rejected: RwLock<Option<RejectionHandler>>,
    in_flight: AtomicUsize,
}

impl<M: Message> Dispatch<M> {
    pub(crate) fn new(config: &ActuatorConfig) -> Self {
        Self {
            label: config.label.clone(),
            log_unhandled: config.log_unhandled,
            channel: BroadcastChannel::new(),
            fallback: RwLock::new(None),
            on_rejected: RwLock::new(None),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn channel(&self) -> &BroadcastChannel<M> {
        &self.channel
    }

    pub(crate) fn submit(&self, msg: M) -> usize {
        trace!(actuator = %self.label, message_id = msg.id(), "submit");
        self.channel.submit(msg)
    }

    pub(crate) fn set_fallback(&self, fallback: Option<Fallback<M>>) {
        *self.fallback.write().unwrap_or_else(PoisonError::into_inner) = fallback;
    }

    pub(crate) fn has_fallback(&self) -> bool {
        self.fallback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn set_rejection_handler(&self, handler: Option<RejectionHandler>) {
        *self.on_rejected.write().unwrap_or_else(PoisonError::into_inner) = handler;
    }

    /// Hand `msg` to the fallback, or drop it if none is attached.
    ///
    /// A panicking fallback is logged and does not affect the caller.
    pub(crate) fn forward_unhandled(&self, msg: M) {
        // Clone out so the fallback may replace itself without deadlocking.
        let fallback = self
            .fallback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match fallback {
            Some(fallback) => {
                let message_id = msg.id().to_string();
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| fallback(msg))) {
                    warn!(
                        actuator = %self.label,
                        message_id = %message_id,
                        panic = %panic_message(payload.as_ref()),
                        "fallback panicked"
                    );
                }
            }
            None if self.log_unhandled => {
                debug!(actuator = %self.label, message_id = msg.id(), "unhandled message dropped");
            }
            None => {}
        }
    }

    fn reject(&self, err: PendingError) {
        warn!(actuator = %self.label, error = %err, "pending message failed to resolve");
        let handler = self
            .on_rejected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler(&err);
        }
    }

    /// Resolve `pending` on the runtime and submit its message.
    pub(crate) fn schedule(self: &Arc<Self>, pending: PendingMessage<M>) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.reject(PendingError::NoRuntime);
            return;
        };

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let dispatch = Arc::clone(self);
        runtime.spawn(async move {
            let outcome = match AssertUnwindSafe(pending).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => Err(PendingError::Panicked(panic_message(payload.as_ref()))),
            };
            match outcome {
                Ok(msg) => {
                    dispatch.submit(msg);
                }
                Err(err) => dispatch.reject(err),
            }
            dispatch.in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}
