//! Normalizes transition results for a session.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::trace;

use crate::actuator::Dispatch;
use crate::core::{panic_message, Message, Model, Stateful, TransitionError, Update};

/// What a session should do after a transition.
#[derive(Debug)]
pub(crate) enum Step<S> {
    /// Candidate next state; the session decides whether it changed.
    Next(Model<S>),

    /// Hand the message to the fallback.
    Unhandled,
}

/// Calls the application's `update` and schedules any pending messages.
pub(crate) struct TransitionAdapter<D: Stateful> {
    definition: Arc<D>,
    dispatch: Arc<Dispatch<D::Msg>>,
}

impl<D: Stateful> TransitionAdapter<D> {
    pub(crate) fn new(definition: Arc<D>, dispatch: Arc<Dispatch<D::Msg>>) -> Self {
        Self {
            definition,
            dispatch,
        }
    }

    /// Apply `msg` to `model`.
    ///
    /// A panic inside `update` is reported as [`TransitionError::Panicked`].
    pub(crate) fn apply(
        &self,
        model: &Model<D::State>,
        msg: &D::Msg,
    ) -> Result<Step<D::State>, TransitionError> {
        let update = panic::catch_unwind(AssertUnwindSafe(|| self.definition.update(model, msg)))
            .map_err(|payload| TransitionError::Panicked(panic_message(payload.as_ref())))??;

        Ok(match update {
            Update::NewState(next) => Step::Next(next),
            Update::NewStateWithPending(next, pending) => {
                trace!(
                    message_id = msg.id(),
                    pending = pending.len(),
                    "scheduling pending messages"
                );
                for fut in pending {
                    self.dispatch.schedule(fut);
                }
                Step::Next(next)
            }
            Update::Unhandled => Step::Unhandled,
        })
    }

    pub(crate) fn forward_unhandled(&self, msg: D::Msg) {
        self.dispatch.forward_unhandled(msg);
    }
}
