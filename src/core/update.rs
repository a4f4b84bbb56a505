//! Results of applying a message to a state.

use super::model::Model;
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;

/// An asynchronously produced follow-up message.
///
/// Once it resolves, the message is submitted to the actuator's broadcast
/// channel and reaches every registered session.
pub type PendingMessage<M> = BoxFuture<'static, Result<M, PendingError>>;

/// Outcome of a transition.
///
/// # Example
///
/// ```rust
/// use state_actuator::core::{resolved, Envelope, Model, Update};
///
/// let model = Model::new(0u32);
///
/// let bare: Update<u32, Envelope<()>> = Update::state(Model::new(1u32));
/// assert!(bare.is_handled());
///
/// let compound: Update<u32, Envelope<()>> =
///     Update::with_message(model.clone(), resolved(Envelope::signal("done")));
/// assert_eq!(compound.pending_len(), 1);
///
/// let declined: Update<u32, Envelope<()>> = Update::unhandled();
/// assert!(!declined.is_handled());
/// ```
pub enum Update<S, M> {
    /// Move to this state.
    NewState(Model<S>),

    /// Move to this state and submit each pending message once it resolves.
    NewStateWithPending(Model<S>, Vec<PendingMessage<M>>),

    /// The transition does not recognize the message.
    Unhandled,
}

impl<S, M> Update<S, M> {
    pub fn state(model: impl Into<Model<S>>) -> Self {
        Self::NewState(model.into())
    }

    /// State plus a single pending message.
    pub fn with_message(model: impl Into<Model<S>>, pending: PendingMessage<M>) -> Self {
        Self::NewStateWithPending(model.into(), vec![pending])
    }

    /// State plus an ordered collection of pending messages.
    pub fn with_messages<I>(model: impl Into<Model<S>>, pending: I) -> Self
    where
        I: IntoIterator<Item = PendingMessage<M>>,
    {
        Self::NewStateWithPending(model.into(), pending.into_iter().collect())
    }

    pub fn unhandled() -> Self {
        Self::Unhandled
    }

    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Unhandled)
    }

    /// The new state, if the message was handled.
    pub fn model(&self) -> Option<&Model<S>> {
        match self {
            Self::NewState(model) | Self::NewStateWithPending(model, _) => Some(model),
            Self::Unhandled => None,
        }
    }

    pub fn pending_len(&self) -> usize {
        match self {
            Self::NewStateWithPending(_, pending) => pending.len(),
            _ => 0,
        }
    }
}

impl<S, M> From<Model<S>> for Update<S, M> {
    fn from(model: Model<S>) -> Self {
        Self::NewState(model)
    }
}

impl<S: fmt::Debug, M> fmt::Debug for Update<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewState(model) => f.debug_tuple("NewState").field(model).finish(),
            Self::NewStateWithPending(model, pending) => f
                .debug_struct("NewStateWithPending")
                .field("model", model)
                .field("pending", &pending.len())
                .finish(),
            Self::Unhandled => f.write_str("Unhandled"),
        }
    }
}

/// Wrap a fallible future as a pending message.
pub fn pending<M, F>(fut: F) -> PendingMessage<M>
where
    F: Future<Output = Result<M, PendingError>> + Send + 'static,
{
    fut.boxed()
}

/// Wrap an infallible future as a pending message.
pub fn pending_ok<M, F>(fut: F) -> PendingMessage<M>
where
    M: Send + 'static,
    F: Future<Output = M> + Send + 'static,
{
    fut.map(Ok).boxed()
}

/// A pending message that is already available.
///
/// It is still delivered asynchronously, as a separate turn.
pub fn resolved<M: Send + 'static>(msg: M) -> PendingMessage<M> {
    future::ready(Ok(msg)).boxed()
}

/// Errors raised by an application transition function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("Transition failed: {0}")]
    Failed(String),

    #[error("Transition panicked: {0}")]
    Panicked(String),
}

impl TransitionError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// Errors raised while resolving a pending message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PendingError {
    #[error("Pending message rejected: {0}")]
    Rejected(String),

    #[error("Pending message panicked: {0}")]
    Panicked(String),

    #[error("No async runtime available to resolve the pending message")]
    NoRuntime,
}

impl PendingError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

/// Render a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
