//! Messages that drive state transitions.
//!
//! Every message carries an identifier so external tooling can log, persist,
//! or trace it. The actuator itself never interprets the identifier beyond
//! attaching it to diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for messages accepted by an actuator.
///
/// Messages are immutable once created. They are cloned once per registered
/// session when broadcast, so cheap clones are preferable.
///
/// # Example
///
/// ```rust
/// use state_actuator::core::Message;
///
/// #[derive(Clone, Debug)]
/// enum CounterMsg {
///     Increment,
///     Reset,
/// }
///
/// impl Message for CounterMsg {
///     fn id(&self) -> &str {
///         match self {
///             Self::Increment => "increment",
///             Self::Reset => "reset",
///         }
///     }
/// }
///
/// assert_eq!(CounterMsg::Increment.id(), "increment");
/// ```
pub trait Message: Clone + Debug + Send + Sync + 'static {
    /// Identifier used for logging and tracing.
    fn id(&self) -> &str;
}

/// Ready-made message: a string identifier plus an arbitrary payload.
///
/// Useful when an application does not want to define its own message enum.
///
/// ```rust
/// use state_actuator::core::{Envelope, Message};
///
/// let msg = Envelope::new("add", 5u32);
/// assert_eq!(msg.id(), "add");
/// assert_eq!(msg.payload, 5);
///
/// let tick = Envelope::signal("tick");
/// assert_eq!(tick.id(), "tick");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Envelope<P> {
    pub id: String,
    pub payload: P,
}

impl<P> Envelope<P> {
    pub fn new(id: impl Into<String>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

impl Envelope<()> {
    /// A payload-free message.
    pub fn signal(id: impl Into<String>) -> Self {
        Self::new(id, ())
    }
}

impl<P> Message for Envelope<P>
where
    P: Clone + Debug + Send + Sync + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }
}
