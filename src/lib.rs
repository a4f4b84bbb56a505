//! State Actuator: message-driven state containers with independent sessions
//!
//! An [`Actuator`] owns an initial state and a broadcast channel. Producers
//! submit messages; every [`StateSession`] created from the actuator applies
//! them through the application's pure `update` function and emits each
//! distinct new state as a stream item.
//!
//! # Core Concepts
//!
//! - **Stateful**: the application definition (`init`, `update`, `subscriptions`)
//! - **Model**: an identity-carrying state handle; returning the same handle means "no change"
//! - **Update**: a transition outcome, optionally carrying pending follow-up messages
//! - **Fallback**: where messages no session handles are forwarded
//!
//! # Example
//!
//! ```rust
//! use futures::StreamExt;
//! use state_actuator::core::{Message, Model, Stateful, TransitionError, Update};
//! use state_actuator::{message_enum, Actuator};
//!
//! message_enum! {
//!     enum CounterMsg {
//!         Increment,
//!         Noop,
//!     }
//! }
//!
//! struct Counter;
//!
//! impl Stateful for Counter {
//!     type State = i64;
//!     type Msg = CounterMsg;
//!
//!     fn init(&self) -> i64 {
//!         0
//!     }
//!
//!     fn update(&self, model: &Model<i64>, msg: &CounterMsg) -> Result<Update<i64, CounterMsg>, TransitionError> {
//!         Ok(match msg {
//!             CounterMsg::Increment => Update::state(**model + 1),
//!             CounterMsg::Noop => Update::state(model.clone()),
//!         })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let actuator = Actuator::new(Counter);
//! let mut session = actuator.create_session();
//!
//! actuator.submit(CounterMsg::Noop);
//! actuator.submit(CounterMsg::Increment);
//!
//! // The no-op produced no emission.
//! assert_eq!(*session.next().await.unwrap().unwrap(), 1);
//! assert_eq!(CounterMsg::Increment.id(), "Increment");
//! # }
//! ```

pub mod actuator;
pub mod broadcast;
pub mod builder;
pub mod core;
pub mod session;
pub mod subscription;

// Re-export commonly used types
pub use actuator::{Actuator, Submitter};
pub use broadcast::BroadcastChannel;
pub use builder::{ActuatorBuilder, ActuatorConfig, BuildError, BuildErrors};
pub use core::{Envelope, Message, Model, PendingError, Stateful, TransitionError, Update};
pub use session::{SessionError, SessionStats, StateSession};
pub use subscription::{Subscribed, SubscriptionExt};
