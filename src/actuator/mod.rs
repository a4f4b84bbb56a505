//! Actuator facade.
//!
//! The [`Actuator`] is the handle applications hold: it exposes the initial
//! state, the single submission entry point, the optional fallback for
//! unhandled messages, and the factory for new [`StateSession`]s.
//!
//! ```text
//! producer ──► Actuator::submit ──► BroadcastChannel ──► every StateSession
//!                   ▲                                           │
//!                   └────────── resolved pending messages ◄─────┘
//! ```
//!
//! [`StateSession`]: crate::session::StateSession

mod dispatch;
mod handle;
mod submitter;

pub(crate) use dispatch::Dispatch;

pub use dispatch::{Fallback, RejectionHandler};
pub use handle::Actuator;
pub use submitter::Submitter;
