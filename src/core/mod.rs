//! Core actuator types.
//!
//! This module contains the pure data model:
//! - Messages via the `Message` trait
//! - Identity-carrying state handles (`Model`)
//! - Transition outcomes (`Update`) and pending follow-up messages
//! - The application definition (`Stateful`)
//!
//! Nothing here spawns tasks or touches the broadcast channel.

mod message;
mod model;
mod stateful;
mod update;

pub(crate) use update::panic_message;

pub use message::{Envelope, Message};
pub use model::Model;
pub use stateful::Stateful;
pub use update::{
    pending, pending_ok, resolved, PendingError, PendingMessage, TransitionError, Update,
};
