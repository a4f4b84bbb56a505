//! # Broadcast channel for actuator messages.
//!
//! Turns `submit` calls into independent pull streams, one per registered
//! reader.
//!
//! ## Architecture
//! ```text
//! submit(msg)
//!     │  (snapshot reader list, release lock)
//!     ├──► [queue 1] ──► Reader 1 ──► session 1
//!     ├──► [queue 2] ──► Reader 2 ──► session 2
//!     └──► [queue N] ──► Reader N ──► session N
//! ```
//!
//! ## Rules
//! - **Registration order**: readers are notified in the order they registered.
//! - **No replay**: a reader only sees messages submitted after it registered.
//! - **Non-blocking**: queues are unbounded; `submit` never waits on a reader.
//! - **Re-entrancy**: registering or deregistering from inside a delivery is
//!   safe because `submit` notifies a copy of the reader list.
//! - **Pruning**: readers whose stream was dropped are removed on the next `submit`.

mod channel;
mod reader;

pub use channel::{BroadcastChannel, ReaderId};
pub use reader::{Deregistration, Reader};
