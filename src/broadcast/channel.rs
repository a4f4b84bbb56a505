//! Reader registry and fan-out.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::trace;

use super::reader::{Deregistration, Reader};

/// Identifier of a registered reader, unique within one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReaderId(u64);

impl ReaderId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reader-{}", self.0)
    }
}

struct ReaderSlot<M> {
    id: ReaderId,
    sender: mpsc::UnboundedSender<M>,
}

pub(super) struct ReaderList<M> {
    next_id: u64,
    slots: Vec<ReaderSlot<M>>,
}

impl<M> ReaderList<M> {
    pub(super) fn remove(&mut self, id: ReaderId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }
}

pub(super) type SharedReaders<M> = Arc<Mutex<ReaderList<M>>>;

pub(super) fn lock<M>(readers: &Mutex<ReaderList<M>>) -> MutexGuard<'_, ReaderList<M>> {
    readers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Multi-reader message channel.
///
/// Cloning is cheap; clones share the same reader list.
///
/// # Example
///
/// ```rust
/// use futures::StreamExt;
/// use state_actuator::broadcast::BroadcastChannel;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let channel = BroadcastChannel::new();
/// let (mut a, _) = channel.register_reader();
/// let (mut b, _) = channel.register_reader();
///
/// assert_eq!(channel.submit("hello"), 2);
/// assert_eq!(a.next().await, Some("hello"));
/// assert_eq!(b.next().await, Some("hello"));
/// # }
/// ```
pub struct BroadcastChannel<M> {
    readers: SharedReaders<M>,
}

impl<M> Clone for BroadcastChannel<M> {
    fn clone(&self) -> Self {
        Self {
            readers: Arc::clone(&self.readers),
        }
    }
}

impl<M> Default for BroadcastChannel<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> fmt::Debug for BroadcastChannel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastChannel")
            .field("readers", &self.reader_count())
            .finish()
    }
}

impl<M> BroadcastChannel<M> {
    pub fn new() -> Self {
        Self {
            readers: Arc::new(Mutex::new(ReaderList {
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    /// Registers a new reader.
    ///
    /// The reader receives every message submitted from now on. Dropping the
    /// reader or calling [`Deregistration::deregister`] removes it.
    pub fn register_reader(&self) -> (Reader<M>, Deregistration<M>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut list = lock(&self.readers);
            let id = ReaderId(list.next_id);
            list.next_id += 1;
            list.slots.push(ReaderSlot { id, sender: tx });
            id
        };
        trace!(reader = %id, "reader registered");

        let registration = Deregistration::new(id, Arc::downgrade(&self.readers));
        (Reader::new(id, rx, registration.clone()), registration)
    }

    /// Number of currently registered readers.
    pub fn reader_count(&self) -> usize {
        lock(&self.readers).slots.len()
    }
}

impl<M: Clone> BroadcastChannel<M> {
    /// Delivers `msg` to every registered reader, in registration order.
    ///
    /// Returns the number of readers notified. Readers whose stream has been
    /// dropped are pruned.
    pub fn submit(&self, msg: M) -> usize {
        let targets: Vec<(ReaderId, mpsc::UnboundedSender<M>)> = lock(&self.readers)
            .slots
            .iter()
            .map(|slot| (slot.id, slot.sender.clone()))
            .collect();

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, sender) in targets {
            match sender.send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => closed.push(id),
            }
        }

        if !closed.is_empty() {
            let mut list = lock(&self.readers);
            for id in closed {
                if list.remove(id) {
                    trace!(reader = %id, "pruned closed reader");
                }
            }
        }
        delivered
    }
}
