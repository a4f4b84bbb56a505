//! Pull side of the broadcast channel.

use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tracing::trace;

use super::channel::{lock, ReaderId, ReaderList};

/// Handle that removes a reader from its channel.
///
/// Cloneable and idempotent: only the first call to
/// [`deregister`](Self::deregister) has an effect.
pub struct Deregistration<M> {
    id: ReaderId,
    readers: Weak<Mutex<ReaderList<M>>>,
    done: Arc<AtomicBool>,
}

impl<M> Deregistration<M> {
    pub(super) fn new(id: ReaderId, readers: Weak<Mutex<ReaderList<M>>>) -> Self {
        Self {
            id,
            readers,
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> ReaderId {
        self.id
    }

    /// Removes the reader so later submissions skip it.
    ///
    /// Returns `true` only for the call that actually removed it. Messages
    /// already queued for the reader can still be drained, after which its
    /// stream ends.
    pub fn deregister(&self) -> bool {
        if self.done.swap(true, Ordering::AcqRel) {
            return false;
        }
        let Some(readers) = self.readers.upgrade() else {
            return false;
        };
        let removed = lock(&readers).remove(self.id);
        if removed {
            trace!(reader = %self.id, "reader deregistered");
        }
        removed
    }

    pub fn is_deregistered(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

impl<M> Clone for Deregistration<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            readers: Weak::clone(&self.readers),
            done: Arc::clone(&self.done),
        }
    }
}

impl<M> fmt::Debug for Deregistration<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deregistration")
            .field("id", &self.id)
            .field("done", &self.is_deregistered())
            .finish()
    }
}

/// Live stream of messages submitted after registration.
///
/// Ends once the reader is deregistered and its queue drained. Dropping the
/// reader deregisters it.
pub struct Reader<M> {
    id: ReaderId,
    rx: mpsc::UnboundedReceiver<M>,
    registration: Deregistration<M>,
}

impl<M> Reader<M> {
    pub(super) fn new(
        id: ReaderId,
        rx: mpsc::UnboundedReceiver<M>,
        registration: Deregistration<M>,
    ) -> Self {
        Self {
            id,
            rx,
            registration,
        }
    }

    pub fn id(&self) -> ReaderId {
        self.id
    }

    /// Waits for the next message.
    pub async fn recv(&mut self) -> Option<M> {
        self.rx.recv().await
    }
}

impl<M> Stream for Reader<M> {
    type Item = M;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<M>> {
        self.rx.poll_recv(cx)
    }
}

impl<M> Drop for Reader<M> {
    fn drop(&mut self) {
        self.registration.deregister();
    }
}

impl<M> fmt::Debug for Reader<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::broadcast::BroadcastChannel;
    use futures::StreamExt;

    #[tokio::test]
    async fn recv_matches_stream_order() {
        let channel = BroadcastChannel::new();
        let (mut reader, _registration) = channel.register_reader();
        channel.submit('a');
        channel.submit('b');

        assert_eq!(reader.recv().await, Some('a'));
        assert_eq!(reader.next().await, Some('b'));
    }

    #[test]
    fn deregistration_outliving_channel_is_harmless() {
        let channel: BroadcastChannel<u8> = BroadcastChannel::new();
        let (reader, registration) = channel.register_reader();
        drop(channel);
        drop(reader);

        assert!(registration.is_deregistered());
        assert!(!registration.deregister());
    }

    #[test]
    fn clones_share_state() {
        let channel: BroadcastChannel<u8> = BroadcastChannel::new();
        let (_reader, registration) = channel.register_reader();
        let copy = registration.clone();

        assert!(copy.deregister());
        assert!(registration.is_deregistered());
        assert_eq!(channel.reader_count(), 0);
    }

    #[tokio::test]
    async fn reregistering_inside_consumption_is_safe() {
        let channel = BroadcastChannel::new();
        let (mut first, first_reg) = channel.register_reader();
        channel.submit(1);

        let mut extra = Vec::new();
        while let Some(n) = first.next().await {
            // Mutate the reader list while a message is being consumed.
            let (reader, registration) = channel.register_reader();
            extra.push((reader, registration));
            first_reg.deregister();
            channel.submit(n + 1);
        }

        assert_eq!(channel.reader_count(), 1);
        let (mut added, _) = extra.pop().unwrap();
        assert_eq!(added.next().await, Some(2));
    }
}
