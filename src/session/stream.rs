//! The per-session processing loop and its consumer handle.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::adapter::{Step, TransitionAdapter};
use super::stats::{Counters, SessionId, SessionStats};
use super::SessionError;
use crate::actuator::{Dispatch, Submitter};
use crate::broadcast::{Deregistration, Reader};
use crate::core::{Message, Model, Stateful};
use crate::subscription::Subscribed;

type Emission<S> = Result<Model<S>, SessionError>;
type Hook<S> = Box<dyn FnMut(&Model<S>) + Send>;

/// Receiving end of the worker's output queue.
struct Outbox<S> {
    rx: mpsc::UnboundedReceiver<Emission<S>>,
}

impl<S> Stream for Outbox<S> {
    type Item = Emission<S>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// One independently evolving state derived from the shared message stream.
///
/// Yields `Ok(model)` each time a transition produces a new state instance.
/// A failing transition yields a single `Err` and ends the stream. Dropping
/// the session releases its reader slot immediately.
///
/// Created by [`Actuator::create_session`](crate::Actuator::create_session).
pub struct StateSession<D: Stateful> {
    id: SessionId,
    stream: Subscribed<Outbox<D::State>, Hook<D::State>>,
    registration: Deregistration<D::Msg>,
    counters: Arc<Counters>,
    worker: JoinHandle<()>,
}

impl<D: Stateful> StateSession<D> {
    /// Registers a reader and starts the processing task on `runtime`.
    pub(crate) fn start(
        runtime: &Handle,
        definition: Arc<D>,
        dispatch: Arc<Dispatch<D::Msg>>,
        initial: Model<D::State>,
    ) -> Self {
        let id = SessionId::new();
        let counters = Arc::new(Counters::new(id));
        let (reader, registration) = dispatch.channel().register_reader();
        let (tx, rx) = mpsc::unbounded_channel();

        debug!(
            actuator = dispatch.label(),
            session = %id,
            reader = %reader.id(),
            "session started"
        );

        let submitter = Submitter::new(Arc::clone(&dispatch));
        let hook_definition = Arc::clone(&definition);
        let hook: Hook<D::State> =
            Box::new(move |model: &Model<D::State>| hook_definition.subscriptions(model, &submitter));

        let adapter = TransitionAdapter::new(definition, dispatch);
        let worker = runtime.spawn(run(
            id,
            adapter,
            reader,
            initial,
            tx,
            Arc::clone(&counters),
        ));

        Self {
            id,
            stream: Subscribed::new(Outbox { rx }, hook),
            registration,
            counters,
            worker,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn stats(&self) -> SessionStats {
        self.counters.snapshot()
    }

    /// Releases the reader slot without dropping the session.
    ///
    /// States derived from messages already delivered are still yielded;
    /// then the stream ends.
    pub fn deregister(&self) -> bool {
        self.registration.deregister()
    }

    pub fn is_registered(&self) -> bool {
        !self.registration.is_deregistered()
    }
}

impl<D: Stateful> Stream for StateSession<D> {
    type Item = Emission<D::State>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.poll_next_unpin(cx)
    }
}

impl<D: Stateful> Drop for StateSession<D> {
    fn drop(&mut self) {
        if self.registration.deregister() {
            trace!(session = %self.id, "session abandoned");
        }
        self.worker.abort();
    }
}

impl<D: Stateful> fmt::Debug for StateSession<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSession")
            .field("id", &self.id)
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Sequential processing loop: one message, one transition, at a time.
async fn run<D: Stateful>(
    id: SessionId,
    adapter: TransitionAdapter<D>,
    mut reader: Reader<D::Msg>,
    initial: Model<D::State>,
    out: mpsc::UnboundedSender<Emission<D::State>>,
    counters: Arc<Counters>,
) {
    let mut model = initial;

    while let Some(msg) = reader.next().await {
        counters.received();

        match adapter.apply(&model, &msg) {
            Ok(Step::Next(next)) => {
                if next.same_as(&model) {
                    counters.unchanged();
                    trace!(session = %id, message_id = msg.id(), "state unchanged");
                    continue;
                }
                model = next;
                counters.emitted();
                if out.send(Ok(model.clone())).is_err() {
                    break;
                }
            }
            Ok(Step::Unhandled) => {
                counters.unhandled();
                trace!(session = %id, message_id = msg.id(), "message unhandled");
                adapter.forward_unhandled(msg);
            }
            Err(source) => {
                counters.failed();
                warn!(session = %id, message_id = msg.id(), error = %source, "transition failed");
                // Release the slot before the consumer can observe the error.
                drop(reader);
                let _ = out.send(Err(SessionError::Transition {
                    message_id: msg.id().to_string(),
                    source,
                }));
                break;
            }
        }
    }

    debug!(session = %id, "session finished");
}
