//! The externally visible actuator.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::debug;

use super::dispatch::Dispatch;
use super::submitter::Submitter;
use crate::builder::{ActuatorBuilder, ActuatorConfig};
use crate::core::{Model, PendingError, Stateful};
use crate::session::{SessionError, StateSession};

/// State container driven by messages.
///
/// Holds the initial state, the shared broadcast channel, and the optional
/// fallback. Any number of sessions can be created; each evolves its own
/// state from the same incoming messages.
///
/// # Example
///
/// ```rust
/// use futures::StreamExt;
/// use state_actuator::core::{Envelope, Message, Model, Stateful, TransitionError, Update};
/// use state_actuator::Actuator;
///
/// struct Counter;
///
/// impl Stateful for Counter {
///     type State = u32;
///     type Msg = Envelope<()>;
///
///     fn init(&self) -> u32 {
///         0
///     }
///
///     fn update(&self, model: &Model<u32>, msg: &Envelope<()>) -> Result<Update<u32, Envelope<()>>, TransitionError> {
///         Ok(match msg.id() {
///             "inc" => Update::state(**model + 1),
///             _ => Update::unhandled(),
///         })
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let actuator = Actuator::new(Counter);
/// let mut session = actuator.create_session();
///
/// actuator.submit(Envelope::signal("inc"));
/// actuator.submit(Envelope::signal("inc"));
///
/// assert_eq!(*session.next().await.unwrap().unwrap(), 1);
/// assert_eq!(*session.next().await.unwrap().unwrap(), 2);
/// # }
/// ```
pub struct Actuator<D: Stateful> {
    definition: Arc<D>,
    initial: Model<D::State>,
    dispatch: Arc<Dispatch<D::Msg>>,
    config: ActuatorConfig,
}

impl<D: Stateful> Actuator<D> {
    /// Create an actuator with the default configuration.
    pub fn new(definition: D) -> Self {
        Self::with_config(definition, ActuatorConfig::default())
    }

    /// Create an actuator. Calls `definition.init()` exactly once.
    pub fn with_config(definition: D, config: ActuatorConfig) -> Self {
        let initial = Model::new(definition.init());
        let dispatch = Arc::new(Dispatch::new(&config));
        debug!(actuator = %config.label, "actuator initialized");
        Self {
            definition: Arc::new(definition),
            initial,
            dispatch,
            config,
        }
    }

    pub fn builder() -> ActuatorBuilder<D> {
        ActuatorBuilder::new()
    }

    /// The state every new session starts from.
    pub fn initial_model(&self) -> &Model<D::State> {
        &self.initial
    }

    pub fn definition(&self) -> &D {
        &self.definition
    }

    pub fn config(&self) -> &ActuatorConfig {
        &self.config
    }

    /// Broadcast `msg` to every registered session.
    ///
    /// Returns the number of sessions notified.
    pub fn submit(&self, msg: D::Msg) -> usize {
        self.dispatch.submit(msg)
    }

    pub fn submitter(&self) -> Submitter<D::Msg> {
        Submitter::new(Arc::clone(&self.dispatch))
    }

    /// Route messages no session handles to `fallback`.
    ///
    /// Replaces any previous fallback. Each session that declines a message
    /// forwards it once.
    pub fn set_fallback<F>(&self, fallback: F)
    where
        F: Fn(D::Msg) + Send + Sync + 'static,
    {
        self.dispatch.set_fallback(Some(Arc::new(fallback)));
    }

    /// Forward unhandled messages into another actuator.
    pub fn forward_unhandled_to(&self, parent: Submitter<D::Msg>) {
        self.set_fallback(move |msg| {
            parent.submit(msg);
        });
    }

    pub fn clear_fallback(&self) {
        self.dispatch.set_fallback(None);
    }

    pub fn has_fallback(&self) -> bool {
        self.dispatch.has_fallback()
    }

    /// Observe pending messages that fail to resolve.
    ///
    /// Failures are always logged; the handler is optional.
    pub fn on_pending_rejected<F>(&self, handler: F)
    where
        F: Fn(&PendingError) + Send + Sync + 'static,
    {
        self.dispatch.set_rejection_handler(Some(Arc::new(handler)));
    }

    /// Start a new session seeded with the initial state.
    ///
    /// The session is registered before this returns, so it observes every
    /// message submitted afterwards.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime. Use
    /// [`try_create_session`](Self::try_create_session) to get an error instead.
    pub fn create_session(&self) -> StateSession<D> {
        self.start_session(&Handle::current())
    }

    /// Like [`create_session`](Self::create_session), but fails with
    /// [`SessionError::NoRuntime`] outside a tokio runtime. Nothing is
    /// registered in that case.
    pub fn try_create_session(&self) -> Result<StateSession<D>, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        Ok(self.start_session(&runtime))
    }

    fn start_session(&self, runtime: &Handle) -> StateSession<D> {
        StateSession::start(
            runtime,
            Arc::clone(&self.definition),
            Arc::clone(&self.dispatch),
            self.initial.clone(),
        )
    }

    /// Number of sessions currently registered on the channel.
    pub fn reader_count(&self) -> usize {
        self.dispatch.channel().reader_count()
    }

    /// Pending messages scheduled but not yet resolved.
    pub fn pending_in_flight(&self) -> usize {
        self.dispatch.in_flight()
    }
}

impl<D: Stateful> fmt::Debug for Actuator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actuator")
            .field("label", &self.config.label)
            .field("readers", &self.reader_count())
            .field("fallback", &self.has_fallback())
            .finish()
    }
}
