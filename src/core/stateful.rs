//! The application-supplied state definition.

use super::message::Message;
use super::model::Model;
use super::update::{TransitionError, Update};
use crate::actuator::Submitter;

/// Everything an actuator needs to know about an application's state.
///
/// `update` should be pure. To leave the state unchanged, return a clone of
/// the `Model` it was given; to change it, return a new `Model`.
///
/// # Example
///
/// ```rust
/// use state_actuator::core::{Envelope, Message, Model, Stateful, TransitionError, Update};
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
///             "noop" => Update::state(model.clone()),
///             _ => Update::unhandled(),
///         })
///     }
/// }
///
/// let model = Model::new(Counter.init());
/// let next = Counter.update(&model, &Envelope::signal("inc")).unwrap();
/// assert_eq!(next.model().map(|m| **m), Some(1));
/// ```
pub trait Stateful: Send + Sync + 'static {
    /// Application state tracked by each session.
    type State: Send + Sync + 'static;

    /// Messages driving transitions.
    type Msg: Message;

    /// Build the initial state. Called once per actuator.
    fn init(&self) -> Self::State;

    /// Apply a message to the current state.
    ///
    /// An `Err` ends the calling session's stream; other sessions keep going.
    fn update(
        &self,
        model: &Model<Self::State>,
        msg: &Self::Msg,
    ) -> Result<Update<Self::State, Self::Msg>, TransitionError>;

    /// Side effects to run for every emitted state.
    ///
    /// New work reaches the actuator only through `submit`.
    fn subscriptions(&self, _model: &Model<Self::State>, _submit: &Submitter<Self::Msg>) {}
}
