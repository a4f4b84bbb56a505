//! Builder for constructing actuators.

use std::sync::Arc;

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

use crate::actuator::{Actuator, Fallback, RejectionHandler};
use crate::builder::config::ActuatorConfig;
use crate::builder::error::{BuildError, BuildErrors};
use crate::core::{PendingError, Stateful};

/// Fluent construction of an [`Actuator`] with its handlers attached.
///
/// Configuration problems are accumulated and reported together.
///
/// ```rust
/// use state_actuator::builder::{ActuatorBuilder, BuildError};
/// use state_actuator::core::{Envelope, Model, Stateful, TransitionError, Update};
///
/// struct Idle;
///
/// impl Stateful for Idle {
///     type State = ();
///     type Msg = Envelope<()>;
///
///     fn init(&self) {}
///
///     fn update(&self, _: &Model<()>, _: &Envelope<()>) -> Result<Update<(), Envelope<()>>, TransitionError> {
///         Ok(Update::unhandled())
///     }
/// }
///
/// let err = ActuatorBuilder::<Idle>::new().label("  ").build().unwrap_err();
/// assert!(err.contains(&BuildError::MissingDefinition));
/// assert!(err.contains(&BuildError::BlankLabel));
///
/// let actuator = ActuatorBuilder::new().definition(Idle).label("idle").build().unwrap();
/// assert_eq!(actuator.config().label, "idle");
/// ```
pub struct ActuatorBuilder<D: Stateful> {
    definition: Option<D>,
    config: ActuatorConfig,
    fallback: Option<Fallback<D::Msg>>,
    on_rejected: Option<RejectionHandler>,
}

impl<D: Stateful> ActuatorBuilder<D> {
    pub fn new() -> Self {
        Self {
            definition: None,
            config: ActuatorConfig::default(),
            fallback: None,
            on_rejected: None,
        }
    }

    /// Set the state definition (required).
    pub fn definition(mut self, definition: D) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    pub fn log_unhandled(mut self, enabled: bool) -> Self {
        self.config.log_unhandled = enabled;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ActuatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a fallback for messages no session handles.
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(D::Msg) + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Attach an observer for pending messages that fail to resolve.
    pub fn on_pending_rejected<F>(mut self, handler: F) -> Self
    where
        F: Fn(&PendingError) + Send + Sync + 'static,
    {
        self.on_rejected = Some(Arc::new(handler));
        self
    }

    /// Check every requirement, collecting all failures.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<BuildError>> {
        let checks = vec![
            if self.definition.is_some() {
                Validation::success(())
            } else {
                Validation::fail(BuildError::MissingDefinition)
            },
            if self.config.label.trim().is_empty() {
                Validation::fail(BuildError::BlankLabel)
            } else {
                Validation::success(())
            },
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the actuator. Calls the definition's `init` exactly once.
    pub fn build(self) -> Result<Actuator<D>, BuildErrors> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(BuildErrors(errors.iter().cloned().collect()));
        }

        let definition = self
            .definition
            .ok_or_else(|| BuildErrors(vec![BuildError::MissingDefinition]))?;

        let actuator = Actuator::with_config(definition, self.config);
        if let Some(fallback) = self.fallback {
            actuator.set_fallback(move |msg| fallback(msg));
        }
        if let Some(handler) = self.on_rejected {
            actuator.on_pending_rejected(move |err| handler(err));
        }
        Ok(actuator)
    }
}

impl<D: Stateful> Default for ActuatorBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}
