//! Build errors for the actuator builder.

use thiserror::Error;

/// A single configuration problem found by [`ActuatorBuilder`](super::ActuatorBuilder).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Stateful definition not specified. Call .definition(def) before .build()")]
    MissingDefinition,

    #[error("Actuator label must not be blank")]
    BlankLabel,
}

/// Every problem found while building, reported together.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid actuator configuration: {}", render(.0))]
pub struct BuildErrors(pub Vec<BuildError>);

impl BuildErrors {
    pub fn errors(&self) -> &[BuildError] {
        &self.0
    }

    pub fn contains(&self, error: &BuildError) -> bool {
        self.0.contains(error)
    }
}

fn render(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
