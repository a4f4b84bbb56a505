//! Builder API for ergonomic actuator construction.
//!
//! [`ActuatorBuilder`] validates configuration with `stillwater::Validation`
//! so every problem is reported at once, and [`message_enum!`](crate::message_enum)
//! removes the boilerplate of declaring simple message types.

pub mod actuator;
pub mod config;
pub mod error;
pub mod macros;

pub use actuator::ActuatorBuilder;
pub use config::ActuatorConfig;
pub use error::{BuildError, BuildErrors};
