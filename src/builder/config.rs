//! Actuator configuration.

use serde::{Deserialize, Serialize};

/// Settings applied when an actuator is constructed.
///
/// Deserializes with defaults for missing fields:
///
/// ```rust
/// use state_actuator::builder::ActuatorConfig;
///
/// let config: ActuatorConfig = serde_json::from_str(r#"{"label":"cart"}"#).unwrap();
/// assert_eq!(config.label, "cart");
/// assert!(config.log_unhandled);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Name attached to every log record the actuator emits.
    pub label: String,

    /// Log a debug record when an unhandled message is dropped for lack of
    /// a fallback.
    pub log_unhandled: bool,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            label: "actuator".to_string(),
            log_unhandled: true,
        }
    }
}
