//! Bridge configuration.
//!
//! The classifier needs three string markers from the embedding
//! application. They can come from a deserialized config document or from
//! environment variables; defaults match the Miniserver naming conventions
//! this bridge was written against.

use serde::{Deserialize, Serialize};

/// Default marker values.
pub mod defaults {
    /// Items named like `Temperatur Wohnzimmer` are temperature sensors.
    pub const TEMPERATURE_PREFIX: &str = "Temperat";
    /// Items named like `Humidity Bad` are humidity sensors.
    pub const HUMIDITY_PREFIX: &str = "Humidity";
    /// Items carrying this substring are internal status/diagnostic items.
    pub const INTERNAL_MARKER: &str = "Loxone";
}

/// Environment variable names.
pub mod env_vars {
    pub const TEMPERATURE_PREFIX: &str = "LOXKIT_TEMPERATURE_PREFIX";
    pub const HUMIDITY_PREFIX: &str = "LOXKIT_HUMIDITY_PREFIX";
    pub const INTERNAL_MARKER: &str = "LOXKIT_INTERNAL_MARKER";
}

/// String markers consumed by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name prefix marking an item as a temperature sensor.
    pub temperature_prefix: String,
    /// Name prefix marking an item as a humidity sensor.
    pub humidity_prefix: String,
    /// Name substring marking an item as internal, to be skipped.
    pub internal_marker: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            temperature_prefix: defaults::TEMPERATURE_PREFIX.to_string(),
            humidity_prefix: defaults::HUMIDITY_PREFIX.to_string(),
            internal_marker: defaults::INTERNAL_MARKER.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Build a config from environment variables, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            temperature_prefix: std::env::var(env_vars::TEMPERATURE_PREFIX)
                .unwrap_or(defaults.temperature_prefix),
            humidity_prefix: std::env::var(env_vars::HUMIDITY_PREFIX)
                .unwrap_or(defaults.humidity_prefix),
            internal_marker: std::env::var(env_vars::INTERNAL_MARKER)
                .unwrap_or(defaults.internal_marker),
        }
    }
}
