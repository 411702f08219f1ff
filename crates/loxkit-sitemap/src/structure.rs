//! Serde model of the Miniserver structure file (`LoxAPP3.json`).
//!
//! Only the fields the pipeline needs are modeled; everything else in the
//! document is carried through opaquely so nothing is lost between ingest
//! and dispatch. The upstream producer is trusted to emit well-formed
//! entries; the only defensive handling is that any of the three sections
//! may be absent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use loxkit_core::error::Result;

/// A visualization category. The `image` icon is what the classifier uses
/// to recognize lighting categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Icon reference assigned in the Miniserver config.
    #[serde(default)]
    pub image: String,
    /// Fields this pipeline does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A room. Controls reference rooms by identifier; only the display name
/// is interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Display name shown to the user.
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A control node as ingested from the document. Sub-controls are
/// themselves control-shaped; identifiers live on the enclosing map keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawControl {
    /// Display name from the Miniserver config.
    #[serde(default)]
    pub name: String,
    /// Raw type tag (e.g. `Switch`, `Jalousie`, `LightControllerV2`).
    #[serde(rename = "type", default)]
    pub control_type: String,
    /// Category reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cat: Option<String>,
    /// Room reference. Absent when the "Not used" room was selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Nested sub-controls, e.g. the circuits of a light controller.
    #[serde(
        rename = "subControls",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_controls: Option<HashMap<String, RawControl>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// The structure document. All three sections are optional; a missing
/// section is treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureFile {
    /// Visualization categories keyed by identifier.
    #[serde(default)]
    pub cats: HashMap<String, Category>,
    /// Rooms keyed by identifier.
    #[serde(default)]
    pub rooms: HashMap<String, Room>,
    /// Top-level controls keyed by identifier.
    #[serde(default)]
    pub controls: HashMap<String, RawControl>,
}

impl StructureFile {
    /// Parse a structure document from JSON text.
    pub fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a structure document from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
