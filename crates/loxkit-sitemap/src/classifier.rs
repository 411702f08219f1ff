//! Type resolution for flattened items.
//!
//! The structure file's raw type vocabulary is too coarse to drive
//! accessory behavior on its own: every on/off device is a `Switch`
//! whether it feeds a relay or a ceiling light. The classifier resolves
//! that ambiguity from context: naming conventions, the category icon,
//! or placement under a known light controller.
//!
//! The type decision is a first-match-wins chain over [`TYPE_RULES`];
//! keeping the rules in one ordered table makes the precedence auditable
//! and each rule testable on its own. Alias normalization, the skip flag
//! and the manufacturer stamp are orthogonal post-processing applied
//! regardless of which rule fired.

use std::collections::HashMap;

use tracing::{debug, trace};

use loxkit_core::config::BridgeConfig;

use crate::registry::{Item, SitemapRegistry};
use crate::structure::Category;

/// Type tags from the structure file vocabulary, plus the resolved tags
/// the classifier introduces.
pub mod tags {
    pub const SWITCH: &str = "Switch";
    pub const LIGHTBULB: &str = "Lightbulb";
    pub const TEMPERATURE_SENSOR: &str = "TemperatureSensor";
    pub const HUMIDITY_SENSOR: &str = "HumiditySensor";
    pub const DIMMER: &str = "Dimmer";
    /// KNX dimmer alias, normalized to [`DIMMER`].
    pub const EIB_DIMMER: &str = "EIBDimmer";
    pub const COLOR_PICKER: &str = "Colorpicker";
    /// Picker variant used inside `LightControllerV2`, normalized to
    /// [`COLOR_PICKER`].
    pub const COLOR_PICKER_V2: &str = "ColorPickerV2";
    pub const LIGHT_CONTROLLER: &str = "LightController";
    pub const LIGHT_CONTROLLER_V2: &str = "LightControllerV2";
    pub const JALOUSIE: &str = "Jalousie";
    pub const PUSHBUTTON: &str = "Pushbutton";
}

/// Icon the Miniserver assigns to lighting categories. A `Switch` filed
/// under a category with this icon drives a light, not a relay.
pub const LIGHT_CATEGORY_IMAGE: &str = "00000000-0000-0002-2000000000000000.svg";

/// Manufacturer stamped on every classified item.
pub const MANUFACTURER: &str = "Loxone";

/// A named type-resolution rule. Returns `true` when it claims the type
/// decision for the item, ending the chain, including when it recognized
/// the item's context but left the type unchanged.
pub struct TypeRule {
    /// Rule name, for logs and tests.
    pub name: &'static str,
    apply: fn(&BridgeConfig, &HashMap<String, Category>, &mut Item) -> bool,
}

impl TypeRule {
    /// Run the rule against one item.
    pub fn apply(
        &self,
        config: &BridgeConfig,
        categories: &HashMap<String, Category>,
        item: &mut Item,
    ) -> bool {
        (self.apply)(config, categories, item)
    }
}

impl std::fmt::Debug for TypeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRule").field("name", &self.name).finish()
    }
}

fn temperature_prefix(
    config: &BridgeConfig,
    _categories: &HashMap<String, Category>,
    item: &mut Item,
) -> bool {
    if item.name.starts_with(&config.temperature_prefix) {
        item.item_type = tags::TEMPERATURE_SENSOR.to_string();
        return true;
    }
    false
}

fn humidity_prefix(
    config: &BridgeConfig,
    _categories: &HashMap<String, Category>,
    item: &mut Item,
) -> bool {
    if item.name.starts_with(&config.humidity_prefix) {
        item.item_type = tags::HUMIDITY_SENSOR.to_string();
        return true;
    }
    false
}

fn light_category(
    _config: &BridgeConfig,
    categories: &HashMap<String, Category>,
    item: &mut Item,
) -> bool {
    let lighting = item
        .cat
        .as_deref()
        .and_then(|id| categories.get(id))
        .is_some_and(|category| category.image == LIGHT_CATEGORY_IMAGE);
    if lighting {
        if item.item_type == tags::SWITCH {
            item.item_type = tags::LIGHTBULB.to_string();
        }
        // The category match claims the decision even for non-Switch
        // types; the parent-type rule below is not consulted.
        return true;
    }
    false
}

fn light_controller_child(
    _config: &BridgeConfig,
    _categories: &HashMap<String, Category>,
    item: &mut Item,
) -> bool {
    match item.parent_type.as_deref() {
        Some(tags::LIGHT_CONTROLLER) | Some(tags::LIGHT_CONTROLLER_V2) => {
            if item.item_type == tags::SWITCH {
                item.item_type = tags::LIGHTBULB.to_string();
            } else if item.item_type == tags::COLOR_PICKER_V2 {
                item.item_type = tags::COLOR_PICKER.to_string();
            }
            true
        }
        _ => false,
    }
}

/// The type-decision chain, evaluated top to bottom per item. Naming
/// conventions outrank category inference, which outranks parent-type
/// inference.
pub const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        name: "temperature-prefix",
        apply: temperature_prefix,
    },
    TypeRule {
        name: "humidity-prefix",
        apply: humidity_prefix,
    },
    TypeRule {
        name: "light-category",
        apply: light_category,
    },
    TypeRule {
        name: "light-controller-child",
        apply: light_controller_child,
    },
];

/// Resolves each item's final type, skip flag and manufacturer.
///
/// Classification is total (every item ends in a defined state, possibly
/// with its raw type untouched) and idempotent.
#[derive(Debug)]
pub struct Classifier<'a> {
    config: &'a BridgeConfig,
    categories: &'a HashMap<String, Category>,
}

impl<'a> Classifier<'a> {
    /// Create a classifier over the given markers and category table.
    pub fn new(config: &'a BridgeConfig, categories: &'a HashMap<String, Category>) -> Self {
        Self { config, categories }
    }

    /// Classify one item in place.
    pub fn classify(&self, item: &mut Item) {
        for rule in TYPE_RULES {
            if rule.apply(self.config, self.categories, item) {
                trace!(rule = rule.name, item = %item.id, resolved = %item.item_type, "type rule matched");
                break;
            }
        }

        // Alias normalization, independent of the chain above.
        if item.item_type == tags::EIB_DIMMER {
            item.item_type = tags::DIMMER.to_string();
        }

        // Internal status/diagnostic items are not exposed.
        if item.name.contains(&self.config.internal_marker) {
            debug!(item = %item.id, name = %item.name, "marked internal item for skipping");
            item.skip = true;
        }

        item.manufacturer = Some(MANUFACTURER.to_string());
    }
}

impl SitemapRegistry {
    /// Run the classifier over every item in the registry.
    ///
    /// The category map is read-only here, so per-item classification has
    /// no cross-item dependencies.
    pub fn classify(&mut self, config: &BridgeConfig) {
        let classifier = Classifier::new(config, &self.categories);
        for item in self.items.values_mut() {
            classifier.classify(item);
        }
    }
}
