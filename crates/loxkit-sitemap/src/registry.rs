//! Flat item registry built from a structure document.
//!
//! Flattening walks the three document sections, copies categories and
//! rooms into lookup tables, and folds every control *and* sub-control
//! into one flat item map. Names are rewritten on the way in so each item
//! is identifiable on its own: controls get their room appended, circuits
//! of a composite control get their parent's full name appended.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::structure::{Category, RawControl, Room, StructureFile};

/// Room label for controls whose room reference is absent or does not
/// resolve. The Miniserver omits the reference when the "Not used" room
/// was selected, so this is an expected state, not an error.
pub const NO_ROOM_LABEL: &str = "'No Room'";

/// A flattened control, ready for classification.
///
/// Items are owned by the registry for their whole lifetime; the
/// classifier mutates `item_type`, `skip` and `manufacturer` in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, unique across the whole registry (sub-items included).
    pub id: String,
    /// Display name, rewritten to carry room or parent context.
    pub name: String,
    /// Raw type tag until classification, resolved tag afterwards.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Category reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cat: Option<String>,
    /// Room reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Raw type of the containing control. Present exactly for sub-items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
    /// Excluded from accessory dispatch.
    #[serde(default)]
    pub skip: bool,
    /// Stamped by the classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Fields this pipeline does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Item {
    fn from_control(
        id: &str,
        control: &RawControl,
        name: String,
        parent_type: Option<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name,
            item_type: control.control_type.clone(),
            cat: control.cat.clone(),
            room: control.room.clone(),
            parent_type,
            skip: false,
            manufacturer: None,
            extra: control.extra.clone(),
        }
    }
}

/// Lookup tables produced by flattening a structure document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SitemapRegistry {
    /// Categories keyed by identifier.
    pub categories: HashMap<String, Category>,
    /// Rooms keyed by identifier.
    pub rooms: HashMap<String, Room>,
    /// Items keyed by identifier. Ordered, so repeated runs over the same
    /// document enumerate accessories identically.
    pub items: BTreeMap<String, Item>,
}

impl SitemapRegistry {
    /// Flatten a structure document into a registry.
    ///
    /// Sub-controls become siblings of top-level items in the flat map,
    /// tagged with their parent's raw type. A room reference that does not
    /// resolve falls back to [`NO_ROOM_LABEL`] rather than failing the
    /// whole parse.
    pub fn flatten(document: &StructureFile) -> Self {
        let mut registry = Self {
            categories: document.cats.clone(),
            rooms: document.rooms.clone(),
            items: BTreeMap::new(),
        };

        for (id, control) in &document.controls {
            let room_name = registry.room_name(control.room.as_deref());
            // Append the room so same-named controls in different rooms
            // stay distinguishable.
            let name = format!("{} in {}", control.name, room_name);

            if let Some(sub_controls) = &control.sub_controls {
                for (sub_id, sub_control) in sub_controls {
                    // The parent name must already carry its room suffix
                    // before it is borrowed here.
                    let sub_name = format!("{} of {}", sub_control.name, name);
                    registry.items.insert(
                        sub_id.clone(),
                        Item::from_control(
                            sub_id,
                            sub_control,
                            sub_name,
                            Some(control.control_type.clone()),
                        ),
                    );
                }
            }

            registry
                .items
                .insert(id.clone(), Item::from_control(id, control, name, None));
        }

        debug!(
            categories = registry.categories.len(),
            rooms = registry.rooms.len(),
            items = registry.items.len(),
            "flattened structure document"
        );
        registry
    }

    /// Resolve a room reference to its display name, falling back to
    /// [`NO_ROOM_LABEL`] when the reference is absent or unknown.
    pub fn room_name(&self, reference: Option<&str>) -> &str {
        reference
            .and_then(|id| self.rooms.get(id))
            .map(|room| room.name.as_str())
            .unwrap_or(NO_ROOM_LABEL)
    }

    /// Look up an item by identifier.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Number of items in the registry.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the registry holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> StructureFile {
        StructureFile::from_value(value).unwrap()
    }

    #[test]
    fn test_flatten_appends_room_name() {
        let registry = SitemapRegistry::flatten(&document(json!({
            "rooms": { "r1": { "name": "Kitchen" } },
            "controls": {
                "c1": { "name": "Light1", "type": "Switch", "room": "r1" }
            }
        })));

        assert_eq!(registry.get("c1").unwrap().name, "Light1 in Kitchen");
    }

    #[test]
    fn test_missing_room_uses_sentinel() {
        let registry = SitemapRegistry::flatten(&document(json!({
            "controls": {
                "c1": { "name": "Status", "type": "InfoOnlyAnalog" },
                "c2": { "name": "Orphan", "type": "Switch", "room": "gone" }
            }
        })));

        // no reference at all, and a reference that does not resolve
        assert_eq!(registry.get("c1").unwrap().name, "Status in 'No Room'");
        assert_eq!(registry.get("c2").unwrap().name, "Orphan in 'No Room'");
    }

    #[test]
    fn test_sub_controls_become_flat_siblings() {
        let registry = SitemapRegistry::flatten(&document(json!({
            "rooms": { "r1": { "name": "Living" } },
            "controls": {
                "c1": {
                    "name": "Main Light",
                    "type": "LightControllerV2",
                    "room": "r1",
                    "subControls": {
                        "c1/sub1": { "name": "Spots", "type": "Switch" },
                        "c1/sub2": { "name": "Mood", "type": "ColorPickerV2" }
                    }
                }
            }
        })));

        assert_eq!(registry.len(), 3);

        let sub = registry.get("c1/sub1").unwrap();
        // parent name carries its room suffix before it is appended
        assert_eq!(sub.name, "Spots of Main Light in Living");
        assert_eq!(sub.parent_type.as_deref(), Some("LightControllerV2"));

        let parent = registry.get("c1").unwrap();
        assert!(parent.parent_type.is_none());
    }

    #[test]
    fn test_every_identifier_appears_exactly_once() {
        let registry = SitemapRegistry::flatten(&document(json!({
            "controls": {
                "c1": {
                    "name": "A", "type": "LightController",
                    "subControls": {
                        "s1": { "name": "A1", "type": "Switch" },
                        "s2": { "name": "A2", "type": "Switch" }
                    }
                },
                "c2": { "name": "B", "type": "Jalousie" }
            }
        })));

        let ids: Vec<&str> = registry.items.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["c1", "c2", "s1", "s2"]);
    }

    #[test]
    fn test_empty_document_flattens_to_empty_registry() {
        let registry = SitemapRegistry::flatten(&StructureFile::default());
        assert!(registry.is_empty());
        assert!(registry.categories.is_empty());
        assert!(registry.rooms.is_empty());
    }

    #[test]
    fn test_categories_copied_verbatim() {
        let registry = SitemapRegistry::flatten(&document(json!({
            "cats": { "catA": { "image": "icon.svg", "color": "#69C350" } }
        })));

        let cat = &registry.categories["catA"];
        assert_eq!(cat.image, "icon.svg");
        assert_eq!(cat.extra["color"], json!("#69C350"));
    }
}
