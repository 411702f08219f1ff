//! Accessory dispatch from a classified registry.
//!
//! The bridge does not define accessory internals. The embedding
//! application supplies a constructor per accessory kind and gets back an
//! ordered list of whatever those constructors produce. Items whose
//! resolved type has no constructor, and items marked skip, are logged and
//! dropped; exceeding the platform's accessory limit is the one fatal
//! condition.

use std::collections::HashMap;

use tracing::{debug, info};

use loxkit_core::error::{Error, Result};

use crate::registry::{Item, SitemapRegistry};

/// The bridge platform rejects more accessories than this outright.
pub const MAX_ACCESSORIES: usize = 100;

/// The closed set of accessory kinds the bridge knows how to expose.
///
/// Tags line up with the resolved type vocabulary so a classified item
/// maps straight onto its kind; anything else is the unhandled catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessoryKind {
    TemperatureSensor,
    HumiditySensor,
    Switch,
    Lightbulb,
    Dimmer,
    /// Window blinds, tagged `Jalousie` in the structure file.
    Blinds,
    Pushbutton,
    Colorpicker,
}

impl AccessoryKind {
    /// All known kinds, in dispatch-table order.
    pub const ALL: [AccessoryKind; 8] = [
        AccessoryKind::TemperatureSensor,
        AccessoryKind::HumiditySensor,
        AccessoryKind::Switch,
        AccessoryKind::Lightbulb,
        AccessoryKind::Dimmer,
        AccessoryKind::Blinds,
        AccessoryKind::Pushbutton,
        AccessoryKind::Colorpicker,
    ];

    /// Map a resolved type tag onto a kind. `None` marks an unhandled tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "TemperatureSensor" => Some(Self::TemperatureSensor),
            "HumiditySensor" => Some(Self::HumiditySensor),
            "Switch" => Some(Self::Switch),
            "Lightbulb" => Some(Self::Lightbulb),
            "Dimmer" => Some(Self::Dimmer),
            "Jalousie" => Some(Self::Blinds),
            "Pushbutton" => Some(Self::Pushbutton),
            "Colorpicker" => Some(Self::Colorpicker),
            _ => None,
        }
    }

    /// The type tag this kind answers to.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::TemperatureSensor => "TemperatureSensor",
            Self::HumiditySensor => "HumiditySensor",
            Self::Switch => "Switch",
            Self::Lightbulb => "Lightbulb",
            Self::Dimmer => "Dimmer",
            Self::Blinds => "Jalousie",
            Self::Pushbutton => "Pushbutton",
            Self::Colorpicker => "Colorpicker",
        }
    }
}

impl std::fmt::Display for AccessoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Caller-supplied factory producing one accessory from a classified item.
/// Platform context and host handles live in the closure's captures.
pub type Constructor<'a, A> = Box<dyn Fn(&Item) -> A + 'a>;

/// Factory table mapping accessory kinds to constructors.
pub struct ConstructorRegistry<'a, A> {
    constructors: HashMap<AccessoryKind, Constructor<'a, A>>,
}

impl<'a, A> Default for ConstructorRegistry<'a, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, A> ConstructorRegistry<'a, A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor for a kind, replacing any previous one.
    pub fn register(
        &mut self,
        kind: AccessoryKind,
        constructor: impl Fn(&Item) -> A + 'a,
    ) -> &mut Self {
        self.constructors.insert(kind, Box::new(constructor));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, kind: AccessoryKind, constructor: impl Fn(&Item) -> A + 'a) -> Self {
        self.register(kind, constructor);
        self
    }

    /// Look up the constructor for a resolved type tag.
    pub fn get(&self, tag: &str) -> Option<&Constructor<'a, A>> {
        AccessoryKind::from_tag(tag).and_then(|kind| self.constructors.get(&kind))
    }

    /// Build accessories for every dispatchable item in the registry, in
    /// item order.
    ///
    /// Unhandled and skipped items are logged and dropped. Producing more
    /// than [`MAX_ACCESSORIES`] accessories aborts with
    /// [`Error::TooManyAccessories`]: the 100th accessory is built,
    /// attempting the 101st fails, and no partial list is returned.
    pub fn build_all(&self, registry: &SitemapRegistry) -> Result<Vec<A>> {
        let mut accessories = Vec::new();

        for item in registry.items.values() {
            let Some(constructor) = self.get(&item.item_type) else {
                debug!(
                    name = %item.name,
                    item_type = %item.item_type,
                    "widget type is not handled"
                );
                continue;
            };
            if item.skip {
                debug!(name = %item.name, item_type = %item.item_type, "widget was skipped");
                continue;
            }

            if accessories.len() == MAX_ACCESSORIES {
                return Err(Error::TooManyAccessories {
                    limit: MAX_ACCESSORIES,
                });
            }

            accessories.push(constructor(item));
            info!(name = %item.name, item_type = %item.item_type, "accessory found");
        }

        Ok(accessories)
    }
}

impl<'a, A> std::fmt::Debug for ConstructorRegistry<'a, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorRegistry")
            .field("kinds", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Item;

    fn item(id: &str, item_type: &str) -> Item {
        Item {
            id: id.to_string(),
            name: format!("{id} in 'No Room'"),
            item_type: item_type.to_string(),
            cat: None,
            room: None,
            parent_type: None,
            skip: false,
            manufacturer: None,
            extra: serde_json::Map::new(),
        }
    }

    fn registry_of(items: Vec<Item>) -> SitemapRegistry {
        let mut registry = SitemapRegistry::default();
        for item in items {
            registry.items.insert(item.id.clone(), item);
        }
        registry
    }

    fn switch_constructors<'a>() -> ConstructorRegistry<'a, String> {
        ConstructorRegistry::new().with(AccessoryKind::Switch, |item: &Item| item.id.clone())
    }

    #[test]
    fn test_tag_round_trip() {
        for kind in AccessoryKind::ALL {
            assert_eq!(AccessoryKind::from_tag(kind.as_tag()), Some(kind));
        }
        assert_eq!(AccessoryKind::from_tag("InfoOnlyAnalog"), None);
    }

    #[test]
    fn test_blinds_answer_to_jalousie() {
        assert_eq!(AccessoryKind::from_tag("Jalousie"), Some(AccessoryKind::Blinds));
        assert_eq!(AccessoryKind::Blinds.as_tag(), "Jalousie");
    }

    #[test]
    fn test_unhandled_type_is_dropped() {
        let registry = registry_of(vec![item("a", "Switch"), item("b", "InfoOnlyAnalog")]);
        let accessories = switch_constructors().build_all(&registry).unwrap();
        assert_eq!(accessories, vec!["a".to_string()]);
    }

    #[test]
    fn test_known_kind_without_constructor_is_dropped() {
        let registry = registry_of(vec![item("a", "Switch"), item("b", "Jalousie")]);
        let accessories = switch_constructors().build_all(&registry).unwrap();
        assert_eq!(accessories, vec!["a".to_string()]);
    }

    #[test]
    fn test_skipped_item_is_dropped() {
        let mut skipped = item("a", "Switch");
        skipped.skip = true;
        let registry = registry_of(vec![skipped, item("b", "Switch")]);
        let accessories = switch_constructors().build_all(&registry).unwrap();
        assert_eq!(accessories, vec!["b".to_string()]);
    }

    #[test]
    fn test_build_order_follows_item_order() {
        let registry = registry_of(vec![
            item("c", "Switch"),
            item("a", "Switch"),
            item("b", "Switch"),
        ]);
        let accessories = switch_constructors().build_all(&registry).unwrap();
        assert_eq!(accessories, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cap_allows_exactly_the_limit() {
        let items = (0..MAX_ACCESSORIES)
            .map(|i| item(&format!("sw{i:03}"), "Switch"))
            .collect();
        let registry = registry_of(items);
        let accessories = switch_constructors().build_all(&registry).unwrap();
        assert_eq!(accessories.len(), MAX_ACCESSORIES);
    }

    #[test]
    fn test_cap_overflow_is_fatal() {
        let items = (0..=MAX_ACCESSORIES)
            .map(|i| item(&format!("sw{i:03}"), "Switch"))
            .collect();
        let registry = registry_of(items);
        let result = switch_constructors().build_all(&registry);
        assert!(matches!(
            result,
            Err(Error::TooManyAccessories { limit: MAX_ACCESSORIES })
        ));
    }

    #[test]
    fn test_skipped_items_do_not_count_toward_cap() {
        let mut items: Vec<Item> = (0..MAX_ACCESSORIES)
            .map(|i| item(&format!("sw{i:03}"), "Switch"))
            .collect();
        let mut skipped = item("zz-internal", "Switch");
        skipped.skip = true;
        items.push(skipped);

        let registry = registry_of(items);
        let accessories = switch_constructors().build_all(&registry).unwrap();
        assert_eq!(accessories.len(), MAX_ACCESSORIES);
    }
}
