//! Sitemap ingestion for LoxKit.
//!
//! This crate turns a Miniserver structure document (`LoxAPP3.json`) into
//! a flat, disambiguated registry of typed accessory descriptors.
//!
//! ## Architecture
//!
//! The pipeline runs in three synchronous stages:
//! - **[`SitemapRegistry::flatten`]**: walk the document's `cats`, `rooms`
//!   and `controls` sections, build the lookup tables and fold every
//!   control and sub-control into one flat item map.
//! - **[`SitemapRegistry::classify`]**: resolve each item's final type,
//!   skip flag and manufacturer from an ordered table of heuristic rules.
//! - **[`ConstructorRegistry::build_all`]**: map resolved types onto
//!   caller-supplied accessory constructors, enforcing the platform's
//!   accessory limit.
//!
//! Each stage depends on the previous one having completed: the classifier
//! reads the fully populated category map, dispatch reads the final
//! type/skip fields. How the document is fetched, and what the constructed
//! accessories do, are the embedding application's business.

pub mod accessory;
pub mod classifier;
pub mod registry;
pub mod structure;

// Re-exports for convenience
pub use accessory::{AccessoryKind, Constructor, ConstructorRegistry, MAX_ACCESSORIES};
pub use classifier::{Classifier, LIGHT_CATEGORY_IMAGE, MANUFACTURER, TYPE_RULES, TypeRule, tags};
pub use registry::{Item, NO_ROOM_LABEL, SitemapRegistry};
pub use structure::{Category, RawControl, Room, StructureFile};

use loxkit_core::config::BridgeConfig;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flatten and classify a structure document in one call.
///
/// This is the library entry point for callers that bring their own
/// dispatch; pass the result to [`ConstructorRegistry::build_all`] to
/// produce accessories.
pub fn parse_structure(document: &StructureFile, config: &BridgeConfig) -> SitemapRegistry {
    let mut registry = SitemapRegistry::flatten(document);
    registry.classify(config);
    registry
}
