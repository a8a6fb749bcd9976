//! Serializers for a shape registry.
//!
//! Two formats are supported:
//! - **ShExC** ([`shexc`]): ShEx compact syntax over Wikidata `wdt:` properties,
//!   for review and for ShEx tooling
//! - **JSON** ([`json`]): the shape configuration format, so a registry can be
//!   dumped and loaded back with [`ShapeConfig::from_json_str`](crate::ShapeConfig::from_json_str)

pub mod json;
pub mod shexc;
