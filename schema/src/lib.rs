//! Resource Hub entity shapes encoded as typed Rust data.
//!
//! The `hub-schema` crate models the Wikidata entities the Resource Hub
//! describes (curricula and their modules, research projects, grants,
//! organizations, software, hardware, artifacts, publications, and
//! researchers) as declarative shapes, and holds them in an immutable
//! [`SchemaRegistry`] that the validator and profile resolver consume.
//!
//! # Entry Point
//!
//! ```
//! let registry = hub_schema::SchemaRegistry::builtin().expect("built-in shapes");
//! assert_eq!(registry.len(), 10);
//! let grant = registry.lookup("grant").expect("grant shape");
//! assert_eq!(grant.class, "Q230788");
//! ```
//!
//! # Serialization
//!
//! ```
//! let registry = hub_schema::SchemaRegistry::builtin().expect("built-in shapes");
//! let shexc = hub_schema::serializer::shexc::to_shexc(&registry);
//! let json  = hub_schema::serializer::json::to_json(&registry);
//! assert!(shexc.contains("hub:grant"));
//! assert!(json["shape"].is_array());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod model;
pub mod registry;
#[cfg(feature = "serializers")]
pub mod serializer;
pub mod shapes;
pub mod vocab;

pub use config::ShapeConfig;
pub use error::{SchemaError, SchemaResult};
pub use model::{
    Cardinality, Entity, EntityId, PropertyConstraint, Qualifier, Shape, Statement, Value,
    ValueType,
};
pub use registry::{Classification, SchemaRegistry, SchemaRegistryBuilder};
pub use vocab::Vocabulary;
