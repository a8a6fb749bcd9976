//! Resource Hub profile resolver.
//!
//! Given an entity id, [`ProfileResolver::resolve`] fetches the entity from a
//! [`KnowledgeBase`], classifies and validates it, and follows the relation
//! edges its shape declares, breadth-first and up to a bounded depth. Each
//! related entity is validated in turn and the result is returned as a
//! serializable [`Profile`] grouped by relation.
//!
//! Two knowledge bases are provided:
//!
//! - [`SparqlKnowledgeBase`] queries a SPARQL endpoint (the Wikidata Query
//!   Service by default).
//! - [`MemoryKnowledgeBase`] holds entities in memory, optionally loaded
//!   from a Turtle dump.
//!
//! ```
//! use std::sync::Arc;
//! use hub_resolver::{MemoryKnowledgeBase, ProfileRequest, ProfileResolver, ResolverConfig};
//! use hub_schema::{vocab::slugs, Entity, SchemaRegistry, Value};
//!
//! # tokio_test(async {
//! let kb = MemoryKnowledgeBase::new().with(
//!     Entity::new("Q1")
//!         .with_value(slugs::INSTANCE_OF, Value::iri("Q5"))
//!         .with_value(slugs::ORCID, Value::string("0000-0002-1825-0097")),
//! );
//! let registry = Arc::new(SchemaRegistry::builtin().expect("built-in shapes"));
//! let resolver = ProfileResolver::new(registry, Arc::new(kb), ResolverConfig::default());
//! let profile = resolver.resolve(&ProfileRequest::new("Q1")).await.expect("resolved");
//! assert_eq!(profile.root.kind.as_deref(), Some("person"));
//! # });
//! # fn tokio_test<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().expect("runtime").block_on(f)
//! # }
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
pub mod kb;
pub mod memory;
pub mod profile;
pub mod query;
pub mod resolver;
pub mod retry;
pub mod sparql;
pub mod turtle;

pub use config::{EndpointConfig, HubConfig, ResolverConfig, SchemaSource};
pub use error::{ConfigError, KbError, KbResult, ResolveError, ResolveResult};
pub use kb::KnowledgeBase;
pub use memory::MemoryKnowledgeBase;
pub use profile::{Profile, ProfileEntry, ProfileNode, ProfileRequest, RelationList};
pub use query::{Binding, GraphPattern, Term, TriplePattern};
pub use resolver::ProfileResolver;
pub use retry::RetryPolicy;
pub use sparql::SparqlKnowledgeBase;
