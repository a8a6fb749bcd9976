//! The knowledge-base capability the resolver is given.

use async_trait::async_trait;
use hub_schema::{Entity, EntityId};

use crate::error::KbResult;
use crate::query::{Binding, GraphPattern};

/// Read-only access to a Wikidata-like knowledge base.
///
/// Implementations must be safe to call concurrently; the resolver fans
/// fetches for one traversal level out in parallel.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Fetches one entity with all of its statements and qualifiers.
    ///
    /// Returns `Ok(None)` if the entity does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`KbError`](crate::KbError) if the knowledge base could not
    /// be reached or answered with something unusable.
    async fn fetch(&self, id: &EntityId) -> KbResult<Option<Entity>>;

    /// Evaluates a graph pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`KbError`](crate::KbError) if the pattern cannot be
    /// expressed or evaluated.
    async fn query(&self, pattern: &GraphPattern) -> KbResult<Vec<Binding>>;
}
