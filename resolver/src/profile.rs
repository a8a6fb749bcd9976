//! Resolved profiles.
//!
//! A [`Profile`] is renderer-agnostic: it serializes to JSON with serde and
//! leaves presentation to its consumers.

use hub_schema::{Entity, EntityId};
use hub_validator::ValidationReport;
use serde::{Deserialize, Serialize};

/// What to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRequest {
    /// Root entity.
    pub id: EntityId,
    /// Traversal depth; the configured default when absent.
    #[serde(default)]
    pub depth: Option<usize>,
    /// Only include related entities of these kinds.
    #[serde(default)]
    pub kinds: Option<Vec<String>>,
}

impl ProfileRequest {
    /// Resolves `id` with the default depth and no kind filter.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            depth: None,
            kinds: None,
        }
    }

    /// Sets the traversal depth.
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Restricts related entities to `kinds`.
    #[must_use]
    pub fn with_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kinds = Some(kinds.into_iter().map(Into::into).collect());
        self
    }

    pub(crate) fn admits(&self, kind: Option<&str>) -> bool {
        match (&self.kinds, kind) {
            (None, _) => true,
            (Some(kinds), Some(kind)) => kinds.iter().any(|k| k == kind),
            (Some(_), None) => false,
        }
    }
}

/// One entity in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileNode {
    /// The entity as fetched.
    pub entity: Entity,
    /// Registered kind; `None` for entities whose class has no shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Validation against the kind's shape; absent for unshaped nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ValidationReport>,
}

impl ProfileNode {
    /// The node's entity id.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.entity.id
    }

    /// Returns true if the node has a shape and no violations.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.report.as_ref().is_some_and(ValidationReport::is_pass)
    }
}

/// A related entity reached through a relation edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEntry {
    /// Entity whose statement led here.
    pub from: EntityId,
    /// Distance from the root (1 for direct neighbours).
    pub depth: usize,
    /// Position in an ordered relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i64>,
    /// The related entity.
    pub node: ProfileNode,
}

/// All entries reached through one relation property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationList {
    /// Relation property slug.
    pub relation: String,
    /// Entries; ordinal order for ordered relations, source order otherwise.
    pub entries: Vec<ProfileEntry>,
}

impl RelationList {
    /// Ids of the entries, in order.
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entries.iter().map(|e| e.node.id())
    }
}

/// A root entity and its related entities, grouped by relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The requested entity.
    pub root: ProfileNode,
    /// One list per relation, in first-encounter order.
    pub relations: Vec<RelationList>,
}

impl Profile {
    /// The list for `relation`, if any entry was reached through it.
    #[must_use]
    pub fn relation(&self, relation: &str) -> Option<&RelationList> {
        self.relations.iter().find(|r| r.relation == relation)
    }

    /// Every node: the root first, then entries in relation order.
    pub fn nodes(&self) -> impl Iterator<Item = &ProfileNode> {
        std::iter::once(&self.root).chain(
            self.relations
                .iter()
                .flat_map(|r| r.entries.iter().map(|e| &e.node)),
        )
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.relations.iter().map(|r| r.entries.len()).sum::<usize>()
    }

    /// Always false: a profile holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
