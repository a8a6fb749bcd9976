//! The Profile Resolver.
//!
//! Resolution is breadth-first over the relation edges each node's shape
//! declares. One level is fetched concurrently (bounded, order-preserving)
//! and joined before the next level starts. An id already placed in the
//! profile is never fetched again, so cyclic graphs terminate.
//!
//! Relations that declare a target kind are checked once the target is
//! classified. A target of another kind is a type violation on the parent
//! node's report.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use hub_schema::{Entity, EntityId, SchemaRegistry, Value, ValueType};
use hub_validator::{Validator, Violation};
use tracing::{debug, info, instrument, trace};

use crate::config::ResolverConfig;
use crate::error::{KbError, KbResult, ResolveError, ResolveResult};
use crate::kb::KnowledgeBase;
use crate::profile::{Profile, ProfileEntry, ProfileNode, ProfileRequest, RelationList};
use crate::query::GraphPattern;

struct Edge {
    from: EntityId,
    relation: String,
    ordinal: Option<i64>,
    target: EntityId,
}

struct Reference {
    from: EntityId,
    relation: String,
    expected: String,
    target: EntityId,
}

struct Expandable {
    entity: Entity,
    kind: String,
}

/// Resolves entity profiles from a knowledge base.
pub struct ProfileResolver {
    registry: Arc<SchemaRegistry>,
    kb: Arc<dyn KnowledgeBase>,
    config: ResolverConfig,
}

impl ProfileResolver {
    /// Creates a resolver over a shared registry and knowledge base.
    #[must_use]
    pub fn new(
        registry: Arc<SchemaRegistry>,
        kb: Arc<dyn KnowledgeBase>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            registry,
            kb,
            config,
        }
    }

    /// The registry profiles are validated against.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The resolver settings.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves the profile of `request.id`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::TraversalDepthExceeded`] if the requested depth is
    ///   above `max_depth` or the profile grows beyond `max_nodes`.
    /// - [`ResolveError::EntityNotFound`] if the root, or any related entity
    ///   it references, does not exist.
    /// - [`ResolveError::UnknownShape`] if the root's kind is not registered.
    /// - [`ResolveError::Upstream`] if the knowledge base keeps failing.
    #[instrument(skip(self, request), fields(id = %request.id))]
    pub async fn resolve(&self, request: &ProfileRequest) -> ResolveResult<Profile> {
        let depth = request.depth.unwrap_or(self.config.default_depth);
        if depth > self.config.max_depth {
            return Err(ResolveError::TraversalDepthExceeded {
                id: request.id.clone(),
                reason: format!(
                    "requested depth {depth} is above max_depth {}",
                    self.config.max_depth
                ),
            });
        }

        let root_entity = self
            .fetch(&request.id)
            .await?
            .ok_or_else(|| ResolveError::EntityNotFound {
                id: request.id.clone(),
            })?;
        let validator = Validator::new(&self.registry);
        let root_report =
            validator
                .validate_entity(&root_entity)
                .map_err(|source| ResolveError::UnknownShape {
                    subject: request.id.to_string(),
                    source,
                })?;
        let root_kind = root_report.kind.clone();

        let mut visited = HashSet::from([root_entity.id.clone()]);
        let mut kinds = HashMap::from([(root_entity.id.clone(), root_kind.clone())]);
        let mut classified = HashMap::from([(root_entity.id.clone(), Some(root_kind.clone()))]);
        let mut mismatches: HashMap<EntityId, Vec<Violation>> = HashMap::new();
        let mut frontier = vec![Expandable {
            entity: root_entity.clone(),
            kind: root_kind.clone(),
        }];
        let mut root = ProfileNode {
            entity: root_entity,
            kind: Some(root_kind),
            report: Some(root_report),
        };
        let mut relations: Vec<RelationList> = Vec::new();
        let mut size = 1;

        for level in 1..=depth {
            let (edges, references) = self.edges(&frontier, &mut visited);
            if edges.is_empty() {
                check_kinds(references, &classified, &mut mismatches);
                break;
            }
            debug!(level, edges = edges.len(), "expanding level");

            let fetched: Vec<Option<Entity>> = stream::iter(edges.iter().map(|e| self.fetch(&e.target)))
                .buffered(self.config.max_concurrent_requests.max(1))
                .try_collect()
                .await?;

            let mut next = Vec::new();
            for (edge, entity) in edges.into_iter().zip(fetched) {
                let entity = entity.ok_or_else(|| ResolveError::EntityNotFound {
                    id: edge.target.clone(),
                })?;
                let (kind, report) = match validator.validate_entity(&entity) {
                    Ok(report) => (Some(report.kind.clone()), Some(report)),
                    Err(_) => (None, None),
                };
                classified.insert(entity.id.clone(), kind.clone());
                if !request.admits(kind.as_deref()) {
                    trace!(id = %entity.id, ?kind, "excluded by kind filter");
                    continue;
                }
                let ordinal = edge.ordinal.or_else(|| entity.ordinal());
                if let Some(kind) = &kind {
                    kinds.insert(entity.id.clone(), kind.clone());
                    next.push(Expandable {
                        entity: entity.clone(),
                        kind: kind.clone(),
                    });
                }
                let entry = ProfileEntry {
                    from: edge.from,
                    depth: level,
                    ordinal,
                    node: ProfileNode {
                        entity,
                        kind,
                        report,
                    },
                };
                match relations.iter_mut().find(|r| r.relation == edge.relation) {
                    Some(list) => list.entries.push(entry),
                    None => relations.push(RelationList {
                        relation: edge.relation,
                        entries: vec![entry],
                    }),
                }
                size += 1;
            }
            check_kinds(references, &classified, &mut mismatches);

            if size > self.config.max_nodes {
                return Err(ResolveError::TraversalDepthExceeded {
                    id: request.id.clone(),
                    reason: format!(
                        "profile reached {size} nodes at depth {level}, above max_nodes {}",
                        self.config.max_nodes
                    ),
                });
            }
            frontier = next;
        }

        if !mismatches.is_empty() {
            let nodes = std::iter::once(&mut root).chain(
                relations
                    .iter_mut()
                    .flat_map(|r| r.entries.iter_mut().map(|e| &mut e.node)),
            );
            for node in nodes {
                if let (Some(found), Some(report)) =
                    (mismatches.remove(node.id()), node.report.as_mut())
                {
                    report.violations.extend(found);
                }
            }
        }
        self.order(&mut relations, &kinds);
        info!(nodes = size, relations = relations.len(), "profile resolved");
        Ok(Profile { root, relations })
    }

    /// Finds entities whose `field` has `value`, optionally only those of
    /// `kind`. Ids are returned in result order without duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownShape`] for an unregistered `kind` and
    /// [`ResolveError::Upstream`] if the query fails.
    #[instrument(skip(self, value), fields(value = %value))]
    pub async fn lookup(
        &self,
        field: &str,
        value: &Value,
        kind: Option<&str>,
    ) -> ResolveResult<Vec<EntityId>> {
        let class = match kind {
            Some(kind) => Some(
                self.registry
                    .lookup(kind)
                    .map_err(|source| ResolveError::UnknownShape {
                        subject: kind.to_owned(),
                        source,
                    })?
                    .class
                    .clone(),
            ),
            None => None,
        };
        let pattern = GraphPattern::lookup(field, value, class.as_deref());
        let subject = format!("lookup {field} = {value}");
        let bindings = self.call(&subject, || self.kb.query(&pattern)).await?;

        let mut ids: Vec<EntityId> = Vec::new();
        for id in bindings
            .iter()
            .filter_map(|b| b.get("item").and_then(Value::as_entity))
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        debug!(matches = ids.len(), "lookup finished");
        Ok(ids)
    }

    /// Looks entities up by field value and resolves each match.
    ///
    /// # Errors
    ///
    /// Returns the first lookup or resolution error.
    pub async fn resolve_by_field(
        &self,
        field: &str,
        value: &Value,
        kind: Option<&str>,
        depth: Option<usize>,
    ) -> ResolveResult<Vec<Profile>> {
        let mut profiles = Vec::new();
        for id in self.lookup(field, value, kind).await? {
            let request = ProfileRequest {
                id,
                depth,
                kinds: None,
            };
            profiles.push(self.resolve(&request).await?);
        }
        Ok(profiles)
    }

    /// New edges to fetch, plus every kinded reference (visited or not)
    /// whose target kind must be checked.
    fn edges(
        &self,
        frontier: &[Expandable],
        visited: &mut HashSet<EntityId>,
    ) -> (Vec<Edge>, Vec<Reference>) {
        let mut edges = Vec::new();
        let mut references = Vec::new();
        for parent in frontier {
            let Ok(shape) = self.registry.lookup(&parent.kind) else {
                continue;
            };
            for constraint in shape.relations() {
                for statement in parent.entity.statements_for(&constraint.property) {
                    let Some(target) = statement.value.as_entity() else {
                        continue;
                    };
                    if let ValueType::Item {
                        kind: Some(expected),
                    } = &constraint.value
                    {
                        references.push(Reference {
                            from: parent.entity.id.clone(),
                            relation: constraint.property.clone(),
                            expected: expected.clone(),
                            target: target.clone(),
                        });
                    }
                    if !visited.insert(target.clone()) {
                        continue;
                    }
                    edges.push(Edge {
                        from: parent.entity.id.clone(),
                        relation: constraint.property.clone(),
                        ordinal: statement.ordinal(),
                        target,
                    });
                }
            }
        }
        (edges, references)
    }

    /// Sorts entries of ordered relations by ascending ordinal within each
    /// parent. Missing ordinals sort last; ties keep source order.
    fn order(&self, relations: &mut [RelationList], kinds: &HashMap<EntityId, String>) {
        for list in relations {
            let relation = list.relation.as_str();
            let mut groups: HashMap<EntityId, (usize, bool)> = HashMap::new();
            for entry in &list.entries {
                let next = groups.len();
                groups.entry(entry.from.clone()).or_insert_with(|| {
                    let ordered = kinds
                        .get(&entry.from)
                        .and_then(|kind| self.registry.lookup(kind).ok())
                        .is_some_and(|shape| shape.is_ordered(relation));
                    (next, ordered)
                });
            }
            if groups.values().all(|(_, ordered)| !ordered) {
                continue;
            }
            list.entries.sort_by_key(|entry| {
                let (group, ordered) = groups.get(&entry.from).copied().unwrap_or((0, false));
                let position = if ordered {
                    (entry.ordinal.is_none(), entry.ordinal.unwrap_or(0))
                } else {
                    (false, 0)
                };
                (group, position)
            });
        }
    }

    async fn fetch(&self, id: &EntityId) -> ResolveResult<Option<Entity>> {
        let subject = format!("fetch {id}");
        self.call(&subject, || self.kb.fetch(id)).await
    }

    /// One knowledge-base call under the per-call timeout and retry policy.
    async fn call<T, F, Fut>(&self, subject: &str, op: F) -> ResolveResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = KbResult<T>>,
    {
        let budget = Duration::from_secs(self.config.request_timeout_secs);
        self.config
            .retry
            .run(subject, || async {
                match tokio::time::timeout(budget, op()).await {
                    Ok(result) => result,
                    Err(_) => Err(KbError::Timeout {
                        operation: subject.to_owned(),
                        after_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                    }),
                }
            })
            .await
            .map_err(|e| ResolveError::Upstream {
                subject: subject.to_owned(),
                attempts: e.attempts,
                source: e.error,
            })
    }
}

/// Records a type violation against the parent of every reference whose
/// target was classified as another kind (or as none).
fn check_kinds(
    references: Vec<Reference>,
    classified: &HashMap<EntityId, Option<String>>,
    mismatches: &mut HashMap<EntityId, Vec<Violation>>,
) {
    for reference in references {
        let Some(actual) = classified.get(&reference.target) else {
            continue;
        };
        if actual.as_deref() == Some(reference.expected.as_str()) {
            continue;
        }
        let found = match actual {
            Some(kind) => format!("{} of kind {kind}", reference.target),
            None => format!("{} of no registered kind", reference.target),
        };
        trace!(from = %reference.from, %found, "relation target has the wrong kind");
        mismatches.entry(reference.from).or_default().push(Violation::value_type(
            reference.relation,
            format!("IRI of kind {}", reference.expected),
            found,
        ));
    }
}
