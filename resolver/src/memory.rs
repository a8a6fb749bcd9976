//! In-memory knowledge base.
//!
//! Holds entities in insertion order and evaluates graph patterns over
//! their statements. Used for tests and for offline work against a Turtle
//! dump of the relevant Wikidata subgraph.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use async_trait::async_trait;
use hub_schema::{Entity, EntityId, Value, Vocabulary};
use tracing::trace;

use crate::error::{KbError, KbResult};
use crate::kb::KnowledgeBase;
use crate::query::{Binding, GraphPattern, Term};
use crate::turtle;

/// A knowledge base backed by a list of entities.
#[derive(Debug)]
pub struct MemoryKnowledgeBase {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    vocabulary: Vocabulary,
    pending_failures: AtomicU32,
    calls: AtomicUsize,
}

impl Default for MemoryKnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKnowledgeBase {
    /// An empty knowledge base using the Wikidata vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::with_vocabulary(Vocabulary::wikidata())
    }

    /// An empty knowledge base; `vocabulary` translates property ids in
    /// patterns to the slugs statements are stored under.
    #[must_use]
    pub fn with_vocabulary(vocabulary: Vocabulary) -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
            vocabulary,
            pending_failures: AtomicU32::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Loads a Turtle dump written with the Wikidata `wd:`, `wdt:`, `p:`,
    /// `ps:` and `pq:` namespaces.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Parse`] if the document is not valid Turtle.
    pub fn from_turtle(src: &str, vocabulary: &Vocabulary) -> KbResult<Self> {
        let mut kb = Self::with_vocabulary(vocabulary.clone());
        for entity in turtle::entities(src, vocabulary)? {
            kb.insert(entity);
        }
        Ok(kb)
    }

    /// Adds `entity`, replacing any entity with the same id.
    pub fn insert(&mut self, entity: Entity) {
        match self.index.get(&entity.id) {
            Some(&i) => self.entities[i] = entity,
            None => {
                self.index.insert(entity.id.clone(), self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, entity: Entity) -> Self {
        self.insert(entity);
        self
    }

    /// Makes the next `n` calls fail with HTTP 503.
    pub fn fail_next(&self, n: u32) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    /// Number of `fetch` and `query` calls served (including failed ones).
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entity is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Looks up an entity without counting a call.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    fn begin_call(&self, operation: &str) -> KbResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(KbError::Status {
                operation: operation.to_owned(),
                status: 503,
                body: "injected failure".to_owned(),
            });
        }
        Ok(())
    }

    fn normalize_property<'a>(&'a self, property: &'a str) -> &'a str {
        self.vocabulary.slug(property).unwrap_or(property)
    }

    fn evaluate(&self, pattern: &GraphPattern) -> Vec<Binding> {
        let mut solutions = vec![Binding::new()];
        for triple in &pattern.patterns {
            let mut next = Vec::new();
            for binding in &solutions {
                for entity in &self.entities {
                    let subject = Value::iri(entity.id.as_str());
                    for statement in &entity.statements {
                        let mut candidate = binding.clone();
                        if self.bind_predicate(&triple.predicate, &statement.property, &mut candidate)
                            && bind(&triple.subject, &subject, &mut candidate)
                            && bind(&triple.object, &statement.value, &mut candidate)
                        {
                            next.push(candidate);
                        }
                    }
                }
            }
            solutions = next;
        }

        let vars: Vec<String> = if pattern.select.is_empty() {
            pattern.variables().into_iter().map(str::to_owned).collect()
        } else {
            pattern.select.clone()
        };
        let mut out: Vec<Binding> = Vec::new();
        for solution in solutions {
            let projected: Binding = solution
                .into_iter()
                .filter(|(k, _)| vars.contains(k))
                .collect();
            if pattern.distinct && out.contains(&projected) {
                continue;
            }
            out.push(projected);
            if pattern.limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
        }
        out
    }

    fn bind_predicate(&self, term: &Term, property: &str, binding: &mut Binding) -> bool {
        match term {
            Term::Property { property: p } => self.normalize_property(p) == property,
            other => bind(
                other,
                &Value::Iri {
                    iri: property.to_owned(),
                },
                binding,
            ),
        }
    }
}

fn bind(term: &Term, candidate: &Value, binding: &mut Binding) -> bool {
    match term {
        Term::Var { name } => match binding.get(name) {
            Some(bound) => same_value(bound, candidate),
            None => {
                binding.insert(name.clone(), candidate.clone());
                true
            }
        },
        Term::Entity { id } => candidate.as_entity().as_ref() == Some(id),
        Term::Value { value } => same_value(value, candidate),
        Term::Property { property } => candidate.lexical() == property,
    }
}

fn same_value(pattern: &Value, candidate: &Value) -> bool {
    match (pattern, candidate) {
        (Value::Iri { iri: a }, Value::Iri { iri: b }) => EntityId::new(a) == EntityId::new(b),
        (
            Value::Literal {
                lexical: a,
                lang: lang_a,
                ..
            },
            Value::Literal {
                lexical: b,
                lang: lang_b,
                ..
            },
        ) => a == b && (lang_a.is_none() || lang_a == lang_b),
        _ => false,
    }
}

#[async_trait]
impl KnowledgeBase for MemoryKnowledgeBase {
    async fn fetch(&self, id: &EntityId) -> KbResult<Option<Entity>> {
        self.begin_call(&format!("fetch {id}"))?;
        trace!(%id, "memory fetch");
        Ok(self.get(id).cloned())
    }

    async fn query(&self, pattern: &GraphPattern) -> KbResult<Vec<Binding>> {
        self.begin_call("query")?;
        Ok(self.evaluate(pattern))
    }
}
