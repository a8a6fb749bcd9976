//! Turtle loading of Wikidata-shaped RDF.
//!
//! Truthy `wdt:` triples become unqualified statements. Full statements
//! (`wd:Q p:P ?s . ?s ps:P ?v ; pq:Q ?q`) attach their qualifiers to the
//! matching truthy statement, or are added when no truthy triple exists.
//! `rdfs:label` sets the entity label, preferring English.

use std::collections::HashMap;

use hub_schema::vocab;
use hub_schema::{Entity, EntityId, Qualifier, Statement, Value, Vocabulary};
use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple;
use sophia_turtle::parser::turtle;
use tracing::trace;

use crate::error::{KbError, KbResult};

struct RawTriple {
    subject: String,
    predicate: String,
    object: Value,
}

fn node_key<T: Term>(term: &T) -> Option<String> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| iri.as_str().to_owned()),
        TermKind::BlankNode => term.bnode_id().map(|b| format!("_:{}", b.as_str())),
        _ => None,
    }
}

fn object_value<T: Term>(term: &T) -> Option<Value> {
    match term.kind() {
        TermKind::Literal => {
            let lexical = term.lexical_form()?;
            let lexical: &str = &lexical;
            let lexical = lexical.to_owned();
            if let Some(tag) = term.language_tag() {
                return Some(Value::text(lexical, tag.as_str()));
            }
            match term.datatype() {
                Some(dt) if dt.as_str() != vocab::XSD_STRING => {
                    Some(Value::typed(lexical, dt.as_str()))
                }
                _ => Some(Value::string(lexical)),
            }
        }
        TermKind::Iri => term.iri().map(|iri| Value::iri(iri.as_str())),
        TermKind::BlankNode => node_key(term).map(|iri| Value::Iri { iri }),
        _ => None,
    }
}

fn parse(src: &str) -> KbResult<Vec<RawTriple>> {
    let mut triples = Vec::new();
    turtle::parse_str(src)
        .for_each_triple(|t| {
            let p = t.p();
            let (Some(subject), Some(predicate), Some(object)) =
                (node_key(&t.s()), p.iri(), object_value(&t.o()))
            else {
                return;
            };
            triples.push(RawTriple {
                subject,
                predicate: predicate.as_str().to_owned(),
                object,
            });
        })
        .map_err(|e| KbError::Parse {
            origin: "turtle".to_owned(),
            message: e.to_string(),
        })?;
    Ok(triples)
}

/// Strips `ns` and returns the remaining property id, if it is one.
fn property_in<'a>(predicate: &'a str, ns: &str) -> Option<&'a str> {
    predicate
        .strip_prefix(ns)
        .filter(|rest| rest.starts_with('P') && EntityId::new(*rest).is_wikidata())
}

#[derive(Default)]
struct Entities {
    order: Vec<EntityId>,
    by_id: HashMap<EntityId, Entity>,
}

impl Entities {
    fn get(&mut self, id: EntityId) -> &mut Entity {
        if !self.by_id.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.by_id
            .entry(id.clone())
            .or_insert_with(|| Entity::new(id))
    }

    fn into_vec(mut self) -> Vec<Entity> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.remove(id))
            .collect()
    }
}

/// Parses `src` into entities in subject first-appearance order.
///
/// # Errors
///
/// Returns [`KbError::Parse`] if the document is not valid Turtle.
pub fn entities(src: &str, vocabulary: &Vocabulary) -> KbResult<Vec<Entity>> {
    let triples = parse(src)?;
    let slug = |pid: &str| vocabulary.slug_or_id(pid).to_owned();

    let mut entities = Entities::default();
    let mut english: HashMap<EntityId, bool> = HashMap::new();
    let mut claims: Vec<(EntityId, String, String)> = Vec::new();
    let mut node_values: HashMap<String, Value> = HashMap::new();
    let mut node_qualifiers: HashMap<String, Vec<Qualifier>> = HashMap::new();

    for t in triples {
        if let Some(pid) = property_in(&t.predicate, vocab::WDT) {
            let property = slug(pid);
            entities
                .get(EntityId::new(&t.subject))
                .statements
                .push(Statement::new(property, t.object));
        } else if let Some(pid) = property_in(&t.predicate, vocab::PS) {
            trace!(node = %t.subject, pid, "statement value");
            node_values.insert(t.subject, t.object);
        } else if let Some(pid) = property_in(&t.predicate, vocab::PQ) {
            node_qualifiers.entry(t.subject).or_default().push(Qualifier {
                property: slug(pid),
                value: t.object,
            });
        } else if let Some(pid) = property_in(&t.predicate, vocab::P) {
            let id = EntityId::new(&t.subject);
            entities.get(id.clone());
            claims.push((id, slug(pid), t.object.lexical().to_owned()));
        } else if t.predicate == vocab::RDFS_LABEL {
            let id = EntityId::new(&t.subject);
            let is_english = matches!(&t.object, Value::Literal { lang: Some(l), .. } if l == "en");
            let had_english = english.get(&id).copied().unwrap_or(false);
            let entity = entities.get(id.clone());
            if entity.label.is_none() || (is_english && !had_english) {
                entity.label = Some(t.object.lexical().to_owned());
                english.insert(id, is_english);
            }
        }
    }

    let mut merged: HashMap<EntityId, Vec<usize>> = HashMap::new();
    for (id, property, node) in claims {
        let Some(value) = node_values.get(&node) else {
            continue;
        };
        let qualifiers = node_qualifiers.remove(&node).unwrap_or_default();
        let entity = entities.get(id.clone());
        let taken = merged.entry(id).or_default();
        let existing = entity.statements.iter().enumerate().position(|(i, s)| {
            s.property == property && s.value == *value && !taken.contains(&i)
        });
        match existing {
            Some(i) => {
                entity.statements[i].qualifiers = qualifiers;
                taken.push(i);
            }
            None => {
                taken.push(entity.statements.len());
                entity.statements.push(Statement {
                    property,
                    value: value.clone(),
                    qualifiers,
                });
            }
        }
    }

    Ok(entities.into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_schema::vocab::slugs;

    const SMALL: &str = r#"
@prefix wd: <http://www.wikidata.org/entity/> .
@prefix wdt: <http://www.wikidata.org/prop/direct/> .
@prefix p: <http://www.wikidata.org/prop/> .
@prefix ps: <http://www.wikidata.org/prop/statement/> .
@prefix pq: <http://www.wikidata.org/prop/qualifier/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

wd:Q10 rdfs:label "Kurs"@de, "Course"@en ;
    wdt:P50 wd:Q42 ;
    wdt:P527 wd:Q11 ;
    p:P527 [ ps:P527 wd:Q11 ; pq:P1545 "2" ] ;
    p:P527 [ ps:P527 wd:Q12 ; pq:P1545 "1" ] .
"#;

    #[test]
    fn loads_truthy_and_qualified_statements() {
        let entities = entities(SMALL, &Vocabulary::wikidata()).expect("valid turtle");
        assert_eq!(entities.len(), 1);
        let course = &entities[0];
        assert_eq!(course.id.as_str(), "Q10");
        assert_eq!(course.label.as_deref(), Some("Course"));
        let parts: Vec<(&str, Option<i64>)> = course
            .statements_for(slugs::HAS_PART)
            .map(|s| (s.value.lexical(), s.ordinal()))
            .collect();
        assert_eq!(parts, vec![("Q11", Some(2)), ("Q12", Some(1))]);
        assert_eq!(course.statements_for(slugs::AUTHOR).count(), 1);
    }

    #[test]
    fn invalid_turtle_is_a_parse_error() {
        let err = entities("wd:Q1 wdt:P31 .", &Vocabulary::wikidata()).expect_err("undeclared prefix");
        assert!(matches!(err, KbError::Parse { .. }));
    }
}
