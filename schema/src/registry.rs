//! The Schema Registry: an immutable kind → shape mapping.
//!
//! Shapes are registered on a [`SchemaRegistryBuilder`]; [`build`] freezes
//! them into a [`SchemaRegistry`] that is shared read-only (by reference or
//! `Arc`) with the validator and resolver. Pattern constraints are compiled
//! once at registration.
//!
//! [`build`]: SchemaRegistryBuilder::build

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::error::{SchemaError, SchemaResult};
use crate::model::{Entity, EntityId, Shape, ValueType};
use crate::shapes;
use crate::vocab::Vocabulary;

/// Outcome of classifying an entity by its `instance-of` statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    /// The authoritative shape: the earliest-registered match.
    pub shape: &'a Shape,
    /// Other registered kinds the entity also claims, in registration order.
    pub conflicting: Vec<String>,
}

/// Accumulates shapes before freezing them into a [`SchemaRegistry`].
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    vocabulary: Vocabulary,
    shapes: Vec<Shape>,
    index: HashMap<String, usize>,
    patterns: Vec<Vec<Option<Regex>>>,
}

impl SchemaRegistryBuilder {
    /// Starts an empty registry over `vocabulary`.
    #[must_use]
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            ..Self::default()
        }
    }

    /// Registers `shape` under its kind.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateShape`] if the kind is already
    /// registered, [`SchemaError::DuplicateProperty`] if the shape declares
    /// a property twice, and [`SchemaError::InvalidPattern`] if a pattern
    /// constraint does not compile.
    pub fn register(&mut self, shape: Shape) -> SchemaResult<&mut Self> {
        if self.index.contains_key(&shape.kind) {
            return Err(SchemaError::DuplicateShape { kind: shape.kind });
        }
        let mut declared = HashSet::with_capacity(shape.properties.len());
        let mut compiled = Vec::with_capacity(shape.properties.len());
        for constraint in &shape.properties {
            if !declared.insert(constraint.property.as_str()) {
                return Err(SchemaError::DuplicateProperty {
                    kind: shape.kind.clone(),
                    property: constraint.property.clone(),
                });
            }
            let regex = match &constraint.value {
                ValueType::Pattern { regex } => Some(
                    Regex::new(&format!("^(?:{regex})$")).map_err(|source| {
                        SchemaError::InvalidPattern {
                            kind: shape.kind.clone(),
                            property: constraint.property.clone(),
                            source,
                        }
                    })?,
                ),
                _ => None,
            };
            compiled.push(regex);
        }
        self.index.insert(shape.kind.clone(), self.shapes.len());
        self.shapes.push(shape);
        self.patterns.push(compiled);
        Ok(self)
    }

    /// Adds slug mappings to the vocabulary; later mappings win.
    pub fn extend_vocabulary(&mut self, vocabulary: &Vocabulary) -> &mut Self {
        self.vocabulary.extend(vocabulary);
        self
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            vocabulary: self.vocabulary,
            shapes: self.shapes,
            index: self.index,
            patterns: self.patterns,
        }
    }
}

/// Immutable mapping from entity kind to shape.
#[derive(Debug)]
pub struct SchemaRegistry {
    vocabulary: Vocabulary,
    shapes: Vec<Shape>,
    index: HashMap<String, usize>,
    patterns: Vec<Vec<Option<Regex>>>,
}

impl SchemaRegistry {
    /// Starts a registry builder over `vocabulary`.
    #[must_use]
    pub fn builder(vocabulary: Vocabulary) -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new(vocabulary)
    }

    /// Returns a builder pre-loaded with the built-in shapes and the
    /// Wikidata vocabulary.
    ///
    /// # Errors
    ///
    /// Returns an error only if a built-in shape is malformed.
    pub fn builtin_builder() -> SchemaResult<SchemaRegistryBuilder> {
        let mut builder = SchemaRegistryBuilder::new(Vocabulary::wikidata());
        for shape in shapes::all() {
            builder.register(shape)?;
        }
        Ok(builder)
    }

    /// The ten built-in shapes over the Wikidata vocabulary.
    ///
    /// # Errors
    ///
    /// Returns an error only if a built-in shape is malformed.
    pub fn builtin() -> SchemaResult<Self> {
        Ok(Self::builtin_builder()?.build())
    }

    /// Looks up the shape registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownShape`] if no shape is registered.
    pub fn lookup(&self, kind: &str) -> SchemaResult<&Shape> {
        self.index
            .get(kind)
            .map(|&i| &self.shapes[i])
            .ok_or_else(|| SchemaError::UnknownShape {
                kind: kind.to_owned(),
            })
    }

    /// Returns true if `kind` is registered.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.index.contains_key(kind)
    }

    /// Returns the compiled, fully anchored regex of a pattern constraint.
    #[must_use]
    pub fn pattern(&self, kind: &str, property: &str) -> Option<&Regex> {
        let i = *self.index.get(kind)?;
        let j = self.shapes[i]
            .properties
            .iter()
            .position(|c| c.property == property)?;
        self.patterns[i][j].as_ref()
    }

    /// Returns the kind whose shape class is `class`, if any.
    #[must_use]
    pub fn kind_for_class(&self, class: &str) -> Option<&str> {
        self.shapes
            .iter()
            .find(|s| EntityId::new(&s.class) == EntityId::new(class))
            .map(|s| s.kind.as_str())
    }

    /// Classifies `entity` by its `instance-of` values.
    ///
    /// The earliest-registered matching shape is authoritative; any other
    /// matching kinds are returned as conflicts.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownShape`] naming the entity's classes
    /// when none of them is registered.
    pub fn classify<'a>(&'a self, entity: &Entity) -> SchemaResult<Classification<'a>> {
        let classes: Vec<&str> = entity.classes().collect();
        let mut matches = self
            .shapes
            .iter()
            .filter(|s| classes.contains(&EntityId::new(&s.class).as_str()));
        let Some(shape) = matches.next() else {
            let kind = if classes.is_empty() {
                format!("{} (no instance-of statement)", entity.id)
            } else {
                format!("{} (instance of {})", entity.id, classes.join(", "))
            };
            return Err(SchemaError::UnknownShape { kind });
        };
        Ok(Classification {
            shape,
            conflicting: matches.map(|s| s.kind.clone()).collect(),
        })
    }

    /// Returns the property vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Iterates shapes in registration order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Iterates registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().map(|s| s.kind.as_str())
    }

    /// Returns the number of registered shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if no shape is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cardinality, PropertyConstraint, Statement, Value};
    use crate::shapes::kinds;
    use crate::vocab::slugs;

    fn tiny(kind: &str) -> Shape {
        Shape {
            kind: kind.to_owned(),
            label: kind.to_owned(),
            class: format!("urn:class:{kind}"),
            properties: vec![PropertyConstraint::attribute(
                "code",
                Cardinality::RequiredOne,
                ValueType::pattern("[A-Z]{3}"),
            )],
            ordered: Vec::new(),
        }
    }

    #[test]
    fn builtin_registers_all_shapes() {
        let registry = SchemaRegistry::builtin().expect("built-in shapes");
        assert_eq!(registry.len(), 10);
        assert!(registry.contains(kinds::CURRICULUM));
        assert_eq!(
            registry.kinds().next(),
            Some(kinds::CURRICULUM),
            "registration order starts with curriculum"
        );
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut builder = SchemaRegistry::builder(Vocabulary::new());
        builder.register(tiny("a")).expect("first registration");
        let err = builder.register(tiny("a")).expect_err("second registration");
        assert!(matches!(err, SchemaError::DuplicateShape { kind } if kind == "a"));
    }

    #[test]
    fn repeated_property_is_rejected() {
        let mut shape = tiny("a");
        shape.properties.push(PropertyConstraint::attribute(
            "code",
            Cardinality::OptionalOne,
            ValueType::String,
        ));
        let mut builder = SchemaRegistry::builder(Vocabulary::new());
        let err = builder.register(shape).expect_err("code declared twice");
        assert!(matches!(
            err,
            SchemaError::DuplicateProperty { kind, property } if kind == "a" && property == "code"
        ));
        assert!(!builder.build().contains("a"));
    }

    #[test]
    fn unknown_lookup_fails() {
        let registry = SchemaRegistry::builder(Vocabulary::new()).build();
        let err = registry.lookup("nope").expect_err("empty registry");
        assert!(matches!(err, SchemaError::UnknownShape { kind } if kind == "nope"));
    }

    #[test]
    fn invalid_pattern_rejected() {
        let mut shape = tiny("a");
        shape.properties[0].value = ValueType::pattern("([unclosed");
        let mut builder = SchemaRegistry::builder(Vocabulary::new());
        let err = builder.register(shape).expect_err("bad regex");
        assert!(matches!(err, SchemaError::InvalidPattern { property, .. } if property == "code"));
    }

    #[test]
    fn patterns_are_anchored() {
        let mut builder = SchemaRegistry::builder(Vocabulary::new());
        builder.register(tiny("a")).expect("register");
        let registry = builder.build();
        let re = registry.pattern("a", "code").expect("compiled pattern");
        assert!(re.is_match("ABC"));
        assert!(!re.is_match("xABCx"));
        assert!(registry.pattern("a", "missing").is_none());
    }

    #[test]
    fn classify_prefers_first_registered() {
        let registry = SchemaRegistry::builtin().expect("built-in shapes");
        let curriculum_class = registry.lookup(kinds::CURRICULUM).expect("curriculum").class.clone();
        let module_class = registry.lookup(kinds::MODULE).expect("module").class.clone();
        let entity = Entity::new("Q1")
            .with(Statement::new(slugs::INSTANCE_OF, Value::iri(&module_class)))
            .with(Statement::new(slugs::INSTANCE_OF, Value::iri(&curriculum_class)));
        let c = registry.classify(&entity).expect("classified");
        assert_eq!(c.shape.kind, kinds::CURRICULUM);
        assert_eq!(c.conflicting, vec![kinds::MODULE.to_owned()]);
    }

    #[test]
    fn classify_unregistered_names_classes() {
        let registry = SchemaRegistry::builtin().expect("built-in shapes");
        let entity = Entity::new("Q2").with_value(slugs::INSTANCE_OF, Value::iri("Q999999"));
        let err = registry.classify(&entity).expect_err("unregistered class");
        assert!(err.to_string().contains("Q999999"));
    }
}
