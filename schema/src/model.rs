//! Core entity and shape model types.
//!
//! These types represent Resource Hub entities as they come back from the
//! knowledge base (identifiers, statements, values) together with the
//! declarative shapes that constrain them. Shapes are plain data: they
//! compare, clone, and serialize, so a shape read back from the registry is
//! exactly the shape that was registered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vocab::{self, slugs};

/// A knowledge-base identifier, normalized to its bare form (`Q42`, `P50`).
///
/// Wikidata entity IRIs and page URLs are accepted and reduced to the bare
/// id. Identifiers from other sources are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an identifier, stripping any known Wikidata IRI prefix.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        for prefix in vocab::ENTITY_PREFIXES {
            if let Some(rest) = raw.strip_prefix(prefix) {
                if is_wikidata_id(rest) {
                    return Self(rest.to_owned());
                }
            }
        }
        Self(raw.to_owned())
    }

    /// Returns the bare identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is a Wikidata item or property id.
    #[must_use]
    pub fn is_wikidata(&self) -> bool {
        is_wikidata_id(&self.0)
    }

    /// Returns the canonical entity IRI (`http://www.wikidata.org/entity/Q42`).
    ///
    /// Non-Wikidata identifiers are returned unchanged.
    #[must_use]
    pub fn iri(&self) -> String {
        if self.is_wikidata() {
            format!("{}{}", vocab::WD, self.0)
        } else {
            self.0.clone()
        }
    }

    /// Returns the human-facing page URL (`https://www.wikidata.org/wiki/Q42`).
    #[must_use]
    pub fn page_url(&self) -> String {
        if self.is_wikidata() {
            format!("{}{}", vocab::WIKI_PAGE, self.0)
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

fn is_wikidata_id(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some('Q' | 'P' | 'L'))
        && s.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

/// The object of a statement: an IRI reference or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Value {
    /// A reference to another resource. Wikidata entity IRIs are stored
    /// in bare form (see [`EntityId`]).
    Iri {
        /// The referenced IRI or bare entity id.
        iri: String,
    },
    /// A plain, typed, or language-tagged literal.
    Literal {
        /// Lexical form.
        lexical: String,
        /// Datatype IRI, if typed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<String>,
        /// Language tag, if language-tagged.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
    },
}

impl Value {
    /// An IRI value; Wikidata entity IRIs are normalized to bare ids.
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Value::Iri {
            iri: EntityId::new(iri).0,
        }
    }

    /// A plain literal.
    pub fn string(lexical: impl Into<String>) -> Self {
        Value::Literal {
            lexical: lexical.into(),
            datatype: None,
            lang: None,
        }
    }

    /// A typed literal.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Value::Literal {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            lang: None,
        }
    }

    /// A language-tagged literal.
    pub fn text(lexical: impl Into<String>, lang: impl Into<String>) -> Self {
        Value::Literal {
            lexical: lexical.into(),
            datatype: None,
            lang: Some(lang.into()),
        }
    }

    /// Returns the IRI when this is an IRI value.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Value::Iri { iri } => Some(iri),
            Value::Literal { .. } => None,
        }
    }

    /// Returns the referenced entity when this is an IRI value.
    #[must_use]
    pub fn as_entity(&self) -> Option<EntityId> {
        self.as_iri().map(EntityId::new)
    }

    /// Returns the IRI or the literal's lexical form.
    #[must_use]
    pub fn lexical(&self) -> &str {
        match self {
            Value::Iri { iri } => iri,
            Value::Literal { lexical, .. } => lexical,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Iri { iri } => write!(f, "<{iri}>"),
            Value::Literal {
                lexical,
                lang: Some(lang),
                ..
            } => write!(f, "{lexical:?}@{lang}"),
            Value::Literal {
                lexical,
                datatype: Some(dt),
                ..
            } => write!(f, "{lexical:?}^^<{dt}>"),
            Value::Literal { lexical, .. } => write!(f, "{lexical:?}"),
        }
    }
}

/// A qualifier attached to a statement (e.g. `series-ordinal` on `has-part`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    /// Property slug of the qualifier.
    pub property: String,
    /// Qualifier value.
    pub value: Value,
}

/// A single (property, value) fact about an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Property slug (e.g. `author`). Unmapped upstream properties keep
    /// their raw identifier.
    pub property: String,
    /// Statement value.
    pub value: Value,
    /// Statement qualifiers, in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
}

impl Statement {
    /// Creates an unqualified statement.
    pub fn new(property: impl Into<String>, value: Value) -> Self {
        Self {
            property: property.into(),
            value,
            qualifiers: Vec::new(),
        }
    }

    /// Adds a qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, property: impl Into<String>, value: Value) -> Self {
        self.qualifiers.push(Qualifier {
            property: property.into(),
            value,
        });
        self
    }

    /// Adds a `series-ordinal` qualifier.
    #[must_use]
    pub fn with_ordinal(self, ordinal: i64) -> Self {
        self.with_qualifier(slugs::SERIES_ORDINAL, Value::string(ordinal.to_string()))
    }

    /// Returns the `series-ordinal` qualifier as an integer, if present and
    /// well-formed.
    #[must_use]
    pub fn ordinal(&self) -> Option<i64> {
        self.qualifiers
            .iter()
            .find(|q| q.property == slugs::SERIES_ORDINAL)
            .and_then(|q| parse_ordinal(q.value.lexical()))
    }
}

pub(crate) fn parse_ordinal(lexical: &str) -> Option<i64> {
    lexical.trim().trim_start_matches('+').parse().ok()
}

/// An entity fetched read-only from the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity identifier.
    pub id: EntityId,
    /// Preferred label, if the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

impl Entity {
    /// Creates an entity with no statements.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            statements: Vec::new(),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Appends a statement.
    #[must_use]
    pub fn with(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Appends an unqualified statement.
    #[must_use]
    pub fn with_value(self, property: impl Into<String>, value: Value) -> Self {
        self.with(Statement::new(property, value))
    }

    /// Returns all statements for `property`, in source order.
    pub fn statements_for<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a Statement> {
        self.statements.iter().filter(move |s| s.property == property)
    }

    /// Returns the values of the `instance-of` statements, in source order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.statements_for(slugs::INSTANCE_OF)
            .map(|s| s.value.lexical())
    }

    /// Returns the entity's own `series-ordinal` statement, if any.
    #[must_use]
    pub fn ordinal(&self) -> Option<i64> {
        self.statements_for(slugs::SERIES_ORDINAL)
            .find_map(|s| parse_ordinal(s.value.lexical()))
    }
}

/// How many times a property may occur on an entity.
///
/// The four tags mirror the ShEx cardinality markers: exactly one (none),
/// `+`, `?`, and `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    /// Exactly one occurrence.
    RequiredOne,
    /// One or more occurrences (`+`).
    RequiredMany,
    /// Zero or one occurrence (`?`).
    OptionalOne,
    /// Any number of occurrences (`*`).
    OptionalMany,
}

impl Cardinality {
    /// Returns the inclusive (min, max) bounds; `None` means unbounded.
    #[must_use]
    pub fn bounds(self) -> (usize, Option<usize>) {
        match self {
            Cardinality::RequiredOne => (1, Some(1)),
            Cardinality::RequiredMany => (1, None),
            Cardinality::OptionalOne => (0, Some(1)),
            Cardinality::OptionalMany => (0, None),
        }
    }

    /// Returns true if `count` occurrences satisfy this cardinality.
    #[must_use]
    pub fn admits(self, count: usize) -> bool {
        let (min, max) = self.bounds();
        count >= min && max.map_or(true, |max| count <= max)
    }

    /// Returns true if at least one occurrence is required.
    #[must_use]
    pub fn is_required(self) -> bool {
        self.bounds().0 > 0
    }

    /// Returns the ShEx cardinality marker.
    #[must_use]
    pub fn shex_marker(self) -> &'static str {
        match self {
            Cardinality::RequiredOne => "",
            Cardinality::RequiredMany => "+",
            Cardinality::OptionalOne => "?",
            Cardinality::OptionalMany => "*",
        }
    }

    /// Returns the configuration name (`required-one`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::RequiredOne => "required-one",
            Cardinality::RequiredMany => "required-many",
            Cardinality::OptionalOne => "optional-one",
            Cardinality::OptionalMany => "optional-many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self.bounds();
        match max {
            Some(max) => write!(f, "{} [{min}, {max}]", self.as_str()),
            None => write!(f, "{} [{min}, *]", self.as_str()),
        }
    }
}

/// The type a statement value must have.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ValueType {
    /// An entity reference, optionally expected to be of the given kind.
    Item {
        /// Expected kind of the referenced entity.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
    /// A plain or `xsd:string` literal (language tags allowed).
    String,
    /// An `http(s)` URL, as an IRI or a literal.
    Url,
    /// A calendar date or date-time.
    Date,
    /// A decimal number.
    Decimal,
    /// An integer.
    Integer,
    /// A language-tagged literal.
    MonolingualText,
    /// A string literal whose whole lexical form matches `regex`.
    Pattern {
        /// Regular expression (matched against the full lexical form).
        regex: String,
    },
}

impl ValueType {
    /// Entity reference of the given kind.
    pub fn item(kind: impl Into<String>) -> Self {
        ValueType::Item {
            kind: Some(kind.into()),
        }
    }

    /// Entity reference of any kind.
    #[must_use]
    pub fn any_item() -> Self {
        ValueType::Item { kind: None }
    }

    /// Pattern-constrained string.
    pub fn pattern(regex: impl Into<String>) -> Self {
        ValueType::Pattern {
            regex: regex.into(),
        }
    }

    /// Maps a Wikidata property datatype name onto a value type.
    ///
    /// Returns `None` for datatypes the hub does not model.
    #[must_use]
    pub fn from_wikidata_datatype(datatype: &str) -> Option<Self> {
        match datatype {
            "wikibase-item" => Some(ValueType::any_item()),
            "string" | "external-id" => Some(ValueType::String),
            "url" => Some(ValueType::Url),
            "time" => Some(ValueType::Date),
            "monolingualtext" => Some(ValueType::MonolingualText),
            "quantity" => Some(ValueType::Decimal),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Item { kind: Some(kind) } => write!(f, "IRI of kind {kind}"),
            ValueType::Item { kind: None } => f.write_str("IRI"),
            ValueType::String => f.write_str("string"),
            ValueType::Url => f.write_str("URL"),
            ValueType::Date => f.write_str("date"),
            ValueType::Decimal => f.write_str("decimal"),
            ValueType::Integer => f.write_str("integer"),
            ValueType::MonolingualText => f.write_str("monolingual text"),
            ValueType::Pattern { regex } => write!(f, "string matching /{regex}/"),
        }
    }
}

/// A constraint on one property of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyConstraint {
    /// Property slug.
    #[serde(rename = "name")]
    pub property: String,
    /// Allowed number of occurrences.
    pub cardinality: Cardinality,
    /// Allowed value type.
    pub value: ValueType,
    /// Whether the property is a traversable relationship edge.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub relation: bool,
}

impl PropertyConstraint {
    /// A plain attribute constraint.
    pub fn attribute(property: impl Into<String>, cardinality: Cardinality, value: ValueType) -> Self {
        Self {
            property: property.into(),
            cardinality,
            value,
            relation: false,
        }
    }

    /// A relationship edge to an entity of `kind` (or any kind).
    pub fn relation(property: impl Into<String>, cardinality: Cardinality, kind: Option<&str>) -> Self {
        Self {
            property: property.into(),
            cardinality,
            value: ValueType::Item {
                kind: kind.map(str::to_owned),
            },
            relation: true,
        }
    }
}

/// The declared shape of one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Kind name (e.g. `curriculum`).
    pub kind: String,
    /// Human-readable label.
    pub label: String,
    /// The `instance-of` class that classifies an entity into this kind.
    pub class: String,
    /// Property constraints in declaration order.
    #[serde(rename = "property", default)]
    pub properties: Vec<PropertyConstraint>,
    /// Relation properties whose targets are ordered by ordinal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ordered: Vec<String>,
}

impl Shape {
    /// Looks up the constraint for `property`.
    #[must_use]
    pub fn constraint(&self, property: &str) -> Option<&PropertyConstraint> {
        self.properties.iter().find(|c| c.property == property)
    }

    /// Returns true if the shape declares `property`.
    #[must_use]
    pub fn declares(&self, property: &str) -> bool {
        self.constraint(property).is_some()
    }

    /// Returns the relationship constraints in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &PropertyConstraint> {
        self.properties.iter().filter(|c| c.relation)
    }

    /// Returns true if targets of `property` are ordered by ordinal.
    #[must_use]
    pub fn is_ordered(&self, property: &str) -> bool {
        self.ordered.iter().any(|p| p == property)
    }
}
