//! Graph patterns and their SPARQL rendering.
//!
//! A [`GraphPattern`] is the small query language the resolver speaks to a
//! [`KnowledgeBase`](crate::KnowledgeBase): a conjunction of triple patterns
//! over entities, property slugs, and values. The in-memory knowledge base
//! evaluates patterns directly; the SPARQL knowledge base renders them with
//! the Wikidata `wd:`/`wdt:` prefixes.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use hub_schema::vocab::{self, slugs};
use hub_schema::{EntityId, Value, Vocabulary};
use serde::{Deserialize, Serialize};

use crate::error::{KbError, KbResult};

/// One solution of a graph pattern: variable name → bound value.
pub type Binding = BTreeMap<String, Value>;

/// A position in a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "term", rename_all = "kebab-case")]
pub enum Term {
    /// A variable (`?name`).
    Var {
        /// Variable name without the `?`.
        name: String,
    },
    /// A knowledge-base entity.
    Entity {
        /// Entity id.
        id: EntityId,
    },
    /// A property, by slug or by Wikidata property id.
    Property {
        /// Slug (`author`) or id (`P50`).
        property: String,
    },
    /// A concrete value.
    Value {
        /// The value.
        value: Value,
    },
}

impl Term {
    /// A variable.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var { name: name.into() }
    }

    /// An entity.
    pub fn entity(id: impl Into<EntityId>) -> Self {
        Term::Entity { id: id.into() }
    }

    /// A property.
    pub fn property(property: impl Into<String>) -> Self {
        Term::Property {
            property: property.into(),
        }
    }

    /// A value; IRI values that name entities become entity terms.
    #[must_use]
    pub fn value(value: Value) -> Self {
        match value.as_entity() {
            Some(id) if id.is_wikidata() => Term::Entity { id },
            _ => Term::Value { value },
        }
    }
}

/// A `subject predicate object` pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriplePattern {
    /// Subject.
    pub subject: Term,
    /// Predicate.
    pub predicate: Term,
    /// Object.
    pub object: Term,
}

/// A conjunctive graph pattern with a projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPattern {
    /// Projected variables; empty projects every variable.
    pub select: Vec<String>,
    /// Remove duplicate solutions.
    pub distinct: bool,
    /// Triple patterns, all of which must match.
    pub patterns: Vec<TriplePattern>,
    /// Maximum number of solutions.
    pub limit: Option<usize>,
}

impl GraphPattern {
    /// Starts a pattern projecting `vars`.
    pub fn select<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            select: vars.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Removes duplicate solutions.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Adds a triple pattern.
    #[must_use]
    pub fn triple(mut self, subject: Term, predicate: Term, object: Term) -> Self {
        self.patterns.push(TriplePattern {
            subject,
            predicate,
            object,
        });
        self
    }

    /// Caps the number of solutions.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The "any field" lookup: every `?item` whose `field` has `value`,
    /// optionally restricted to instances of `class`.
    #[must_use]
    pub fn lookup(field: &str, value: &Value, class: Option<&str>) -> Self {
        let mut pattern = Self::select(["item"])
            .distinct()
            .triple(Term::var("item"), Term::property(field), Term::value(value.clone()));
        if let Some(class) = class {
            pattern = pattern.triple(
                Term::var("item"),
                Term::property(slugs::INSTANCE_OF),
                Term::value(Value::iri(class)),
            );
        }
        pattern
    }

    /// Returns the variable names in first-occurrence order.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = Vec::new();
        for p in &self.patterns {
            for term in [&p.subject, &p.predicate, &p.object] {
                if let Term::Var { name } = term {
                    if !vars.contains(&name.as_str()) {
                        vars.push(name);
                    }
                }
            }
        }
        vars
    }

    /// Renders the pattern as a SPARQL `SELECT` query.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::UnmappedProperty`] if a property slug has no
    /// Wikidata property id in `vocabulary`.
    pub fn to_sparql(&self, vocabulary: &Vocabulary) -> KbResult<String> {
        let mut out = String::new();
        let _ = writeln!(out, "PREFIX wd: <{}>", vocab::WD);
        let _ = writeln!(out, "PREFIX wdt: <{}>", vocab::WDT);
        out.push_str("SELECT ");
        if self.distinct {
            out.push_str("DISTINCT ");
        }
        let vars = if self.select.is_empty() {
            self.variables()
        } else {
            self.select.iter().map(String::as_str).collect()
        };
        let projection: Vec<String> = vars.iter().map(|v| format!("?{v}")).collect();
        out.push_str(&projection.join(" "));
        out.push_str(" WHERE {\n");
        for p in &self.patterns {
            let _ = writeln!(
                out,
                "  {} {} {} .",
                render_node(&p.subject),
                render_predicate(&p.predicate, vocabulary)?,
                render_node(&p.object)
            );
        }
        out.push('}');
        if let Some(limit) = self.limit {
            let _ = write!(out, "\nLIMIT {limit}");
        }
        Ok(out)
    }
}

fn render_node(term: &Term) -> String {
    match term {
        Term::Var { name } => format!("?{name}"),
        Term::Entity { id } if id.is_wikidata() => format!("wd:{id}"),
        Term::Entity { id } => format!("<{}>", id.iri()),
        Term::Property { property } => format!("wd:{property}"),
        Term::Value { value } => render_value(value),
    }
}

fn render_predicate(term: &Term, vocabulary: &Vocabulary) -> KbResult<String> {
    match term {
        Term::Property { property } => Ok(format!("wdt:{}", property_id(property, vocabulary)?)),
        other => Ok(render_node(other)),
    }
}

/// Resolves a slug or property id to a Wikidata property id.
///
/// # Errors
///
/// Returns [`KbError::UnmappedProperty`] if `property` is neither a mapped
/// slug nor a property id.
pub fn property_id<'a>(property: &'a str, vocabulary: &'a Vocabulary) -> KbResult<&'a str> {
    if let Some(pid) = vocabulary.property_id(property) {
        return Ok(pid);
    }
    let id = EntityId::new(property);
    if id.is_wikidata() && property.starts_with('P') {
        return Ok(property);
    }
    Err(KbError::UnmappedProperty {
        property: property.to_owned(),
    })
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Iri { iri } => {
            let id = EntityId::new(iri);
            if id.is_wikidata() {
                format!("wd:{id}")
            } else {
                format!("<{iri}>")
            }
        }
        Value::Literal {
            lexical,
            lang: Some(lang),
            ..
        } => format!("{}@{lang}", quote(lexical)),
        Value::Literal {
            lexical,
            datatype: Some(dt),
            ..
        } => format!("{}^^<{dt}>", quote(lexical)),
        Value::Literal { lexical, .. } => quote(lexical),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Variables of the statement query built by [`fetch_query`].
pub mod fetch_vars {
    /// Wikidata property id of the statement.
    pub const PROPERTY: &str = "property";
    /// Statement value.
    pub const VALUE: &str = "value";
    /// `series-ordinal` qualifier.
    pub const ORDINAL: &str = "ordinal";
    /// English label.
    pub const LABEL: &str = "label";
}

/// SPARQL query returning every statement of `id` (with its
/// `series-ordinal` qualifier) plus the entity's English label.
#[must_use]
pub fn fetch_query(id: &EntityId, vocabulary: &Vocabulary) -> String {
    let ordinal = vocabulary
        .property_id(slugs::SERIES_ORDINAL)
        .unwrap_or("P1545");
    let subject = render_node(&Term::entity(id.clone()));
    format!(
        "PREFIX wd: <{wd}>\n\
         PREFIX p: <{p}>\n\
         PREFIX pq: <{pq}>\n\
         PREFIX wikibase: <http://wikiba.se/ontology#>\n\
         PREFIX rdfs: <{rdfs}>\n\
         SELECT ?property ?value ?ordinal ?label WHERE {{\n  \
           {{\n    \
             {subject} ?claim ?statement .\n    \
             ?statement ?ps ?value .\n    \
             ?property wikibase:claim ?claim ;\n              wikibase:statementProperty ?ps .\n    \
             OPTIONAL {{ ?statement pq:{ordinal} ?ordinal . }}\n  \
           }} UNION {{\n    \
             {subject} rdfs:label ?label .\n    \
             FILTER(LANG(?label) = \"en\")\n  \
           }}\n\
         }}",
        wd = vocab::WD,
        p = vocab::P,
        pq = vocab::PQ,
        rdfs = vocab::RDFS,
    )
}

/// A SPARQL 1.1 JSON results document.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    /// Result header.
    pub head: SparqlHead,
    /// Solutions.
    pub results: SparqlBindings,
}

/// Header of a SPARQL JSON results document.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlHead {
    /// Projected variables.
    #[serde(default)]
    pub vars: Vec<String>,
}

/// Solution list of a SPARQL JSON results document.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlBindings {
    /// One map per solution.
    pub bindings: Vec<BTreeMap<String, RdfTerm>>,
}

/// One bound RDF term in SPARQL JSON results.
#[derive(Debug, Clone, Deserialize)]
pub struct RdfTerm {
    /// `uri`, `literal`, `typed-literal`, or `bnode`.
    #[serde(rename = "type")]
    pub kind: String,
    /// IRI, lexical form, or blank-node label.
    pub value: String,
    /// Datatype IRI of typed literals.
    #[serde(default)]
    pub datatype: Option<String>,
    /// Language tag of tagged literals.
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
}

impl RdfTerm {
    /// Converts to a statement value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match (self.kind.as_str(), &self.lang, &self.datatype) {
            ("uri", _, _) => Value::iri(&self.value),
            ("bnode", _, _) => Value::Iri {
                iri: format!("_:{}", self.value),
            },
            (_, Some(lang), _) => Value::text(&self.value, lang),
            (_, None, Some(dt)) if dt != vocab::XSD_STRING => Value::typed(&self.value, dt),
            _ => Value::string(&self.value),
        }
    }
}

impl SparqlResults {
    /// Decodes a SPARQL JSON results document.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Decode`] if `body` is not a results document.
    pub fn from_json(operation: &str, body: &str) -> KbResult<Self> {
        serde_json::from_str(body).map_err(|e| KbError::Decode {
            operation: operation.to_owned(),
            message: e.to_string(),
        })
    }

    /// Converts the solutions into bindings.
    #[must_use]
    pub fn into_bindings(self) -> Vec<Binding> {
        self.results
            .bindings
            .into_iter()
            .map(|row| row.into_iter().map(|(k, t)| (k, t.to_value())).collect())
            .collect()
    }

    /// Flattens each solution to `variable → string` (IRIs and lexical
    /// forms as-is).
    #[must_use]
    pub fn into_rows(self) -> Vec<BTreeMap<String, String>> {
        self.results
            .bindings
            .into_iter()
            .map(|row| row.into_iter().map(|(k, t)| (k, t.value)).collect())
            .collect()
    }
}
