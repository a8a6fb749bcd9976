//! ShExC serializer for a shape registry.
//!
//! Produces one shape expression per registered kind. Properties with a
//! Wikidata mapping are written as `wdt:` predicates; unmapped slugs use the
//! hub property namespace. Relation targets of a known kind reference that
//! kind's shape.

use crate::model::{Shape, ValueType};
use crate::registry::SchemaRegistry;
use crate::vocab::slugs;

/// Hub shape namespace.
pub const HUB_SHAPE: &str = "https://w3id.org/resource-hub/shape/";
/// Hub property namespace for slugs without a Wikidata mapping.
pub const HUB_PROP: &str = "https://w3id.org/resource-hub/prop/";

/// Serializes every registered shape to a ShExC document.
#[must_use]
pub fn to_shexc(registry: &SchemaRegistry) -> String {
    let mut out = String::with_capacity(8 * 1024);

    out.push_str("PREFIX wd:    <http://www.wikidata.org/entity/>\n");
    out.push_str("PREFIX wdt:   <http://www.wikidata.org/prop/direct/>\n");
    out.push_str("PREFIX rdf:   <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n");
    out.push_str("PREFIX xsd:   <http://www.w3.org/2001/XMLSchema#>\n");
    out.push_str(&format!("PREFIX hub:   <{HUB_SHAPE}>\n"));
    out.push_str(&format!("PREFIX hubp:  <{HUB_PROP}>\n"));
    out.push('\n');

    for shape in registry.shapes() {
        shape_to_shexc(registry, shape, &mut out);
        out.push('\n');
    }

    out
}

fn shape_to_shexc(registry: &SchemaRegistry, shape: &Shape, out: &mut String) {
    out.push_str(&format!("# {}\n", shape.label));
    if !shape.ordered.is_empty() {
        out.push_str(&format!(
            "# ordered by {}: {}\n",
            slugs::SERIES_ORDINAL,
            shape.ordered.join(", ")
        ));
    }
    out.push_str(&format!("hub:{} {{\n", shape.kind));

    let mut lines = vec![format!(
        "  {} [ {} ]",
        predicate(registry, slugs::INSTANCE_OF),
        class_term(&shape.class)
    )];
    for c in &shape.properties {
        let marker = c.cardinality.shex_marker();
        let mut line = format!(
            "  {} {}",
            predicate(registry, &c.property),
            value_expr(registry, &c.value)
        );
        if !marker.is_empty() {
            line.push(' ');
            line.push_str(marker);
        }
        lines.push(line);
    }
    out.push_str(&lines.join(" ;\n"));
    out.push_str("\n}\n");
}

fn predicate(registry: &SchemaRegistry, slug: &str) -> String {
    match registry.vocabulary().property_id(slug) {
        Some(pid) => format!("wdt:{pid}"),
        None => format!("hubp:{slug}"),
    }
}

fn class_term(class: &str) -> String {
    let id = crate::model::EntityId::new(class);
    if id.is_wikidata() {
        format!("wd:{id}")
    } else {
        format!("<{class}>")
    }
}

fn value_expr(registry: &SchemaRegistry, value: &ValueType) -> String {
    match value {
        ValueType::Item { kind: Some(kind) } if registry.contains(kind) => format!("@hub:{kind}"),
        ValueType::Item { .. } | ValueType::Url => "IRI".to_owned(),
        ValueType::String => "xsd:string".to_owned(),
        ValueType::Date => "xsd:dateTime".to_owned(),
        ValueType::Decimal => "xsd:decimal".to_owned(),
        ValueType::Integer => "xsd:integer".to_owned(),
        ValueType::MonolingualText => "rdf:langString".to_owned(),
        ValueType::Pattern { regex } => format!("xsd:string /{}/", regex.replace('/', "\\/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_shexc() -> String {
        let registry = SchemaRegistry::builtin().expect("built-in shapes");
        to_shexc(&registry)
    }

    #[test]
    fn declares_prefixes() {
        let out = builtin_shexc();
        assert!(out.starts_with("PREFIX wd:"));
        assert!(out.contains("PREFIX wdt:"));
    }

    #[test]
    fn renders_cardinality_and_references() {
        let out = builtin_shexc();
        assert!(out.contains("hub:curriculum {"));
        assert!(out.contains("wdt:P527 @hub:module +"), "{out}");
        assert!(out.contains("wdt:P31 [ wd:Q230788 ]"));
    }

    #[test]
    fn unmapped_slugs_use_hub_namespace() {
        let out = builtin_shexc();
        assert!(out.contains("hubp:award-id xsd:string /^[0-9]{7}$/ ?"), "{out}");
    }

    #[test]
    fn one_block_per_shape() {
        let out = builtin_shexc();
        assert_eq!(out.matches("\n}\n").count(), 10);
    }
}
