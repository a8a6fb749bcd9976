//! JSON serializer for a shape registry.
//!
//! The output uses the shape configuration layout (`properties` plus a
//! `shape` array), so it can be fed back to
//! [`ShapeConfig::from_json_str`](crate::ShapeConfig::from_json_str).

use serde_json::{json, Map, Value};

use crate::model::{PropertyConstraint, Shape, ValueType};
use crate::registry::SchemaRegistry;

/// Serializes the registry to a JSON `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json(registry: &SchemaRegistry) -> Value {
    let mut properties = Map::new();
    for (slug, pid) in registry.vocabulary().iter() {
        properties.insert(slug.to_owned(), json!(pid));
    }
    let shapes: Vec<Value> = registry.shapes().map(shape_to_json).collect();
    json!({
        "extends_builtin": false,
        "properties": properties,
        "shape": shapes
    })
}

fn shape_to_json(shape: &Shape) -> Value {
    let properties: Vec<Value> = shape.properties.iter().map(constraint_to_json).collect();
    let mut node = json!({
        "kind": shape.kind,
        "label": shape.label,
        "class": shape.class,
        "property": properties
    });
    if !shape.ordered.is_empty() {
        node["ordered"] = json!(shape.ordered);
    }
    node
}

fn constraint_to_json(c: &PropertyConstraint) -> Value {
    let mut node = json!({
        "name": c.property,
        "cardinality": c.cardinality.as_str(),
        "value": value_type_to_json(&c.value)
    });
    if c.relation {
        node["relation"] = json!(true);
    }
    node
}

fn value_type_to_json(value: &ValueType) -> Value {
    match value {
        ValueType::Item { kind: Some(kind) } => json!({ "type": "item", "kind": kind }),
        ValueType::Item { kind: None } => json!({ "type": "item" }),
        ValueType::String => json!({ "type": "string" }),
        ValueType::Url => json!({ "type": "url" }),
        ValueType::Date => json!({ "type": "date" }),
        ValueType::Decimal => json!({ "type": "decimal" }),
        ValueType::Integer => json!({ "type": "integer" }),
        ValueType::MonolingualText => json!({ "type": "monolingual-text" }),
        ValueType::Pattern { regex } => json!({ "type": "pattern", "regex": regex }),
    }
}
