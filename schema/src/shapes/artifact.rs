//! `artifact` shape: a created object that may belong to collections.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::{slugs, HUB_CLASS};

/// Returns the `artifact` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::ARTIFACT.to_owned(),
        label: "Artifact".to_owned(),
        class: format!("{HUB_CLASS}Artifact"),
        properties: vec![
            PropertyConstraint::relation(slugs::CREATOR, Cardinality::RequiredMany, None),
            PropertyConstraint::attribute(
                slugs::TITLE,
                Cardinality::OptionalOne,
                ValueType::MonolingualText,
            ),
            PropertyConstraint::attribute(
                slugs::MAIN_SUBJECT,
                Cardinality::OptionalMany,
                ValueType::any_item(),
            ),
            PropertyConstraint::attribute(slugs::GENRE, Cardinality::OptionalMany, ValueType::any_item()),
            PropertyConstraint::attribute(slugs::INCEPTION, Cardinality::OptionalOne, ValueType::Date),
            PropertyConstraint::relation(slugs::COLLECTION, Cardinality::OptionalMany, None),
        ],
        ordered: Vec::new(),
    }
}
