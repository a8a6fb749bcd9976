//! `module` shape: one unit of a curriculum.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::{slugs, HUB_CLASS};

/// Returns the `module` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::MODULE.to_owned(),
        label: "Module".to_owned(),
        class: format!("{HUB_CLASS}Module"),
        properties: vec![
            PropertyConstraint::relation(slugs::AUTHOR, Cardinality::RequiredMany, None),
            PropertyConstraint::attribute(
                slugs::PUBLICATION_DATE,
                Cardinality::OptionalOne,
                ValueType::Date,
            ),
            PropertyConstraint::attribute(
                slugs::CITES_WORK,
                Cardinality::OptionalMany,
                ValueType::any_item(),
            ),
            PropertyConstraint::relation(
                slugs::PART_OF,
                Cardinality::OptionalOne,
                Some(kinds::CURRICULUM),
            ),
            PropertyConstraint::attribute(
                slugs::SERIES_ORDINAL,
                Cardinality::OptionalOne,
                ValueType::Integer,
            ),
        ],
        ordered: Vec::new(),
    }
}
