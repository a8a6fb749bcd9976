//! `hardware` shape.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::slugs;

/// Returns the `hardware` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::HARDWARE.to_owned(),
        label: "Hardware".to_owned(),
        class: "Q3966".to_owned(),
        properties: vec![
            PropertyConstraint::relation(
                slugs::MANUFACTURER,
                Cardinality::RequiredOne,
                Some(kinds::ORGANIZATION),
            ),
            PropertyConstraint::attribute(slugs::INCEPTION, Cardinality::OptionalOne, ValueType::Date),
            PropertyConstraint::relation(slugs::COMPATIBLE_WITH, Cardinality::OptionalMany, None),
            PropertyConstraint::attribute(
                slugs::SOFTWARE_VERSION,
                Cardinality::OptionalMany,
                ValueType::String,
            ),
            PropertyConstraint::relation(
                slugs::FOLLOWS,
                Cardinality::OptionalOne,
                Some(kinds::HARDWARE),
            ),
            PropertyConstraint::relation(
                slugs::FOLLOWED_BY,
                Cardinality::OptionalOne,
                Some(kinds::HARDWARE),
            ),
        ],
        ordered: Vec::new(),
    }
}
