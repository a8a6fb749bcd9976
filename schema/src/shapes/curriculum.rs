//! `curriculum` shape: an ordered, flat sequence of modules.
//!
//! A curriculum names exactly one author (typically the publishing
//! organization) and one or more modules through `has-part`. Each
//! `has-part` statement carries a `series-ordinal` qualifier; ordinals are
//! distinct, so the modules form a total order. Nested curricula are not
//! modelled: a module is never itself a curriculum.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::{slugs, HUB_CLASS};

/// Returns the `curriculum` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::CURRICULUM.to_owned(),
        label: "Curriculum".to_owned(),
        class: format!("{HUB_CLASS}Curriculum"),
        properties: vec![
            PropertyConstraint::relation(slugs::AUTHOR, Cardinality::RequiredOne, None),
            PropertyConstraint::attribute(
                slugs::DESCRIBED_AT_URL,
                Cardinality::OptionalOne,
                ValueType::Url,
            ),
            PropertyConstraint::relation(
                slugs::HAS_PART,
                Cardinality::RequiredMany,
                Some(kinds::MODULE),
            ),
            PropertyConstraint::attribute(
                slugs::MAIN_SUBJECT,
                Cardinality::OptionalMany,
                ValueType::any_item(),
            ),
        ],
        ordered: vec![slugs::HAS_PART.to_owned()],
    }
}
