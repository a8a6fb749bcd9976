//! `software` shape.
//!
//! Releases of the same package chain through `follows`/`followed-by`.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::slugs;

/// Returns the `software` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::SOFTWARE.to_owned(),
        label: "Software".to_owned(),
        class: "Q7397".to_owned(),
        properties: vec![
            PropertyConstraint::relation(slugs::DEVELOPER, Cardinality::OptionalMany, None),
            PropertyConstraint::attribute(
                slugs::PROGRAMMING_LANGUAGE,
                Cardinality::OptionalMany,
                ValueType::any_item(),
            ),
            PropertyConstraint::attribute(
                slugs::SOURCE_CODE_REPOSITORY,
                Cardinality::OptionalMany,
                ValueType::Url,
            ),
            PropertyConstraint::attribute(
                slugs::LICENSE,
                Cardinality::OptionalMany,
                ValueType::any_item(),
            ),
            PropertyConstraint::attribute(
                slugs::SOFTWARE_VERSION,
                Cardinality::OptionalMany,
                ValueType::String,
            ),
            PropertyConstraint::relation(
                slugs::FOLLOWS,
                Cardinality::OptionalOne,
                Some(kinds::SOFTWARE),
            ),
            PropertyConstraint::relation(
                slugs::FOLLOWED_BY,
                Cardinality::OptionalOne,
                Some(kinds::SOFTWARE),
            ),
        ],
        ordered: Vec::new(),
    }
}
