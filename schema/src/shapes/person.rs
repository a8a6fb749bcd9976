//! `person` shape: researcher profiles.
//!
//! A researcher profile pulls in the institutions the person is affiliated
//! with or employed by, and the fields of work used as keyword labels.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::slugs;

/// ORCID iD: four groups of four digits, the last check character may be `X`.
pub const ORCID_ID: &str = "^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]$";

/// Returns the `person` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::PERSON.to_owned(),
        label: "Person".to_owned(),
        class: "Q5".to_owned(),
        properties: vec![
            PropertyConstraint::attribute(
                slugs::ORCID,
                Cardinality::OptionalOne,
                ValueType::pattern(ORCID_ID),
            ),
            PropertyConstraint::relation(
                slugs::AFFILIATED_WITH,
                Cardinality::OptionalMany,
                Some(kinds::ORGANIZATION),
            ),
            PropertyConstraint::relation(
                slugs::EMPLOYER,
                Cardinality::OptionalMany,
                Some(kinds::ORGANIZATION),
            ),
            PropertyConstraint::attribute(
                slugs::FIELD_OF_WORK,
                Cardinality::OptionalMany,
                ValueType::any_item(),
            ),
        ],
        ordered: Vec::new(),
    }
}
