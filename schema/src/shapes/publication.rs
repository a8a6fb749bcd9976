//! `publication` shape: case studies and articles produced by projects.
//!
//! Mirrors the statements written for imported case studies: the full
//! work URL, the venue it was published in, and its copyright status.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::slugs;

/// Returns the `publication` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::PUBLICATION.to_owned(),
        label: "Publication".to_owned(),
        class: "Q732557".to_owned(),
        properties: vec![
            PropertyConstraint::attribute(
                slugs::TITLE,
                Cardinality::OptionalOne,
                ValueType::MonolingualText,
            ),
            PropertyConstraint::attribute(
                slugs::FULL_WORK_URL,
                Cardinality::RequiredOne,
                ValueType::Url,
            ),
            PropertyConstraint::attribute(
                slugs::PUBLISHED_IN,
                Cardinality::OptionalOne,
                ValueType::any_item(),
            ),
            PropertyConstraint::relation(slugs::AUTHOR, Cardinality::OptionalMany, Some(kinds::PERSON)),
            PropertyConstraint::attribute(
                slugs::PUBLICATION_DATE,
                Cardinality::OptionalOne,
                ValueType::Date,
            ),
            PropertyConstraint::attribute(
                slugs::COPYRIGHT_STATUS,
                Cardinality::OptionalOne,
                ValueType::any_item(),
            ),
            PropertyConstraint::attribute(slugs::LICENSE, Cardinality::OptionalOne, ValueType::any_item()),
            PropertyConstraint::relation(
                slugs::PART_OF,
                Cardinality::OptionalOne,
                Some(kinds::RESEARCH_PROJECT),
            ),
        ],
        ordered: Vec::new(),
    }
}
