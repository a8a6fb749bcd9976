//! `grant` shape: a funding award.
//!
//! NSF award numbers are seven digits; the `award-id` constraint enforces
//! that pattern on the full lexical form.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::slugs;

/// Seven-digit NSF award number.
pub const NSF_AWARD_ID: &str = "^[0-9]{7}$";

/// Returns the `grant` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::GRANT.to_owned(),
        label: "Grant".to_owned(),
        class: "Q230788".to_owned(),
        properties: vec![
            PropertyConstraint::attribute(
                slugs::AWARD_ID,
                Cardinality::OptionalOne,
                ValueType::pattern(NSF_AWARD_ID),
            ),
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
            PropertyConstraint::attribute(slugs::START_TIME, Cardinality::OptionalOne, ValueType::Date),
            PropertyConstraint::attribute(slugs::END_TIME, Cardinality::OptionalOne, ValueType::Date),
            PropertyConstraint::attribute(slugs::BUDGET, Cardinality::OptionalOne, ValueType::Decimal),
            PropertyConstraint::relation(
                slugs::PRINCIPAL_INVESTIGATOR,
                Cardinality::OptionalMany,
                Some(kinds::PERSON),
            ),
            PropertyConstraint::relation(
                slugs::FUNDER,
                Cardinality::RequiredOne,
                Some(kinds::ORGANIZATION),
            ),
            PropertyConstraint::relation(
                slugs::FUNDS,
                Cardinality::OptionalMany,
                Some(kinds::RESEARCH_PROJECT),
            ),
        ],
        ordered: Vec::new(),
    }
}
