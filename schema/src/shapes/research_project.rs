//! `research-project` shape.
//!
//! Projects point at their grants through `funded-by` (one grant per
//! funding statement; several statements accumulate over time) and at
//! their outputs through `has-part`. Award ids repeat the grant's award
//! number and share its seven-digit NSF pattern.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::{grant, kinds};
use crate::vocab::slugs;

/// Returns the `research-project` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::RESEARCH_PROJECT.to_owned(),
        label: "Research project".to_owned(),
        class: "Q1298668".to_owned(),
        properties: vec![
            PropertyConstraint::attribute(slugs::START_TIME, Cardinality::RequiredOne, ValueType::Date),
            PropertyConstraint::attribute(slugs::END_TIME, Cardinality::OptionalOne, ValueType::Date),
            PropertyConstraint::attribute(
                slugs::OFFICIAL_WEBSITE,
                Cardinality::OptionalOne,
                ValueType::Url,
            ),
            PropertyConstraint::relation(
                slugs::FUNDER,
                Cardinality::OptionalMany,
                Some(kinds::ORGANIZATION),
            ),
            PropertyConstraint::relation(
                slugs::FUNDED_BY,
                Cardinality::OptionalMany,
                Some(kinds::GRANT),
            ),
            PropertyConstraint::attribute(
                slugs::AWARD_ID,
                Cardinality::OptionalMany,
                ValueType::pattern(grant::NSF_AWARD_ID),
            ),
            PropertyConstraint::relation(
                slugs::PRINCIPAL_INVESTIGATOR,
                Cardinality::OptionalMany,
                Some(kinds::PERSON),
            ),
            PropertyConstraint::attribute(
                slugs::MAIN_SUBJECT,
                Cardinality::OptionalMany,
                ValueType::any_item(),
            ),
            PropertyConstraint::relation(
                slugs::HAS_PART,
                Cardinality::OptionalMany,
                Some(kinds::PUBLICATION),
            ),
        ],
        ordered: Vec::new(),
    }
}
