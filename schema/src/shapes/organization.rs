//! `organization` shape.

use crate::model::{Cardinality, PropertyConstraint, Shape, ValueType};
use crate::shapes::kinds;
use crate::vocab::slugs;

/// ROR identifier: a leading zero, six Crockford base32 characters, and a
/// two-digit checksum.
pub const ROR_ID: &str = "^0[a-hj-km-np-tv-z0-9]{6}[0-9]{2}$";

/// Returns the `organization` shape.
#[must_use]
pub fn shape() -> Shape {
    Shape {
        kind: kinds::ORGANIZATION.to_owned(),
        label: "Organization".to_owned(),
        class: "Q43229".to_owned(),
        properties: vec![
            PropertyConstraint::attribute(
                slugs::ROR_ID,
                Cardinality::OptionalOne,
                ValueType::pattern(ROR_ID),
            ),
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
            PropertyConstraint::attribute(
                slugs::LOCATION,
                Cardinality::OptionalMany,
                ValueType::any_item(),
            ),
        ],
        ordered: Vec::new(),
    }
}
