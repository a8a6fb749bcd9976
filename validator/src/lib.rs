//! Resource Hub validator.
//!
//! Checks an entity's statements against the shape registered for its kind
//! and produces a [`ValidationReport`]: cardinality and type violations,
//! undeclared ("extra") properties, and conflicting classifications.
//! Validation is pure; nothing here performs I/O.
//!
//! ```
//! use hub_schema::{vocab::slugs, Entity, SchemaRegistry, Value};
//! use hub_validator::Validator;
//!
//! let registry = SchemaRegistry::builtin().expect("built-in shapes");
//! let grant = Entity::new("Q1")
//!     .with_value(slugs::INSTANCE_OF, Value::iri("Q230788"))
//!     .with_value(slugs::AWARD_ID, Value::string("12345"))
//!     .with_value(slugs::FUNDER, Value::iri("Q304878"));
//! let report = Validator::new(&registry).validate("grant", &grant).expect("registered");
//! assert!(!report.is_pass());
//! assert_eq!(report.violations[0].property, "award-id");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod literal;
pub mod report;
pub mod validator;

pub use report::{ConformanceSummary, Outcome, ValidationReport, Violation, ViolationKind};
pub use validator::Validator;
