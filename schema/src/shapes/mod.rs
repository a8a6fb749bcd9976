//! Built-in entity shapes, one module per kind.
//!
//! Each module exposes a `shape()` function returning the kind's [`Shape`].
//! [`all()`] assembles them in registration order; that order is also the
//! precedence order used when an entity carries more than one registered
//! `instance-of` class.

pub mod artifact;
pub mod curriculum;
pub mod grant;
pub mod hardware;
pub mod module;
pub mod organization;
pub mod person;
pub mod publication;
pub mod research_project;
pub mod software;

use crate::model::Shape;

/// Kind names of the built-in shapes.
pub mod kinds {
    /// An ordered course of modules.
    pub const CURRICULUM: &str = "curriculum";
    /// One unit of a curriculum.
    pub const MODULE: &str = "module";
    /// A funded research effort.
    pub const RESEARCH_PROJECT: &str = "research-project";
    /// A funding award.
    pub const GRANT: &str = "grant";
    /// An institution or funder.
    pub const ORGANIZATION: &str = "organization";
    /// A software package.
    pub const SOFTWARE: &str = "software";
    /// A hardware device.
    pub const HARDWARE: &str = "hardware";
    /// A cultural or research artifact.
    pub const ARTIFACT: &str = "artifact";
    /// A publication or case study.
    pub const PUBLICATION: &str = "publication";
    /// A researcher.
    pub const PERSON: &str = "person";
}

/// Returns every built-in shape in registration order.
#[must_use]
pub fn all() -> Vec<Shape> {
    vec![
        curriculum::shape(),
        module::shape(),
        research_project::shape(),
        grant::shape(),
        organization::shape(),
        software::shape(),
        hardware::shape(),
        artifact::shape(),
        publication::shape(),
        person::shape(),
    ]
}
