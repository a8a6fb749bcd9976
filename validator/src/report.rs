//! Validation report types: violations, per-entity reports, and batch summaries.

use std::fmt;

use hub_schema::EntityId;
use serde::{Deserialize, Serialize};

/// What kind of constraint a statement set broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// The property occurs too few or too many times.
    Cardinality,
    /// A value does not have the declared type.
    Type,
    /// An ordered relation occurrence has a missing or repeated ordinal.
    Ordinal,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Cardinality => f.write_str("cardinality"),
            ViolationKind::Type => f.write_str("type"),
            ViolationKind::Ordinal => f.write_str("ordinal"),
        }
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Property slug.
    pub property: String,
    /// Violation kind.
    pub kind: ViolationKind,
    /// What the shape requires.
    pub expected: String,
    /// What the entity has.
    pub actual: String,
    /// Human-readable explanation.
    pub message: String,
}

impl Violation {
    /// Creates a cardinality violation.
    pub fn cardinality(property: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        let property = property.into();
        let expected = expected.into();
        let message = format!(
            "property `{property}` occurs {actual} time(s), expected {expected}"
        );
        Self {
            property,
            kind: ViolationKind::Cardinality,
            expected,
            actual: actual.to_string(),
            message,
        }
    }

    /// Creates a type violation.
    pub fn value_type(
        property: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let property = property.into();
        let expected = expected.into();
        let actual = actual.into();
        let message = format!("property `{property}` has value {actual}, expected {expected}");
        Self {
            property,
            kind: ViolationKind::Type,
            expected,
            actual,
            message,
        }
    }
}

impl Violation {
    /// Creates an ordinal violation for one occurrence of an ordered
    /// relation; `ordinal` is `None` when the occurrence has none.
    pub fn ordinal(property: impl Into<String>, target: impl fmt::Display, ordinal: Option<i64>) -> Self {
        let property = property.into();
        let (actual, message) = match ordinal {
            Some(n) => (
                format!("{target} at {n}"),
                format!("property `{property}` repeats ordinal {n} at {target}"),
            ),
            None => (
                format!("{target} without ordinal"),
                format!("property `{property}` has no ordinal for {target}"),
            ),
        };
        Self {
            property,
            kind: ViolationKind::Ordinal,
            expected: "distinct series ordinal".to_owned(),
            actual,
            message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Result of validating one entity against its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Validated entity.
    pub entity: EntityId,
    /// Shape the entity was validated against.
    pub kind: String,
    /// Violations in shape declaration order, then occurrence order.
    pub violations: Vec<Violation>,
    /// Properties present on the entity but not declared by the shape.
    pub extras: Vec<String>,
    /// Other registered kinds the entity's `instance-of` statements claim.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_kinds: Vec<String>,
}

impl ValidationReport {
    /// Creates an empty (passing) report.
    pub fn new(entity: EntityId, kind: impl Into<String>) -> Self {
        Self {
            entity,
            kind: kind.into(),
            violations: Vec::new(),
            extras: Vec::new(),
            conflicting_kinds: Vec::new(),
        }
    }

    /// Returns true if there are no violations.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the violations on `property`.
    pub fn violations_for<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.property == property)
    }
}

/// Outcome of one entity in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// Validated with no violations.
    Pass {
        /// The report.
        report: ValidationReport,
    },
    /// Validated with violations.
    Fail {
        /// The report.
        report: ValidationReport,
    },
    /// Could not be validated (not found, unknown shape, upstream failure).
    Error {
        /// Entity that could not be validated.
        entity: EntityId,
        /// Explanation.
        message: String,
    },
}

impl Outcome {
    /// Wraps a report as pass or fail.
    #[must_use]
    pub fn from_report(report: ValidationReport) -> Self {
        if report.is_pass() {
            Outcome::Pass { report }
        } else {
            Outcome::Fail { report }
        }
    }

    /// Returns true unless this outcome passed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, Outcome::Pass { .. })
    }
}

/// Aggregated outcomes of a batch validation.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConformanceSummary {
    /// Outcomes in request order.
    pub outcomes: Vec<Outcome>,
}

impl ConformanceSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome.
    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Returns the number of outcomes that did not pass.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Returns true if every outcome passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_serialize_with_status_tag() {
        let mut report = ValidationReport::new(EntityId::new("Q1"), "grant");
        report
            .violations
            .push(Violation::value_type("award-id", "string matching /^[0-9]{7}$/", "\"12345\""));
        let json = serde_json::to_value(Outcome::from_report(report)).expect("serialize");
        assert_eq!(json["status"], "fail");
        assert_eq!(json["report"]["violations"][0]["kind"], "type");
        assert!(json["report"].get("conflicting_kinds").is_none());
    }

    #[test]
    fn empty_summary_passes() {
        let summary = ConformanceSummary::new();
        assert!(summary.all_passed());
        assert_eq!(summary.failure_count(), 0);
    }
}
