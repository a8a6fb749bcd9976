//! Shape validation of fetched entities.
//!
//! Validation is structural and local: each declared property is counted
//! against its cardinality and each occurrence is checked against its value
//! type. Occurrences of ordered relations must carry distinct ordinals.
//! Item-typed values are checked for IRI form only; whether the referenced
//! entity really is of the expected kind is the resolver's concern, since
//! it requires fetching the target.

use std::collections::HashSet;

use hub_schema::vocab::slugs;
use hub_schema::{
    Entity, PropertyConstraint, SchemaRegistry, SchemaResult, Shape, Value, ValueType,
};

use crate::literal;
use crate::report::{ConformanceSummary, Outcome, ValidationReport, Violation};

/// Validates entities against the shapes of a registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Validator<'r> {
    /// Creates a validator over `registry`.
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates `entity` against the shape registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownShape`](hub_schema::SchemaError::UnknownShape)
    /// if `kind` is not registered. Constraint violations are not errors;
    /// they are reported in the returned [`ValidationReport`].
    pub fn validate(&self, kind: &str, entity: &Entity) -> SchemaResult<ValidationReport> {
        let shape = self.registry.lookup(kind)?;
        Ok(self.check(shape, entity))
    }

    /// Classifies `entity` by its `instance-of` statements and validates it
    /// against the authoritative shape. Other matching kinds are recorded
    /// in [`ValidationReport::conflicting_kinds`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownShape`](hub_schema::SchemaError::UnknownShape)
    /// if none of the entity's classes is registered.
    pub fn validate_entity(&self, entity: &Entity) -> SchemaResult<ValidationReport> {
        let classification = self.registry.classify(entity)?;
        let mut report = self.check(classification.shape, entity);
        report.conflicting_kinds = classification.conflicting;
        Ok(report)
    }

    /// Validates a batch of entities, classifying each one.
    pub fn validate_all<'e>(&self, entities: impl IntoIterator<Item = &'e Entity>) -> ConformanceSummary {
        let mut summary = ConformanceSummary::new();
        for entity in entities {
            let outcome = match self.validate_entity(entity) {
                Ok(report) => Outcome::from_report(report),
                Err(e) => Outcome::Error {
                    entity: entity.id.clone(),
                    message: e.to_string(),
                },
            };
            summary.push(outcome);
        }
        summary
    }

    fn check(&self, shape: &Shape, entity: &Entity) -> ValidationReport {
        let mut report = ValidationReport::new(entity.id.clone(), shape.kind.clone());

        for constraint in &shape.properties {
            let values: Vec<&Value> = entity
                .statements_for(&constraint.property)
                .map(|s| &s.value)
                .collect();

            if !constraint.cardinality.admits(values.len()) {
                report.violations.push(Violation::cardinality(
                    &constraint.property,
                    constraint.cardinality.to_string(),
                    values.len(),
                ));
            }

            for value in values {
                if !self.admits(&shape.kind, constraint, value) {
                    report.violations.push(Violation::value_type(
                        &constraint.property,
                        constraint.value.to_string(),
                        value.to_string(),
                    ));
                }
            }
        }

        for property in &shape.ordered {
            check_ordinals(property, entity, &mut report);
        }

        let mut seen = HashSet::new();
        for statement in &entity.statements {
            let property = statement.property.as_str();
            if property == slugs::INSTANCE_OF || shape.declares(property) {
                continue;
            }
            if seen.insert(property) {
                report.extras.push(property.to_owned());
            }
        }

        report
    }

    fn admits(&self, kind: &str, constraint: &PropertyConstraint, value: &Value) -> bool {
        match (&constraint.value, value) {
            (ValueType::Item { .. }, Value::Iri { .. }) => true,
            (ValueType::Item { .. }, Value::Literal { .. }) => false,
            (ValueType::Url, Value::Iri { iri }) => literal::is_http_url(iri),
            (ValueType::Url, Value::Literal { lexical, .. }) => literal::is_http_url(lexical),
            (_, Value::Iri { .. }) => false,
            (ValueType::String, Value::Literal { datatype, .. }) => {
                literal::is_string_datatype(datatype.as_deref())
            }
            (ValueType::MonolingualText, Value::Literal { lang, .. }) => {
                lang.as_deref().is_some_and(|l| !l.is_empty())
            }
            (ValueType::Date, Value::Literal { lexical, .. }) => literal::is_date(lexical),
            (ValueType::Decimal, Value::Literal { lexical, .. }) => literal::is_decimal(lexical),
            (ValueType::Integer, Value::Literal { lexical, .. }) => literal::is_integer(lexical),
            (ValueType::Pattern { .. }, Value::Literal { lexical, .. }) => self
                .registry
                .pattern(kind, &constraint.property)
                .is_some_and(|re| re.is_match(lexical)),
        }
    }
}

/// Every occurrence of an ordered relation needs an ordinal no other
/// occurrence uses.
fn check_ordinals(property: &str, entity: &Entity, report: &mut ValidationReport) {
    let mut used = HashSet::new();
    for statement in entity.statements_for(property) {
        let ordinal = statement.ordinal();
        if ordinal.map_or(true, |n| !used.insert(n)) {
            let target = statement
                .value
                .as_entity()
                .map_or_else(|| statement.value.to_string(), |id| id.to_string());
            report
                .violations
                .push(Violation::ordinal(property, target, ordinal));
        }
    }
}
