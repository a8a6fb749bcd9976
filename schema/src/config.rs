//! Declarative shape configuration.
//!
//! Shapes are normally loaded once at startup from a TOML (or JSON) file:
//!
//! ```toml
//! extends_builtin = false
//!
//! [properties]
//! award-id = "P99001"
//!
//! [[shape]]
//! kind = "grant"
//! label = "Grant"
//! class = "Q230788"
//!
//! [[shape.property]]
//! name = "award-id"
//! cardinality = "optional-one"
//! value = { type = "pattern", regex = "^[0-9]{7}$" }
//! ```
//!
//! `[properties]` maps property slugs to Wikidata property ids and is merged
//! over the built-in vocabulary. Shapes are registered in file order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::model::Shape;
use crate::registry::SchemaRegistry;
use crate::vocab::Vocabulary;

/// A parsed shape configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Start from the built-in shapes and register these after them.
    #[serde(default)]
    pub extends_builtin: bool,
    /// Slug → Wikidata property id overrides and additions.
    #[serde(default)]
    pub properties: Vocabulary,
    /// Shapes in registration order.
    #[serde(rename = "shape", default)]
    pub shapes: Vec<Shape>,
}

impl ShapeConfig {
    /// Parses a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Config`] if the text is not a valid shape
    /// configuration.
    pub fn from_toml_str(src: &str) -> SchemaResult<Self> {
        toml::from_str(src).map_err(|e| SchemaError::Config {
            origin: "<inline>".to_owned(),
            message: e.to_string(),
        })
    }

    /// Parses a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Config`] if the text is not a valid shape
    /// configuration.
    pub fn from_json_str(src: &str) -> SchemaResult<Self> {
        serde_json::from_str(src).map_err(|e| SchemaError::Config {
            origin: "<inline>".to_owned(),
            message: e.to_string(),
        })
    }

    /// Reads a configuration file; `.json` files are parsed as JSON,
    /// everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let origin = path.display().to_string();
        let src = std::fs::read_to_string(path).map_err(|e| SchemaError::Config {
            origin: origin.clone(),
            message: e.to_string(),
        })?;
        let parsed = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&src)
        } else {
            Self::from_toml_str(&src)
        };
        parsed.map_err(|e| match e {
            SchemaError::Config { message, .. } => SchemaError::Config { origin, message },
            other => other,
        })
    }

    /// Builds the registry described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns the first registration error (duplicate kind, invalid
    /// pattern).
    pub fn into_registry(self) -> SchemaResult<SchemaRegistry> {
        let mut builder = if self.extends_builtin {
            SchemaRegistry::builtin_builder()?
        } else {
            SchemaRegistry::builder(Vocabulary::wikidata())
        };
        builder.extend_vocabulary(&self.properties);
        for shape in self.shapes {
            builder.register(shape)?;
        }
        Ok(builder.build())
    }
}
