//! Schema registry errors.

use thiserror::Error;

/// Errors raised while building or querying a [`SchemaRegistry`](crate::SchemaRegistry).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No shape is registered for the kind (or no registered class matches
    /// an entity's `instance-of` statements).
    #[error("unknown shape `{kind}`: no shape is registered for this kind")]
    UnknownShape {
        /// The kind (or class list) that failed to resolve.
        kind: String,
    },

    /// A shape for the kind is already registered.
    #[error("duplicate shape `{kind}`: a shape for this kind is already registered")]
    DuplicateShape {
        /// The conflicting kind.
        kind: String,
    },

    /// A shape declares the same property more than once.
    #[error("shape `{kind}` declares property `{property}` more than once")]
    DuplicateProperty {
        /// Shape kind.
        kind: String,
        /// Property slug.
        property: String,
    },

    /// A pattern constraint does not compile.
    #[error("shape `{kind}` property `{property}` has an invalid pattern: {source}")]
    InvalidPattern {
        /// Shape kind.
        kind: String,
        /// Property slug.
        property: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The shape configuration could not be read or decoded.
    #[error("shape configuration {origin}: {message}")]
    Config {
        /// Where the configuration came from (path or `<inline>`).
        origin: String,
        /// Explanation.
        message: String,
    },
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
