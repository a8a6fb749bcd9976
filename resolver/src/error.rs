//! Knowledge-base, resolution, and configuration errors.

use std::path::PathBuf;

use hub_schema::{EntityId, SchemaError};
use thiserror::Error;

/// Failures of a single knowledge-base call.
///
/// "Not found" is not an error: [`KnowledgeBase::fetch`](crate::KnowledgeBase::fetch)
/// returns `Ok(None)` for absent entities.
#[derive(Debug, Error)]
pub enum KbError {
    /// The call did not complete within the per-call timeout.
    #[error("{operation}: timed out after {after_ms} ms")]
    Timeout {
        /// What was being attempted.
        operation: String,
        /// Elapsed budget in milliseconds.
        after_ms: u64,
    },

    /// Transport-level failure (connection refused, TLS, ...).
    #[error("{operation}: HTTP transport error: {source}")]
    Http {
        /// What was being attempted.
        operation: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("{operation}: endpoint returned HTTP {status}: {body}")]
    Status {
        /// What was being attempted.
        operation: String,
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The response could not be decoded.
    #[error("{operation}: undecodable response: {message}")]
    Decode {
        /// What was being attempted.
        operation: String,
        /// Explanation.
        message: String,
    },

    /// An RDF document could not be parsed.
    #[error("{origin}: RDF parse error: {message}")]
    Parse {
        /// Document origin.
        origin: String,
        /// Explanation.
        message: String,
    },

    /// A query names a property slug with no Wikidata property id.
    #[error("property `{property}` has no Wikidata property id in the vocabulary")]
    UnmappedProperty {
        /// Offending slug.
        property: String,
    },
}

impl KbError {
    /// Returns true if repeating the call may succeed: timeouts,
    /// connection failures, HTTP 429 and 5xx.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            KbError::Timeout { .. } => true,
            KbError::Http { source, .. } => {
                source.is_connect() || source.is_timeout() || source.is_request()
            }
            KbError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            KbError::Decode { .. } | KbError::Parse { .. } | KbError::UnmappedProperty { .. } => {
                false
            }
        }
    }
}

/// Failures of a profile resolution or lookup. Any error discards the
/// partial profile.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The knowledge base has no entity with this id.
    #[error("entity not found: {id} does not exist in the knowledge base")]
    EntityNotFound {
        /// Missing entity.
        id: EntityId,
    },

    /// The entity's kind (or the requested kind) has no registered shape.
    #[error("cannot resolve {subject}: {source}")]
    UnknownShape {
        /// Entity id or kind name.
        subject: String,
        /// Registry error.
        #[source]
        source: SchemaError,
    },

    /// The knowledge base kept failing after the retry budget was spent, or
    /// failed with a non-retryable error.
    #[error("upstream failure for {subject} after {attempts} attempt(s): {source}")]
    Upstream {
        /// Entity id or query being fetched.
        subject: String,
        /// Attempts made.
        attempts: u32,
        /// Last error.
        #[source]
        source: KbError,
    },

    /// The traversal would exceed a configured limit.
    #[error("traversal from {id} exceeded its limit: {reason}")]
    TraversalDepthExceeded {
        /// Root of the traversal.
        id: EntityId,
        /// Which limit, and by how much.
        reason: String,
    },
}

/// Failures loading a hub configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Configuration path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("invalid configuration in {}: {source}", path.display())]
    Toml {
        /// Configuration path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: toml::de::Error,
    },

    /// The shape configuration it points to could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result alias for knowledge-base calls.
pub type KbResult<T> = Result<T, KbError>;

/// Result alias for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
