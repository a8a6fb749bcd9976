//! Hub configuration (`hub.toml`).
//!
//! ```toml
//! [endpoint]
//! url = "https://query.wikidata.org/sparql"
//! user_agent = "resource-hub/0.1 (ops@example.org)"
//! min_request_interval_ms = 1000
//!
//! [resolver]
//! default_depth = 1
//! max_depth = 4
//! max_concurrent_requests = 8
//!
//! [resolver.retry]
//! max_retries = 3
//! backoff_ms = 500
//!
//! [schema]
//! path = "shapes.toml"
//! ```
//!
//! Every field has a default; an absent file yields [`HubConfig::default`].

use std::path::{Path, PathBuf};

use hub_schema::{SchemaRegistry, ShapeConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::retry::RetryPolicy;

/// Default Wikidata Query Service endpoint.
pub const WIKIDATA_SPARQL: &str = "https://query.wikidata.org/sparql";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Knowledge-base endpoint.
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Traversal limits and retry behaviour.
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Where shapes come from.
    #[serde(default)]
    pub schema: SchemaSource,
}

impl HubConfig {
    /// Parses a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if `src` is not valid configuration.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        toml::from_str(src).map_err(|source| ConfigError::Toml {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Loads configuration from `path`, or returns the defaults when no
    /// path is given. A relative `schema.path` is resolved against the
    /// configuration file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&src).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        if let (Some(shapes), Some(dir)) = (config.schema.path.as_mut(), path.parent()) {
            if shapes.is_relative() {
                *shapes = dir.join(&*shapes);
            }
        }
        Ok(config)
    }
}

/// SPARQL endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// HTTP timeout per request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Minimum spacing between requests, in milliseconds.
    #[serde(default = "default_min_interval")]
    pub min_request_interval_ms: u64,
}

fn default_url() -> String {
    WIKIDATA_SPARQL.to_owned()
}

fn default_user_agent() -> String {
    format!(
        "resource-hub/{} (https://seekcommons.org/)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_request_timeout() -> u64 {
    30
}

fn default_min_interval() -> u64 {
    1_000
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            min_request_interval_ms: default_min_interval(),
        }
    }
}

/// Profile resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Depth used when a request does not name one.
    #[serde(default = "default_depth")]
    pub default_depth: usize,
    /// Largest depth a request may ask for.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Largest number of nodes a profile may hold.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    /// Fetches in flight at once within a traversal level.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    /// Budget for one knowledge-base call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Retry policy for knowledge-base calls.
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_depth() -> usize {
    1
}

fn default_max_depth() -> usize {
    4
}

fn default_max_nodes() -> usize {
    500
}

fn default_max_concurrent() -> usize {
    8
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
            max_depth: default_max_depth(),
            max_nodes: default_max_nodes(),
            max_concurrent_requests: default_max_concurrent(),
            request_timeout_secs: default_request_timeout(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Shape source: a configuration file, or the built-in shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSource {
    /// Shape configuration file (TOML or JSON).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SchemaSource {
    /// Builds the registry this source describes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Schema`] if the shape file cannot be loaded or
    /// registered.
    pub fn registry(&self) -> Result<SchemaRegistry, ConfigError> {
        let registry = match &self.path {
            Some(path) => ShapeConfig::load(path)?.into_registry()?,
            None => SchemaRegistry::builtin()?,
        };
        Ok(registry)
    }
}
