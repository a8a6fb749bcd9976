//! Shared plumbing for the Resource Hub command-line clients.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use hub_resolver::{HubConfig, KnowledgeBase, MemoryKnowledgeBase, SparqlKnowledgeBase};
use hub_schema::{SchemaRegistry, Value};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Options shared by the clients that talk to a knowledge base.
#[derive(Debug, Args)]
pub struct HubArgs {
    /// Hub configuration file (TOML).
    #[arg(short, long, env = "HUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read entities from a Turtle dump instead of the SPARQL endpoint.
    #[arg(long)]
    pub turtle: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, env = "HUB_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, env = "HUB_LOG_JSON")]
    pub json_logs: bool,
}

/// Everything a client needs to validate or resolve.
pub struct Hub {
    /// Loaded configuration.
    pub config: HubConfig,
    /// Shape registry.
    pub registry: Arc<SchemaRegistry>,
    /// Knowledge base (SPARQL or Turtle-backed).
    pub kb: Arc<dyn KnowledgeBase>,
}

impl HubArgs {
    /// Initializes logging, then loads configuration, shapes, and the
    /// knowledge base.
    ///
    /// # Errors
    ///
    /// Returns an error if any of them cannot be loaded.
    pub fn open(&self) -> Result<Hub> {
        init_tracing(&self.log_level, self.json_logs);

        let config = HubConfig::load(self.config.as_deref()).with_context(|| {
            format!(
                "Failed to load configuration{}",
                self.config
                    .as_ref()
                    .map(|p| format!(" from {}", p.display()))
                    .unwrap_or_default()
            )
        })?;
        let registry = config
            .schema
            .registry()
            .context("Failed to load shapes")?;
        let vocabulary = registry.vocabulary().clone();

        let kb: Arc<dyn KnowledgeBase> = match &self.turtle {
            Some(path) => Arc::new(load_turtle(path, &registry)?),
            None => {
                info!(endpoint = %config.endpoint.url, "using SPARQL endpoint");
                Arc::new(
                    SparqlKnowledgeBase::new(&config.endpoint, vocabulary)
                        .context("Failed to build SPARQL client")?
                        .with_retry(config.resolver.retry.clone()),
                )
            }
        };

        Ok(Hub {
            config,
            registry: Arc::new(registry),
            kb,
        })
    }
}

fn load_turtle(path: &Path, registry: &SchemaRegistry) -> Result<MemoryKnowledgeBase> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let kb = MemoryKnowledgeBase::from_turtle(&src, registry.vocabulary())
        .with_context(|| format!("Failed to load {}", path.display()))?;
    info!(path = %path.display(), entities = kb.len(), "loaded Turtle dump");
    Ok(kb)
}

/// Installs the global subscriber: `RUST_LOG` wins, `level` otherwise.
/// An already installed subscriber is kept.
pub fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.to_owned().into());
    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(e) = result {
        tracing::debug!(%e, "subscriber already installed");
    }
}

/// Parses a command-line value: entity ids and `http(s)` IRIs become IRI
/// values, anything else a plain string.
#[must_use]
pub fn parse_value(raw: &str) -> Value {
    let id = hub_schema::EntityId::new(raw);
    if id.is_wikidata() || raw.starts_with("http://") || raw.starts_with("https://") {
        Value::iri(raw)
    } else {
        Value::string(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_can_be_initialized_twice() {
        init_tracing("debug", false);
        init_tracing("warn", true);
        tracing::info!("still logging");
    }

    #[test]
    fn values_from_the_command_line() {
        assert_eq!(parse_value("Q42"), Value::iri("Q42"));
        assert_eq!(parse_value("https://orcid.org/x"), Value::iri("https://orcid.org/x"));
        assert_eq!(parse_value("2121789"), Value::string("2121789"));
    }
}
