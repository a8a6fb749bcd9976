//! SPARQL endpoint client (Wikidata Query Service by default).
//!
//! Every request carries an explicit user agent, as the Wikidata query
//! service requires, and asks for `application/sparql-results+json`.
//! Requests are spaced at least `min_request_interval_ms` apart.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hub_schema::vocab::slugs;
use hub_schema::{Entity, EntityId, Qualifier, Statement, Value, Vocabulary};
use reqwest::header::ACCEPT;
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::config::EndpointConfig;
use crate::error::{KbError, KbResult};
use crate::kb::KnowledgeBase;
use crate::query::{fetch_query, fetch_vars, Binding, GraphPattern, SparqlResults};
use crate::retry::RetryPolicy;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const BODY_SNIPPET: usize = 200;

/// A [`KnowledgeBase`] over a SPARQL 1.1 endpoint.
///
/// Trait calls make a single attempt; the resolver owns retries for
/// them. [`select`](Self::select) and [`column`](Self::column) retry on
/// their own with the configured [`RetryPolicy`].
#[derive(Debug)]
pub struct SparqlKnowledgeBase {
    client: Client,
    url: String,
    min_interval: Duration,
    timeout: Duration,
    vocabulary: Vocabulary,
    retry: RetryPolicy,
    last_request: Mutex<Option<Instant>>,
}

impl SparqlKnowledgeBase {
    /// Creates a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &EndpointConfig, vocabulary: Vocabulary) -> KbResult<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()
            .map_err(|source| KbError::Http {
                operation: "build HTTP client".to_owned(),
                source,
            })?;
        Ok(Self {
            client,
            url: config.url.clone(),
            min_interval: Duration::from_millis(config.min_request_interval_ms),
            timeout,
            vocabulary,
            retry: RetryPolicy::default(),
            last_request: Mutex::new(None),
        })
    }

    /// Replaces the retry policy used by [`select`](Self::select).
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// The endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Runs a raw SPARQL query and flattens every solution to
    /// `variable → string`.
    ///
    /// # Errors
    ///
    /// Returns the last [`KbError`] once the retry budget is spent.
    pub async fn select(&self, sparql: &str) -> KbResult<Vec<BTreeMap<String, String>>> {
        let results = self
            .retry
            .run("select", || self.execute("select", sparql))
            .await
            .map_err(|e| e.error)?;
        Ok(results.into_rows())
    }

    /// Runs a raw SPARQL query and returns the values of one variable.
    /// Solutions that leave `var` unbound are skipped.
    ///
    /// # Errors
    ///
    /// Returns the last [`KbError`] once the retry budget is spent.
    pub async fn column(&self, sparql: &str, var: &str) -> KbResult<Vec<String>> {
        let rows = self.select(sparql).await?;
        Ok(rows.into_iter().filter_map(|mut row| row.remove(var)).collect())
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    #[instrument(skip(self, sparql), fields(endpoint = %self.url))]
    async fn execute(&self, operation: &str, sparql: &str) -> KbResult<SparqlResults> {
        self.throttle().await;
        debug!(query_len = sparql.len(), "sending SPARQL query");
        let response = self
            .client
            .get(&self.url)
            .query(&[("query", sparql), ("format", "json")])
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(|source| self.transport_error(operation, source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| self.transport_error(operation, source))?;
        if !status.is_success() {
            return Err(KbError::Status {
                operation: operation.to_owned(),
                status: status.as_u16(),
                body: body.chars().take(BODY_SNIPPET).collect(),
            });
        }
        SparqlResults::from_json(operation, &body)
    }

    fn transport_error(&self, operation: &str, source: reqwest::Error) -> KbError {
        if source.is_timeout() {
            KbError::Timeout {
                operation: operation.to_owned(),
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            KbError::Http {
                operation: operation.to_owned(),
                source,
            }
        }
    }
}

/// Assembles an entity from the solutions of [`fetch_query`]. Returns
/// `None` when there are no solutions at all.
#[must_use]
pub fn entity_from_bindings(id: &EntityId, rows: &[Binding], vocabulary: &Vocabulary) -> Option<Entity> {
    if rows.is_empty() {
        return None;
    }
    let mut entity = Entity::new(id.clone());
    for row in rows {
        if let Some(label) = row.get(fetch_vars::LABEL) {
            entity.label.get_or_insert_with(|| label.lexical().to_owned());
            continue;
        }
        let (Some(property), Some(value)) = (
            row.get(fetch_vars::PROPERTY).and_then(Value::as_entity),
            row.get(fetch_vars::VALUE),
        ) else {
            continue;
        };
        let mut statement = Statement::new(vocabulary.slug_or_id(property.as_str()), value.clone());
        if let Some(ordinal) = row.get(fetch_vars::ORDINAL) {
            statement.qualifiers.push(Qualifier {
                property: slugs::SERIES_ORDINAL.to_owned(),
                value: ordinal.clone(),
            });
        }
        entity.statements.push(statement);
    }
    Some(entity)
}

#[async_trait]
impl KnowledgeBase for SparqlKnowledgeBase {
    async fn fetch(&self, id: &EntityId) -> KbResult<Option<Entity>> {
        let operation = format!("fetch {id}");
        let rows = self
            .execute(&operation, &fetch_query(id, &self.vocabulary))
            .await?
            .into_bindings();
        Ok(entity_from_bindings(id, &rows, &self.vocabulary))
    }

    async fn query(&self, pattern: &GraphPattern) -> KbResult<Vec<Binding>> {
        let sparql = pattern.to_sparql(&self.vocabulary)?;
        Ok(self.execute("query", &sparql).await?.into_bindings())
    }
}
