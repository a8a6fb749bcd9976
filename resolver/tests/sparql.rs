//! SPARQL client behaviour against a mock endpoint.

use std::sync::Arc;

use hub_resolver::{
    EndpointConfig, KbError, KnowledgeBase, ProfileRequest, ProfileResolver, ResolverConfig,
    RetryPolicy, SparqlKnowledgeBase,
};
use hub_schema::vocab::slugs;
use hub_schema::{EntityId, SchemaRegistry, Vocabulary};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS: &str = "application/sparql-results+json";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("hub_resolver=debug")
        .with_test_writer()
        .try_init();
}

fn endpoint(server: &MockServer) -> EndpointConfig {
    EndpointConfig {
        url: format!("{}/sparql", server.uri()),
        user_agent: "hub-tests/0.1 (tests@example.org)".to_owned(),
        request_timeout_secs: 5,
        min_request_interval_ms: 0,
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        backoff_ms: 5,
        exponential_backoff: false,
        max_backoff_ms: 5,
    }
}

const FETCH_Q600: &str = r#"{
  "head": { "vars": ["property", "value", "ordinal", "label"] },
  "results": { "bindings": [
    { "property": { "type": "uri", "value": "http://www.wikidata.org/entity/P31" },
      "value": { "type": "uri", "value": "http://www.wikidata.org/entity/Q732557" } },
    { "property": { "type": "uri", "value": "http://www.wikidata.org/entity/P953" },
      "value": { "type": "uri", "value": "https://example.org/case-study.pdf" } },
    { "label": { "type": "literal", "value": "Microscopy case study", "xml:lang": "en" } }
  ] }
}"#;

const EMPTY: &str = r#"{ "head": { "vars": ["property", "value", "ordinal", "label"] },
  "results": { "bindings": [] } }"#;

const CASE_STUDIES: &str = r#"{
  "head": { "vars": ["item", "itemLabel"] },
  "results": { "bindings": [
    { "item": { "type": "uri", "value": "http://www.wikidata.org/entity/Q600" },
      "itemLabel": { "type": "literal", "value": "Microscopy case study", "xml:lang": "en" } },
    { "item": { "type": "uri", "value": "http://www.wikidata.org/entity/Q601" } }
  ] }
}"#;

#[tokio::test]
async fn fetch_sends_user_agent_and_decodes_statements() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .and(header("accept", RESULTS))
        .and(header("user-agent", "hub-tests/0.1 (tests@example.org)"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FETCH_Q600, RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let kb = SparqlKnowledgeBase::new(&endpoint(&server), Vocabulary::wikidata()).expect("client");
    let entity = kb
        .fetch(&EntityId::new("Q600"))
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(entity.label.as_deref(), Some("Microscopy case study"));
    assert_eq!(entity.classes().collect::<Vec<_>>(), vec!["Q732557"]);
    assert_eq!(entity.statements_for(slugs::FULL_WORK_URL).count(), 1);
}

#[tokio::test]
async fn empty_results_mean_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(EMPTY, RESULTS))
        .mount(&server)
        .await;
    let kb = SparqlKnowledgeBase::new(&endpoint(&server), Vocabulary::wikidata()).expect("client");
    assert!(kb.fetch(&EntityId::new("Q1")).await.expect("fetch").is_none());
}

#[tokio::test]
async fn select_flattens_rows_and_retries_throttling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CASE_STUDIES, RESULTS))
        .mount(&server)
        .await;

    let kb = SparqlKnowledgeBase::new(&endpoint(&server), Vocabulary::wikidata())
        .expect("client")
        .with_retry(fast_retry());
    let query = "SELECT ?item ?itemLabel WHERE { ?item wdt:P31 wd:Q155207 . }";
    let rows = kb.select(query).await.expect("second attempt succeeds");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["itemLabel"], "Microscopy case study");
    assert!(!rows[1].contains_key("itemLabel"));

    let labels = kb.column(query, "itemLabel").await.expect("column");
    assert_eq!(labels, vec!["Microscopy case study".to_owned()]);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("MalformedQueryException"))
        .expect(1)
        .mount(&server)
        .await;
    let kb = SparqlKnowledgeBase::new(&endpoint(&server), Vocabulary::wikidata())
        .expect("client")
        .with_retry(fast_retry());
    let err = kb.select("SELECT").await.expect_err("bad query");
    assert!(matches!(err, KbError::Status { status: 400, ref body, .. } if body.contains("Malformed")));
}

#[tokio::test]
async fn resolver_retries_server_errors_over_sparql() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FETCH_Q600, RESULTS))
        .mount(&server)
        .await;

    let kb = SparqlKnowledgeBase::new(&endpoint(&server), Vocabulary::wikidata()).expect("client");
    let resolver = ProfileResolver::new(
        Arc::new(SchemaRegistry::builtin().expect("built-in shapes")),
        Arc::new(kb),
        ResolverConfig {
            retry: fast_retry(),
            ..ResolverConfig::default()
        },
    );
    let profile = resolver
        .resolve(&ProfileRequest::new("Q600"))
        .await
        .expect("third attempt succeeds");
    assert_eq!(profile.root.kind.as_deref(), Some("publication"));
    assert!(profile.root.is_valid());
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    let kb = SparqlKnowledgeBase::new(&endpoint(&server), Vocabulary::wikidata()).expect("client");
    let err = kb.fetch(&EntityId::new("Q1")).await.expect_err("not JSON");
    assert!(matches!(err, KbError::Decode { .. }));
}
