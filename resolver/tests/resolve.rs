//! End-to-end profile resolution over in-memory knowledge bases.

mod fixtures;

use std::collections::HashSet;
use std::sync::Arc;

use hub_resolver::{
    KnowledgeBase, MemoryKnowledgeBase, ProfileRequest, ProfileResolver, ResolveError,
    ResolverConfig, RetryPolicy,
};
use hub_schema::shapes::kinds;
use hub_schema::vocab::slugs;
use hub_schema::{Entity, EntityId, SchemaRegistry, Statement, Value, Vocabulary};
use hub_validator::ViolationKind;

fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::builtin().expect("built-in shapes"))
}

fn funding_registry() -> Arc<SchemaRegistry> {
    let mut builder = SchemaRegistry::builtin_builder().expect("built-in shapes");
    builder.extend_vocabulary(&funding_vocabulary());
    Arc::new(builder.build())
}

fn funding_vocabulary() -> Vocabulary {
    let mut vocab = Vocabulary::wikidata();
    vocab.insert(slugs::AWARD_ID, "P99001");
    vocab.insert(slugs::FUNDS, "P99002");
    vocab.insert(slugs::FUNDED_BY, "P99003");
    vocab
}

fn fast_config() -> ResolverConfig {
    ResolverConfig {
        retry: RetryPolicy {
            max_retries: 3,
            backoff_ms: 10,
            exponential_backoff: true,
            max_backoff_ms: 100,
        },
        ..ResolverConfig::default()
    }
}

fn curriculum_kb() -> Arc<MemoryKnowledgeBase> {
    let kb = MemoryKnowledgeBase::from_turtle(fixtures::CURRICULUM, &Vocabulary::wikidata())
        .expect("curriculum fixture parses");
    Arc::new(kb)
}

fn resolver(kb: Arc<MemoryKnowledgeBase>) -> ProfileResolver {
    ProfileResolver::new(registry(), kb, fast_config())
}

fn ids<'a>(it: impl Iterator<Item = &'a EntityId>) -> Vec<&'a str> {
    it.map(EntityId::as_str).collect()
}

#[tokio::test]
async fn curriculum_parts_follow_ordinals() {
    let profile = resolver(curriculum_kb())
        .resolve(&ProfileRequest::new("Q100"))
        .await
        .expect("resolved");

    assert_eq!(profile.root.kind.as_deref(), Some(kinds::CURRICULUM));
    assert!(profile.root.is_valid(), "{:?}", profile.root.report);
    assert_eq!(profile.root.entity.label.as_deref(), Some("Open Science Curriculum"));

    let parts = profile.relation(slugs::HAS_PART).expect("has-part list");
    assert_eq!(ids(parts.ids()), vec!["Q101", "Q102", "Q103"]);
    let ordinals: Vec<Option<i64>> = parts.entries.iter().map(|e| e.ordinal).collect();
    assert_eq!(ordinals, vec![Some(1), Some(2), Some(3)]);
    assert!(parts.entries.iter().all(|e| e.depth == 1 && e.from.as_str() == "Q100"));

    let authors = profile.relation(slugs::AUTHOR).expect("author list");
    assert_eq!(ids(authors.ids()), vec!["Q200"]);
    assert_eq!(authors.entries[0].node.kind.as_deref(), Some(kinds::ORGANIZATION));
    assert_eq!(profile.len(), 5);
}

#[tokio::test]
async fn resolution_is_idempotent() {
    let resolver = resolver(curriculum_kb());
    let request = ProfileRequest::new("Q100").with_depth(2);
    let first = resolver.resolve(&request).await.expect("first");
    let second = resolver.resolve(&request).await.expect("second");
    assert_eq!(first, second);
}

#[tokio::test]
async fn cycles_terminate_and_visit_each_id_once() {
    let profile = resolver(curriculum_kb())
        .resolve(&ProfileRequest::new("Q100").with_depth(4))
        .await
        .expect("resolved");

    let mut seen = HashSet::new();
    for node in profile.nodes() {
        assert!(seen.insert(node.id().clone()), "{} appears twice", node.id());
    }
    assert_eq!(seen.len(), 6);
    assert!(profile.relation(slugs::PART_OF).is_none(), "part-of only leads back to the root");

    let authors = profile.relation(slugs::AUTHOR).expect("author list");
    assert_eq!(ids(authors.ids()), vec!["Q200", "Q300"]);
    assert_eq!(authors.entries[1].depth, 2);
    assert_eq!(authors.entries[1].from.as_str(), "Q102");
}

#[tokio::test]
async fn unknown_root_is_not_found() {
    let err = resolver(curriculum_kb())
        .resolve(&ProfileRequest::new("Q999"))
        .await
        .expect_err("absent entity");
    assert!(matches!(err, ResolveError::EntityNotFound { id } if id.as_str() == "Q999"));
}

#[tokio::test]
async fn unregistered_root_kind_is_unknown_shape() {
    let kb = MemoryKnowledgeBase::new()
        .with(Entity::new("Q1").with_value(slugs::INSTANCE_OF, Value::iri("Q3305213")));
    let err = resolver(Arc::new(kb))
        .resolve(&ProfileRequest::new("Q1"))
        .await
        .expect_err("paintings have no shape");
    assert!(matches!(err, ResolveError::UnknownShape { .. }));
    assert!(err.to_string().contains("Q3305213"));
}

#[tokio::test]
async fn missing_neighbour_fails_the_whole_resolution() {
    let kb = MemoryKnowledgeBase::new().with(
        Entity::new("Q1")
            .with_value(slugs::INSTANCE_OF, Value::iri("Q1298668"))
            .with_value(slugs::START_TIME, Value::string("2024-01-01"))
            .with_value(slugs::FUNDER, Value::iri("Q404")),
    );
    let err = resolver(Arc::new(kb))
        .resolve(&ProfileRequest::new("Q1"))
        .await
        .expect_err("dangling funder");
    assert!(matches!(err, ResolveError::EntityNotFound { id } if id.as_str() == "Q404"));
}

#[tokio::test]
async fn unshaped_neighbours_are_leaves() {
    let kb = MemoryKnowledgeBase::new()
        .with(
            Entity::new("Q1")
                .with_value(slugs::INSTANCE_OF, Value::iri("Q7397"))
                .with_value(slugs::DEVELOPER, Value::iri("Q2")),
        )
        .with(
            Entity::new("Q2")
                .with_value(slugs::INSTANCE_OF, Value::iri("Q16887380"))
                .with_value(slugs::FUNDER, Value::iri("Q404")),
        );
    let profile = resolver(Arc::new(kb))
        .resolve(&ProfileRequest::new("Q1").with_depth(2))
        .await
        .expect("resolved");
    let developers = profile.relation(slugs::DEVELOPER).expect("developer list");
    let leaf = &developers.entries[0].node;
    assert_eq!(leaf.id().as_str(), "Q2");
    assert!(leaf.kind.is_none());
    assert!(leaf.report.is_none());
    assert_eq!(profile.len(), 2, "unshaped nodes are not traversed");
}

#[tokio::test]
async fn kind_filter_excludes_and_prunes() {
    let profile = resolver(curriculum_kb())
        .resolve(
            &ProfileRequest::new("Q100")
                .with_depth(2)
                .with_kinds([kinds::MODULE]),
        )
        .await
        .expect("resolved");
    assert!(profile.relation(slugs::AUTHOR).is_none());
    let parts = profile.relation(slugs::HAS_PART).expect("modules kept");
    assert_eq!(parts.entries.len(), 3);
    assert_eq!(profile.len(), 4);
}

#[tokio::test]
async fn child_ordinal_used_when_statement_has_none() {
    let class = |name: &str| Value::iri(format!("{}{name}", hub_schema::vocab::HUB_CLASS));
    let module = |id: &str, ordinal: Option<&str>| {
        let mut e = Entity::new(id)
            .with_value(slugs::INSTANCE_OF, class("Module"))
            .with_value(slugs::AUTHOR, Value::iri("Q9"));
        if let Some(o) = ordinal {
            e = e.with_value(slugs::SERIES_ORDINAL, Value::string(o));
        }
        e
    };
    let kb = MemoryKnowledgeBase::new()
        .with(
            Entity::new("Q1")
                .with_value(slugs::INSTANCE_OF, class("Curriculum"))
                .with_value(slugs::AUTHOR, Value::iri("Q9"))
                .with_value(slugs::HAS_PART, Value::iri("Q12"))
                .with_value(slugs::HAS_PART, Value::iri("Q14"))
                .with(Statement::new(slugs::HAS_PART, Value::iri("Q13")).with_ordinal(1))
                .with_value(slugs::HAS_PART, Value::iri("Q11")),
        )
        .with(module("Q11", Some("0")))
        .with(module("Q12", None))
        .with(module("Q13", Some("7")))
        .with(module("Q14", None))
        .with(Entity::new("Q9").with_value(slugs::INSTANCE_OF, Value::iri("Q5")));
    let profile = resolver(Arc::new(kb))
        .resolve(&ProfileRequest::new("Q1"))
        .await
        .expect("resolved");
    let parts = profile.relation(slugs::HAS_PART).expect("parts");
    assert_eq!(
        ids(parts.ids()),
        vec!["Q11", "Q13", "Q12", "Q14"],
        "qualifier beats the child's own ordinal; unordered parts keep source order at the end"
    );
}

fn hub_class(name: &str) -> Value {
    Value::iri(format!("{}{name}", hub_schema::vocab::HUB_CLASS))
}

#[tokio::test]
async fn relation_target_of_the_wrong_kind_is_a_type_violation() {
    let kb = MemoryKnowledgeBase::new()
        .with(
            Entity::new("Q1")
                .with_value(slugs::INSTANCE_OF, hub_class("Curriculum"))
                .with_value(slugs::AUTHOR, Value::iri("Q9"))
                .with(Statement::new(slugs::HAS_PART, Value::iri("Q9")).with_ordinal(1)),
        )
        .with(Entity::new("Q9").with_value(slugs::INSTANCE_OF, Value::iri("Q5")));
    let profile = resolver(Arc::new(kb))
        .resolve(&ProfileRequest::new("Q1"))
        .await
        .expect("resolved");

    assert!(!profile.root.is_valid());
    let report = profile.root.report.as_ref().expect("curriculum is shaped");
    let parts: Vec<_> = report.violations_for(slugs::HAS_PART).collect();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].kind, ViolationKind::Type);
    assert_eq!(parts[0].expected, "IRI of kind module");
    assert_eq!(parts[0].actual, "Q9 of kind person");
    assert_eq!(report.violations_for(slugs::AUTHOR).count(), 0);
}

#[tokio::test]
async fn funds_pointing_at_software_is_flagged_on_the_grant() {
    let kb = MemoryKnowledgeBase::new()
        .with(
            Entity::new("Q400")
                .with_value(slugs::INSTANCE_OF, Value::iri("Q230788"))
                .with_value(slugs::AWARD_ID, Value::string("2121789"))
                .with_value(slugs::FUNDER, Value::iri("Q200"))
                .with_value(slugs::FUNDS, Value::iri("Q700")),
        )
        .with(Entity::new("Q200").with_value(slugs::INSTANCE_OF, Value::iri("Q43229")))
        .with(Entity::new("Q700").with_value(slugs::INSTANCE_OF, Value::iri("Q7397")));
    let profile = resolver(Arc::new(kb))
        .resolve(&ProfileRequest::new("Q400"))
        .await
        .expect("resolved");

    let report = profile.root.report.as_ref().expect("grant is shaped");
    let funds: Vec<_> = report.violations_for(slugs::FUNDS).collect();
    assert_eq!(funds.len(), 1, "{:?}", report.violations);
    assert_eq!(funds[0].actual, "Q700 of kind software");
    assert_eq!(report.violations_for(slugs::FUNDER).count(), 0);
    let software = &profile.relation(slugs::FUNDS).expect("funds").entries[0].node;
    assert_eq!(software.kind.as_deref(), Some(kinds::SOFTWARE));
}

#[tokio::test]
async fn matching_relation_kinds_add_no_violations() {
    let profile = resolver(curriculum_kb())
        .resolve(&ProfileRequest::new("Q100").with_depth(4))
        .await
        .expect("resolved");
    for node in profile.nodes() {
        if let Some(report) = &node.report {
            assert!(
                report.violations.iter().all(|v| v.kind != ViolationKind::Type),
                "{}: {:?}",
                node.id(),
                report.violations
            );
        }
    }
}

#[tokio::test]
async fn repeated_curriculum_ordinal_invalidates_the_root() {
    let module = |id: &str| {
        Entity::new(id)
            .with_value(slugs::INSTANCE_OF, hub_class("Module"))
            .with_value(slugs::AUTHOR, Value::iri("Q9"))
    };
    let kb = MemoryKnowledgeBase::new()
        .with(
            Entity::new("Q1")
                .with_value(slugs::INSTANCE_OF, hub_class("Curriculum"))
                .with_value(slugs::AUTHOR, Value::iri("Q9"))
                .with(Statement::new(slugs::HAS_PART, Value::iri("Q2")).with_ordinal(1))
                .with(Statement::new(slugs::HAS_PART, Value::iri("Q3")).with_ordinal(1)),
        )
        .with(module("Q2"))
        .with(module("Q3"))
        .with(Entity::new("Q9").with_value(slugs::INSTANCE_OF, Value::iri("Q5")));
    let profile = resolver(Arc::new(kb))
        .resolve(&ProfileRequest::new("Q1"))
        .await
        .expect("resolved");

    let report = profile.root.report.as_ref().expect("curriculum is shaped");
    let found: Vec<_> = report
        .violations
        .iter()
        .map(|v| (v.kind, v.actual.as_str()))
        .collect();
    assert_eq!(found, vec![(ViolationKind::Ordinal, "Q3 at 1")]);
    let parts = profile.relation(slugs::HAS_PART).expect("parts");
    assert_eq!(ids(parts.ids()), vec!["Q2", "Q3"]);
}

#[tokio::test]
async fn depth_above_limit_is_rejected_before_fetching() {
    let kb = curriculum_kb();
    let resolver = ProfileResolver::new(
        registry(),
        kb.clone(),
        ResolverConfig {
            max_depth: 2,
            ..fast_config()
        },
    );
    let err = resolver
        .resolve(&ProfileRequest::new("Q100").with_depth(3))
        .await
        .expect_err("too deep");
    assert!(matches!(err, ResolveError::TraversalDepthExceeded { .. }));
    assert_eq!(kb.calls(), 0);
}

#[tokio::test]
async fn node_budget_is_enforced() {
    let resolver = ProfileResolver::new(
        registry(),
        curriculum_kb(),
        ResolverConfig {
            max_nodes: 3,
            ..fast_config()
        },
    );
    let err = resolver
        .resolve(&ProfileRequest::new("Q100"))
        .await
        .expect_err("five nodes at depth one");
    assert!(matches!(err, ResolveError::TraversalDepthExceeded { reason, .. } if reason.contains("max_nodes")));
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let kb = curriculum_kb();
    kb.fail_next(2);
    let profile = resolver(kb.clone())
        .resolve(&ProfileRequest::new("Q100"))
        .await
        .expect("recovered");
    assert_eq!(profile.len(), 5);
    assert_eq!(kb.calls(), 2 + 5);
}

#[tokio::test]
async fn exhausted_retries_surface_upstream() {
    let kb = curriculum_kb();
    kb.fail_next(100);
    let err = resolver(kb.clone())
        .resolve(&ProfileRequest::new("Q100"))
        .await
        .expect_err("never recovers");
    match err {
        ResolveError::Upstream {
            subject, attempts, ..
        } => {
            assert_eq!(attempts, 4);
            assert!(subject.contains("Q100"));
        }
        other => panic!("expected upstream error, got {other}"),
    }
    assert_eq!(kb.calls(), 4);
}

#[tokio::test]
async fn funding_graph_reports_bad_award_id() {
    let kb = MemoryKnowledgeBase::from_turtle(fixtures::FUNDING, &funding_vocabulary())
        .expect("funding fixture parses");
    let resolver = ProfileResolver::new(funding_registry(), Arc::new(kb), fast_config());
    let profile = resolver
        .resolve(&ProfileRequest::new("Q400").with_depth(2))
        .await
        .expect("resolved");

    let report = profile.root.report.as_ref().expect("grant is shaped");
    let award: Vec<_> = report.violations_for(slugs::AWARD_ID).collect();
    assert_eq!(award.len(), 1);
    assert_eq!(award[0].kind, ViolationKind::Type);

    assert_eq!(ids(profile.relation(slugs::FUNDS).expect("funds").ids()), vec!["Q500"]);
    assert_eq!(ids(profile.relation(slugs::HAS_PART).expect("outputs").ids()), vec!["Q600"]);
    assert!(profile.relation(slugs::FUNDED_BY).is_none(), "cycle back to the grant is cut");
    let project = &profile.relation(slugs::FUNDS).expect("funds").entries[0].node;
    assert!(project.is_valid(), "{:?}", project.report);
}

#[tokio::test]
async fn lookup_finds_entities_by_any_field() {
    let resolver = resolver(curriculum_kb());
    let modules = resolver
        .lookup(slugs::AUTHOR, &Value::iri("Q300"), Some(kinds::MODULE))
        .await
        .expect("lookup");
    assert_eq!(ids(modules.iter()), vec!["Q101", "Q102", "Q103"]);

    let none = resolver
        .lookup(slugs::AUTHOR, &Value::iri("Q300"), Some(kinds::CURRICULUM))
        .await
        .expect("lookup");
    assert!(none.is_empty());

    let err = resolver
        .lookup(slugs::AUTHOR, &Value::iri("Q300"), Some("spaceship"))
        .await
        .expect_err("unregistered kind");
    assert!(matches!(err, ResolveError::UnknownShape { .. }));
}

#[tokio::test]
async fn resolve_by_field_returns_one_profile_per_match() {
    let resolver = resolver(curriculum_kb());
    let profiles = resolver
        .resolve_by_field(
            slugs::ORCID,
            &Value::string("0000-0002-1825-0097"),
            None,
            Some(0),
        )
        .await
        .expect("resolved");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].root.id().as_str(), "Q300");
    assert_eq!(profiles[0].root.kind.as_deref(), Some(kinds::PERSON));
    assert!(profiles[0].relations.is_empty());
}

#[tokio::test]
async fn profiles_serialize_to_json() {
    let profile = resolver(curriculum_kb())
        .resolve(&ProfileRequest::new("Q100"))
        .await
        .expect("resolved");
    let json = serde_json::to_value(&profile).expect("serializable");
    assert_eq!(json["root"]["entity"]["id"], "Q100");
    assert_eq!(json["root"]["kind"], "curriculum");
    assert_eq!(json["relations"][1]["relation"], "has-part");
    assert_eq!(json["relations"][1]["entries"][0]["ordinal"], 1);
}

#[tokio::test]
async fn memory_kb_is_usable_as_a_trait_object() {
    let kb: Arc<dyn KnowledgeBase> = curriculum_kb();
    let entity = kb.fetch(&EntityId::new("Q101")).await.expect("fetch");
    assert_eq!(entity.and_then(|e| e.label).as_deref(), Some("What is open science?"));
}
