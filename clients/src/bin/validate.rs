//! `hub-validate`: validates knowledge-base entities against their shapes.
//!
//! Each id is fetched, classified by its `instance-of` statements, and
//! validated. Exits non-zero if any entity fails or cannot be validated.
//!
//! **Usage:**
//! ```text
//! hub-validate [--config <hub.toml>] [--turtle <dump.ttl>] [--json] <ID>...
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use hub_clients::HubArgs;
use hub_resolver::{ProfileRequest, ProfileResolver};
use hub_schema::EntityId;
use hub_validator::{ConformanceSummary, Outcome};

/// Validate Resource Hub entities.
#[derive(Parser)]
#[command(name = "hub-validate", about = "Validate Resource Hub entities against their shapes")]
struct Args {
    #[command(flatten)]
    hub: HubArgs,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,

    /// Entity ids (Q-ids or Wikidata URLs).
    #[arg(required = true)]
    ids: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let hub = args.hub.open()?;
    let resolver = ProfileResolver::new(hub.registry, hub.kb, hub.config.resolver);

    let mut summary = ConformanceSummary::new();
    for raw in &args.ids {
        let id = EntityId::new(raw);
        let outcome = match resolver.resolve(&ProfileRequest::new(id.clone()).with_depth(0)).await {
            Ok(profile) => match profile.root.report {
                Some(report) => Outcome::from_report(report),
                None => Outcome::Error {
                    entity: id,
                    message: "entity has no shape".to_owned(),
                },
            },
            Err(e) => Outcome::Error {
                entity: id,
                message: e.to_string(),
            },
        };
        summary.push(outcome);
    }

    if args.json {
        let out = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{out}");
    } else {
        print_summary(&summary);
    }

    let failed = summary.failure_count();
    if failed > 0 {
        eprintln!("Validation FAILED: {failed} entit(y/ies) did not pass.");
        process::exit(1);
    }
    Ok(())
}

fn print_summary(summary: &ConformanceSummary) {
    println!("Resource Hub Validation Report");
    println!("==============================");
    println!();
    for outcome in &summary.outcomes {
        match outcome {
            Outcome::Pass { report } => {
                println!("[PASS] {} ({})", report.entity, report.kind);
            }
            Outcome::Fail { report } => {
                println!("[FAIL] {} ({})", report.entity, report.kind);
                for violation in &report.violations {
                    println!("       {violation}");
                }
            }
            Outcome::Error { entity, message } => {
                println!("[ERROR] {entity}: {message}");
            }
        }
        if let Outcome::Pass { report } | Outcome::Fail { report } = outcome {
            if !report.extras.is_empty() {
                println!("       extra properties: {}", report.extras.join(", "));
            }
            if !report.conflicting_kinds.is_empty() {
                println!(
                    "       also classified as: {}",
                    report.conflicting_kinds.join(", ")
                );
            }
        }
    }
    println!();
    println!(
        "Summary: {} checked, {} failed",
        summary.outcomes.len(),
        summary.failure_count()
    );
}
