//! `hub-profile`: resolves entity profiles and prints them as JSON.
//!
//! Either resolves one id, or looks entities up by a field value and
//! resolves every match.
//!
//! **Usage:**
//! ```text
//! hub-profile [--config <hub.toml>] [--turtle <dump.ttl>] <ID> [--depth N] [--kind K]...
//! hub-profile [--config <hub.toml>] --field <slug> --value <v> [--of-kind K] [--depth N]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use hub_clients::{parse_value, HubArgs};
use hub_resolver::{ProfileRequest, ProfileResolver};
use hub_schema::EntityId;

/// Resolve Resource Hub profiles.
#[derive(Parser)]
#[command(name = "hub-profile", about = "Resolve Resource Hub entity profiles")]
struct Args {
    #[command(flatten)]
    hub: HubArgs,

    /// Entity id to resolve.
    #[arg(conflicts_with_all = ["field", "value"])]
    id: Option<String>,

    /// Traversal depth (configured default when absent).
    #[arg(long)]
    depth: Option<usize>,

    /// Only include related entities of these kinds.
    #[arg(long = "kind")]
    kinds: Vec<String>,

    /// Property slug to look entities up by.
    #[arg(long, requires = "value")]
    field: Option<String>,

    /// Value the looked-up property must have.
    #[arg(long, requires = "field")]
    value: Option<String>,

    /// Restrict the lookup to entities of this kind.
    #[arg(long, requires = "field")]
    of_kind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let hub = args.hub.open()?;
    let resolver = ProfileResolver::new(hub.registry, hub.kb, hub.config.resolver);

    let out = match (&args.id, &args.field, &args.value) {
        (Some(id), _, _) => {
            let mut request = ProfileRequest::new(EntityId::new(id));
            request.depth = args.depth;
            if !args.kinds.is_empty() {
                request.kinds = Some(args.kinds.clone());
            }
            let profile = resolver
                .resolve(&request)
                .await
                .with_context(|| format!("Failed to resolve {id}"))?;
            serde_json::to_string_pretty(&profile)
        }
        (None, Some(field), Some(value)) => {
            let profiles = resolver
                .resolve_by_field(field, &parse_value(value), args.of_kind.as_deref(), args.depth)
                .await
                .with_context(|| format!("Failed to resolve entities with {field} = {value}"))?;
            serde_json::to_string_pretty(&profiles)
        }
        _ => bail!("Give an entity id, or --field with --value"),
    }
    .context("Failed to serialize profile")?;

    println!("{out}");
    Ok(())
}
