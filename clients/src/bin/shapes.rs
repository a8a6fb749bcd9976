//! `hub-shapes`: exports the registered entity shapes.
//!
//! Prints (or writes) the shape registry as ShEx compact syntax or as the
//! JSON shape configuration layout.
//!
//! **Usage:**
//! ```text
//! hub-shapes [--config <shapes.toml>] [--format shexc|json] [--out <path>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hub_schema::serializer::{json, shexc};
use hub_schema::{SchemaRegistry, ShapeConfig};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Shexc,
    Json,
}

/// Export Resource Hub entity shapes.
#[derive(Parser)]
#[command(name = "hub-shapes", about = "Export Resource Hub entity shapes")]
struct Args {
    /// Shape configuration (TOML or JSON); built-in shapes when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "shexc")]
    format: Format,

    /// Output file; standard output when absent.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let registry = match &args.config {
        Some(path) => ShapeConfig::load(path)
            .and_then(ShapeConfig::into_registry)
            .with_context(|| format!("Failed to load shapes from {}", path.display()))?,
        None => SchemaRegistry::builtin().context("Failed to build built-in shapes")?,
    };

    let rendered = match args.format {
        Format::Shexc => shexc::to_shexc(&registry),
        Format::Json => serde_json::to_string_pretty(&json::to_json(&registry))
            .context("Failed to serialize shapes")?,
    };

    match &args.out {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} shapes to {}", registry.len(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
