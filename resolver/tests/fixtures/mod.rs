//! Turtle fixtures: small Wikidata-shaped subgraphs.
//!
//! Each constant holds a Turtle 1.1 document written with the Wikidata
//! `wd:`/`wdt:`/`p:`/`ps:`/`pq:` namespaces, loaded through
//! `MemoryKnowledgeBase::from_turtle`.

#![allow(dead_code)]

mod curriculum;
mod funding;

pub use curriculum::CURRICULUM;
pub use funding::FUNDING;
