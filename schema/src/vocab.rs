//! Property vocabulary: slugs used by shapes and their Wikidata property ids.
//!
//! Shapes and statements name properties by slug (`author`, `has-part`).
//! The [`Vocabulary`] translates slugs to and from the Wikidata property
//! ids the query layer speaks (`P50`, `P527`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wikidata entity namespace.
pub const WD: &str = "http://www.wikidata.org/entity/";
/// Wikidata truthy-statement (direct property) namespace.
pub const WDT: &str = "http://www.wikidata.org/prop/direct/";
/// Wikidata statement-node namespace.
pub const P: &str = "http://www.wikidata.org/prop/";
/// Wikidata statement-value namespace.
pub const PS: &str = "http://www.wikidata.org/prop/statement/";
/// Wikidata qualifier namespace.
pub const PQ: &str = "http://www.wikidata.org/prop/qualifier/";
/// Wikidata page URL prefix.
pub const WIKI_PAGE: &str = "https://www.wikidata.org/wiki/";
/// RDFS namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XSD namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// `xsd:string`.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// `xsd:dateTime`.
pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
/// `xsd:date`.
pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
/// `xsd:decimal`.
pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
/// `xsd:integer`.
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
/// Namespace for hub classes that have no established Wikidata item.
pub const HUB_CLASS: &str = "https://w3id.org/resource-hub/class/";
/// `rdfs:label`.
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Prefixes under which a Wikidata entity id may be written.
pub const ENTITY_PREFIXES: &[&str] = &[
    WD,
    "https://www.wikidata.org/entity/",
    WIKI_PAGE,
    "https://wikidata.org/wiki/",
    "http://www.wikidata.org/wiki/",
    "wd:",
];

/// Property slugs shared by the built-in shapes.
pub mod slugs {
    /// Classification statement; never reported as an extra.
    pub const INSTANCE_OF: &str = "instance-of";
    /// Position within an ordered relation.
    pub const SERIES_ORDINAL: &str = "series-ordinal";
    /// Author of a work.
    pub const AUTHOR: &str = "author";
    /// Whole-to-part relation.
    pub const HAS_PART: &str = "has-part";
    /// Part-to-whole relation.
    pub const PART_OF: &str = "part-of";
    /// Publication date.
    pub const PUBLICATION_DATE: &str = "publication-date";
    /// Cited work.
    pub const CITES_WORK: &str = "cites-work";
    /// Start of an interval.
    pub const START_TIME: &str = "start-time";
    /// End of an interval.
    pub const END_TIME: &str = "end-time";
    /// Official website.
    pub const OFFICIAL_WEBSITE: &str = "official-website";
    /// Page describing the subject.
    pub const DESCRIBED_AT_URL: &str = "described-at-url";
    /// Funding body.
    pub const FUNDER: &str = "funder";
    /// Grant that funds a project.
    pub const FUNDED_BY: &str = "funded-by";
    /// Project funded by a grant.
    pub const FUNDS: &str = "funds";
    /// Award identifier (e.g. NSF award number).
    pub const AWARD_ID: &str = "award-id";
    /// Principal investigator.
    pub const PRINCIPAL_INVESTIGATOR: &str = "principal-investigator";
    /// Main subject.
    pub const MAIN_SUBJECT: &str = "main-subject";
    /// Title of a work.
    pub const TITLE: &str = "title";
    /// Budget.
    pub const BUDGET: &str = "budget";
    /// Research Organization Registry id.
    pub const ROR_ID: &str = "ror-id";
    /// Location.
    pub const LOCATION: &str = "location";
    /// Software developer.
    pub const DEVELOPER: &str = "developer";
    /// Programming language.
    pub const PROGRAMMING_LANGUAGE: &str = "programming-language";
    /// Source code repository URL.
    pub const SOURCE_CODE_REPOSITORY: &str = "source-code-repository";
    /// Copyright license.
    pub const LICENSE: &str = "license";
    /// Software version identifier.
    pub const SOFTWARE_VERSION: &str = "software-version";
    /// Predecessor in a series.
    pub const FOLLOWS: &str = "follows";
    /// Successor in a series.
    pub const FOLLOWED_BY: &str = "followed-by";
    /// Hardware manufacturer.
    pub const MANUFACTURER: &str = "manufacturer";
    /// Inception date.
    pub const INCEPTION: &str = "inception";
    /// Compatibility relation.
    pub const COMPATIBLE_WITH: &str = "compatible-with";
    /// Creator of an artifact.
    pub const CREATOR: &str = "creator";
    /// Genre.
    pub const GENRE: &str = "genre";
    /// Collection membership.
    pub const COLLECTION: &str = "collection";
    /// URL of the full work.
    pub const FULL_WORK_URL: &str = "full-work-url";
    /// Venue a work is published in.
    pub const PUBLISHED_IN: &str = "published-in";
    /// Copyright status.
    pub const COPYRIGHT_STATUS: &str = "copyright-status";
    /// Organizational affiliation.
    pub const AFFILIATED_WITH: &str = "affiliated-with";
    /// Employer.
    pub const EMPLOYER: &str = "employer";
    /// Field of work.
    pub const FIELD_OF_WORK: &str = "field-of-work";
    /// ORCID iD.
    pub const ORCID: &str = "orcid";
}

/// Default slug → Wikidata property id table.
///
/// `award-id`, `principal-investigator`, `funded-by` and `funds` have no
/// settled Wikidata property and are left for deployments to map in
/// configuration.
pub const DEFAULT_PROPERTIES: &[(&str, &str)] = &[
    (slugs::INSTANCE_OF, "P31"),
    (slugs::AUTHOR, "P50"),
    (slugs::HAS_PART, "P527"),
    (slugs::PART_OF, "P361"),
    (slugs::SERIES_ORDINAL, "P1545"),
    (slugs::PUBLICATION_DATE, "P577"),
    (slugs::CITES_WORK, "P2860"),
    (slugs::START_TIME, "P580"),
    (slugs::END_TIME, "P582"),
    (slugs::OFFICIAL_WEBSITE, "P856"),
    (slugs::DESCRIBED_AT_URL, "P973"),
    (slugs::FUNDER, "P8324"),
    (slugs::MAIN_SUBJECT, "P921"),
    (slugs::TITLE, "P1476"),
    (slugs::BUDGET, "P2769"),
    (slugs::ROR_ID, "P6782"),
    (slugs::LOCATION, "P276"),
    (slugs::DEVELOPER, "P178"),
    (slugs::PROGRAMMING_LANGUAGE, "P277"),
    (slugs::SOURCE_CODE_REPOSITORY, "P1324"),
    (slugs::LICENSE, "P275"),
    (slugs::SOFTWARE_VERSION, "P348"),
    (slugs::FOLLOWS, "P155"),
    (slugs::FOLLOWED_BY, "P156"),
    (slugs::MANUFACTURER, "P176"),
    (slugs::INCEPTION, "P571"),
    (slugs::CREATOR, "P170"),
    (slugs::GENRE, "P136"),
    (slugs::COLLECTION, "P195"),
    (slugs::FULL_WORK_URL, "P953"),
    (slugs::PUBLISHED_IN, "P1433"),
    (slugs::COPYRIGHT_STATUS, "P6216"),
    (slugs::AFFILIATED_WITH, "P1416"),
    (slugs::EMPLOYER, "P108"),
    (slugs::FIELD_OF_WORK, "P101"),
    (slugs::ORCID, "P496"),
];

/// Bidirectional slug ↔ Wikidata property id mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    forward: BTreeMap<String, String>,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Wikidata vocabulary.
    #[must_use]
    pub fn wikidata() -> Self {
        let mut vocab = Self::new();
        for (slug, pid) in DEFAULT_PROPERTIES {
            vocab.insert(*slug, *pid);
        }
        vocab
    }

    /// Maps `slug` to `property_id`, replacing any earlier mapping.
    pub fn insert(&mut self, slug: impl Into<String>, property_id: impl Into<String>) {
        self.forward.insert(slug.into(), property_id.into());
    }

    /// Merges `other` into this vocabulary; `other` wins on conflicts.
    pub fn extend(&mut self, other: &Vocabulary) {
        for (slug, pid) in &other.forward {
            self.forward.insert(slug.clone(), pid.clone());
        }
    }

    /// Returns the Wikidata property id for `slug`.
    #[must_use]
    pub fn property_id(&self, slug: &str) -> Option<&str> {
        self.forward.get(slug).map(String::as_str)
    }

    /// Returns the slug for a Wikidata property id. When several slugs share
    /// an id, the first in slug order wins.
    #[must_use]
    pub fn slug(&self, property_id: &str) -> Option<&str> {
        self.forward
            .iter()
            .find(|(_, pid)| pid.as_str() == property_id)
            .map(|(slug, _)| slug.as_str())
    }

    /// Returns the slug for a property id, or the id itself when unmapped.
    #[must_use]
    pub fn slug_or_id<'a>(&'a self, property_id: &'a str) -> &'a str {
        self.slug(property_id).unwrap_or(property_id)
    }

    /// Returns the number of mapped slugs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns true if no slug is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterates `(slug, property id)` pairs in slug order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward.iter().map(|(s, p)| (s.as_str(), p.as_str()))
    }
}
