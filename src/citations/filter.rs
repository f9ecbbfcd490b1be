//! Filtering and ordering of a user's citation list.

use std::cmp::Ordering;

use chrono::DateTime;
use feruca::Collator;
use serde::Serialize;

use crate::models::{Citation, CitationType};

/// Type filter; `All` is the `"all"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(CitationType),
}

impl TypeFilter {
    /// Parse a type filter name. Returns `None` for names that are neither `all` nor a type.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "all" => Some(TypeFilter::All),
            other => CitationType::from_name(other).map(TypeFilter::Only),
        }
    }

    fn matches(&self, citation: &Citation) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => citation.citation_type == *t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Title,
    Year,
    /// First author only.
    Authors,
    #[default]
    CreatedAt,
}

impl SortKey {
    /// Unknown names sort by creation time.
    pub fn from_name(s: &str) -> Self {
        match s {
            "title" => SortKey::Title,
            "year" => SortKey::Year,
            "authors" => SortKey::Authors,
            _ => SortKey::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn from_name(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// The citation manager's view state: search text, filters and ordering.
#[derive(Debug, Clone, Default)]
pub struct CitationQuery {
    pub search: String,
    pub type_filter: TypeFilter,
    pub tags: Vec<String>,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

impl CitationQuery {
    /// Whether a citation passes the search, type and tag filters.
    pub fn matches(&self, citation: &Citation) -> bool {
        self.matches_search(citation)
            && self.type_filter.matches(citation)
            && (self.tags.is_empty() || self.tags.iter().any(|t| citation.tags.contains(t)))
    }

    fn matches_search(&self, citation: &Citation) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        citation.title.to_lowercase().contains(&needle)
            || citation
                .authors
                .iter()
                .any(|a| a.to_lowercase().contains(&needle))
            || citation
                .journal
                .as_ref()
                .is_some_and(|j| j.to_lowercase().contains(&needle))
    }

    /// Filter then sort. Equal keys keep their incoming relative order in both directions.
    pub fn apply(&self, citations: &[Citation]) -> Vec<Citation> {
        let mut out: Vec<Citation> = citations
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect();

        let key = self.sort_by;
        let mut collator = Collator::default();
        match self.order {
            SortOrder::Asc => out.sort_by(|a, b| compare(&mut collator, key, a, b)),
            SortOrder::Desc => out.sort_by(|a, b| compare(&mut collator, key, b, a)),
        }
        out
    }
}

/// Text keys use Unicode collation (CLDR root order), so accents and case sort
/// next to their base letters.
fn compare(collator: &mut Collator, key: SortKey, a: &Citation, b: &Citation) -> Ordering {
    match key {
        SortKey::Title => collator.collate(a.title.as_str(), b.title.as_str()),
        SortKey::Year => a.year.cmp(&b.year),
        SortKey::Authors => collator.collate(
            a.first_author().unwrap_or_default(),
            b.first_author().unwrap_or_default(),
        ),
        SortKey::CreatedAt => timestamp_cmp(&a.created_at, &b.created_at),
    }
}

fn timestamp_cmp(a: &str, b: &str) -> Ordering {
    match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Per-type counts and tag vocabulary for the citation manager sidebar.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySummary {
    pub total: usize,
    pub favorites: usize,
    /// `(type, count)` for every citation type, in declaration order.
    pub by_type: Vec<TypeCount>,
    /// Distinct tags in first-seen order.
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub citation_type: CitationType,
    pub count: usize,
}

pub fn summarize(citations: &[Citation]) -> LibrarySummary {
    let by_type = CitationType::ALL
        .iter()
        .map(|t| TypeCount {
            citation_type: *t,
            count: citations.iter().filter(|c| c.citation_type == *t).count(),
        })
        .collect();

    LibrarySummary {
        total: citations.len(),
        favorites: citations.iter().filter(|c| c.is_favorite).count(),
        by_type,
        tags: all_tags(citations),
    }
}

pub fn all_tags(citations: &[Citation]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in citations.iter().flat_map(|c| c.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}
