//! Citation record, style and type enums, and the create/patch request bodies.

use serde::{Deserialize, Deserializer, Serialize};

/// Kind of cited work. Determines which optional fields a style template reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CitationType {
    #[default]
    Article,
    Book,
    Website,
    Conference,
    Thesis,
    Report,
}

impl CitationType {
    pub const ALL: [CitationType; 6] = [
        CitationType::Article,
        CitationType::Book,
        CitationType::Website,
        CitationType::Conference,
        CitationType::Thesis,
        CitationType::Report,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CitationType::Article => "article",
            CitationType::Book => "book",
            CitationType::Website => "website",
            CitationType::Conference => "conference",
            CitationType::Thesis => "thesis",
            CitationType::Report => "report",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "article" => Some(CitationType::Article),
            "book" => Some(CitationType::Book),
            "website" => Some(CitationType::Website),
            "conference" => Some(CitationType::Conference),
            "thesis" => Some(CitationType::Thesis),
            "report" => Some(CitationType::Report),
            _ => None,
        }
    }
}

/// Supported reference styles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    #[default]
    Apa,
    Mla,
    Chicago,
    Harvard,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 4] = [
        CitationStyle::Apa,
        CitationStyle::Mla,
        CitationStyle::Chicago,
        CitationStyle::Harvard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "apa",
            CitationStyle::Mla => "mla",
            CitationStyle::Chicago => "chicago",
            CitationStyle::Harvard => "harvard",
        }
    }

    /// Resolve a style name. Anything unrecognised is APA.
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mla" => CitationStyle::Mla,
            "chicago" => CitationStyle::Chicago,
            "harvard" => CitationStyle::Harvard,
            _ => CitationStyle::Apa,
        }
    }
}

/// Previously generated reference strings, one per style.
///
/// Nothing keeps these in step with the citation fields; they are a snapshot taken
/// when the cache was last regenerated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormattedCitations {
    pub apa: String,
    pub mla: String,
    pub chicago: String,
    pub harvard: String,
}

impl FormattedCitations {
    pub fn get(&self, style: CitationStyle) -> &str {
        match style {
            CitationStyle::Apa => &self.apa,
            CitationStyle::Mla => &self.mla,
            CitationStyle::Chicago => &self.chicago,
            CitationStyle::Harvard => &self.harvard,
        }
    }
}

/// A bibliographic reference owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub citation_type: CitationType,
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_citations: Option<FormattedCitations>,
    pub created_at: String,
    pub updated_at: String,
}

impl Citation {
    /// Journal name if present and non-empty.
    pub fn journal_name(&self) -> Option<&str> {
        self.journal.as_deref().filter(|j| !j.is_empty())
    }

    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}

/// Request body for creating a new citation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCitationRequest {
    #[serde(rename = "type", default)]
    pub citation_type: CitationType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    /// Defaults to the current year, like the add-citation form.
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Request body for patching an existing citation. Absent fields keep their value.
///
/// The optional text fields are nested options: `Some(None)` is an explicit `null` and clears
/// the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCitationRequest {
    #[serde(rename = "type", default)]
    pub citation_type: Option<CitationType>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub journal: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub doi: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub pages: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub volume: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub issue: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub publisher: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

impl UpdateCitationRequest {
    /// True if the patch touches any field a reference template reads.
    pub fn changes_bibliographic_fields(&self) -> bool {
        self.citation_type.is_some()
            || self.title.is_some()
            || self.authors.is_some()
            || self.year.is_some()
            || self.journal.is_some()
            || self.doi.is_some()
            || self.url.is_some()
            || self.pages.is_some()
            || self.volume.is_some()
            || self.issue.is_some()
            || self.publisher.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.changes_bibliographic_fields() && self.tags.is_none() && self.is_favorite.is_none()
    }
}

/// Present-but-null deserializes to `Some(None)`; a missing key falls back to `default`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Drop blank author entries, trimming the rest.
pub fn clean_authors(authors: &[String]) -> Vec<String> {
    authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
