//! Plain-text bibliography export.

use super::format::format;
use crate::models::{Citation, CitationStyle};

const ENTRY_SEPARATOR: &str = "\n\n";

/// Join the citations into one paragraph each, in list order.
///
/// A cached formatted string is used when the citation has one; otherwise the citation is
/// formatted on the spot.
pub fn bibliography(citations: &[Citation], style: CitationStyle) -> String {
    citations
        .iter()
        .map(|c| entry(c, style))
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

fn entry(citation: &Citation, style: CitationStyle) -> String {
    match &citation.formatted_citations {
        Some(cached) => cached.get(style).to_string(),
        None => format(citation, style),
    }
}

/// Download name for an exported bibliography.
pub fn file_name(style: CitationStyle) -> String {
    format!("bibliography-{}.txt", style.as_str())
}
