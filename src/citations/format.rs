//! Reference string templates for each citation style.
//!
//! Each style is its own template function. Missing optional fields never fail a format:
//! depending on the style the segment is dropped or a placeholder is printed.

use crate::models::{Citation, CitationStyle, CitationType, FormattedCitations};

const AUTHOR_SEPARATOR: &str = ", ";

/// Format a citation in the given style.
pub fn format(citation: &Citation, style: CitationStyle) -> String {
    match style {
        CitationStyle::Apa => apa(citation),
        CitationStyle::Mla => mla(citation),
        CitationStyle::Chicago => chicago(citation),
        CitationStyle::Harvard => harvard(citation),
    }
}

/// Format a citation in every supported style.
pub fn format_all(citation: &Citation) -> FormattedCitations {
    FormattedCitations {
        apa: apa(citation),
        mla: mla(citation),
        chicago: chicago(citation),
        harvard: harvard(citation),
    }
}

fn apa(c: &Citation) -> String {
    let lead = format!("{} ({}). {}.", all_authors(c), c.year, c.title);

    if let (CitationType::Article, Some(journal)) = (c.citation_type, c.journal_name()) {
        let mut out = format!("{} {}", lead, journal);
        if let Some(volume) = field(&c.volume) {
            out.push_str(&format!(", {}", volume));
        }
        if let Some(issue) = field(&c.issue) {
            out.push_str(&format!("({})", issue));
        }
        if let Some(pages) = field(&c.pages) {
            out.push_str(&format!(", {}", pages));
        }
        out.push('.');
        if let Some(doi) = field(&c.doi) {
            out.push_str(&format!(" https://doi.org/{}", doi));
        }
        return out;
    }

    match c.citation_type {
        CitationType::Book => format!("{} {}.", lead, field(&c.publisher).unwrap_or("Publisher")),
        CitationType::Website => {
            format!("{} Retrieved from {}", lead, field(&c.url).unwrap_or("URL"))
        }
        _ => lead,
    }
}

fn mla(c: &Citation) -> String {
    let first_author = c.first_author().filter(|a| !a.is_empty()).unwrap_or("Author");
    let first_author = trim_period(first_author);

    match (c.citation_type, c.journal_name()) {
        (CitationType::Article, Some(journal)) => format!(
            "{}. \"{}\" {}, vol. {}, no. {}, {}, pp. {}.",
            first_author,
            c.title,
            journal,
            field(&c.volume).unwrap_or("1"),
            field(&c.issue).unwrap_or("1"),
            c.year,
            field(&c.pages).unwrap_or("1-10"),
        ),
        _ => format!("{}. \"{}\" {}.", first_author, c.title, c.year),
    }
}

fn chicago(c: &Citation) -> String {
    let all = all_authors(c);
    let authors = trim_period(&all);

    match (c.citation_type, c.journal_name()) {
        (CitationType::Article, Some(journal)) => format!(
            "{}. \"{}\" {} {}, no. {} ({}): {}.",
            authors,
            c.title,
            journal,
            field(&c.volume).unwrap_or("1"),
            field(&c.issue).unwrap_or("1"),
            c.year,
            field(&c.pages).unwrap_or("1-10"),
        ),
        _ => format!("{}. \"{}\" {}.", authors, c.title, c.year),
    }
}

fn harvard(c: &Citation) -> String {
    let source = c
        .journal_name()
        .or_else(|| field(&c.publisher))
        .unwrap_or("Source");
    format!("{}, {}. {}. {}.", all_authors(c), c.year, c.title, source)
}

fn all_authors(c: &Citation) -> String {
    c.authors.join(AUTHOR_SEPARATOR)
}

/// Author segment without its trailing period, so `"{}. "` does not double it.
fn trim_period(authors: &str) -> &str {
    authors.strip_suffix('.').unwrap_or(authors)
}

/// Optional text field, treating an empty string as absent.
fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
