//! Citation formatting, filtering and bibliography export.
//!
//! Everything here is pure and infallible; storage and HTTP live elsewhere.

pub mod export;
pub mod filter;
pub mod format;

pub use export::{bibliography, file_name};
pub use filter::{summarize, CitationQuery, LibrarySummary, SortKey, SortOrder, TypeFilter};
pub use format::{format, format_all};
