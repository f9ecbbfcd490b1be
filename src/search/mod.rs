//! Tantivy-based search index module.
//!
//! Full-text search over citations with field boosting. Every query is restricted to the
//! documents of a single user.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Citation;

/// Field boost values. Title hits outrank author hits, which outrank venue and tag hits.
const BOOST_TITLE: f32 = 10.0;
const BOOST_AUTHORS: f32 = 8.0;
const BOOST_JOURNAL: f32 = 5.0;
const BOOST_TAGS: f32 = 4.0;
const BOOST_PUBLISHER: f32 = 3.0;

/// Largest page a single search returns.
pub const MAX_LIMIT: usize = 100;
/// Deepest page start. The collector allocates for `limit + offset` hits up front.
pub const MAX_OFFSET: usize = 10_000;

/// Search result with citation id and relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub citation_id: String,
    pub score: f32,
}

/// Search index schema fields.
struct SearchFields {
    citation_id: Field,
    user_id: Field,
    title: Field,
    authors: Field,
    journal: Field,
    publisher: Field,
    tags: Field,
}

/// Tantivy search index for citations.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        let mut schema_builder = Schema::builder();
        let citation_id = schema_builder.add_text_field("citation_id", STRING | STORED);
        let user_id = schema_builder.add_text_field("user_id", STRING);
        let title = schema_builder.add_text_field("title", TEXT);
        let authors = schema_builder.add_text_field("authors", TEXT);
        let journal = schema_builder.add_text_field("journal", TEXT);
        let publisher = schema_builder.add_text_field("publisher", TEXT);
        let tags = schema_builder.add_text_field("tags", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            citation_id,
            user_id,
            title,
            authors,
            journal,
            publisher,
            tags,
        };

        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from the stored citations.
    pub async fn rebuild(&self, citations: &[Citation]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_all_documents()?;
        for citation in citations {
            writer.add_document(self.create_document(citation))?;
        }
        writer.commit()?;

        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} citations", citations.len());
        Ok(())
    }

    /// Index a single citation, replacing any previous version.
    pub async fn index_citation(&self, citation: &Citation) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_term(Term::from_field_text(self.fields.citation_id, &citation.id));
        writer.add_document(self.create_document(citation))?;
        writer.commit()?;

        self.reader.reload()?;
        Ok(())
    }

    /// Remove a citation from the index.
    pub async fn remove_citation(&self, citation_id: &str) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_term(Term::from_field_text(self.fields.citation_id, citation_id));
        writer.commit()?;

        self.reader.reload()?;
        Ok(())
    }

    /// Search one user's citations.
    ///
    /// Malformed query syntax is parsed leniently, so stray quotes or parentheses in a
    /// search box never fail the request.
    pub fn search(
        &self,
        user_id: &str,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>, AppError> {
        if offset > MAX_OFFSET {
            return Err(AppError::Validation(format!(
                "offset must be at most {}",
                MAX_OFFSET
            )));
        }
        let limit = limit.min(MAX_LIMIT);
        if query_str.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        let field_queries = [
            (self.fields.title, BOOST_TITLE),
            (self.fields.authors, BOOST_AUTHORS),
            (self.fields.journal, BOOST_JOURNAL),
            (self.fields.tags, BOOST_TAGS),
            (self.fields.publisher, BOOST_PUBLISHER),
        ];

        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for (field, boost) in field_queries {
            let field_parser = QueryParser::for_index(&self.index, vec![field]);
            let (field_query, _errors) = field_parser.parse_query_lenient(query_str);
            subqueries.push((
                Occur::Should,
                Box::new(BoostQuery::new(field_query, boost)),
            ));
        }

        let owner = TermQuery::new(
            Term::from_field_text(self.fields.user_id, user_id),
            IndexRecordOption::Basic,
        );
        let combined_query = BooleanQuery::new(vec![
            (Occur::Must, Box::new(owner) as Box<dyn Query>),
            (Occur::Must, Box::new(BooleanQuery::new(subqueries))),
        ]);

        let collector = TopDocs::with_limit(limit.saturating_add(offset));
        let top_docs = searcher
            .search(&combined_query, &collector)
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let results: Vec<SearchResult> = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let citation_id = doc
                    .get_first(self.fields.citation_id)?
                    .as_str()?
                    .to_string();
                Some(SearchResult { citation_id, score })
            })
            .collect();

        Ok(results)
    }

    fn create_document(&self, citation: &Citation) -> TantivyDocument {
        doc!(
            self.fields.citation_id => citation.id.clone(),
            self.fields.user_id => citation.user_id.clone(),
            self.fields.title => citation.title.clone(),
            self.fields.authors => citation.authors.join(" "),
            self.fields.journal => citation.journal.clone().unwrap_or_default(),
            self.fields.publisher => citation.publisher.clone().unwrap_or_default(),
            self.fields.tags => citation.tags.join(" ")
        )
    }
}
