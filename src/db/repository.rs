//! Database repository for CRUD operations.
//!
//! Every citation and file operation is scoped by the owning user id; a row that belongs to
//! someone else behaves exactly like a missing row.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::citations::format_all;
use crate::errors::AppError;
use crate::models::{
    Citation, CitationType, CreateCitationRequest, FileListQuery, FileRecord, FormattedCitations,
    NewFileRecord, UpdateCitationRequest,
};

const CITATION_COLUMNS: &str = "id, user_id, type, title, authors, year, journal, doi, url, pages, volume, issue, publisher, tags, is_favorite, formatted_citations, created_at, updated_at";

const FILE_COLUMNS: &str = "id, user_id, name, content_type, size, url, storage_path, project_id, metadata, created_at, updated_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Cheap connectivity check for the health endpoint.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    // ==================== CITATION OPERATIONS ====================

    /// List a user's citations, newest first.
    pub async fn list_citations(&self, user_id: &str) -> Result<Vec<Citation>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM citations WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            CITATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(citation_from_row).collect())
    }

    /// List every user's citations. Used to rebuild the search index.
    pub async fn list_all_citations(&self) -> Result<Vec<Citation>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM citations", CITATION_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(citation_from_row).collect())
    }

    /// Get one of a user's citations by ID.
    pub async fn get_citation(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<Citation>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM citations WHERE id = ? AND user_id = ?",
            CITATION_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(citation_from_row))
    }

    /// Create a citation. The request must already be validated.
    ///
    /// The stored record comes back with its id, timestamps and a freshly generated
    /// formatted-citation cache.
    pub async fn create_citation(
        &self,
        user_id: &str,
        request: &CreateCitationRequest,
    ) -> Result<Citation, AppError> {
        let now = now();
        let mut citation = Citation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            citation_type: request.citation_type,
            title: request.title.clone(),
            authors: request.authors.clone(),
            year: request.year.unwrap_or_else(current_year),
            journal: request.journal.clone(),
            doi: request.doi.clone(),
            url: request.url.clone(),
            pages: request.pages.clone(),
            volume: request.volume.clone(),
            issue: request.issue.clone(),
            publisher: request.publisher.clone(),
            tags: request.tags.clone(),
            is_favorite: request.is_favorite,
            formatted_citations: None,
            created_at: now.clone(),
            updated_at: now,
        };
        citation.formatted_citations = Some(format_all(&citation));

        sqlx::query(&format!(
            "INSERT INTO citations ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            CITATION_COLUMNS
        ))
        .bind(&citation.id)
        .bind(&citation.user_id)
        .bind(citation.citation_type.as_str())
        .bind(&citation.title)
        .bind(to_json(&citation.authors))
        .bind(citation.year)
        .bind(&citation.journal)
        .bind(&citation.doi)
        .bind(&citation.url)
        .bind(&citation.pages)
        .bind(&citation.volume)
        .bind(&citation.issue)
        .bind(&citation.publisher)
        .bind(to_json(&citation.tags))
        .bind(citation.is_favorite as i32)
        .bind(citation.formatted_citations.as_ref().map(to_json))
        .bind(&citation.created_at)
        .bind(&citation.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(citation)
    }

    /// Apply a partial update. Last write wins.
    ///
    /// Changing any field a reference template reads clears the formatted-citation cache.
    pub async fn update_citation(
        &self,
        user_id: &str,
        id: &str,
        request: &UpdateCitationRequest,
    ) -> Result<Citation, AppError> {
        let existing = self
            .get_citation(user_id, id)
            .await?
            .ok_or_else(|| citation_not_found(id))?;

        let formatted_citations = if request.changes_bibliographic_fields() {
            None
        } else {
            existing.formatted_citations.clone()
        };

        let updated = Citation {
            id: existing.id,
            user_id: existing.user_id,
            citation_type: request.citation_type.unwrap_or(existing.citation_type),
            title: request.title.clone().unwrap_or(existing.title),
            authors: request.authors.clone().unwrap_or(existing.authors),
            year: request.year.unwrap_or(existing.year),
            journal: patched(&request.journal, existing.journal),
            doi: patched(&request.doi, existing.doi),
            url: patched(&request.url, existing.url),
            pages: patched(&request.pages, existing.pages),
            volume: patched(&request.volume, existing.volume),
            issue: patched(&request.issue, existing.issue),
            publisher: patched(&request.publisher, existing.publisher),
            tags: request.tags.clone().unwrap_or(existing.tags),
            is_favorite: request.is_favorite.unwrap_or(existing.is_favorite),
            formatted_citations,
            created_at: existing.created_at,
            updated_at: now(),
        };

        let result = sqlx::query(
            r#"UPDATE citations SET
                type = ?, title = ?, authors = ?, year = ?, journal = ?, doi = ?, url = ?,
                pages = ?, volume = ?, issue = ?, publisher = ?, tags = ?, is_favorite = ?,
                formatted_citations = ?, updated_at = ?
            WHERE id = ? AND user_id = ?"#,
        )
        .bind(updated.citation_type.as_str())
        .bind(&updated.title)
        .bind(to_json(&updated.authors))
        .bind(updated.year)
        .bind(&updated.journal)
        .bind(&updated.doi)
        .bind(&updated.url)
        .bind(&updated.pages)
        .bind(&updated.volume)
        .bind(&updated.issue)
        .bind(&updated.publisher)
        .bind(to_json(&updated.tags))
        .bind(updated.is_favorite as i32)
        .bind(updated.formatted_citations.as_ref().map(to_json))
        .bind(&updated.updated_at)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        // Deleted between the read and the write
        if result.rows_affected() == 0 {
            return Err(citation_not_found(id));
        }

        Ok(updated)
    }

    /// Flip the favorite flag and return the updated citation.
    pub async fn toggle_favorite(&self, user_id: &str, id: &str) -> Result<Citation, AppError> {
        let existing = self
            .get_citation(user_id, id)
            .await?
            .ok_or_else(|| citation_not_found(id))?;

        self.set_favorite(user_id, id, !existing.is_favorite).await
    }

    /// Set the favorite flag. Leaves the formatted-citation cache alone.
    pub async fn set_favorite(
        &self,
        user_id: &str,
        id: &str,
        is_favorite: bool,
    ) -> Result<Citation, AppError> {
        let patch = UpdateCitationRequest {
            is_favorite: Some(is_favorite),
            ..Default::default()
        };
        self.update_citation(user_id, id, &patch).await
    }

    /// Replace the formatted-citation cache.
    pub async fn store_formatted(
        &self,
        user_id: &str,
        id: &str,
        formatted: &FormattedCitations,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE citations SET formatted_citations = ? WHERE id = ? AND user_id = ?",
        )
        .bind(to_json(formatted))
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(citation_not_found(id));
        }
        Ok(())
    }

    /// Delete one of a user's citations.
    pub async fn delete_citation(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM citations WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(citation_not_found(id));
        }
        Ok(())
    }

    // ==================== FILE OPERATIONS ====================

    /// List a user's files, newest first, with optional type and project filters.
    pub async fn list_files(
        &self,
        user_id: &str,
        query: &FileListQuery,
    ) -> Result<Vec<FileRecord>, AppError> {
        let type_pattern = query
            .content_type
            .as_ref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| format!("%{}%", t.trim().to_lowercase()));
        let project_id = query.project_id.as_ref().filter(|p| !p.is_empty());

        let rows = sqlx::query(&format!(
            r#"SELECT {} FROM files
               WHERE user_id = ?
                 AND (? IS NULL OR LOWER(content_type) LIKE ?)
                 AND (? IS NULL OR project_id = ?)
               ORDER BY created_at DESC, rowid DESC"#,
            FILE_COLUMNS
        ))
        .bind(user_id)
        .bind(&type_pattern)
        .bind(&type_pattern)
        .bind(project_id)
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(file_from_row).collect())
    }

    /// Get one of a user's files by ID.
    pub async fn get_file(&self, user_id: &str, id: &str) -> Result<Option<FileRecord>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM files WHERE id = ? AND user_id = ?",
            FILE_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(file_from_row))
    }

    /// Insert the record for an object that has already been stored.
    pub async fn create_file(
        &self,
        user_id: &str,
        id: &str,
        file: NewFileRecord,
    ) -> Result<FileRecord, AppError> {
        let now = now();

        sqlx::query(&format!(
            "INSERT INTO files ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            FILE_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(&file.name)
        .bind(&file.content_type)
        .bind(file.size)
        .bind(&file.url)
        .bind(&file.storage_path)
        .bind(&file.project_id)
        .bind(to_json(&file.metadata))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(FileRecord {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: file.name,
            content_type: file.content_type,
            size: file.size,
            url: file.url,
            storage_path: file.storage_path,
            project_id: file.project_id,
            metadata: file.metadata,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Delete a file record and return it so the caller can remove the stored object.
    pub async fn delete_file(&self, user_id: &str, id: &str) -> Result<FileRecord, AppError> {
        let existing = self
            .get_file(user_id, id)
            .await?
            .ok_or_else(|| file_not_found(id))?;

        let result = sqlx::query("DELETE FROM files WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(file_not_found(id));
        }
        Ok(existing)
    }
}

// Helper functions for row conversion

fn citation_from_row(row: &sqlx::sqlite::SqliteRow) -> Citation {
    let type_str: String = row.get("type");
    let authors_str: String = row.get("authors");
    let tags_str: String = row.get("tags");
    let is_favorite: i32 = row.get("is_favorite");
    let formatted_str: Option<String> = row.get("formatted_citations");

    Citation {
        id: row.get("id"),
        user_id: row.get("user_id"),
        citation_type: CitationType::from_name(&type_str).unwrap_or_default(),
        title: row.get("title"),
        authors: parse_json_array(&authors_str),
        year: row.get("year"),
        journal: row.get("journal"),
        doi: row.get("doi"),
        url: row.get("url"),
        pages: row.get("pages"),
        volume: row.get("volume"),
        issue: row.get("issue"),
        publisher: row.get("publisher"),
        tags: parse_json_array(&tags_str),
        is_favorite: is_favorite != 0,
        formatted_citations: formatted_str.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn file_from_row(row: &sqlx::sqlite::SqliteRow) -> FileRecord {
    let metadata_str: String = row.get("metadata");
    FileRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        content_type: row.get("content_type"),
        size: row.get("size"),
        url: row.get("url"),
        storage_path: row.get("storage_path"),
        project_id: row.get("project_id"),
        metadata: serde_json::from_str(&metadata_str)
            .unwrap_or_else(|_| serde_json::Value::Object(Default::default())),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

/// Apply a clearable patch field: absent keeps, `null` clears, a value replaces.
fn patched(patch: &Option<Option<String>>, existing: Option<String>) -> Option<String> {
    match patch {
        Some(value) => value.clone(),
        None => existing,
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Fixed-width UTC timestamp, so text order matches time order.
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn current_year() -> i32 {
    use chrono::Datelike;
    Utc::now().year()
}

fn citation_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Citation {} not found", id))
}

fn file_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("File {} not found", id))
}
