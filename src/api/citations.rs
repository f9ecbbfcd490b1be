//! Citation API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::UserId;
use crate::citations::{
    self, CitationQuery, LibrarySummary, SortKey, SortOrder, TypeFilter,
};
use crate::errors::AppError;
use crate::models::{
    clean_authors, Citation, CitationStyle, CreateCitationRequest, UpdateCitationRequest,
};
use crate::AppState;

/// Years outside this window are accepted but logged.
const MIN_EXPECTED_YEAR: i32 = 1900;
const FUTURE_YEAR_SLACK: i32 = 5;

/// List/export query parameters, mirroring the citation manager's controls.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationListParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(rename = "type", default)]
    pub citation_type: Option<String>,
    /// Comma-separated tag names.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    /// Export only.
    #[serde(default)]
    pub style: Option<String>,
}

impl CitationListParams {
    fn to_query(&self) -> Result<CitationQuery, AppError> {
        let type_name = self.citation_type.as_deref().unwrap_or("");
        let type_filter = TypeFilter::from_name(type_name).ok_or_else(|| {
            AppError::Validation(format!("Unknown citation type: {}", type_name))
        })?;

        let tags = self
            .tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        Ok(CitationQuery {
            search: self.q.clone().unwrap_or_default(),
            type_filter,
            tags,
            sort_by: self
                .sort_by
                .as_deref()
                .map(SortKey::from_name)
                .unwrap_or_default(),
            order: self
                .order
                .as_deref()
                .map(SortOrder::from_name)
                .unwrap_or_default(),
        })
    }

    fn style(&self) -> CitationStyle {
        self.style
            .as_deref()
            .map(CitationStyle::from_name)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct StyleParams {
    #[serde(default)]
    pub style: Option<String>,
}

/// A citation rendered in one style.
#[derive(Debug, Serialize)]
pub struct FormattedCitation {
    pub style: CitationStyle,
    pub text: String,
}

/// GET /api/citations - List the caller's citations with search, filters and ordering.
pub async fn list_citations(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<CitationListParams>,
) -> ApiResult<Vec<Citation>> {
    let query = params.to_query()?;
    let all = state.repo.list_citations(user.as_str()).await?;
    success(query.apply(&all))
}

/// GET /api/citations/summary - Counts per type, favorites and tag vocabulary.
pub async fn citation_summary(
    State(state): State<AppState>,
    user: UserId,
) -> ApiResult<LibrarySummary> {
    let all = state.repo.list_citations(user.as_str()).await?;
    success(citations::summarize(&all))
}

/// GET /api/citations/export - Download the filtered list as a bibliography.
pub async fn export_citations(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<CitationListParams>,
) -> Result<Response, AppError> {
    let query = params.to_query()?;
    let style = params.style();
    let all = state.repo.list_citations(user.as_str()).await?;
    let selected = query.apply(&all);

    tracing::info!(
        "Exporting {} citations as {} for {}",
        selected.len(),
        style.as_str(),
        user.as_str()
    );

    let body = citations::bibliography(&selected, style);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        citations::file_name(style)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// GET /api/citations/:id - Get a single citation.
pub async fn get_citation(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<Citation> {
    match state.repo.get_citation(user.as_str(), &id).await? {
        Some(citation) => success(citation),
        None => Err(AppError::NotFound(format!("Citation {} not found", id))),
    }
}

/// POST /api/citations - Create a citation.
pub async fn create_citation(
    State(state): State<AppState>,
    user: UserId,
    Json(mut request): Json<CreateCitationRequest>,
) -> ApiResult<Citation> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    request.authors = clean_authors(&request.authors);
    if request.authors.is_empty() {
        return Err(AppError::Validation(
            "At least one author is required".to_string(),
        ));
    }
    if let Some(year) = request.year {
        check_year(year);
    }

    let citation = state.repo.create_citation(user.as_str(), &request).await?;

    if let Err(e) = state.search.index_citation(&citation).await {
        tracing::warn!("Failed to index citation: {}", e);
    }

    success(citation)
}

/// PUT /api/citations/:id - Patch a citation. Last write wins.
pub async fn update_citation(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
    Json(mut request): Json<UpdateCitationRequest>,
) -> ApiResult<Citation> {
    if request.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    if matches!(&request.title, Some(title) if title.trim().is_empty()) {
        return Err(AppError::Validation("Title cannot be empty".to_string()));
    }
    if let Some(authors) = &request.authors {
        let cleaned = clean_authors(authors);
        if cleaned.is_empty() {
            return Err(AppError::Validation(
                "At least one author is required".to_string(),
            ));
        }
        request.authors = Some(cleaned);
    }
    if let Some(year) = request.year {
        check_year(year);
    }

    let citation = state
        .repo
        .update_citation(user.as_str(), &id, &request)
        .await?;

    if let Err(e) = state.search.index_citation(&citation).await {
        tracing::warn!("Failed to re-index citation: {}", e);
    }

    success(citation)
}

/// DELETE /api/citations/:id - Delete a citation.
pub async fn delete_citation(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.repo.delete_citation(user.as_str(), &id).await?;

    if let Err(e) = state.search.remove_citation(&id).await {
        tracing::warn!("Failed to remove citation from index: {}", e);
    }

    success(())
}

/// POST /api/citations/:id/favorite - Toggle the favorite flag.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<Citation> {
    let citation = state.repo.toggle_favorite(user.as_str(), &id).await?;
    success(citation)
}

/// POST /api/citations/:id/format - Regenerate the cached reference strings.
pub async fn regenerate_formats(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<Citation> {
    let mut citation = state
        .repo
        .get_citation(user.as_str(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Citation {} not found", id)))?;

    let formatted = citations::format_all(&citation);
    state
        .repo
        .store_formatted(user.as_str(), &id, &formatted)
        .await?;

    citation.formatted_citations = Some(formatted);
    success(citation)
}

/// GET /api/citations/:id/formatted - Render a citation in one style, ignoring the cache.
pub async fn format_citation(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
    Query(params): Query<StyleParams>,
) -> ApiResult<FormattedCitation> {
    let citation = state
        .repo
        .get_citation(user.as_str(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Citation {} not found", id)))?;

    let style = params
        .style
        .as_deref()
        .map(CitationStyle::from_name)
        .unwrap_or_default();

    success(FormattedCitation {
        style,
        text: citations::format(&citation, style),
    })
}

fn check_year(year: i32) {
    let latest = chrono::Utc::now().year() + FUTURE_YEAR_SLACK;
    if !(MIN_EXPECTED_YEAR..=latest).contains(&year) {
        tracing::warn!("Citation year {} is outside {}..={}", year, MIN_EXPECTED_YEAR, latest);
    }
}
