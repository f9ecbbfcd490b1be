//! Search API endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::UserId;
use crate::errors::AppError;
use crate::models::Citation;
use crate::search::{MAX_LIMIT, MAX_OFFSET};
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string.
    #[serde(default)]
    pub q: String,
    /// Maximum number of results (default: 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0, at most 10000).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

/// Search result with citations and metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Single search result item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub citation: Citation,
    pub score: f32,
}

/// GET /api/citations/search - Full-text search over the caller's citations.
pub async fn search_citations(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let limit = params.limit.min(MAX_LIMIT);
    if params.offset > MAX_OFFSET {
        return Err(AppError::Validation(format!(
            "offset must be at most {}",
            MAX_OFFSET
        )));
    }

    let hits = state
        .search
        .search(user.as_str(), &params.q, limit, params.offset)?;

    // Hits whose row has since disappeared are skipped
    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        if let Ok(Some(citation)) = state.repo.get_citation(user.as_str(), &hit.citation_id).await
        {
            results.push(SearchResultItem {
                citation,
                score: hit.score,
            });
        }
    }

    let total = results.len();

    success(SearchResponse {
        results,
        total,
        limit,
        offset: params.offset,
    })
}
