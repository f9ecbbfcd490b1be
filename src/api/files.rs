//! File manager API endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap},
};

use super::{success, ApiResult};
use crate::auth::UserId;
use crate::errors::AppError;
use crate::models::{ChatResponse, FileListQuery, FileRecord, NewFileRecord, UploadFileQuery};
use crate::storage::ObjectStore;
use crate::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// GET /api/files - List the caller's files.
pub async fn list_files(
    State(state): State<AppState>,
    user: UserId,
    Query(query): Query<FileListQuery>,
) -> ApiResult<Vec<FileRecord>> {
    let files = state.repo.list_files(user.as_str(), &query).await?;
    success(files)
}

/// GET /api/files/:id - Get a single file record.
pub async fn get_file(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<FileRecord> {
    match state.repo.get_file(user.as_str(), &id).await? {
        Some(file) => success(file),
        None => Err(AppError::NotFound(format!("File {} not found", id))),
    }
}

/// POST /api/files?name=&projectId= - Upload the raw request body as a new file.
pub async fn upload_file(
    State(state): State<AppState>,
    user: UserId,
    Query(params): Query<UploadFileQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<FileRecord> {
    let name = params.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("File name is required".to_string()));
    }
    if body.is_empty() {
        return Err(AppError::Validation("File is empty".to_string()));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    let id = uuid::Uuid::new_v4().to_string();
    let key = ObjectStore::object_key(user.as_str(), &id, name);
    let stored = state.storage.put(&key, &body).await?;

    let record = NewFileRecord {
        name: name.to_string(),
        content_type,
        size: body.len() as i64,
        url: stored.url,
        storage_path: stored.key,
        project_id: params.project_id.filter(|p| !p.trim().is_empty()),
        metadata: serde_json::json!({}),
    };

    match state.repo.create_file(user.as_str(), &id, record).await {
        Ok(file) => {
            tracing::info!("Uploaded {} ({} bytes) for {}", file.name, file.size, user.as_str());
            success(file)
        }
        Err(e) => {
            // Don't leave an orphaned object behind
            if let Err(cleanup) = state.storage.delete(&key).await {
                tracing::warn!("Failed to remove orphaned object {}: {}", key, cleanup);
            }
            Err(e)
        }
    }
}

/// DELETE /api/files/:id - Delete a file record and its stored object.
pub async fn delete_file(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let file = state.repo.delete_file(user.as_str(), &id).await?;

    match state.storage.delete(&file.storage_path).await {
        Ok(true) => {}
        Ok(false) => tracing::warn!("Stored object {} was already missing", file.storage_path),
        Err(e) => tracing::warn!("Failed to delete stored object {}: {}", file.storage_path, e),
    }

    success(())
}

/// POST /api/files/:id/analyze - Canned assistant analysis of a file.
pub async fn analyze_file(
    State(state): State<AppState>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<ChatResponse> {
    let file = state
        .repo
        .get_file(user.as_str(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))?;

    success(state.assistant.analyze_file(&file).await)
}
