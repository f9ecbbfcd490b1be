//! Uploaded file record and the list/upload query parameters.

use serde::{Deserialize, Serialize};

/// An uploaded research file and the object-store key that holds its bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// MIME type reported at upload time.
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: i64,
    pub url: String,
    pub storage_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Query parameters for listing files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListQuery {
    /// Case-insensitive substring of the MIME type, e.g. `pdf`.
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Query parameters accompanying a raw upload body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Values needed to insert a file record once its bytes are stored.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub name: String,
    pub content_type: String,
    pub size: i64,
    pub url: String,
    pub storage_path: String,
    pub project_id: Option<String>,
    pub metadata: serde_json::Value,
}
