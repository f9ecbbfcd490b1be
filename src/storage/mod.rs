//! Local-disk object store for uploaded research files.
//!
//! Objects live under `<storage_path>/<key>` and are served back read-only at
//! `/storage/<key>`. Keys have the form `<user_id>/<uuid>-<sanitized name>`.

use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// URL prefix the object directory is mounted at.
pub const STORAGE_ROUTE: &str = "/storage";

/// Upper bound on the file-name part of an object key.
const MAX_NAME_LEN: usize = 100;

/// Stored object location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

/// Object store rooted at a directory on local disk.
pub struct ObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl ObjectStore {
    /// Open the store, creating its root directory.
    pub fn open(root: &Path, public_base_url: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(root)
            .map_err(|e| AppError::Storage(format!("Failed to create storage directory: {}", e)))?;

        Ok(Self {
            root: root.to_path_buf(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Object key for a new upload.
    pub fn object_key(user_id: &str, object_id: &str, file_name: &str) -> String {
        format!("{}/{}-{}", user_id, object_id, sanitize_file_name(file_name))
    }

    /// Public URL of an object.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}{}/{}", self.public_base_url, STORAGE_ROUTE, key)
    }

    /// Write an object and return where it can be fetched.
    pub async fn put(&self, key: &str, bytes: &[u8]) -> Result<StoredObject, AppError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!("Stored object {} ({} bytes)", key, bytes.len());
        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    /// Delete an object. Returns false if it was already gone.
    pub async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Map a key to a path inside the root, refusing anything that could escape it.
    fn resolve(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && !key.starts_with('/')
            && !key.contains('\\')
            && key
                .split('/')
                .all(|part| !part.is_empty() && part != "." && part != "..");
        if !valid {
            return Err(AppError::Storage(format!("Invalid object key: {}", key)));
        }
        Ok(self.root.join(key))
    }
}

/// Reduce a client-supplied file name to a safe single path segment.
///
/// Keeps ASCII letters, digits, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    // Browsers on Windows may send the full client path
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name);

    let mut cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        cleaned = "file".to_string();
    }
    cleaned
}
