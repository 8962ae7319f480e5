//! Serves the frontend bundle from a directory on disk.

use crate::app::mime;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const INDEX_FILE: &str = "index.html";

/// A file read from the static directory.
#[derive(Debug)]
pub struct StaticFile {
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// Loads `request_path` relative to `static_dir`. Directories resolve to
/// their `index.html`. Anything that resolves outside `static_dir` is
/// refused.
pub async fn load_from_directory(static_dir: &Path, request_path: &str) -> Option<StaticFile> {
    let relative_path = request_path.trim_start_matches('/');

    let static_dir_canonical = match fs::canonicalize(static_dir).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(
                "Static directory not found or inaccessible '{}': {}",
                static_dir.display(),
                e
            );
            return None;
        }
    };

    let mut file_path: PathBuf = static_dir.join(relative_path);
    let is_dir = fs::metadata(&file_path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if relative_path.is_empty() || relative_path.ends_with('/') || is_dir {
        file_path = file_path.join(INDEX_FILE);
    }

    // Not found is the common case, not worth a warning.
    let file_path_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        tracing::warn!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            file_path_canonical.display()
        );
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to read file '{}': {}", file_path.display(), e);
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));

    Some(StaticFile {
        content,
        content_type,
    })
}
