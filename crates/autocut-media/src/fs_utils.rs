//! Filesystem helpers for scratch and output handling.

use std::path::Path;
use tracing::warn;

use crate::error::MediaResult;

/// Create a directory and all of its parents.
pub async fn ensure_dir(path: impl AsRef<Path>) -> MediaResult<()> {
    tokio::fs::create_dir_all(path.as_ref()).await?;
    Ok(())
}

/// Remove a file, logging instead of failing when it cannot be removed.
pub async fn remove_file_best_effort(path: impl AsRef<Path>) {
    let path = path.as_ref();
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), "Failed to remove file: {e}");
        }
    }
}

/// Remove a directory tree, logging instead of failing.
pub async fn remove_dir_best_effort(path: impl AsRef<Path>) {
    let path = path.as_ref();
    if let Err(e) = tokio::fs::remove_dir_all(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), "Failed to remove directory: {e}");
        }
    }
}

/// Reduce a file stem to a safe ASCII subset for generated names.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`; an empty result
/// falls back to `"output"`.
pub fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "output".to_string()
    } else {
        cleaned
    }
}
