//! Avatar encoding
//!
//! Reads a user-picked image file and turns it into an inline
//! `data:<mime>;base64,...` URL for the profile record.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("Failed to read image {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// MIME type guessed from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

pub fn image_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read `path` and encode it as a data URL
pub async fn encode_image_file(path: &Path) -> Result<String, AvatarError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| AvatarError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = ?path, bytes = bytes.len(), "Encoded avatar image");
    Ok(image_data_url(mime_for_path(path), &bytes))
}
