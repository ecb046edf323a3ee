use crate::error::AppError;
use crate::models::selection_types::FileCandidate;
use base64::Engine;
use image::ImageFormat;
use std::path::Path;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Inline preview source for the `<img>` element.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, b64)
}

/// Declared type for a file read from disk: extension first, then content.
pub fn mime_for(path: &Path, bytes: &[u8]) -> String {
    ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(bytes))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME.to_string())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

pub async fn candidate_from_path(path: &Path) -> Result<FileCandidate, AppError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| AppError {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;
    let mime = mime_for(path, &bytes);

    Ok(FileCandidate {
        name: file_name_of(path),
        mime,
        bytes,
    })
}

/// Like [`candidate_from_path`], but an unreadable path (a directory, a
/// permission error) becomes a candidate with no declared type, so the widget
/// still sees the drop and rejects it.
pub async fn intake_path(path: &Path) -> FileCandidate {
    match candidate_from_path(path).await {
        Ok(candidate) => candidate,
        Err(e) => {
            tracing::warn!(error = %e, "dropped path could not be read");
            FileCandidate {
                name: file_name_of(path),
                mime: String::new(),
                bytes: Vec::new(),
            }
        }
    }
}
