//! Local upload storage for images and identity documents.
//!
//! Files land under the configured upload directory in a per-kind
//! subdirectory, renamed to a UUID so uploads can never collide or traverse
//! paths. Database rows store the returned relative path; the router serves
//! the directory back at `/uploads`.

use std::path::PathBuf;

use uuid::Uuid;

use crate::error::AppError;

/// Supported image extensions (listing photos, gallery images).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Supported identity-document extensions (images plus PDF).
const DOCUMENT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "pdf"];

/// What is being uploaded; decides the allowed extensions and the
/// subdirectory within the upload store.
#[derive(Debug, Clone, Copy)]
pub enum UploadKind {
    Image,
    Document,
}

impl UploadKind {
    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Image => IMAGE_EXTENSIONS,
            UploadKind::Document => DOCUMENT_EXTENSIONS,
        }
    }

    fn subdir(&self) -> &'static str {
        match self {
            UploadKind::Image => "images",
            UploadKind::Document => "documents",
        }
    }
}

/// Persist one uploaded file and return its relative path within the store
/// (e.g. `images/3f2a....jpg`).
///
/// The original filename is only consulted for its extension; the stored
/// name is a fresh UUID.
pub async fn store_file(
    upload_dir: &str,
    kind: UploadKind,
    original_filename: &str,
    data: &[u8],
) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let ext = original_filename
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_lowercase();
    let allowed = kind.allowed_extensions();
    if !allowed.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported file format '.{ext}'. Supported: {}",
            allowed
                .iter()
                .map(|e| format!(".{e}"))
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }

    let target_dir = PathBuf::from(upload_dir).join(kind.subdir());
    tokio::fs::create_dir_all(&target_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let stored_filename = format!("{}.{ext}", Uuid::new_v4());
    let file_path = target_dir.join(&stored_filename);
    tokio::fs::write(&file_path, data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(format!("{}/{stored_filename}", kind.subdir()))
}
