//! Gallery item entity model and DTOs.

use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `gallery_items` table (admin-curated showcase gallery).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GalleryItem {
    pub id: DbId,
    pub category: String,
    pub caption: String,
    /// Relative reference into the upload store.
    pub image_path: String,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a gallery item.
#[derive(Debug)]
pub struct CreateGalleryItem {
    pub category: String,
    pub caption: String,
    pub image_path: String,
    pub uploaded_by: Option<DbId>,
}

/// DTO for updating a gallery item. All fields are optional; `image_path`
/// is set when a replacement image was uploaded.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGalleryItem {
    pub category: Option<String>,
    pub caption: Option<String>,
    pub image_path: Option<String>,
}
