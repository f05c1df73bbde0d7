//! Handlers for the `/gallery` resource (admin-curated showcase gallery).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::error::CoreError;
use pawhaven_core::types::DbId;
use pawhaven_core::validation::validate_required;
use pawhaven_db::models::gallery::{CreateGalleryItem, GalleryItem, UpdateGalleryItem};
use pawhaven_db::repositories::GalleryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;
use crate::uploads::{store_file, UploadKind};

/// Query parameters for `GET /gallery`.
#[derive(Debug, serde::Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
}

/// GET /api/v1/gallery
///
/// Public list, optionally filtered by category, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> AppResult<Json<Vec<GalleryItem>>> {
    let items = GalleryRepo::list(&state.pool, query.category.as_deref()).await?;
    Ok(Json(items))
}

/// POST /api/v1/gallery
///
/// Accepts a multipart form with `image` (file), `category`, and `caption`
/// fields. The image is stored locally and its reference recorded.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<GalleryItem>)> {
    let mut image: Option<(String, Vec<u8>)> = None;
    let mut category = String::new();
    let mut caption = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("image").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                image = Some((filename, data.to_vec()));
            }
            "category" => {
                category = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            "caption" => {
                caption = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            _ => {} // ignore unknown fields
        }
    }

    validate_required("category", &category)?;
    validate_required("caption", &caption)?;
    let (filename, data) =
        image.ok_or_else(|| AppError::BadRequest("Missing required 'image' field".into()))?;

    let image_path = store_file(&state.config.upload_dir, UploadKind::Image, &filename, &data)
        .await?;

    let input = CreateGalleryItem {
        category,
        caption,
        image_path,
        uploaded_by: Some(admin.user_id),
    };
    let item = GalleryRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/v1/gallery/{id}
///
/// Multipart update: any of `image`, `category`, `caption` may be present;
/// absent fields keep their stored values.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<GalleryItem>> {
    let mut input = UpdateGalleryItem::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("image").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let path = store_file(
                    &state.config.upload_dir,
                    UploadKind::Image,
                    &filename,
                    &data,
                )
                .await?;
                input.image_path = Some(path);
            }
            "category" => {
                input.category = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "caption" => {
                input.caption = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    let item = GalleryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Gallery item",
            id,
        }))?;
    Ok(Json(item))
}

/// DELETE /api/v1/gallery/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = GalleryRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Gallery item",
            id,
        }))
    }
}
