//! Repository for the `gallery_items` table.

use pawhaven_core::types::DbId;
use sqlx::PgPool;

use crate::models::gallery::{CreateGalleryItem, GalleryItem, UpdateGalleryItem};

/// Column list shared across queries.
const COLUMNS: &str = "id, category, caption, image_path, uploaded_by, created_at, updated_at";

/// Provides CRUD operations for the showcase gallery.
pub struct GalleryRepo;

impl GalleryRepo {
    /// Insert a new gallery item, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGalleryItem,
    ) -> Result<GalleryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO gallery_items (category, caption, image_path, uploaded_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(&input.category)
            .bind(&input.caption)
            .bind(&input.image_path)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a gallery item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gallery_items WHERE id = $1");
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List gallery items, optionally filtered by category, newest first.
    pub async fn list(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<GalleryItem>, sqlx::Error> {
        match category {
            Some(cat) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM gallery_items
                     WHERE category = $1
                     ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, GalleryItem>(&query)
                    .bind(cat)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM gallery_items ORDER BY created_at DESC");
                sqlx::query_as::<_, GalleryItem>(&query).fetch_all(pool).await
            }
        }
    }

    /// Update a gallery item. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGalleryItem,
    ) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!(
            "UPDATE gallery_items SET
                category = COALESCE($2, category),
                caption = COALESCE($3, caption),
                image_path = COALESCE($4, image_path)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(id)
            .bind(&input.category)
            .bind(&input.caption)
            .bind(&input.image_path)
            .fetch_optional(pool)
            .await
    }

    /// Delete a gallery item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
