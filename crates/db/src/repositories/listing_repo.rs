//! Repository for the `pet_listings` table.
//!
//! Status transitions (reserve, release) live in
//! [`crate::workflow::AdoptionWorkflow`]; this repository only covers
//! attribute CRUD, the owner's withdraw, and the claim-guarded delete.

use pawhaven_core::status::{
    LISTING_AVAILABLE, LISTING_RESERVED, LISTING_WITHDRAWN, REQUEST_PENDING,
};
use pawhaven_core::types::DbId;
use sqlx::PgPool;

use crate::models::listing::{
    CreatePetListing, ListingFilter, ListingSummary, PetListing, UpdatePetListing,
};

/// Column list shared across queries.
const COLUMNS: &str = "id, owner_id, species, breed, gender, age, caption, \
                        medical_history, photo_paths, document_paths, status, \
                        approved, created_at, updated_at";

/// Column list for [`ListingSummary`] projections.
const SUMMARY_COLUMNS: &str = "id, species, breed, gender, age, caption, status, photo_paths";

/// Outcome of [`ListingRepo::delete`].
#[derive(Debug, PartialEq, Eq)]
pub enum ListingDelete {
    Deleted,
    NotFound,
    /// A pending adoption request still references the listing.
    Claimed,
}

/// Provides CRUD operations for pet listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing in `available` status, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePetListing,
    ) -> Result<PetListing, sqlx::Error> {
        let query = format!(
            "INSERT INTO pet_listings
                (owner_id, species, breed, gender, age, caption,
                 medical_history, photo_paths, document_paths)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PetListing>(&query)
            .bind(input.owner_id)
            .bind(&input.species)
            .bind(&input.breed)
            .bind(&input.gender)
            .bind(input.age)
            .bind(&input.caption)
            .bind(&input.medical_history)
            .bind(&input.photo_paths)
            .bind(&input.document_paths)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PetListing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pet_listings WHERE id = $1");
        sqlx::query_as::<_, PetListing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List listings matching the filter, newest first.
    ///
    /// `None` filter fields match everything; the public browse endpoint
    /// defaults status to `available` before calling this.
    pub async fn list(
        pool: &PgPool,
        filter: &ListingFilter,
    ) -> Result<Vec<PetListing>, sqlx::Error> {
        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if filter.status.is_some() {
            conditions.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.species.is_some() {
            conditions.push(format!("species = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.breed.is_some() {
            conditions.push(format!("breed = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.owner_id.is_some() {
            conditions.push(format!("owner_id = ${bind_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM pet_listings
             {where_clause}
             ORDER BY created_at DESC"
        );

        let mut q = sqlx::query_as::<_, PetListing>(&query);

        if let Some(status) = &filter.status {
            q = q.bind(status);
        }
        if let Some(species) = &filter.species {
            q = q.bind(species);
        }
        if let Some(breed) = &filter.breed {
            q = q.bind(breed);
        }
        if let Some(owner_id) = filter.owner_id {
            q = q.bind(owner_id);
        }

        q.fetch_all(pool).await
    }

    /// Fetch compact summaries for a set of listing IDs.
    ///
    /// Rows come back ordered by id; callers needing request order must
    /// re-sort against their own id sequence.
    pub async fn summaries_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ListingSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM pet_listings
             WHERE id = ANY($1)
             ORDER BY id"
        );
        sqlx::query_as::<_, ListingSummary>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Update a listing's attribute fields. Only non-`None` fields are
    /// applied; status is untouchable through this method.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePetListing,
    ) -> Result<Option<PetListing>, sqlx::Error> {
        let query = format!(
            "UPDATE pet_listings SET
                species = COALESCE($2, species),
                breed = COALESCE($3, breed),
                gender = COALESCE($4, gender),
                age = COALESCE($5, age),
                caption = COALESCE($6, caption),
                medical_history = COALESCE($7, medical_history)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PetListing>(&query)
            .bind(id)
            .bind(&input.species)
            .bind(&input.breed)
            .bind(&input.gender)
            .bind(input.age)
            .bind(&input.caption)
            .bind(&input.medical_history)
            .fetch_optional(pool)
            .await
    }

    /// Withdraw a listing from adoption: `available -> withdrawn` as a
    /// single conditional write.
    ///
    /// Returns `true` if the row transitioned. A reserved listing cannot be
    /// withdrawn; callers distinguish "missing" from "not available" with a
    /// follow-up [`Self::find_by_id`].
    pub async fn withdraw(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pet_listings SET status = $2 WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(LISTING_WITHDRAWN)
        .bind(LISTING_AVAILABLE)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a listing unless a pending adoption request references it.
    ///
    /// Runs in a transaction: the listing row is locked first so a racing
    /// submit cannot claim it between the reference check and the delete.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<ListingDelete, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM pet_listings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(ListingDelete::NotFound);
        }

        let claimed: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                 SELECT 1 FROM adoption_requests
                 WHERE status = $2 AND listing_ids @> ARRAY[$1]::BIGINT[]
             )",
        )
        .bind(id)
        .bind(REQUEST_PENDING)
        .fetch_one(&mut *tx)
        .await?;
        if claimed.0 {
            return Ok(ListingDelete::Claimed);
        }

        sqlx::query("DELETE FROM pet_listings WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ListingDelete::Deleted)
    }

    /// Count listings owned by `owner_id` that are currently reserved.
    ///
    /// Used as a guard before hard-deleting a user: reserved listings are
    /// claimed by someone else's active request and must not cascade away.
    pub async fn count_reserved_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM pet_listings WHERE owner_id = $1 AND status = $2",
        )
        .bind(owner_id)
        .bind(LISTING_RESERVED)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
