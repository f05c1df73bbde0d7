//! Read-side repository for the `adoption_requests` table.
//!
//! All lifecycle mutations (submit, approve, decline, restore, cancel,
//! reset) go through [`crate::workflow::AdoptionWorkflow`]. This repository
//! provides lookups and the query projections for the admin and user
//! dashboards.

use std::collections::HashMap;

use pawhaven_core::status::REQUEST_PENDING;
use pawhaven_core::types::DbId;
use sqlx::PgPool;

use crate::models::adoption::{
    AdoptionRequest, PendingRequestItem, PendingRequestRow, RequestWithListings,
};
use crate::models::listing::ListingSummary;
use crate::repositories::ListingRepo;

/// Column list shared across queries.
const COLUMNS: &str = "id, requester_id, full_name, email, contact_number, address, \
                        listing_ids, status, admin_message, created_at, updated_at";

/// Provides read access to adoption requests.
pub struct AdoptionRequestRepo;

impl AdoptionRequestRepo {
    /// Find a request by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AdoptionRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM adoption_requests WHERE id = $1");
        sqlx::query_as::<_, AdoptionRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all requests, optionally filtered by status, newest first.
    pub async fn list_all(
        pool: &PgPool,
        status: Option<&str>,
    ) -> Result<Vec<AdoptionRequest>, sqlx::Error> {
        match status {
            Some(s) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM adoption_requests
                     WHERE status = $1
                     ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, AdoptionRequest>(&query)
                    .bind(s)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM adoption_requests ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, AdoptionRequest>(&query)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// List a user's own requests, any status, newest first.
    pub async fn list_for_requester(
        pool: &PgPool,
        requester_id: DbId,
    ) -> Result<Vec<AdoptionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM adoption_requests
             WHERE requester_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AdoptionRequest>(&query)
            .bind(requester_id)
            .fetch_all(pool)
            .await
    }

    /// A user's requests joined with the current state of their listings.
    pub async fn list_for_requester_with_listings(
        pool: &PgPool,
        requester_id: DbId,
    ) -> Result<Vec<RequestWithListings>, sqlx::Error> {
        let requests = Self::list_for_requester(pool, requester_id).await?;
        let summaries = Self::summaries_for(pool, &requests).await?;

        Ok(requests
            .into_iter()
            .map(|request| {
                let listings = collect_in_order(&request.listing_ids, &summaries);
                RequestWithListings { request, listings }
            })
            .collect())
    }

    /// The admin review queue: pending requests, newest first, each joined
    /// with a summarized requester identity and its listing summaries.
    pub async fn list_pending_for_admin(
        pool: &PgPool,
    ) -> Result<Vec<PendingRequestItem>, sqlx::Error> {
        let rows = sqlx::query_as::<_, PendingRequestRow>(
            "SELECT
                r.id, r.requester_id, r.full_name, r.email, r.contact_number,
                r.address, r.listing_ids, r.admin_message, r.created_at,
                u.first_name AS requester_first_name,
                u.last_name AS requester_last_name,
                u.email AS requester_email,
                u.verified AS requester_verified
             FROM adoption_requests r
             JOIN users u ON u.id = r.requester_id
             WHERE r.status = $1
             ORDER BY r.created_at DESC",
        )
        .bind(REQUEST_PENDING)
        .fetch_all(pool)
        .await?;

        let all_ids: Vec<DbId> = rows.iter().flat_map(|r| r.listing_ids.clone()).collect();
        let summaries = index_summaries(ListingRepo::summaries_by_ids(pool, &all_ids).await?);

        Ok(rows
            .into_iter()
            .map(|request| {
                let listings = collect_in_order(&request.listing_ids, &summaries);
                PendingRequestItem { request, listings }
            })
            .collect())
    }

    /// Count a user's pending requests. Guard for user hard-delete.
    pub async fn count_pending_for_requester(
        pool: &PgPool,
        requester_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM adoption_requests WHERE requester_id = $1 AND status = $2",
        )
        .bind(requester_id)
        .bind(REQUEST_PENDING)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Fetch summaries for every listing referenced by `requests`, indexed
    /// by listing id.
    async fn summaries_for(
        pool: &PgPool,
        requests: &[AdoptionRequest],
    ) -> Result<HashMap<DbId, ListingSummary>, sqlx::Error> {
        let all_ids: Vec<DbId> = requests
            .iter()
            .flat_map(|r| r.listing_ids.clone())
            .collect();
        Ok(index_summaries(
            ListingRepo::summaries_by_ids(pool, &all_ids).await?,
        ))
    }
}

/// Index summaries by listing id for assembly.
fn index_summaries(summaries: Vec<ListingSummary>) -> HashMap<DbId, ListingSummary> {
    summaries.into_iter().map(|s| (s.id, s)).collect()
}

/// Pick summaries in the request's own listing order, skipping ids whose
/// listing row no longer exists.
fn collect_in_order(
    ids: &[DbId],
    summaries: &HashMap<DbId, ListingSummary>,
) -> Vec<ListingSummary> {
    ids.iter()
        .filter_map(|id| summaries.get(id).cloned())
        .collect()
}
