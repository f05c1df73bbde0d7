//! The adoption workflow engine.
//!
//! Owns every status transition on `adoption_requests` and `pet_listings`
//! and the single-claim invariant binding them: a listing is reserved by at
//! most one active request at any time. No other component writes either
//! status column.
//!
//! Every operation runs inside one transaction. Listing claims are taken
//! with conditional writes (`SET status = 'reserved' WHERE status =
//! 'available'`) and checked by affected-row count, so two racing claims
//! over the same listing serialize on the row lock and exactly one wins;
//! the loser's transaction rolls back without partial effects. Request-side
//! transitions first lock the request row with `SELECT ... FOR UPDATE`,
//! which serializes concurrent decisions on the same request.

use pawhaven_core::error::CoreError;
use pawhaven_core::status::{RequestStatus, LISTING_AVAILABLE, LISTING_RESERVED};
use pawhaven_core::types::DbId;
use pawhaven_core::validation;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::adoption::{AdoptionRequest, SubmitAdoptionRequest};

/// Column list for `adoption_requests` rows returned by transitions.
const COLUMNS: &str = "id, requester_id, full_name, email, contact_number, address, \
                        listing_ids, status, admin_message, created_at, updated_at";

/// Error type for workflow operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A domain rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store itself failed.
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Counts reported by [`AdoptionWorkflow::reset_all`].
#[derive(Debug, Serialize)]
pub struct ResetOutcome {
    pub requests_deleted: u64,
    pub listings_released: u64,
}

/// Orchestrates cross-store state transitions for adoption requests.
///
/// Stateless; every method is a self-contained transaction against the
/// shared pool, so multiple server processes can run it safely.
pub struct AdoptionWorkflow;

impl AdoptionWorkflow {
    /// Submit a new adoption request claiming `listing_ids`.
    ///
    /// Validation rejects empty or duplicated listing sets and incomplete
    /// contact snapshots before any store write. The claim itself is a
    /// single check-and-reserve step: if any referenced listing is not
    /// `available`, nothing is created and the caller sees `Conflict`
    /// (or `NotFound` when the id does not exist at all).
    pub async fn submit(
        pool: &PgPool,
        requester_id: DbId,
        input: &SubmitAdoptionRequest,
    ) -> WorkflowResult<AdoptionRequest> {
        validation::validate_listing_refs(&input.listing_ids)?;
        validation::validate_contact(
            &input.full_name,
            &input.email,
            &input.contact_number,
            &input.address,
        )?;

        let mut tx = pool.begin().await?;

        reserve_listings(&mut tx, &input.listing_ids).await?;

        let query = format!(
            "INSERT INTO adoption_requests
                (requester_id, full_name, email, contact_number, address, listing_ids)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, AdoptionRequest>(&query)
            .bind(requester_id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.contact_number)
            .bind(&input.address)
            .bind(&input.listing_ids)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            request_id = request.id,
            requester_id,
            listings = request.listing_ids.len(),
            "Adoption request submitted"
        );
        Ok(request)
    }

    /// Approve a pending request. Listings stay reserved; they are now
    /// committed to the requester, not released.
    ///
    /// Approving a request that is already terminal fails with `Conflict`
    /// instead of silently re-applying the decision.
    pub async fn approve(
        pool: &PgPool,
        request_id: DbId,
        admin_message: Option<&str>,
    ) -> WorkflowResult<AdoptionRequest> {
        validation::validate_admin_message(admin_message)?;

        let mut tx = pool.begin().await?;
        let request = lock_request(&mut tx, request_id).await?;

        let status = RequestStatus::from_str(&request.status)?;
        if !status.can_transition_to(RequestStatus::Approved) {
            return Err(CoreError::Conflict(format!(
                "Cannot approve a request in '{}' status",
                status.as_str()
            ))
            .into());
        }

        let updated = set_request_status(
            &mut tx,
            request_id,
            RequestStatus::Approved,
            Some(admin_message),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(request_id, "Adoption request approved");
        Ok(updated)
    }

    /// Decline a pending request and release every referenced listing back
    /// to `available`.
    pub async fn decline(
        pool: &PgPool,
        request_id: DbId,
        admin_message: Option<&str>,
    ) -> WorkflowResult<AdoptionRequest> {
        validation::validate_admin_message(admin_message)?;

        let mut tx = pool.begin().await?;
        let request = lock_request(&mut tx, request_id).await?;

        let status = RequestStatus::from_str(&request.status)?;
        if !status.can_transition_to(RequestStatus::Rejected) {
            return Err(CoreError::Conflict(format!(
                "Cannot decline a request in '{}' status",
                status.as_str()
            ))
            .into());
        }

        release_listings(&mut tx, &request.listing_ids).await?;

        let updated = set_request_status(
            &mut tx,
            request_id,
            RequestStatus::Rejected,
            Some(admin_message),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            request_id,
            listings = request.listing_ids.len(),
            "Adoption request declined"
        );
        Ok(updated)
    }

    /// Reopen a terminal request back to `pending`.
    ///
    /// A rejected request must re-claim its listings, re-checking the
    /// single-claim invariant: if any listing was claimed by another
    /// request (or withdrawn) in the interim, restore fails with `Conflict`
    /// and the request stays terminal. An approved request never let go of
    /// its reservations, so they are verified under lock instead.
    pub async fn restore(pool: &PgPool, request_id: DbId) -> WorkflowResult<AdoptionRequest> {
        let mut tx = pool.begin().await?;
        let request = lock_request(&mut tx, request_id).await?;

        let status = RequestStatus::from_str(&request.status)?;
        match status {
            RequestStatus::Pending => {
                return Err(CoreError::Conflict(
                    "Request is already pending".to_string(),
                )
                .into());
            }
            RequestStatus::Rejected => reserve_listings(&mut tx, &request.listing_ids).await?,
            RequestStatus::Approved => {
                ensure_still_reserved(&mut tx, &request.listing_ids).await?
            }
        }

        let updated = set_request_status(&mut tx, request_id, RequestStatus::Pending, None).await?;
        tx.commit().await?;

        tracing::info!(
            request_id,
            from = status.as_str(),
            "Adoption request restored to pending"
        );
        Ok(updated)
    }

    /// Cancel a pending request: delete it and release its listings.
    ///
    /// Only the requester may cancel, and only while the request is
    /// `pending`. Both checks run before any mutation.
    pub async fn cancel(
        pool: &PgPool,
        request_id: DbId,
        requester_id: DbId,
    ) -> WorkflowResult<()> {
        let mut tx = pool.begin().await?;
        let request = lock_request(&mut tx, request_id).await?;

        if request.requester_id != requester_id {
            return Err(CoreError::Forbidden(
                "Only the requester may cancel an adoption request".to_string(),
            )
            .into());
        }

        let status = RequestStatus::from_str(&request.status)?;
        if status != RequestStatus::Pending {
            return Err(CoreError::Conflict(format!(
                "Cannot cancel a request in '{}' status",
                status.as_str()
            ))
            .into());
        }

        release_listings(&mut tx, &request.listing_ids).await?;

        sqlx::query("DELETE FROM adoption_requests WHERE id = $1")
            .bind(request_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            request_id,
            requester_id,
            listings = request.listing_ids.len(),
            "Adoption request cancelled"
        );
        Ok(())
    }

    /// Administrative escape hatch: delete every request and release every
    /// reserved listing. Used for data migration and test resets.
    pub async fn reset_all(pool: &PgPool) -> WorkflowResult<ResetOutcome> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM adoption_requests")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let released = sqlx::query("UPDATE pet_listings SET status = $1 WHERE status = $2")
            .bind(LISTING_AVAILABLE)
            .bind(LISTING_RESERVED)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::warn!(
            requests_deleted = deleted,
            listings_released = released,
            "Adoption workflow bulk reset"
        );
        Ok(ResetOutcome {
            requests_deleted: deleted,
            listings_released: released,
        })
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

/// Fetch a request row under `FOR UPDATE`, or fail with `NotFound`.
async fn lock_request(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
) -> WorkflowResult<AdoptionRequest> {
    let query = format!("SELECT {COLUMNS} FROM adoption_requests WHERE id = $1 FOR UPDATE");
    sqlx::query_as::<_, AdoptionRequest>(&query)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Adoption request",
                id,
            }
            .into()
        })
}

/// Claim every listing in `ids`: `available -> reserved` as one conditional
/// write. A shortfall in affected rows means a lost race, a withdrawn
/// listing, or a dangling reference; the error rolls the caller's
/// transaction back untouched.
async fn reserve_listings(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[DbId],
) -> WorkflowResult<()> {
    let result = sqlx::query("UPDATE pet_listings SET status = $2 WHERE id = ANY($1) AND status = $3")
        .bind(ids)
        .bind(LISTING_RESERVED)
        .bind(LISTING_AVAILABLE)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() as usize == ids.len() {
        return Ok(());
    }

    // Distinguish a dangling reference from a lost claim for the error.
    let found: Vec<(DbId,)> = sqlx::query_as("SELECT id FROM pet_listings WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut **tx)
        .await?;
    if let Some(missing) = ids.iter().find(|id| !found.iter().any(|(f,)| f == *id)) {
        return Err(CoreError::NotFound {
            entity: "Listing",
            id: *missing,
        }
        .into());
    }
    Err(CoreError::Conflict("One or more listings are no longer available".to_string()).into())
}

/// Release every listing in `ids`: `reserved -> available`.
///
/// All of them must currently be reserved by the caller's request; a
/// shortfall means the stores disagree and the transaction rolls back.
async fn release_listings(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[DbId],
) -> WorkflowResult<()> {
    let result = sqlx::query("UPDATE pet_listings SET status = $2 WHERE id = ANY($1) AND status = $3")
        .bind(ids)
        .bind(LISTING_AVAILABLE)
        .bind(LISTING_RESERVED)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() as usize != ids.len() {
        return Err(CoreError::Conflict(
            "Listing reservations are inconsistent with this request".to_string(),
        )
        .into());
    }
    Ok(())
}

/// Verify every listing in `ids` is still reserved, taking row locks.
///
/// Used when restoring an approved request, whose reservations were never
/// released.
async fn ensure_still_reserved(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[DbId],
) -> WorkflowResult<()> {
    let rows: Vec<(DbId,)> = sqlx::query_as(
        "SELECT id FROM pet_listings WHERE id = ANY($1) AND status = $2 FOR UPDATE",
    )
    .bind(ids)
    .bind(LISTING_RESERVED)
    .fetch_all(&mut **tx)
    .await?;

    if rows.len() != ids.len() {
        return Err(CoreError::Conflict(
            "Listing reservations are inconsistent with this request".to_string(),
        )
        .into());
    }
    Ok(())
}

/// Apply a request status transition, optionally writing the admin message.
///
/// `admin_message` semantics: `None` leaves the stored message untouched
/// (restore); `Some(msg)` overwrites it, clearing on `Some(None)`.
async fn set_request_status(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
    status: RequestStatus,
    admin_message: Option<Option<&str>>,
) -> WorkflowResult<AdoptionRequest> {
    let request = match admin_message {
        Some(message) => {
            let query = format!(
                "UPDATE adoption_requests SET status = $2, admin_message = $3
                 WHERE id = $1
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, AdoptionRequest>(&query)
                .bind(id)
                .bind(status.as_str())
                .bind(message)
                .fetch_one(&mut **tx)
                .await?
        }
        None => {
            let query = format!(
                "UPDATE adoption_requests SET status = $2
                 WHERE id = $1
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, AdoptionRequest>(&query)
                .bind(id)
                .bind(status.as_str())
                .fetch_one(&mut **tx)
                .await?
        }
    };
    Ok(request)
}
