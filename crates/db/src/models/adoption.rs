//! Adoption request entity model, DTOs, and read-side projection rows.

use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::listing::ListingSummary;

/// Row from the `adoption_requests` table.
///
/// The contact fields are a snapshot captured at submission time; they do
/// not track later edits to the requester's profile.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdoptionRequest {
    pub id: DbId,
    pub requester_id: DbId,
    pub full_name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
    pub listing_ids: Vec<DbId>,
    pub status: String,
    pub admin_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting an adoption request.
#[derive(Debug, Deserialize)]
pub struct SubmitAdoptionRequest {
    pub listing_ids: Vec<DbId>,
    pub full_name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
}

/// Admin review-queue row: a pending request joined with a summarized
/// requester identity. No password or OTP material is exposed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PendingRequestRow {
    pub id: DbId,
    pub requester_id: DbId,
    pub full_name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
    pub listing_ids: Vec<DbId>,
    pub admin_message: Option<String>,
    pub created_at: Timestamp,
    pub requester_first_name: String,
    pub requester_last_name: String,
    pub requester_email: String,
    pub requester_verified: bool,
}

/// A request paired with the current state of the listings it references.
#[derive(Debug, Serialize)]
pub struct RequestWithListings {
    pub request: AdoptionRequest,
    pub listings: Vec<ListingSummary>,
}

/// A review-queue entry paired with its listing summaries.
#[derive(Debug, Serialize)]
pub struct PendingRequestItem {
    pub request: PendingRequestRow,
    pub listings: Vec<ListingSummary>,
}
