//! Handlers for the adoption-request workflow.
//!
//! Every lifecycle mutation goes through
//! [`pawhaven_db::workflow::AdoptionWorkflow`]; these handlers add
//! authentication, the admin review surface, and best-effort decision
//! emails on top of it.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::status::RequestStatus;
use pawhaven_core::types::DbId;
use pawhaven_db::models::adoption::{
    AdoptionRequest, PendingRequestItem, RequestWithListings, SubmitAdoptionRequest,
};
use pawhaven_db::repositories::AdoptionRequestRepo;
use pawhaven_db::workflow::{AdoptionWorkflow, ResetOutcome};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for the admin decision routes (approve / decline).
#[derive(Debug, serde::Deserialize)]
pub struct DecisionRequest {
    pub admin_message: Option<String>,
}

/// Query parameters for `GET /admin/adoptions`.
#[derive(Debug, serde::Deserialize)]
pub struct AdoptionQuery {
    pub status: Option<String>,
}

/// POST /api/v1/adoptions
///
/// Submit an adoption request for one or more listings. All referenced
/// listings are reserved atomically; a lost race surfaces as 409.
pub async fn submit(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<SubmitAdoptionRequest>,
) -> AppResult<(StatusCode, Json<AdoptionRequest>)> {
    let request = AdoptionWorkflow::submit(&state.pool, auth_user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/v1/adoptions/mine
///
/// The caller's requests, any status, each joined with the current state
/// of the listings it references.
pub async fn mine(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<Vec<RequestWithListings>>> {
    let requests =
        AdoptionRequestRepo::list_for_requester_with_listings(&state.pool, auth_user.user_id)
            .await?;
    Ok(Json(requests))
}

/// DELETE /api/v1/adoptions/{id}
///
/// Cancel a pending request. Only the requester may cancel; the request
/// row is removed and its listings are released.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth_user: AuthUser,
) -> AppResult<StatusCode> {
    AdoptionWorkflow::cancel(&state.pool, id, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/adoptions/{id}/approve
///
/// Approve a pending request. Listings stay reserved; the requester is
/// notified best-effort.
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<AdoptionRequest>> {
    let request =
        AdoptionWorkflow::approve(&state.pool, id, input.admin_message.as_deref()).await?;
    notify_decision(&state, &request, true);
    Ok(Json(request))
}

/// PUT /api/v1/adoptions/{id}/decline
///
/// Decline a pending request, releasing every referenced listing back to
/// `available`. The requester is notified best-effort.
pub async fn decline(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<AdoptionRequest>> {
    let request =
        AdoptionWorkflow::decline(&state.pool, id, input.admin_message.as_deref()).await?;
    notify_decision(&state, &request, false);
    Ok(Json(request))
}

/// PUT /api/v1/adoptions/{id}/restore
///
/// Reopen a decided request. Fails with 409 when a listing was claimed by
/// another request in the interim.
pub async fn restore(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<AdoptionRequest>> {
    let request = AdoptionWorkflow::restore(&state.pool, id).await?;
    Ok(Json(request))
}

/// GET /api/v1/admin/adoptions
///
/// Full request list, optionally filtered by status, newest first.
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<AdoptionQuery>,
) -> AppResult<Json<Vec<AdoptionRequest>>> {
    let status = match query.status {
        Some(s) => Some(RequestStatus::from_str(&s)?.as_str()),
        None => None,
    };
    let requests = AdoptionRequestRepo::list_all(&state.pool, status).await?;
    Ok(Json(requests))
}

/// GET /api/v1/admin/adoptions/pending
///
/// The review queue: pending requests, newest first, with requester
/// summaries and listing summaries.
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<PendingRequestItem>>> {
    let queue = AdoptionRequestRepo::list_pending_for_admin(&state.pool).await?;
    Ok(Json(queue))
}

/// POST /api/v1/admin/adoptions/reset
///
/// Administrative escape hatch: delete every request and release every
/// reserved listing.
pub async fn reset(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ResetOutcome>> {
    let outcome = AdoptionWorkflow::reset_all(&state.pool).await?;
    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Email the decision to the request's contact snapshot address.
/// Failures are logged and never affect the response.
fn notify_decision(state: &AppState, request: &AdoptionRequest, approved: bool) {
    let Some(mailer) = &state.mailer else {
        return;
    };
    let mailer = Arc::clone(mailer);
    let email = request.email.clone();
    let full_name = request.full_name.clone();
    let admin_message = request.admin_message.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer
            .send_request_decision(&email, &full_name, approved, admin_message.as_deref())
            .await
        {
            tracing::warn!(error = %e, "Failed to send decision email");
        }
    });
}
