//! Handlers for the `/users` resource (self-service account routes).
//!
//! Every route here is self-or-admin: a user may only read, edit, or delete
//! their own account, while admins may act on any account through the same
//! paths.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::error::CoreError;
use pawhaven_core::roles::ROLE_ADMIN;
use pawhaven_core::types::DbId;
use pawhaven_db::models::user::{UpdateProfile, UserResponse};
use pawhaven_db::repositories::{AdoptionRequestRepo, ListingRepo, UserRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Verification status of an account, as polled by the frontend to gate
/// features on manual review.
#[derive(Debug, serde::Serialize)]
pub struct VerificationResponse {
    pub verified: bool,
    pub admin_message: Option<String>,
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    ensure_self_or_admin(&auth_user, id)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/users/{id}
///
/// Partial profile update. Role and verification state cannot be changed
/// here; those live on the admin routes.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth_user: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<UserResponse>> {
    ensure_self_or_admin(&auth_user, id)?;
    let user = UserRepo::update_profile(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{id}
///
/// Hard delete. Fails with 409 while the account still holds live workflow
/// state (a pending adoption request, or an owned listing that another
/// user's request has reserved).
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth_user: AuthUser,
) -> AppResult<StatusCode> {
    ensure_self_or_admin(&auth_user, id)?;
    ensure_no_live_claims(&state.pool, id).await?;

    let deleted = UserRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(user_id = id, "Account deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

/// GET /api/v1/users/{id}/verification
pub async fn get_verification(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth_user: AuthUser,
) -> AppResult<Json<VerificationResponse>> {
    ensure_self_or_admin(&auth_user, id)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(VerificationResponse {
        verified: user.verified,
        admin_message: user.admin_message,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Allow the account holder and admins; reject everyone else with 403.
fn ensure_self_or_admin(auth_user: &AuthUser, id: DbId) -> Result<(), AppError> {
    if auth_user.user_id != id && auth_user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only manage your own account".into(),
        )));
    }
    Ok(())
}

/// Deletion guard shared with the admin route: an account cannot go away
/// while the workflow still depends on it.
pub(crate) async fn ensure_no_live_claims(pool: &PgPool, user_id: DbId) -> Result<(), AppError> {
    let pending = AdoptionRequestRepo::count_pending_for_requester(pool, user_id).await?;
    if pending > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete an account with pending adoption requests".into(),
        )));
    }

    let reserved = ListingRepo::count_reserved_for_owner(pool, user_id).await?;
    if reserved > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete an account while one of its listings is reserved".into(),
        )));
    }

    Ok(())
}
