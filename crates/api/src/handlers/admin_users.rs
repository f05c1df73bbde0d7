//! Handlers for the `/admin/users` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::error::CoreError;
use pawhaven_core::roles::is_valid_role;
use pawhaven_core::types::DbId;
use pawhaven_core::validation::validate_admin_message;
use pawhaven_db::models::user::{AdminUpdateUser, UserResponse};
use pawhaven_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::users::ensure_no_live_claims;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}/verification`.
#[derive(Debug, serde::Deserialize)]
pub struct SetVerificationRequest {
    pub verified: bool,
    pub admin_message: Option<String>,
}

/// GET /api/v1/admin/users
///
/// List every account, newest first, as safe profiles.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /api/v1/admin/users/{id}
///
/// Partial update of profile fields and role.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdateUser>,
) -> AppResult<Json<UserResponse>> {
    if let Some(role) = &input.role {
        if !is_valid_role(role) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "'{role}' is not a valid role"
            ))));
        }
    }

    let user = UserRepo::admin_update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Hard delete, with the same live-claims guard as self-deletion.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_no_live_claims(&state.pool, id).await?;

    let deleted = UserRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(user_id = id, "Account deleted by admin");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

/// PUT /api/v1/admin/users/{id}/verification
///
/// Record the manual identity-review decision and notify the account
/// holder best-effort.
pub async fn set_verification(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetVerificationRequest>,
) -> AppResult<Json<UserResponse>> {
    validate_admin_message(input.admin_message.as_deref())?;

    let user = UserRepo::set_verification(
        &state.pool,
        id,
        input.verified,
        input.admin_message.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    tracing::info!(user_id = id, verified = input.verified, "Verification decision recorded");

    if let Some(mailer) = &state.mailer {
        let mailer = Arc::clone(mailer);
        let email = user.email.clone();
        let first_name = user.first_name.clone();
        let admin_message = user.admin_message.clone();
        let verified = user.verified;
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_verification_decision(&email, &first_name, verified, admin_message.as_deref())
                .await
            {
                tracing::warn!(error = %e, "Failed to send verification email");
            }
        });
    }

    Ok(Json(user.into()))
}
