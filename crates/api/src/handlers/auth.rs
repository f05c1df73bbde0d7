//! Handlers for the `/auth` resource (register, login, OTP password reset).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use pawhaven_core::error::CoreError;
use pawhaven_core::otp::{self, OTP_TTL_MINS};
use pawhaven_core::validation::{validate_email, validate_password, validate_required};
use pawhaven_db::models::user::{CreateUser, User, UserResponse};
use pawhaven_db::repositories::UserRepo;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, serde::Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub contact_number: String,
    pub facebook: Option<String>,
    /// Reference string of an already-uploaded identity document.
    pub valid_document: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, serde::Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/otp/request`.
#[derive(Debug, serde::Deserialize)]
pub struct OtpRequest {
    pub email: String,
}

/// Request body for `POST /auth/otp/reset`.
#[derive(Debug, serde::Deserialize)]
pub struct OtpReset {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, serde::Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and log it in. Returns 201 with a token and the safe
/// profile, or 409 when the email is already taken.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    // 1. Fail fast on invalid input, before any store mutation.
    validate_required("first_name", &input.first_name)?;
    validate_required("last_name", &input.last_name)?;
    validate_required("address", &input.address)?;
    validate_required("contact_number", &input.contact_number)?;
    validate_email(&input.email)?;
    validate_password(&input.password)?;

    // 2. Reject duplicate emails with a readable message. The uq_users_email
    //    index still backstops a racing registration.
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    // 3. Hash the password and create the row.
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        password_hash,
        address: input.address,
        contact_number: input.contact_number,
        facebook: input.facebook,
        valid_document: input.valid_document,
    };
    let user = UserRepo::create(&state.pool, &create).await?;
    tracing::info!(user_id = user.id, "New account registered");

    // 4. Issue the token.
    let response = build_auth_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. The failure message never reveals
/// whether the account exists.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let response = build_auth_response(&state, user)?;
    Ok(Json(response))
}

/// POST /api/v1/auth/otp/request
///
/// Issue a password-reset code. Responds 200 with the same message whether
/// or not the email belongs to an account, so callers cannot probe for
/// registered addresses.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    if let Some(user) = UserRepo::find_by_email(&state.pool, &input.email).await? {
        let generated = otp::generate_otp(Utc::now());
        UserRepo::set_otp(&state.pool, user.id, &generated.hash, generated.expires_at).await?;
        tracing::info!(user_id = user.id, "Password reset code issued");

        // Best-effort delivery; the reset flow works regardless.
        if let Some(mailer) = &state.mailer {
            let mailer = Arc::clone(mailer);
            let code = generated.plaintext;
            tokio::spawn(async move {
                if let Err(e) = mailer
                    .send_password_otp(&user.email, &user.first_name, &code, OTP_TTL_MINS)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to send password reset email");
                }
            });
        }
    }

    Ok(Json(MessageResponse {
        message: "If that email belongs to an account, a reset code has been sent".into(),
    }))
}

/// POST /api/v1/auth/otp/reset
///
/// Complete a password reset with the emailed code. Invalid and expired
/// codes are indistinguishable in the response.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<OtpReset>,
) -> AppResult<Json<MessageResponse>> {
    validate_password(&input.new_password)?;

    let invalid_code =
        || AppError::Core(CoreError::Unauthorized("Invalid or expired reset code".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid_code)?;

    let (Some(stored_hash), Some(expires_at)) = (&user.otp_hash, user.otp_expires_at) else {
        return Err(invalid_code());
    };
    if !otp::verify_otp(&input.code, stored_hash, expires_at, Utc::now()) {
        return Err(invalid_code());
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let updated = UserRepo::reset_password(&state.pool, user.id, &password_hash).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }));
    }
    tracing::info!(user_id = user.id, "Password reset completed");

    Ok(Json(MessageResponse {
        message: "Password has been reset".into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a token for `user` and assemble the auth response.
fn build_auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = generate_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let expires_in = state.config.jwt.expiry_hours * 3600;

    Ok(AuthResponse {
        token,
        expires_in,
        user: user.into(),
    })
}
