//! HTTP-level integration tests for registration, login, and password reset.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, create_user, login_token, post_json};
use pawhaven_core::otp::generate_otp;
use pawhaven_db::repositories::UserRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Successful registration returns 201 with a token and the new profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_201_with_token_and_profile(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "first_name": "Maria",
        "last_name": "Santos",
        "email": "maria@example.com",
        "password": "a_decent_password",
        "address": "45 Rescue Road",
        "contact_number": "09179876543"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    assert!(json["token"].is_string(), "response must contain a token");
    assert!(json["expires_in"].is_number());
    assert_eq!(json["user"]["email"], "maria@example.com");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["user"]["verified"], false);
    // Credential material must never appear in responses.
    assert!(json["user"].get("password_hash").is_none());
    assert!(json["user"].get("otp_hash").is_none());
}

/// Registering a duplicate email returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_duplicate_email_returns_409(pool: PgPool) {
    let (_user, _) = create_user(&pool, "taken@example.com").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "first_name": "Other",
        "last_name": "Person",
        "email": "taken@example.com",
        "password": "a_decent_password",
        "address": "1 Elsewhere St",
        "contact_number": "09170000000"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

/// A malformed email address is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_invalid_email_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "first_name": "Bad",
        "last_name": "Email",
        "email": "not-an-email",
        "password": "a_decent_password",
        "address": "1 Somewhere St",
        "contact_number": "09170000000"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// A password below the minimum length is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_short_password_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "first_name": "Short",
        "last_name": "Password",
        "email": "short@example.com",
        "password": "tiny",
        "address": "1 Somewhere St",
        "contact_number": "09170000000"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Blank required fields are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_blank_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({
        "first_name": "   ",
        "last_name": "Blank",
        "email": "blank@example.com",
        "password": "a_decent_password",
        "address": "1 Somewhere St",
        "contact_number": "09170000000"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with a token and user info.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_success(pool: PgPool) {
    let (user, password) = create_user(&pool, "login@example.com").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "login@example.com", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["email"], "login@example.com");
}

/// Email lookup is case-insensitive.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_email_is_case_insensitive(pool: PgPool) {
    let (_user, password) = create_user(&pool, "mixed@example.com").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "MIXED@Example.COM", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_wrong_password_returns_401(pool: PgPool) {
    let (_user, _password) = create_user(&pool, "wrongpw@example.com").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "wrongpw@example.com", "password": "incorrect" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with a nonexistent email returns the same 401 as a bad password,
/// so responses do not reveal which accounts exist.
#[sqlx::test(migrations = "../db/migrations")]
async fn login_unknown_email_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@example.com", "password": "whatever" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid email or password");
}

// ---------------------------------------------------------------------------
// Password reset (OTP)
// ---------------------------------------------------------------------------

/// Requesting a reset code for a known account stores an OTP digest.
#[sqlx::test(migrations = "../db/migrations")]
async fn otp_request_stores_digest_for_known_account(pool: PgPool) {
    let (user, _) = create_user(&pool, "forgot@example.com").await;
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "email": "forgot@example.com" });
    let response = post_json(app, "/api/v1/auth/otp/request", body).await;

    assert_eq!(response.status(), StatusCode::OK);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.otp_hash.is_some(), "an OTP digest must be stored");
    assert!(stored.otp_expires_at.is_some());
}

/// Requesting a reset code for an unknown email still returns 200, with
/// the same message, so the endpoint cannot be used to enumerate accounts.
#[sqlx::test(migrations = "../db/migrations")]
async fn otp_request_unknown_email_returns_200(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "nobody@example.com" });
    let response = post_json(app, "/api/v1/auth/otp/request", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].is_string());
}

/// Full reset flow: a valid code sets the new password and invalidates
/// the old one.
#[sqlx::test(migrations = "../db/migrations")]
async fn otp_reset_with_valid_code_changes_password(pool: PgPool) {
    let (user, old_password) = create_user(&pool, "reset@example.com").await;

    // Plant a known code the way the request endpoint would.
    let otp = generate_otp(Utc::now());
    UserRepo::set_otp(&pool, user.id, &otp.hash, otp.expires_at)
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "email": "reset@example.com",
        "code": otp.plaintext,
        "new_password": "brand_new_password"
    });
    let response = post_json(app.clone(), "/api/v1/auth/otp/reset", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // New password works.
    let _token = login_token(app.clone(), "reset@example.com", "brand_new_password").await;

    // Old password no longer does.
    let body = serde_json::json!({ "email": "reset@example.com", "password": old_password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A used code cannot be replayed.
#[sqlx::test(migrations = "../db/migrations")]
async fn otp_reset_code_is_single_use(pool: PgPool) {
    let (user, _) = create_user(&pool, "replay@example.com").await;

    let otp = generate_otp(Utc::now());
    UserRepo::set_otp(&pool, user.id, &otp.hash, otp.expires_at)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "replay@example.com",
        "code": otp.plaintext,
        "new_password": "brand_new_password"
    });
    let response = post_json(app.clone(), "/api/v1/auth/otp/reset", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app, "/api/v1/auth/otp/reset", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A wrong code returns 401 without changing anything.
#[sqlx::test(migrations = "../db/migrations")]
async fn otp_reset_wrong_code_returns_401(pool: PgPool) {
    let (user, password) = create_user(&pool, "wrongcode@example.com").await;

    let otp = generate_otp(Utc::now());
    UserRepo::set_otp(&pool, user.id, &otp.hash, otp.expires_at)
        .await
        .unwrap();

    // A six-digit code space makes an off-by-one guess the natural wrong input.
    let wrong_code = if otp.plaintext == "000000" { "000001" } else { "000000" };

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "wrongcode@example.com",
        "code": wrong_code,
        "new_password": "brand_new_password"
    });
    let response = post_json(app.clone(), "/api/v1/auth/otp/reset", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The original password still works.
    let _token = login_token(app, "wrongcode@example.com", &password).await;
}

/// An expired code returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn otp_reset_expired_code_returns_401(pool: PgPool) {
    let (user, _) = create_user(&pool, "expired@example.com").await;

    // Generate as if 30 minutes ago, well past the 10-minute window.
    let otp = generate_otp(Utc::now() - Duration::minutes(30));
    UserRepo::set_otp(&pool, user.id, &otp.hash, otp.expires_at)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "expired@example.com",
        "code": otp.plaintext,
        "new_password": "brand_new_password"
    });
    let response = post_json(app, "/api/v1/auth/otp/reset", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Resetting to a too-short password is rejected before the code is spent.
#[sqlx::test(migrations = "../db/migrations")]
async fn otp_reset_weak_password_returns_400(pool: PgPool) {
    let (user, _) = create_user(&pool, "weakpw@example.com").await;

    let otp = generate_otp(Utc::now());
    UserRepo::set_otp(&pool, user.id, &otp.hash, otp.expires_at)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "email": "weakpw@example.com",
        "code": otp.plaintext,
        "new_password": "tiny"
    });
    let response = post_json(app, "/api/v1/auth/otp/reset", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
