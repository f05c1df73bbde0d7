//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! on top of a per-test database pool, plus request/response helpers and
//! database fixtures.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use pawhaven_api::auth::jwt::JwtConfig;
use pawhaven_api::auth::password::hash_password;
use pawhaven_api::config::ServerConfig;
use pawhaven_api::router::build_app_router;
use pawhaven_api::state::AppState;
use pawhaven_core::roles::ROLE_ADMIN;
use pawhaven_core::types::DbId;
use pawhaven_db::models::listing::{CreatePetListing, PetListing};
use pawhaven_db::models::user::{AdminUpdateUser, CreateUser, User};
use pawhaven_db::repositories::{ListingRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uploads land in a unique directory under the system temp dir so
/// concurrent tests never collide.
pub fn test_config() -> ServerConfig {
    let upload_dir = std::env::temp_dir().join(format!("pawhaven-test-uploads-{}", Uuid::new_v4()));

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_hours: 72,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. No mailer is attached, so notification emails are
/// skipped exactly as on a server without SMTP configured.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: None,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart helpers
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "pawhaven-test-boundary";

/// Minimal `multipart/form-data` body builder for upload tests.
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Append a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Append a file field with the given filename and content type.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

async fn multipart_request(
    app: Router,
    method: &str,
    uri: &str,
    body: MultipartBody,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.finish()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    body: MultipartBody,
    token: &str,
) -> Response {
    multipart_request(app, "POST", uri, body, token).await
}

pub async fn put_multipart_auth(
    app: Router,
    uri: &str,
    body: MultipartBody,
    token: &str,
) -> Response {
    multipart_request(app, "PUT", uri, body, token).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a regular user directly in the database and return the row plus
/// the plaintext password used.
pub async fn create_user(pool: &PgPool, email: &str) -> (User, String) {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let input = CreateUser {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password_hash: hashed,
        address: "12 Shelter Lane".to_string(),
        contact_number: "09171234567".to_string(),
        facebook: None,
        valid_document: None,
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    (user, password.to_string())
}

/// Create a user and promote them to the admin role.
pub async fn create_admin(pool: &PgPool, email: &str) -> (User, String) {
    let (user, password) = create_user(pool, email).await;
    let update = AdminUpdateUser {
        role: Some(ROLE_ADMIN.to_string()),
        ..Default::default()
    };
    let admin = UserRepo::admin_update(pool, user.id, &update)
        .await
        .expect("role update should succeed")
        .expect("user should exist");
    (admin, password)
}

/// Log a user in via the API and return the bearer token.
pub async fn login_token(app: Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["token"].as_str().expect("token in response").to_string()
}

/// Create an available pet listing directly in the database.
pub async fn create_listing(pool: &PgPool, owner_id: DbId) -> PetListing {
    let input = CreatePetListing {
        owner_id,
        species: "dog".to_string(),
        breed: "aspin".to_string(),
        gender: "male".to_string(),
        age: 2,
        caption: "Friendly, vaccinated, good with kids".to_string(),
        medical_history: vec!["dewormed 2026-01".to_string()],
        photo_paths: vec!["images/fixture.jpg".to_string()],
        document_paths: Vec::new(),
    };
    ListingRepo::create(pool, &input)
        .await
        .expect("listing creation should succeed")
}
