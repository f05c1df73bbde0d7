//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_users, adoptions};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                    -> list
/// PUT    /users/{id}               -> update
/// DELETE /users/{id}               -> delete
/// PUT    /users/{id}/verification  -> set_verification
/// GET    /adoptions                -> list_all (?status)
/// GET    /adoptions/pending        -> list_pending
/// POST   /adoptions/reset          -> reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin_users::list))
        .route(
            "/users/{id}",
            put(admin_users::update).delete(admin_users::delete),
        )
        .route(
            "/users/{id}/verification",
            put(admin_users::set_verification),
        )
        .route("/adoptions", get(adoptions::list_all))
        .route("/adoptions/pending", get(adoptions::list_pending))
        .route("/adoptions/reset", post(adoptions::reset))
}
