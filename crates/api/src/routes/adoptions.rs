//! Route definitions for the `/adoptions` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::adoptions;
use crate::state::AppState;

/// Routes mounted at `/adoptions`.
///
/// Submission and cancellation belong to the requester; the decision
/// verbs require the `admin` role (enforced by handler extractors).
///
/// ```text
/// POST   /               -> submit
/// GET    /mine           -> mine
/// DELETE /{id}           -> cancel
/// PUT    /{id}/approve   -> approve (admin)
/// PUT    /{id}/decline   -> decline (admin)
/// PUT    /{id}/restore   -> restore (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(adoptions::submit))
        .route("/mine", get(adoptions::mine))
        .route("/{id}", delete(adoptions::cancel))
        .route("/{id}/approve", put(adoptions::approve))
        .route("/{id}/decline", put(adoptions::decline))
        .route("/{id}/restore", put(adoptions::restore))
}
