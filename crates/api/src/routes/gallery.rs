//! Route definitions for the `/gallery` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::gallery;
use crate::state::AppState;

/// Routes mounted at `/gallery`.
///
/// Reads are public; writes require the `admin` role.
///
/// ```text
/// GET    /       -> list (?category)
/// POST   /       -> create (multipart)
/// PUT    /{id}   -> update (multipart)
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::list).post(gallery::create))
        .route("/{id}", put(gallery::update).delete(gallery::delete))
}
