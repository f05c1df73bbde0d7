//! Route definitions for the `/listings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// Browsing is public; creation requires authentication and mutation is
/// restricted to the listing owner or an admin (enforced in the handlers).
///
/// ```text
/// GET    /                -> list (?status, ?species, ?breed, ?owner_id)
/// POST   /                -> create (multipart)
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// POST   /{id}/withdraw   -> withdraw
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listings::list).post(listings::create))
        .route(
            "/{id}",
            get(listings::get_by_id)
                .put(listings::update)
                .delete(listings::delete),
        )
        .route("/{id}/withdraw", post(listings::withdraw))
}
