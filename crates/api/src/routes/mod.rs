pub mod admin;
pub mod adoptions;
pub mod auth;
pub mod gallery;
pub mod health;
pub mod listings;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                    register (public)
/// /auth/login                       login (public)
/// /auth/otp/request                 request password reset code (public)
/// /auth/otp/reset                   reset password with code (public)
///
/// /users/{id}                       get, update, delete (self or admin)
/// /users/{id}/verification          verification status (self or admin)
///
/// /admin/users                      list users (admin only)
/// /admin/users/{id}                 update, delete
/// /admin/users/{id}/verification    set verification decision (PUT)
/// /admin/adoptions                  list all requests (?status)
/// /admin/adoptions/pending          pending review queue
/// /admin/adoptions/reset            bulk reset (POST)
///
/// /gallery                          list (public), create (admin, multipart)
/// /gallery/{id}                     update (admin, multipart), delete (admin)
///
/// /listings                         list (public, ?status ?species ?breed ?owner_id),
///                                   create (auth, multipart)
/// /listings/{id}                    get (public), update, delete (owner or admin)
/// /listings/{id}/withdraw           withdraw from adoption (POST, owner or admin)
///
/// /adoptions                        submit request (auth)
/// /adoptions/mine                   requester's own requests with listings
/// /adoptions/{id}                   cancel pending request (DELETE, requester)
/// /adoptions/{id}/approve           approve (PUT, admin)
/// /adoptions/{id}/decline           decline (PUT, admin)
/// /adoptions/{id}/restore           restore a decided request (PUT, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login, password reset).
        .nest("/auth", auth::router())
        // Self-service account routes.
        .nest("/users", users::router())
        // Admin routes (user management + adoption oversight).
        .nest("/admin", admin::router())
        // Public gallery with admin-managed content.
        .nest("/gallery", gallery::router())
        // Pet listings (public browsing, owner-managed lifecycle).
        .nest("/listings", listings::router())
        // Adoption request workflow.
        .nest("/adoptions", adoptions::router())
}
