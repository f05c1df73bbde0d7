//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories and the adoption workflow in
//! `pawhaven_db` and map errors via [`crate::error::AppError`]. Listing and
//! request status fields are only ever changed through the workflow engine;
//! no handler writes them directly.

pub mod admin_users;
pub mod adoptions;
pub mod auth;
pub mod gallery;
pub mod listings;
pub mod users;
