//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Status mutations on listings and
//! adoption requests do not live here; they belong to
//! [`crate::workflow::AdoptionWorkflow`], the sole writer of both status
//! columns.

pub mod adoption_repo;
pub mod gallery_repo;
pub mod listing_repo;
pub mod user_repo;

pub use adoption_repo::AdoptionRequestRepo;
pub use gallery_repo::GalleryRepo;
pub use listing_repo::{ListingDelete, ListingRepo};
pub use user_repo::UserRepo;
