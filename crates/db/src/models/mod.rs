//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches
//! - Read-side projection rows where the API needs joined views

pub mod adoption;
pub mod gallery;
pub mod listing;
pub mod user;
