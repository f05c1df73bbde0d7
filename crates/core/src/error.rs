//! Domain error taxonomy.
//!
//! Every fallible core operation reports one of these variants; the API
//! crate maps them onto HTTP statuses in one place.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input rejected before any store mutation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An invariant would be violated: double-claim on a listing, an
    /// illegal status transition, or a delete while still referenced.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or unusable credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to act on this resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
