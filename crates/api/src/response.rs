//! Shared response types for API handlers.

use serde::Serialize;

/// Standard `{ "message": ... }` acknowledgement envelope.
///
/// Used by operations that have no entity payload to return, such as
/// password-reset requests.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
