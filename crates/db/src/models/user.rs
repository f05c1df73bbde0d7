//! User entity model and DTOs.

use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and OTP material -- NEVER serialize this to
/// API responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    pub contact_number: String,
    pub facebook: Option<String>,
    pub valid_document: Option<String>,
    pub role: String,
    pub verified: bool,
    /// Feedback left by the admin who reviewed the identity document.
    pub admin_message: Option<String>,
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no credentials, no OTP).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub contact_number: String,
    pub facebook: Option<String>,
    pub valid_document: Option<String>,
    pub role: String,
    pub verified: bool,
    pub admin_message: Option<String>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            address: user.address,
            contact_number: user.contact_number,
            facebook: user.facebook,
            valid_document: user.valid_document,
            role: user.role,
            verified: user.verified,
            admin_message: user.admin_message,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. Role defaults to `user` in the database.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    pub contact_number: String,
    pub facebook: Option<String>,
    pub valid_document: Option<String>,
}

/// DTO for a user updating their own profile. All fields are optional.
///
/// Role and verification state are deliberately absent; those change only
/// through the admin routes.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub facebook: Option<String>,
    pub valid_document: Option<String>,
}

/// DTO for an admin updating any user. Extends [`UpdateProfile`] with role.
#[derive(Debug, Default, Deserialize)]
pub struct AdminUpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub facebook: Option<String>,
    pub valid_document: Option<String>,
    pub role: Option<String>,
}
