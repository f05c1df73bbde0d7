//! Fail-fast input validation for the adoption workflow and account routes.
//!
//! Every check here runs before any store mutation, so a rejected input
//! leaves no partial effects behind.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length of the admin decision message, in characters.
pub const MAX_ADMIN_MESSAGE_LEN: usize = 255;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum number of photos attached to a single pet listing.
pub const MAX_LISTING_PHOTOS: usize = 4;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate the listing set of an adoption request: non-empty, all distinct.
pub fn validate_listing_refs(refs: &[DbId]) -> Result<(), CoreError> {
    if refs.is_empty() {
        return Err(CoreError::Validation(
            "An adoption request must reference at least one listing".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(refs.len());
    for id in refs {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Duplicate listing id {id} in adoption request"
            )));
        }
    }
    Ok(())
}

/// Validate that a required text field is present and not blank.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Validate the shape of an email address.
///
/// Deliberately loose: exactly one `@` with a non-empty local part and
/// domain. Deliverability is decided by the mail system, not here.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let mut parts = email.split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    );
    if !valid || email.contains(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate the contact snapshot captured on an adoption request.
pub fn validate_contact(
    full_name: &str,
    email: &str,
    contact_number: &str,
    address: &str,
) -> Result<(), CoreError> {
    validate_required("full_name", full_name)?;
    validate_required("contact_number", contact_number)?;
    validate_required("address", address)?;
    validate_email(email)
}

/// Validate an optional admin decision message against the length limit.
pub fn validate_admin_message(message: Option<&str>) -> Result<(), CoreError> {
    if let Some(msg) = message {
        if msg.chars().count() > MAX_ADMIN_MESSAGE_LEN {
            return Err(CoreError::Validation(format!(
                "Admin message exceeds maximum length of {MAX_ADMIN_MESSAGE_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// Validate password strength.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
