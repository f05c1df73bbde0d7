//! One-time password-reset codes.
//!
//! A code is a short numeric string emailed to the account holder. Only its
//! SHA-256 hex digest is stored, next to an expiry timestamp; the plaintext
//! exists in the reset email and nowhere else.

use chrono::Duration;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of digits in a reset code.
pub const OTP_CODE_LEN: usize = 6;

/// Minutes a reset code stays valid after issuance.
pub const OTP_TTL_MINS: i64 = 10;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// The result of generating a new reset code.
pub struct GeneratedOtp {
    /// The plaintext code (emailed to the user, never stored).
    pub plaintext: String,
    /// The SHA-256 hex digest of the code (stored in the database).
    pub hash: String,
    /// When the code stops being accepted.
    pub expires_at: Timestamp,
}

/// Generate a new reset code valid for [`OTP_TTL_MINS`] from `now`.
pub fn generate_otp(now: Timestamp) -> GeneratedOtp {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    let plaintext = format!("{code:06}");
    let hash = hash_otp(&plaintext);

    GeneratedOtp {
        plaintext,
        hash,
        expires_at: now + Duration::minutes(OTP_TTL_MINS),
    }
}

/// Compute the SHA-256 hex digest of a reset code.
pub fn hash_otp(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    format!("{digest:x}")
}

/// Check a submitted code against the stored digest and expiry.
///
/// Returns `true` only when the digest matches and `now` has not passed
/// `expires_at`.
pub fn verify_otp(code: &str, stored_hash: &str, expires_at: Timestamp, now: Timestamp) -> bool {
    now <= expires_at && hash_otp(code) == stored_hash
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
