//! Listing and adoption-request status enums.
//!
//! The string constants must match the CHECK constraints on
//! `pet_listings.status` and `adoption_requests.status`. Status columns are
//! written only by the adoption workflow engine; these enums exist so every
//! transition rule lives in one place instead of scattered string literals.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Listing status constants
// ---------------------------------------------------------------------------

/// Claimable by a new adoption request.
pub const LISTING_AVAILABLE: &str = "available";
/// Claimed by exactly one pending adoption request.
pub const LISTING_RESERVED: &str = "reserved";
/// Removed from adoption by its owner.
pub const LISTING_WITHDRAWN: &str = "withdrawn";

/// All valid listing statuses.
pub const VALID_LISTING_STATUSES: &[&str] =
    &[LISTING_AVAILABLE, LISTING_RESERVED, LISTING_WITHDRAWN];

// ---------------------------------------------------------------------------
// Adoption request status constants
// ---------------------------------------------------------------------------

/// Awaiting an admin decision. Initial state; the only cancellable state.
pub const REQUEST_PENDING: &str = "pending";
/// Accepted by an admin. Referenced listings stay reserved.
pub const REQUEST_APPROVED: &str = "approved";
/// Declined by an admin. Referenced listings were released.
pub const REQUEST_REJECTED: &str = "rejected";

/// All valid adoption request statuses.
pub const VALID_REQUEST_STATUSES: &[&str] =
    &[REQUEST_PENDING, REQUEST_APPROVED, REQUEST_REJECTED];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Pet listing status with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Available,
    Reserved,
    Withdrawn,
}

impl ListingStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => LISTING_AVAILABLE,
            Self::Reserved => LISTING_RESERVED,
            Self::Withdrawn => LISTING_WITHDRAWN,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            LISTING_AVAILABLE => Ok(Self::Available),
            LISTING_RESERVED => Ok(Self::Reserved),
            LISTING_WITHDRAWN => Ok(Self::Withdrawn),
            other => Err(CoreError::Validation(format!(
                "Unknown listing status: '{other}'. Valid statuses: {}",
                VALID_LISTING_STATUSES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Adoption request status with string conversion and transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => REQUEST_PENDING,
            Self::Approved => REQUEST_APPROVED,
            Self::Rejected => REQUEST_REJECTED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            REQUEST_PENDING => Ok(Self::Pending),
            REQUEST_APPROVED => Ok(Self::Approved),
            REQUEST_REJECTED => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "Unknown request status: '{other}'. Valid statuses: {}",
                VALID_REQUEST_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether this is a terminal state (`approved` or `rejected`).
    ///
    /// Terminal requests hold no pending claim; they can only re-enter the
    /// state machine through restore.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether a transition from `self` to `to` is legal.
    ///
    /// `pending -> approved | rejected` (decision), and
    /// `approved | rejected -> pending` (restore). Everything else,
    /// including self-transitions, is rejected so a repeated decision
    /// surfaces as a conflict instead of silently re-applying side effects.
    pub fn can_transition_to(&self, to: RequestStatus) -> bool {
        match (self, to) {
            (Self::Pending, Self::Approved) => true,
            (Self::Pending, Self::Rejected) => true,
            (Self::Approved, Self::Pending) => true,
            (Self::Rejected, Self::Pending) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
