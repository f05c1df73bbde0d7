//! Domain types, constants, and pure validation logic shared by every
//! PawHaven crate.
//!
//! This crate performs no I/O. It holds:
//!
//! - [`error::CoreError`] -- the domain error taxonomy.
//! - [`types`] -- database id and timestamp aliases.
//! - [`roles`] -- well-known role name constants.
//! - [`status`] -- listing and adoption-request status enums with their
//!   legal-transition rules.
//! - [`validation`] -- fail-fast input checks used before any store mutation.
//! - [`otp`] -- one-time password-reset code generation and digests.

pub mod error;
pub mod otp;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
