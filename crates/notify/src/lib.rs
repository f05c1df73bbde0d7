//! Outbound email notifications for the adoption platform.
//!
//! Wraps the `lettre` async SMTP transport behind a small [`Mailer`] with
//! one method per notification kind: password-reset codes, account
//! verification decisions, and adoption request decisions. Delivery is
//! best-effort; callers log failures rather than surfacing them to users.

pub mod email;

pub use email::{EmailConfig, EmailError, Mailer};
