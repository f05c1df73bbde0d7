//! Email delivery via SMTP.
//!
//! [`Mailer`] sends plain-text emails through the `lettre` async SMTP
//! transport. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! mailer should be constructed, leaving the platform fully usable without
//! outbound email.

use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@pawhaven.local";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `SMTP_HOST`     | yes      | --                        |
    /// | `SMTP_PORT`     | no       | `587`                     |
    /// | `SMTP_FROM`     | no       | `noreply@pawhaven.local`  |
    /// | `SMTP_USER`     | no       | --                        |
    /// | `SMTP_PASSWORD` | no       | --                        |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends platform notification emails via SMTP.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Email a password-reset code with its validity window.
    pub async fn send_password_otp(
        &self,
        to_email: &str,
        first_name: &str,
        code: &str,
        valid_mins: i64,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Hi {first_name},\n\n\
             Your password reset code is: {code}\n\n\
             It expires in {valid_mins} minutes. If you did not request a \
             reset, you can ignore this email.\n\n\
             PawHaven"
        );
        self.send(to_email, "[PawHaven] Password reset code", body)
            .await
    }

    /// Email the outcome of an account verification review.
    pub async fn send_verification_decision(
        &self,
        to_email: &str,
        first_name: &str,
        verified: bool,
        admin_message: Option<&str>,
    ) -> Result<(), EmailError> {
        let verdict = if verified {
            "Your account has been verified. You can now post listings and \
             send adoption requests."
        } else {
            "Your account could not be verified."
        };
        let body = match admin_message {
            Some(note) => format!("Hi {first_name},\n\n{verdict}\n\nNote from the team: {note}\n\nPawHaven"),
            None => format!("Hi {first_name},\n\n{verdict}\n\nPawHaven"),
        };
        self.send(to_email, "[PawHaven] Account verification update", body)
            .await
    }

    /// Email the outcome of an adoption request review.
    pub async fn send_request_decision(
        &self,
        to_email: &str,
        full_name: &str,
        approved: bool,
        admin_message: Option<&str>,
    ) -> Result<(), EmailError> {
        let verdict = if approved {
            "Great news: your adoption request has been approved!"
        } else {
            "Unfortunately your adoption request has been declined."
        };
        let body = match admin_message {
            Some(note) => format!("Hi {full_name},\n\n{verdict}\n\nNote from the team: {note}\n\nPawHaven"),
            None => format!("Hi {full_name},\n\n{verdict}\n\nPawHaven"),
        };
        self.send(to_email, "[PawHaven] Adoption request update", body)
            .await
    }

    /// Assemble and send one plain-text message.
    async fn send(
        &self,
        to_email: &str,
        subject: &str,
        body: String,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let transport = transport_builder.build();
        transport.send(email).await?;

        tracing::info!(to = to_email, subject, "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
