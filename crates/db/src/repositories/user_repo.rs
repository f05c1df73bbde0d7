//! Repository for the `users` table.

use pawhaven_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{AdminUpdateUser, CreateUser, UpdateProfile, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, password_hash, address, \
                        contact_number, facebook, valid_document, role, verified, \
                        admin_message, otp_hash, otp_expires_at, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Duplicate emails surface as a unique violation on `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (first_name, last_name, email, password_hash, address,
                 contact_number, facebook, valid_document)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.address)
            .bind(&input.contact_number)
            .bind(&input.facebook)
            .bind(&input.valid_document)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email, case-insensitively.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user's own profile fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                address = COALESCE($4, address),
                contact_number = COALESCE($5, contact_number),
                facebook = COALESCE($6, facebook),
                valid_document = COALESCE($7, valid_document)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.address)
            .bind(&input.contact_number)
            .bind(&input.facebook)
            .bind(&input.valid_document)
            .fetch_optional(pool)
            .await
    }

    /// Admin update: profile fields plus role.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn admin_update(
        pool: &PgPool,
        id: DbId,
        input: &AdminUpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                address = COALESCE($4, address),
                contact_number = COALESCE($5, contact_number),
                facebook = COALESCE($6, facebook),
                valid_document = COALESCE($7, valid_document),
                role = COALESCE($8, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.address)
            .bind(&input.contact_number)
            .bind(&input.facebook)
            .bind(&input.valid_document)
            .bind(&input.role)
            .fetch_optional(pool)
            .await
    }

    /// Set the manual verification flag and the reviewing admin's message.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_verification(
        pool: &PgPool,
        id: DbId,
        verified: bool,
        admin_message: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET verified = $2, admin_message = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(verified)
            .bind(admin_message)
            .fetch_optional(pool)
            .await
    }

    /// Store a password-reset OTP digest and its expiry.
    pub async fn set_otp(
        pool: &PgPool,
        id: DbId,
        otp_hash: &str,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET otp_hash = $2, otp_expires_at = $3 WHERE id = $1")
            .bind(id)
            .bind(otp_hash)
            .bind(expires_at)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Complete a password reset: set the new hash and clear OTP material.
    ///
    /// Returns `true` if the row was updated.
    pub async fn reset_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                password_hash = $2,
                otp_hash = NULL,
                otp_expires_at = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a user. Returns `true` if a row was removed.
    ///
    /// Callers must run the pending-claims guard first; see the user
    /// handlers. Terminal adoption requests and listings cascade away with
    /// the row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
