//! User repository for profile operations.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use clementine_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::{ProfilePatch, UserProfile};

const USER_COLUMNS: &str = "id, email, first_name, last_name, phone, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's profile by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_profile(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    /// Apply a sparse profile patch. Absent fields keep their current value.
    ///
    /// Returns `None` when the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn update_profile(
        &self,
        id: UserId,
        patch: &ProfilePatch,
    ) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query(&format!(
            r"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name  = COALESCE($3, last_name),
                phone      = COALESCE($4, phone),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .bind(patch.phone.as_deref())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(profile_from_row).transpose()
    }

    /// Create a user with just an email. Used by seeding and tests.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, email: &Email) -> Result<UserProfile, RepositoryError> {
        let row = sqlx::query(&format!(
            r"
            INSERT INTO users (email)
            VALUES ($1)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(email.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        profile_from_row(&row)
    }
}

fn profile_from_row(row: &PgRow) -> Result<UserProfile, RepositoryError> {
    let raw_email = row.try_get::<String, _>("email")?;
    let email = Email::parse(&raw_email).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
    })?;

    Ok(UserProfile {
        id: row.try_get::<UserId, _>("id")?,
        email,
        first_name: row.try_get::<Option<String>, _>("first_name")?,
        last_name: row.try_get::<Option<String>, _>("last_name")?,
        phone: row.try_get::<Option<String>, _>("phone")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
