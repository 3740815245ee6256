//! Address repository.
//!
//! All lookups and writes are scoped by the owning user id in the SQL, so an
//! address id belonging to someone else behaves exactly like a missing id.
//! "At most one default per (user, type)" is kept true transactionally: a
//! write that sets a default clears the previous one first, backed by a
//! partial unique index.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use clementine_core::{AddressId, AddressType, UserId};

use super::RepositoryError;
use crate::models::address::{Address, AddressPatch, NewAddress};

const ADDRESS_COLUMNS: &str = "id, user_id, address_type, label, line1, line2, \
                               city, state, country, postal_code, phone, is_default, \
                               created_at, updated_at";

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All addresses of a user, defaults first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {ADDRESS_COLUMNS}
            FROM addresses
            WHERE user_id = $1
            ORDER BY is_default DESC, created_at ASC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(address_from_row).collect()
    }

    /// A single address, only if owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query(&format!(
            r"
            SELECT {ADDRESS_COLUMNS}
            FROM addresses
            WHERE id = $1 AND user_id = $2
            "
        ))
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(address_from_row).transpose()
    }

    /// Create an address for a user.
    ///
    /// When the new address is a default, the previous default of the same
    /// type is cleared in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create(
        &self,
        user_id: UserId,
        new: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if new.is_default {
            clear_default(&mut tx, user_id, new.address_type).await?;
        }

        let row = sqlx::query(&format!(
            r"
            INSERT INTO addresses
                (user_id, address_type, label, line1, line2,
                 city, state, country, postal_code, phone, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(new.address_type)
        .bind(new.label.as_deref())
        .bind(&new.line1)
        .bind(new.line2.as_deref())
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.country)
        .bind(&new.postal_code)
        .bind(new.phone.as_deref())
        .bind(new.is_default)
        .fetch_one(&mut *tx)
        .await?;

        let address = address_from_row(&row)?;
        tx.commit().await?;

        Ok(address)
    }

    /// Apply a sparse patch to an address the user owns.
    ///
    /// Absent fields keep their current value (COALESCE). Returns `None`
    /// when the address does not exist or belongs to another user - the two
    /// cases are indistinguishable on purpose.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn update_owned(
        &self,
        user_id: UserId,
        address_id: AddressId,
        patch: &AddressPatch,
    ) -> Result<Option<Address>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row, confirm ownership, and learn the current type so a
        // default flip clears the right sibling.
        let current = sqlx::query(
            r"
            SELECT address_type FROM addresses
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            ",
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        if patch.is_default == Some(true) {
            let effective_type = match patch.address_type {
                Some(t) => t,
                None => current.try_get::<AddressType, _>("address_type")?,
            };
            clear_default(&mut tx, user_id, effective_type).await?;
        }

        let row = sqlx::query(&format!(
            r"
            UPDATE addresses SET
                address_type = COALESCE($3, address_type),
                label        = COALESCE($4, label),
                line1        = COALESCE($5, line1),
                line2        = COALESCE($6, line2),
                city         = COALESCE($7, city),
                state        = COALESCE($8, state),
                country      = COALESCE($9, country),
                postal_code  = COALESCE($10, postal_code),
                phone        = COALESCE($11, phone),
                is_default   = COALESCE($12, is_default),
                updated_at   = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {ADDRESS_COLUMNS}
            "
        ))
        .bind(address_id)
        .bind(user_id)
        .bind(patch.address_type)
        .bind(patch.label.as_deref())
        .bind(patch.line1.as_deref())
        .bind(patch.line2.as_deref())
        .bind(patch.city.as_deref())
        .bind(patch.state.as_deref())
        .bind(patch.country.as_deref())
        .bind(patch.postal_code.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.is_default)
        .fetch_one(&mut *tx)
        .await?;

        let address = address_from_row(&row)?;
        tx.commit().await?;

        Ok(Some(address))
    }
}

/// Clear the current default address of the given type for a user.
async fn clear_default(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: UserId,
    address_type: AddressType,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE addresses SET is_default = FALSE, updated_at = now()
        WHERE user_id = $1 AND address_type = $2 AND is_default
        ",
    )
    .bind(user_id)
    .bind(address_type)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn address_from_row(row: &PgRow) -> Result<Address, RepositoryError> {
    Ok(Address {
        id: row.try_get::<AddressId, _>("id")?,
        user_id: row.try_get::<UserId, _>("user_id")?,
        address_type: row.try_get::<AddressType, _>("address_type")?,
        label: row.try_get::<Option<String>, _>("label")?,
        line1: row.try_get::<String, _>("line1")?,
        line2: row.try_get::<Option<String>, _>("line2")?,
        city: row.try_get::<String, _>("city")?,
        state: row.try_get::<String, _>("state")?,
        country: row.try_get::<String, _>("country")?,
        postal_code: row.try_get::<String, _>("postal_code")?,
        phone: row.try_get::<Option<String>, _>("phone")?,
        is_default: row.try_get::<bool, _>("is_default")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
