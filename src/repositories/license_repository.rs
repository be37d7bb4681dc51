//! License persistence
//!
//! No duplicate pre-check on insert: the UNIQUE constraint on
//! `license_number` is the authority, and a violation is reported as a
//! conflict without leaking the constraint name.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::license::{License, NewLicense};
use crate::utils::errors::AppError;

/// Storage operations the license service depends on.
#[allow(async_fn_in_trait)]
pub trait LicenseStore {
    async fn create(&self, license: &NewLicense) -> Result<License, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<License>, AppError>;
    async fn list(&self) -> Result<Vec<License>, AppError>;
    async fn update(&self, license: &License) -> Result<Option<License>, AppError>;
    async fn delete(&self, id: Uuid) -> Result<u64, AppError>;
}

pub struct LicenseRepository {
    pool: PgPool,
}

impl LicenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl LicenseStore for LicenseRepository {
    async fn create(&self, license: &NewLicense) -> Result<License, AppError> {
        let id = Uuid::new_v4();

        let created = sqlx::query_as::<_, License>(
            r#"
            INSERT INTO licenses (id, holder_name, phone, dob, license_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&license.holder_name)
        .bind(&license.phone)
        .bind(license.dob)
        .bind(&license.license_number)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<License>, AppError> {
        let license = sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(license)
    }

    /// Most recently updated first.
    async fn list(&self) -> Result<Vec<License>, AppError> {
        let licenses =
            sqlx::query_as::<_, License>("SELECT * FROM licenses ORDER BY updated_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(licenses)
    }

    /// Writes an already-merged record back. A changed `license_number`
    /// can still collide with another row, so the conflict mapping applies
    /// here too.
    async fn update(&self, license: &License) -> Result<Option<License>, AppError> {
        let updated = sqlx::query_as::<_, License>(
            r#"
            UPDATE licenses
            SET holder_name = $2, phone = $3, dob = $4, license_number = $5, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(license.id)
        .bind(&license.holder_name)
        .bind(&license.phone)
        .bind(license.dob)
        .bind(&license.license_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM licenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn map_unique_violation(error: sqlx::Error) -> AppError {
    let is_unique = error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if is_unique {
        AppError::Conflict("License number is already registered".to_string())
    } else {
        AppError::Database(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let error = sqlx::Error::Database(Box::new(FakeDbError { unique: true }));
        let mapped = map_unique_violation(error);

        assert!(matches!(mapped, AppError::Conflict(_)));
    }

    #[test]
    fn test_other_database_errors_pass_through() {
        let error = sqlx::Error::Database(Box::new(FakeDbError { unique: false }));
        assert!(matches!(map_unique_violation(error), AppError::Database(_)));

        assert!(matches!(
            map_unique_violation(sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
    }
}
