//! Admin credential repository.
//!
//! A single-row (in practice) table holding the admin username and hashed
//! password. The default row is seeded at startup when the table is empty.

use sqlx::SqlitePool;

use webshop_core::{CredentialId, Username};

use super::RepositoryError;
use crate::models::admin::AdminIdentity;
use crate::services::auth;

/// Username seeded when no credentials exist yet.
pub const DEFAULT_USERNAME: &str = "admin";

/// Password seeded when no credentials exist yet.
pub const DEFAULT_PASSWORD: &str = "admin123";

/// Repository for admin credential operations.
pub struct CredentialRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CredentialRepository<'a> {
    /// Create a new credential repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the default admin credentials when the table is empty.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was seeded, `false` if credentials existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn seed_default(&self) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_credentials")
            .fetch_one(self.pool)
            .await?;
        if count > 0 {
            return Ok(false);
        }

        sqlx::query("INSERT INTO admin_credentials (username, password) VALUES (?1, ?2)")
            .bind(DEFAULT_USERNAME)
            .bind(auth::hash_password(DEFAULT_PASSWORD))
            .execute(self.pool)
            .await?;

        Ok(true)
    }

    /// Delete any existing credentials and restore the default row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn reset_default(&self) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM admin_credentials")
            .execute(self.pool)
            .await?;
        self.seed_default().await?;
        Ok(())
    }

    /// Check a username/hashed-password pair with a single equality lookup.
    ///
    /// Returns `None` for any mismatch; callers must not distinguish between
    /// an unknown username and a wrong password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn verify(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<AdminIdentity>, RepositoryError> {
        let identity = sqlx::query_as::<_, AdminIdentity>(
            "SELECT id, username FROM admin_credentials WHERE username = ?1 AND password = ?2",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(identity)
    }

    /// Get the stored admin username, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_username(&self) -> Result<Option<Username>, RepositoryError> {
        let username = sqlx::query_scalar::<_, Username>(
            "SELECT username FROM admin_credentials ORDER BY id LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(username)
    }

    /// Overwrite the stored admin username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no credential row exists.
    /// Returns `RepositoryError::Conflict` if the username is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_username(&self, new_username: &Username) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE admin_credentials SET username = ?1, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(new_username)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("Username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Find the credential row matching a hashed password.
    ///
    /// Used to verify the current password before accepting a new one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn verify_password(
        &self,
        password_hash: &str,
    ) -> Result<Option<CredentialId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CredentialId>(
            "SELECT id FROM admin_credentials WHERE password = ?1",
        )
        .bind(password_hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }

    /// Overwrite the hashed password for a credential row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_password(
        &self,
        id: CredentialId,
        new_password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE admin_credentials SET password = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
        )
        .bind(new_password_hash)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_seed_default_only_once() {
        let pool = test_pool().await;
        let repo = CredentialRepository::new(&pool);

        assert!(repo.seed_default().await.unwrap());
        assert!(!repo.seed_default().await.unwrap());

        let username = repo.get_username().await.unwrap().unwrap();
        assert_eq!(username.as_str(), DEFAULT_USERNAME);
    }

    #[tokio::test]
    async fn test_verify_accepts_default_and_rejects_wrong_pairs() {
        let pool = test_pool().await;
        let repo = CredentialRepository::new(&pool);
        repo.seed_default().await.unwrap();

        let good = repo
            .verify(DEFAULT_USERNAME, &auth::hash_password(DEFAULT_PASSWORD))
            .await
            .unwrap();
        assert_eq!(good.unwrap().username.as_str(), DEFAULT_USERNAME);

        let wrong_password = repo
            .verify(DEFAULT_USERNAME, &auth::hash_password("nope"))
            .await
            .unwrap();
        assert!(wrong_password.is_none());

        let unknown_user = repo
            .verify("nobody", &auth::hash_password(DEFAULT_PASSWORD))
            .await
            .unwrap();
        assert!(unknown_user.is_none());
    }

    #[tokio::test]
    async fn test_update_username() {
        let pool = test_pool().await;
        let repo = CredentialRepository::new(&pool);
        repo.seed_default().await.unwrap();

        let new_username = Username::parse("shopkeeper").unwrap();
        repo.update_username(&new_username).await.unwrap();

        assert_eq!(repo.get_username().await.unwrap(), Some(new_username));
    }

    #[tokio::test]
    async fn test_update_username_without_row_is_not_found() {
        let pool = test_pool().await;
        let repo = CredentialRepository::new(&pool);

        let err = repo
            .update_username(&Username::parse("shopkeeper").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_password_change_flow() {
        let pool = test_pool().await;
        let repo = CredentialRepository::new(&pool);
        repo.seed_default().await.unwrap();

        let current_hash = auth::hash_password(DEFAULT_PASSWORD);
        let id = repo.verify_password(&current_hash).await.unwrap().unwrap();

        repo.update_password(id, &auth::hash_password("newpass1"))
            .await
            .unwrap();

        assert!(repo.verify_password(&current_hash).await.unwrap().is_none());
        assert!(
            repo.verify_password(&auth::hash_password("newpass1"))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_reset_default_restores_seed_row() {
        let pool = test_pool().await;
        let repo = CredentialRepository::new(&pool);
        repo.seed_default().await.unwrap();
        repo.update_username(&Username::parse("shopkeeper").unwrap())
            .await
            .unwrap();

        repo.reset_default().await.unwrap();

        let username = repo.get_username().await.unwrap().unwrap();
        assert_eq!(username.as_str(), DEFAULT_USERNAME);
    }
}
