//! Credential Store
//!
//! Durable CRUD for user records over an embedded SQLite database, plus the
//! one schema-evolution rule this service carries: the `password_hash` column
//! was added after initial deployment, so older database files may lack it.
//! `ensure_credential_column` repairs that shape idempotently at startup, and
//! the email lookup degrades gracefully (credential reported absent) if it
//! ever runs against the legacy shape.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::models::User;

/// Storage errors, classified so callers never string-match engine internals.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A referenced column does not exist (legacy table shape)
    #[error("column missing")]
    ColumnMissing,

    /// Unique constraint violation (duplicate email)
    #[error("unique constraint violation")]
    UniqueViolation,

    /// Any other engine error
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation;
            }
            let message = db_err.message();
            if message.contains("no such column") || message.contains("has no column named") {
                return StoreError::ColumnMissing;
            }
        }
        StoreError::Database(err)
    }
}

/// User store backed by a SQLite pool
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Create a store over an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the users table if absent and seed it when empty.
    ///
    /// Safe to call on every process start; any DDL failure here is fatal to
    /// startup and must prevent the service from accepting requests.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users")
            .fetch_one(&self.pool)
            .await?;

        if count == 0 {
            for (name, email) in [("Vasan", "vasan@example.com"), ("Alex", "alex@example.com")] {
                sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
                    .bind(name)
                    .bind(email)
                    .execute(&self.pool)
                    .await?;
            }
            tracing::info!("seeded users table with 2 example records");
        }

        Ok(())
    }

    /// Add the `password_hash` column if an older database file lacks it.
    ///
    /// Idempotent: a no-op when the column already exists. Runs once at
    /// startup right after `init_schema`; the column, once added, never
    /// disappears. Errors other than the repair itself propagate unchanged.
    pub async fn ensure_credential_column(&self) -> Result<(), StoreError> {
        let columns = sqlx::query("PRAGMA table_info(users)")
            .fetch_all(&self.pool)
            .await?;

        let has_column = columns
            .iter()
            .any(|row| row.get::<String, _>("name") == "password_hash");

        if !has_column {
            sqlx::query("ALTER TABLE users ADD COLUMN password_hash TEXT")
                .execute(&self.pool)
                .await?;
            tracing::info!("added password_hash column to users table");
        }

        Ok(())
    }

    /// Look up a user by email, exact match as stored.
    ///
    /// If the credential column cannot be selected (legacy shape), the lookup
    /// degrades: the record is returned with the credential reported absent
    /// rather than failing. Only the `ColumnMissing` condition degrades; any
    /// other storage error propagates.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let result = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from);

        match result {
            Err(StoreError::ColumnMissing) => {
                let row = sqlx::query_as::<_, (i64, String, String)>(
                    "SELECT id, name, email FROM users WHERE email = ?",
                )
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

                Ok(row.map(|(id, name, email)| User {
                    id,
                    name,
                    email,
                    password_hash: None,
                }))
            }
            other => other,
        }
    }

    /// Look up a user by identifier
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users, ascending by identifier
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Insert a new user; `UniqueViolation` if the email is already present
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<User, StoreError> {
        let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    /// Update name and email; `None` if the identifier does not exist
    pub async fn update(&self, id: i64, name: &str, email: &str) -> Result<Option<User>, StoreError> {
        let result = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    /// Delete a user; `false` if the identifier did not exist
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        // single connection so every query sees the same in-memory database
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn init_store() -> UserStore {
        let store = UserStore::new(memory_pool().await);
        store.init_schema().await.unwrap();
        store
    }

    /// Recreate the table shape that predates the credential column
    async fn legacy_store() -> UserStore {
        let pool = memory_pool().await;
        sqlx::query(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO users (name, email) VALUES ('Old', 'old@example.com')")
            .execute(&pool)
            .await
            .unwrap();
        UserStore::new(pool)
    }

    #[tokio::test]
    async fn init_schema_seeds_empty_table() {
        let store = init_store().await;

        let users = store.list().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, 1);
        assert_eq!(users[0].email, "vasan@example.com");
        assert_eq!(users[1].id, 2);
        assert!(users.iter().all(|u| !u.has_credential()));
    }

    #[tokio::test]
    async fn init_schema_seeds_only_once() {
        let store = init_store().await;
        store.init_schema().await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn ensure_column_is_noop_on_current_schema() {
        let store = init_store().await;

        store.ensure_credential_column().await.unwrap();
        store.ensure_credential_column().await.unwrap();

        // column still usable, data intact
        store
            .create("Ann", "ann@example.com", Some("hash"))
            .await
            .unwrap();
        assert_eq!(store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn ensure_column_repairs_legacy_table() {
        let store = legacy_store().await;

        store.ensure_credential_column().await.unwrap();

        // existing row survives with the credential reported absent
        let user = store.find_by_email("old@example.com").await.unwrap().unwrap();
        assert_eq!(user.name, "Old");
        assert!(!user.has_credential());

        // the new column is writable
        store
            .create("Ann", "ann@example.com", Some("hash"))
            .await
            .unwrap();
        let ann = store.find_by_email("ann@example.com").await.unwrap().unwrap();
        assert_eq!(ann.password_hash.as_deref(), Some("hash"));
    }

    #[tokio::test]
    async fn find_by_email_degrades_on_legacy_shape() {
        // no ensure step: the select against password_hash fails with
        // ColumnMissing and the lookup falls back to the legacy projection
        let store = legacy_store().await;

        let user = store.find_by_email("old@example.com").await.unwrap().unwrap();
        assert_eq!(user.email, "old@example.com");
        assert!(!user.has_credential());

        let missing = store.find_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_unique_violation() {
        let store = init_store().await;

        store.create("Ann", "ann@example.com", None).await.unwrap();
        let err = store.create("Ann2", "ann@example.com", None).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));

        // exactly one record for that email
        let count = store
            .list()
            .await
            .unwrap()
            .iter()
            .filter(|u| u.email == "ann@example.com")
            .count();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn update_existing_and_missing() {
        let store = init_store().await;

        let updated = store.update(1, "Vasan R", "vasan@example.org").await.unwrap();
        assert_eq!(updated.unwrap().email, "vasan@example.org");

        let missing = store.update(99, "Nobody", "nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_to_taken_email_is_unique_violation() {
        let store = init_store().await;

        let err = store.update(1, "Vasan", "alex@example.com").await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let store = init_store().await;

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert!(store.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn identifiers_are_never_reused() {
        let store = init_store().await;

        store.delete(2).await.unwrap();
        let user = store.create("Ann", "ann@example.com", None).await.unwrap();
        assert_eq!(user.id, 3);
    }
}
