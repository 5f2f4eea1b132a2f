use crate::db::models::{Account, Role};
use crate::db::schema::SQLITE_INIT;
use crate::error::WardenError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Account storage over a single SQLite file.
///
/// No pool: every call opens its own connection and drops it before returning.
/// Mutations run in a transaction that is committed before the call returns; an
/// early `?` drops the transaction (rollback) and then the connection (close).
#[derive(Clone)]
pub struct UserStore {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, WardenError> {
        Ok(self.options.connect().await?)
    }

    async fn release(conn: SqliteConnection) {
        if let Err(e) = conn.close().await {
            warn!(error = %e, "closing sqlite connection failed");
        }
    }

    /// Create the database file, its directory and the `users` table when absent.
    pub async fn initialize(&self) -> Result<(), WardenError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let mut conn = self.connect().await?;
        sqlx::query(SQLITE_INIT.trim()).execute(&mut conn).await?;
        Self::release(conn).await;
        debug!(path = %self.path.display(), "users table ready");
        Ok(())
    }

    /// Insert a new account and return its id.
    pub async fn create(
        &self,
        username: &str,
        password_digest: &str,
        role: Role,
    ) -> Result<i64, WardenError> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;
        let res = sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password_digest)
            .bind(role.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| match WardenError::from(e) {
                WardenError::ConstraintViolation(_) => {
                    WardenError::ConstraintViolation(username.to_string())
                }
                other => other,
            })?;
        tx.commit().await?;
        Self::release(conn).await;
        Ok(res.last_insert_rowid())
    }

    /// Exact match on both columns. Usernames are unique, so at most one row.
    pub async fn find_by_credentials(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<Option<Account>, WardenError> {
        let mut conn = self.connect().await?;
        let row = sqlx::query(
            "SELECT id, username, password, role FROM users WHERE username = ? AND password = ?",
        )
        .bind(username)
        .bind(password_digest)
        .fetch_optional(&mut conn)
        .await?;
        Self::release(conn).await;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>, WardenError> {
        let mut conn = self.connect().await?;
        let row = sqlx::query("SELECT id, username, password, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut conn)
            .await?;
        Self::release(conn).await;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, WardenError> {
        let mut conn = self.connect().await?;
        let row = sqlx::query("SELECT id, username, password, role FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut conn)
            .await?;
        Self::release(conn).await;
        row.map(Self::row_to_model).transpose()
    }

    /// All accounts in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Account>, WardenError> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query("SELECT id, username, password, role FROM users ORDER BY id")
            .fetch_all(&mut conn)
            .await?;
        Self::release(conn).await;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn count_admins(&self) -> Result<u64, WardenError> {
        let mut conn = self.connect().await?;
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(Role::Admin.as_str())
            .fetch_one(&mut conn)
            .await?;
        Self::release(conn).await;
        Ok(rec.0.max(0) as u64)
    }

    /// Returns the number of rows updated (0 or 1).
    pub async fn update_password(
        &self,
        username: &str,
        password_digest: &str,
    ) -> Result<u64, WardenError> {
        self.execute_mutation(
            sqlx::query("UPDATE users SET password = ? WHERE username = ?")
                .bind(password_digest.to_string())
                .bind(username.to_string()),
        )
        .await
    }

    /// Returns the number of rows updated (0 or 1).
    pub async fn update_role(&self, username: &str, role: Role) -> Result<u64, WardenError> {
        self.execute_mutation(
            sqlx::query("UPDATE users SET role = ? WHERE username = ?")
                .bind(role.as_str())
                .bind(username.to_string()),
        )
        .await
    }

    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, username: &str) -> Result<u64, WardenError> {
        self.execute_mutation(
            sqlx::query("DELETE FROM users WHERE username = ?").bind(username.to_string()),
        )
        .await
    }

    async fn execute_mutation<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> Result<u64, WardenError> {
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;
        let res = query.execute(&mut *tx).await?;
        tx.commit().await?;
        Self::release(conn).await;
        Ok(res.rows_affected())
    }

    fn row_to_model(row: SqliteRow) -> Result<Account, WardenError> {
        let id: i64 = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let password_digest: String = row.try_get("password")?;
        let role_str: String = row.try_get("role")?;

        let role: Role = role_str.parse().map_err(|e: WardenError| {
            sqlx::Error::Decode(format!("column role: {e}").into())
        })?;

        Ok(Account {
            id,
            username,
            password_digest,
            role,
        })
    }
}
