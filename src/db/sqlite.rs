use crate::db::models::{DbAccount, DebitOutcome};
use crate::db::schema::SQLITE_INIT;
use crate::db::traits::AccountRepository;
use crate::error::CopydeskError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct AccountsStorage {
    pool: SqlitePool,
}

impl AccountsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, CopydeskError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `:memory:` is its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_opts)
            .await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        info!(database_url, "account storage ready");
        Ok(storage)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CopydeskError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool, CopydeskError> {
        let rec: Option<(i64,)> = sqlx::query_as("SELECT id FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rec.is_some())
    }

    fn row_to_model(row: SqliteRow) -> Result<DbAccount, CopydeskError> {
        let id: i64 = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let password_hash: String = row.try_get("password_hash")?;
        let credits: i64 = row.try_get("credits")?;
        let created_str: String = row.try_get("created_at")?;

        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbAccount {
            id,
            username,
            password_hash,
            credits,
            created_at,
        })
    }
}

#[async_trait]
impl AccountRepository for AccountsStorage {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<DbAccount, CopydeskError> {
        let created_at = Utc::now().to_rfc3339();
        let inserted = sqlx::query(
            r#"INSERT INTO accounts (username, password_hash, created_at)
               VALUES (?, ?, ?)
               RETURNING id, username, password_hash, credits, created_at"#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => Self::row_to_model(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(CopydeskError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<DbAccount>, CopydeskError> {
        let row = sqlx::query(
            r#"SELECT id, username, password_hash, credits, created_at
               FROM accounts WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<DbAccount>, CopydeskError> {
        let row = sqlx::query(
            r#"SELECT id, username, password_hash, credits, created_at
               FROM accounts WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Conditional decrement in one statement; no read-modify-write.
    async fn debit_one(&self, id: i64) -> Result<DebitOutcome, CopydeskError> {
        let rec: Option<(i64,)> = sqlx::query_as(
            r#"UPDATE accounts SET credits = credits - 1
               WHERE id = ? AND credits > 0
               RETURNING credits"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match rec {
            Some((remaining,)) => Ok(DebitOutcome::Debited { remaining }),
            None if self.exists(id).await? => Ok(DebitOutcome::InsufficientBalance),
            None => Err(CopydeskError::AccountNotFound(id)),
        }
    }

    async fn credit(&self, id: i64, amount: i64) -> Result<i64, CopydeskError> {
        let rec: Option<(i64,)> = sqlx::query_as(
            "UPDATE accounts SET credits = credits + ? WHERE id = ? RETURNING credits",
        )
        .bind(amount)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        rec.map(|(balance,)| balance)
            .ok_or(CopydeskError::AccountNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::STARTING_CREDITS;

    async fn memory_storage() -> AccountsStorage {
        AccountsStorage::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite")
    }

    #[tokio::test]
    async fn new_accounts_start_with_five_credits() {
        let storage = memory_storage().await;
        let acc = storage.create("alice", "hash").await.unwrap();
        assert_eq!(acc.credits, STARTING_CREDITS);

        let loaded = storage.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(loaded, acc);
        assert_eq!(storage.get_by_id(acc.id).await.unwrap(), Some(acc));
    }

    #[tokio::test]
    async fn duplicate_username_keeps_first_account() {
        let storage = memory_storage().await;
        let first = storage.create("alice", "first-hash").await.unwrap();
        storage.credit(first.id, 2).await.unwrap();

        let err = storage.create("alice", "second-hash").await.unwrap_err();
        assert!(matches!(err, CopydeskError::DuplicateUsername));

        let stored = storage.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "first-hash");
        assert_eq!(stored.credits, STARTING_CREDITS + 2);
    }

    #[tokio::test]
    async fn debit_stops_at_zero() {
        let storage = memory_storage().await;
        let acc = storage.create("bob", "hash").await.unwrap();

        for expected in (0..STARTING_CREDITS).rev() {
            assert_eq!(
                storage.debit_one(acc.id).await.unwrap(),
                DebitOutcome::Debited {
                    remaining: expected
                }
            );
        }
        assert_eq!(
            storage.debit_one(acc.id).await.unwrap(),
            DebitOutcome::InsufficientBalance
        );
        let stored = storage.get_by_id(acc.id).await.unwrap().unwrap();
        assert_eq!(stored.credits, 0);
    }

    #[tokio::test]
    async fn unknown_account_is_reported() {
        let storage = memory_storage().await;
        assert!(matches!(
            storage.debit_one(42).await,
            Err(CopydeskError::AccountNotFound(42))
        ));
        assert!(matches!(
            storage.credit(42, 1).await,
            Err(CopydeskError::AccountNotFound(42))
        ));
        assert!(storage.get_by_id(42).await.unwrap().is_none());
    }
}
