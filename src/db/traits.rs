use crate::db::models::{DbAccount, DebitOutcome};
use crate::error::CopydeskError;
use async_trait::async_trait;

/// Account persistence as seen by the ledger and request handlers.
///
/// Every balance mutation is a single statement against the store, so two
/// requests racing on the same account can never overdraw it.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account with the starting balance.
    /// Fails with [`CopydeskError::DuplicateUsername`] when the handle is taken.
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<DbAccount, CopydeskError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<DbAccount>, CopydeskError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<DbAccount>, CopydeskError>;

    /// Take one credit if the balance is positive.
    async fn debit_one(&self, id: i64) -> Result<DebitOutcome, CopydeskError>;

    /// Add `amount` credits and return the new balance.
    async fn credit(&self, id: i64, amount: i64) -> Result<i64, CopydeskError>;
}
