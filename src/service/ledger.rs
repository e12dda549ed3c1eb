use crate::db::models::DebitOutcome;
use crate::db::traits::AccountRepository;
use crate::error::CopydeskError;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-account credit balance: one credit per generation, top-ups from payments.
#[derive(Clone)]
pub struct CreditLedger {
    repo: Arc<dyn AccountRepository>,
}

impl CreditLedger {
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Take exactly one credit, or report that none are left. Never goes negative.
    pub async fn debit(&self, account_id: i64) -> Result<DebitOutcome, CopydeskError> {
        let outcome = self.repo.debit_one(account_id).await?;
        debug!(account_id, ?outcome, "debit");
        Ok(outcome)
    }

    /// Add `amount` credits; zero is a valid no-op top-up.
    pub async fn credit(&self, account_id: i64, amount: u32) -> Result<i64, CopydeskError> {
        let balance = self.repo.credit(account_id, i64::from(amount)).await?;
        info!(account_id, amount, balance, "credits added");
        Ok(balance)
    }

    pub async fn balance(&self, account_id: i64) -> Result<i64, CopydeskError> {
        self.repo
            .get_by_id(account_id)
            .await?
            .map(|acc| acc.credits)
            .ok_or(CopydeskError::AccountNotFound(account_id))
    }
}
