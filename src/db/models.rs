use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default balance granted at registration.
pub const STARTING_CREDITS: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbAccount {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub credits: i64,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a single-credit debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    Debited { remaining: i64 },
    InsufficientBalance,
}
