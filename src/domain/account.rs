use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Account numbers are entered by the teller, not generated.
pub type AccountId = String;

/// Whether an accepted deposit or withdrawal actually moved money.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Why a movement was accepted without touching the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NonPositiveAmount,
    InsufficientFunds,
    Overflow,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::NonPositiveAmount => write!(f, "amount must be positive"),
            IgnoreReason::InsufficientFunds => write!(f, "insufficient funds"),
            IgnoreReason::Overflow => write!(f, "balance would overflow"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub holder_name: String,
    /// Balance in cents; only `deposit` and `withdraw` change it.
    pub balance: Cents,
    pub opened_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, holder_name: impl Into<String>, balance: Cents) -> Self {
        Self {
            id: id.into(),
            holder_name: holder_name.into(),
            balance,
            opened_at: Utc::now(),
        }
    }

    pub fn deposit(&mut self, amount: Cents) -> Outcome {
        if amount <= 0 {
            return Outcome::Ignored(IgnoreReason::NonPositiveAmount);
        }
        match self.balance.checked_add(amount) {
            Some(balance) => {
                self.balance = balance;
                Outcome::Applied
            }
            None => Outcome::Ignored(IgnoreReason::Overflow),
        }
    }

    pub fn withdraw(&mut self, amount: Cents) -> Outcome {
        if amount <= 0 {
            return Outcome::Ignored(IgnoreReason::NonPositiveAmount);
        }
        if amount > self.balance {
            return Outcome::Ignored(IgnoreReason::InsufficientFunds);
        }
        self.balance -= amount;
        Outcome::Applied
    }
}
