use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{
    format_cents, Account, AccountId, Authenticator, Cents, Credentials, Ledger, Outcome,
};

use super::AppError;

/// Application service providing the teller operations over a ledger.
///
/// Cloning the service hands out another handle to the same ledger. Every
/// mutation holds the write lock for its whole read-modify-write step.
#[derive(Clone, Default)]
pub struct BankService {
    ledger: Arc<RwLock<Ledger>>,
}

/// Result of a deposit or withdrawal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub account_id: AccountId,
    pub requested: Cents,
    pub outcome: Outcome,
    pub balance: Cents,
}

impl BankService {
    /// Create a service over an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service over an existing ledger.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account.
    pub async fn open_account(
        &self,
        id: &str,
        holder_name: &str,
        initial_balance: Cents,
    ) -> Result<Account, AppError> {
        let id = normalize_id(id)?;
        let holder_name = holder_name.trim();

        let mut ledger = self.ledger.write().await;
        let account = ledger.create(id, holder_name, initial_balance)?.clone();

        if initial_balance < 0 {
            warn!(
                account = %account.id,
                balance = %format_cents(initial_balance),
                "account opened with a negative balance"
            );
        }
        info!(
            account = %account.id,
            holder = %account.holder_name,
            balance = %format_cents(account.balance),
            "account opened"
        );
        Ok(account)
    }

    /// Get an account by number.
    pub async fn account(&self, id: &str) -> Result<Account, AppError> {
        let id = normalize_id(id)?;
        self.ledger
            .read()
            .await
            .account(id)
            .cloned()
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }

    /// List all accounts ordered by account number.
    pub async fn list_accounts(&self) -> Vec<Account> {
        self.ledger.read().await.accounts().cloned().collect()
    }

    /// Get the current balance of an account.
    pub async fn balance(&self, id: &str) -> Result<Cents, AppError> {
        let id = normalize_id(id)?;
        let balance = self.ledger.read().await.balance_of(id)?;
        debug!(account = %id, balance = %format_cents(balance), "balance queried");
        Ok(balance)
    }

    // ========================
    // Movements
    // ========================

    /// Deposit into an account. Non-positive amounts are accepted and ignored.
    pub async fn deposit(&self, id: &str, amount: Cents) -> Result<Movement, AppError> {
        let id = normalize_id(id)?;
        let mut ledger = self.ledger.write().await;
        let outcome = ledger.deposit(id, amount)?;
        let balance = ledger.balance_of(id)?;
        drop(ledger);

        let movement = Movement {
            account_id: id.to_string(),
            requested: amount,
            outcome,
            balance,
        };
        log_movement("deposit", &movement);
        Ok(movement)
    }

    /// Withdraw from an account. Non-positive amounts and overdrafts are
    /// accepted and ignored.
    pub async fn withdraw(&self, id: &str, amount: Cents) -> Result<Movement, AppError> {
        let id = normalize_id(id)?;
        let mut ledger = self.ledger.write().await;
        let outcome = ledger.withdraw(id, amount)?;
        let balance = ledger.balance_of(id)?;
        drop(ledger);

        let movement = Movement {
            account_id: id.to_string(),
            requested: amount,
            outcome,
            balance,
        };
        log_movement("withdraw", &movement);
        Ok(movement)
    }
}

/// Check credentials against the given authenticator.
pub fn sign_in(authenticator: &dyn Authenticator, credentials: &Credentials) -> Result<(), AppError> {
    if authenticator.authenticate(credentials) {
        info!(username = %credentials.username, "teller signed in");
        Ok(())
    } else {
        warn!(username = %credentials.username, "rejected sign-in attempt");
        Err(AppError::InvalidCredentials)
    }
}

fn normalize_id(id: &str) -> Result<&str, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::InvalidInput(
            "Account number must not be empty".to_string(),
        ));
    }
    Ok(id)
}

fn log_movement(kind: &'static str, movement: &Movement) {
    match movement.outcome {
        Outcome::Applied => info!(
            kind,
            account = %movement.account_id,
            amount = %format_cents(movement.requested),
            balance = %format_cents(movement.balance),
            "movement applied"
        ),
        Outcome::Ignored(reason) => warn!(
            kind,
            account = %movement.account_id,
            amount = %format_cents(movement.requested),
            %reason,
            "movement ignored"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IgnoreReason, StaticAuthenticator};

    #[tokio::test]
    async fn test_open_account_trims_input() {
        let service = BankService::new();
        let account = service.open_account(" 1001 ", " Alice ", 100).await.unwrap();
        assert_eq!(account.id, "1001");
        assert_eq!(account.holder_name, "Alice");
        assert_eq!(service.balance("1001").await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_empty_account_number_is_rejected() {
        let service = BankService::new();
        let result = service.open_account("   ", "Alice", 100).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(service.list_accounts().await.is_empty());
    }

    #[tokio::test]
    async fn test_withdraw_reports_ignored_overdraft() {
        let service = BankService::new();
        service.open_account("1001", "Alice", 1000).await.unwrap();

        let movement = service.withdraw("1001", 5000).await.unwrap();
        assert_eq!(
            movement.outcome,
            Outcome::Ignored(IgnoreReason::InsufficientFunds)
        );
        assert_eq!(movement.balance, 1000);
    }

    #[tokio::test]
    async fn test_clones_share_the_ledger() {
        let service = BankService::new();
        let other = service.clone();
        service.open_account("1001", "Alice", 0).await.unwrap();
        other.deposit("1001", 250).await.unwrap();
        assert_eq!(service.balance("1001").await.unwrap(), 250);
    }

    #[test]
    fn test_sign_in() {
        let auth = StaticAuthenticator::default();
        assert!(sign_in(&auth, &Credentials::new("user", "pass")).is_ok());
        assert!(matches!(
            sign_in(&auth, &Credentials::new("user", "nope")),
            Err(AppError::InvalidCredentials)
        ));
    }
}
