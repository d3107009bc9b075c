use std::collections::BTreeMap;

use super::{Account, AccountId, Cents, Outcome};

/// In-memory store of accounts keyed by account number.
///
/// The ledger only refuses duplicate and unknown account numbers. Invalid
/// amounts and overdrafts are accepted as no-ops and reported through
/// [`Outcome`].
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    accounts: BTreeMap<AccountId, Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new account. The initial balance is taken as given, negative
    /// values included.
    pub fn create(
        &mut self,
        id: &str,
        holder_name: &str,
        initial_balance: Cents,
    ) -> Result<&Account, LedgerError> {
        if self.accounts.contains_key(id) {
            return Err(LedgerError::AlreadyExists(id.to_string()));
        }
        let account = Account::new(id, holder_name, initial_balance);
        Ok(self.accounts.entry(id.to_string()).or_insert(account))
    }

    pub fn deposit(&mut self, id: &str, amount: Cents) -> Result<Outcome, LedgerError> {
        Ok(self.account_mut(id)?.deposit(amount))
    }

    pub fn withdraw(&mut self, id: &str, amount: Cents) -> Result<Outcome, LedgerError> {
        Ok(self.account_mut(id)?.withdraw(amount))
    }

    pub fn balance_of(&self, id: &str) -> Result<Cents, LedgerError> {
        self.account(id)
            .map(|account| account.balance)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// All accounts, ordered by account number.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn account_mut(&mut self, id: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    AlreadyExists(AccountId),
    NotFound(AccountId),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::AlreadyExists(id) => write!(f, "account {} already exists", id),
            LedgerError::NotFound(id) => write!(f, "account {} not found", id),
        }
    }
}

impl std::error::Error for LedgerError {}
