use thiserror::Error;

use crate::domain::{LedgerError, ParseCentsError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] ParseCentsError),

    #[error("Invalid username or password")]
    InvalidCredentials,
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyExists(id) => AppError::AccountAlreadyExists(id),
            LedgerError::NotFound(id) => AppError::AccountNotFound(id),
        }
    }
}
