use thiserror::Error;

use crate::domain::{PeriodError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    #[error("Ledger store unavailable: {0:#}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl AppError {
    /// Validation and period errors are the caller's to fix; store errors
    /// may go away by trying again later.
    pub fn is_user_error(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::InvalidPeriod(_))
    }
}
