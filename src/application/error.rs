use thiserror::Error;

use crate::domain::RecordError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(#[from] RecordError),

    #[error("Transaction already exists: {0}")]
    DuplicateTransaction(String),

    #[error("Data source error: {0}")]
    Source(#[from] anyhow::Error),
}
