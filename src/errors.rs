use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::AllocationRule;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Allocation rule {rule} adds up to {total}%, expected 100%")]
    InvalidRule { rule: AllocationRule, total: i32 },

    #[error("Invalid amount {0}: amounts must not be negative")]
    NegativeAmount(Decimal),

    #[error("Invalid amount {amount}: amounts must not exceed {max}")]
    AmountTooLarge { amount: Decimal, max: Decimal },

    #[error("Amount overflow while {0}")]
    AmountOverflow(String),

    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, Error>;
