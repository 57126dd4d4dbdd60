use thiserror::Error;

use crate::domain::{Cents, ParseAmountError, RecordId, format_cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount {
        input: String,
        reason: ParseAmountError,
    },

    #[error(
        "Insufficient balance: balance {}, required {}",
        format_cents(*balance),
        format_cents(*required)
    )]
    InsufficientBalance { balance: Cents, required: Cents },

    #[error("No entry at position {index} (ledger has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),
}

impl AppError {
    pub(crate) fn invalid_amount(input: &str, reason: ParseAmountError) -> Self {
        AppError::InvalidAmount {
            input: input.to_string(),
            reason,
        }
    }
}
