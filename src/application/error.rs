use thiserror::Error;

use crate::domain::{Amount, ParseAmountError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount {
        input: String,
        reason: ParseAmountError,
    },

    #[error("Insufficient funds: balance {balance:.2}, required {required:.2}")]
    InsufficientFunds { balance: Amount, required: Amount },

    #[error("Group name cannot be empty")]
    EmptyGroupName,

    #[error("Member name cannot be empty")]
    EmptyMemberName,

    #[error("Group not found: #{0}")]
    GroupNotFound(usize),

    #[error("Group '{0}' has no members to request money from")]
    EmptyGroup(String),

    #[error("Charging {charge} would take the balance of {balance} out of range")]
    BalanceOverflow { balance: Amount, charge: Amount },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// True for errors caused by the request itself rather than by storage.
    /// These leave the ledger untouched.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, AppError::Storage(_))
    }
}
