use std::ops::RangeInclusive;

use thiserror::Error;

use crate::domain::{Amount, Group};

/// Starting balance when nothing has been persisted yet.
pub const DEFAULT_INITIAL_BALANCE: Amount = 100.0;

/// Bounds of the amount drawn by the receipt scanner.
pub const DEFAULT_RECEIPT_MIN: Amount = 5.0;
pub const DEFAULT_RECEIPT_MAX: Amount = 100.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Initial balance must be a finite number, got {0}")]
    NonFiniteBalance(Amount),

    #[error("Receipt range {start}..={end} must have finite bounds and a finite width")]
    InvalidReceiptRange { start: Amount, end: Amount },
}

/// Tunables for a fresh ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    initial_balance: Amount,
    /// Always ordered, with finite bounds and a finite width.
    receipt_range: RangeInclusive<Amount>,
    /// Groups present before anything is loaded, as (name, members).
    pub seed_groups: Vec<(String, Vec<String>)>,
}

impl LedgerConfig {
    pub fn with_initial_balance(mut self, balance: Amount) -> Result<Self, ConfigError> {
        if !balance.is_finite() {
            return Err(ConfigError::NonFiniteBalance(balance));
        }
        self.initial_balance = balance;
        Ok(self)
    }

    /// Bounds may be given in either order.
    pub fn with_receipt_range(mut self, range: RangeInclusive<Amount>) -> Result<Self, ConfigError> {
        let (start, end) = range.into_inner();
        let (low, high) = (start.min(end), start.max(end));
        // gen_range panics unless both bounds and their difference are finite
        if !start.is_finite() || !end.is_finite() || !(high - low).is_finite() {
            return Err(ConfigError::InvalidReceiptRange { start, end });
        }
        self.receipt_range = low..=high;
        Ok(self)
    }

    pub fn initial_balance(&self) -> Amount {
        self.initial_balance
    }

    pub fn receipt_range(&self) -> &RangeInclusive<Amount> {
        &self.receipt_range
    }

    pub fn without_seed_groups(mut self) -> Self {
        self.seed_groups.clear();
        self
    }

    /// Build the seed groups with fresh ids.
    pub fn build_seed_groups(&self) -> Vec<Group> {
        self.seed_groups
            .iter()
            .map(|(name, members)| Group::new(name.clone()).with_members(members.iter().cloned()))
            .collect()
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            receipt_range: DEFAULT_RECEIPT_MIN..=DEFAULT_RECEIPT_MAX,
            seed_groups: vec![
                (
                    "Group 1".to_string(),
                    vec!["Alice".to_string(), "Bob".to_string()],
                ),
                ("Group 2".to_string(), vec!["Charlie".to_string()]),
            ],
        }
    }
}
