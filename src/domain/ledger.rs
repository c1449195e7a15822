use crate::config::LedgerConfig;

use super::{Amount, Group, Transaction};

/// The in-memory aggregate: balance, newest-first transactions and groups.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerState {
    pub balance: Amount,
    /// Newest first. New entries are only ever inserted at index 0.
    pub transactions: Vec<Transaction>,
    pub groups: Vec<Group>,
}

impl LedgerState {
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            balance: config.initial_balance(),
            transactions: Vec::new(),
            groups: config.build_seed_groups(),
        }
    }

    /// Prepend a transaction so the list stays newest first.
    pub fn record(&mut self, transaction: Transaction) {
        self.transactions.insert(0, transaction);
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn group_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.groups.get_mut(index)
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new(&LedgerConfig::default())
    }
}

/// Split `amount` evenly across `members`.
/// Returns the per-member share and the charged total, which is the share
/// multiplied back by the member count and can differ from `amount` in the
/// last bits. Returns `None` for an empty member list.
pub fn split_request(amount: Amount, members: usize) -> Option<(Amount, Amount)> {
    if members == 0 {
        return None;
    }
    let share = amount / members as f64;
    Some((share, share * members as f64))
}
