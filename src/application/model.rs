use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::config::LedgerConfig;
use crate::domain::{
    Amount, Group, LedgerState, Transaction, parse_amount, split_request,
};
use crate::storage::codec::{self, CodecError};
use crate::storage::{BALANCE_KEY, GROUPS_KEY, KeyValueStore, TRANSACTIONS_KEY};

use super::AppError;

/// The ledger a session works against: in-memory state plus the store it is
/// flushed to. Callers own it and pass it by reference; every operation runs to
/// completion before the next one starts.
pub struct LedgerModel<S> {
    state: LedgerState,
    config: LedgerConfig,
    store: S,
}

impl<S: KeyValueStore> LedgerModel<S> {
    /// Create a model with default state. Nothing is loaded yet.
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self {
            state: LedgerState::new(&config),
            config,
            store,
        }
    }

    /// Create a model and load whatever the store holds.
    pub async fn open(store: S) -> Self {
        Self::open_with_config(store, LedgerConfig::default()).await
    }

    pub async fn open_with_config(store: S, config: LedgerConfig) -> Self {
        let mut model = Self::with_config(store, config);
        model.load_all().await;
        model
    }

    pub fn balance(&self) -> Amount {
        self.state.balance
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    pub fn groups(&self) -> &[Group] {
        &self.state.groups
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================
    // Loading
    // ========================

    /// Replace the balance with the stored one. Returns false, leaving the
    /// balance as it was, when nothing usable is stored.
    pub async fn load_balance(&mut self) -> bool {
        match self.load_document(BALANCE_KEY, codec::decode_balance).await {
            Some(balance) => {
                self.state.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Replace the transaction list with the stored one. Returns false, leaving
    /// the list as it was, when nothing usable is stored.
    pub async fn load_transactions(&mut self) -> bool {
        match self
            .load_document(TRANSACTIONS_KEY, codec::decode_transactions)
            .await
        {
            Some(transactions) => {
                self.state.transactions = transactions;
                true
            }
            None => false,
        }
    }

    /// Replace the group list with the stored one. Returns false, leaving the
    /// list as it was, when nothing usable is stored.
    pub async fn load_groups(&mut self) -> bool {
        match self.load_document(GROUPS_KEY, codec::decode_groups).await {
            Some(groups) => {
                self.state.groups = groups;
                true
            }
            None => false,
        }
    }

    pub async fn load_all(&mut self) {
        let balance = self.load_balance().await;
        let transactions = self.load_transactions().await;
        let groups = self.load_groups().await;
        debug!(balance, transactions, groups, "loaded ledger documents");
    }

    async fn load_document<T>(
        &self,
        key: &str,
        decode: fn(&[u8]) -> Result<T, CodecError>,
    ) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(bytes)) => match decode(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(key, "keeping current value, stored document is unreadable: {err}");
                    None
                }
            },
            Ok(None) => {
                debug!(key, "nothing stored yet");
                None
            }
            Err(err) => {
                warn!(key, "keeping current value, read failed: {err:#}");
                None
            }
        }
    }

    // ========================
    // Saving
    // ========================

    /// Write the balance. `Ok(false)` means it could not be encoded and nothing
    /// was written.
    pub async fn save_balance(&self) -> Result<bool, AppError> {
        self.save_document(BALANCE_KEY, codec::encode_balance(self.state.balance))
            .await
    }

    pub async fn save_transactions(&self) -> Result<bool, AppError> {
        self.save_document(
            TRANSACTIONS_KEY,
            codec::encode_transactions(&self.state.transactions),
        )
        .await
    }

    pub async fn save_groups(&self) -> Result<bool, AppError> {
        self.save_document(GROUPS_KEY, codec::encode_groups(&self.state.groups))
            .await
    }

    /// Write all three documents. They are independent writes, not one transaction.
    pub async fn save_all(&self) -> Result<(), AppError> {
        self.save_balance().await?;
        self.save_transactions().await?;
        self.save_groups().await?;
        Ok(())
    }

    async fn save_document(
        &self,
        key: &str,
        encoded: Result<Vec<u8>, CodecError>,
    ) -> Result<bool, AppError> {
        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key, "not saving: {err}");
                return Ok(false);
            }
        };
        self.store.set(key, &bytes).await?;
        Ok(true)
    }

    // Mutations keep their in-memory effect even when the write fails.
    async fn persist_balance(&self) {
        if let Err(err) = self.save_balance().await {
            error!("balance write lost: {err}");
        }
    }

    async fn persist_transactions(&self) {
        if let Err(err) = self.save_transactions().await {
            error!("transactions write lost: {err}");
        }
    }

    async fn persist_groups(&self) {
        if let Err(err) = self.save_groups().await {
            error!("groups write lost: {err}");
        }
    }

    // ========================
    // Payments
    // ========================

    /// Send money out of the balance. An empty description becomes "Payment sent".
    pub async fn send_payment(
        &mut self,
        amount_text: &str,
        description: &str,
    ) -> Result<Transaction, AppError> {
        let amount = parse_input(amount_text)?;
        if amount > self.state.balance {
            return Err(AppError::InsufficientFunds {
                balance: self.state.balance,
                required: amount,
            });
        }

        self.state.balance = self.debited(amount)?;
        let transaction = Transaction::sent(description, amount);
        self.state.record(transaction.clone());
        info!(amount, balance = self.state.balance, "payment sent");

        self.persist_transactions().await;
        self.persist_balance().await;
        Ok(transaction)
    }

    /// Charge a receipt of random value within the configured range.
    /// The balance is not checked against the charge and may go negative.
    pub async fn scan_receipt(&mut self) -> Result<Transaction, AppError> {
        let amount = self.draw_receipt_amount(&mut rand::thread_rng());
        self.charge_receipt(amount).await
    }

    pub async fn scan_receipt_with<R: Rng>(&mut self, rng: &mut R) -> Result<Transaction, AppError> {
        let amount = self.draw_receipt_amount(rng);
        self.charge_receipt(amount).await
    }

    fn draw_receipt_amount<R: Rng>(&self, rng: &mut R) -> Amount {
        rng.gen_range(self.config.receipt_range().clone())
    }

    async fn charge_receipt(&mut self, amount: Amount) -> Result<Transaction, AppError> {
        self.state.balance = self.debited(amount)?;
        let transaction = Transaction::receipt(amount);
        self.state.record(transaction.clone());
        info!(amount, balance = self.state.balance, "receipt scanned");

        self.persist_transactions().await;
        self.persist_balance().await;
        Ok(transaction)
    }

    /// Balance after taking `charge` out of it. The balance must stay finite
    /// so that it can still be saved.
    fn debited(&self, charge: Amount) -> Result<Amount, AppError> {
        let balance = self.state.balance - charge;
        if balance.is_finite() {
            Ok(balance)
        } else {
            Err(AppError::BalanceOverflow {
                balance: self.state.balance,
                charge,
            })
        }
    }

    // ========================
    // Groups
    // ========================

    /// Append a new group with no members. Only the empty string is rejected.
    pub async fn create_group(&mut self, name: &str) -> Result<Group, AppError> {
        if name.is_empty() {
            return Err(AppError::EmptyGroupName);
        }

        let group = Group::new(name);
        self.state.groups.push(group.clone());
        info!(name, "group created");

        self.persist_groups().await;
        Ok(group)
    }

    pub async fn add_member_to_group(
        &mut self,
        group_index: usize,
        member_name: &str,
    ) -> Result<Group, AppError> {
        if member_name.is_empty() {
            return Err(AppError::EmptyMemberName);
        }
        let group = self
            .state
            .group_mut(group_index)
            .ok_or(AppError::GroupNotFound(group_index))?;

        group.add_member(member_name);
        let updated = group.clone();
        info!(group = %updated.name, member = member_name, "member added");

        self.persist_groups().await;
        Ok(updated)
    }

    /// Split `amount_text` evenly across the group's members, recording one
    /// request per member in member order (so the last member ends up first
    /// in the list). The balance is charged the share times the member count.
    /// Returns the new transactions in the order they were recorded.
    pub async fn request_money_from_group(
        &mut self,
        group_index: usize,
        amount_text: &str,
    ) -> Result<Vec<Transaction>, AppError> {
        let amount = parse_input(amount_text)?;
        let group = self
            .state
            .group(group_index)
            .ok_or(AppError::GroupNotFound(group_index))?;
        let (share, charged) = split_request(amount, group.member_count())
            .ok_or_else(|| AppError::EmptyGroup(group.name.clone()))?;
        let balance = self.debited(charged)?;

        let requests: Vec<Transaction> = group
            .members
            .iter()
            .map(|member| Transaction::request_from(member, share))
            .collect();
        for request in &requests {
            self.state.record(request.clone());
        }
        self.state.balance = balance;
        info!(
            amount,
            share,
            members = requests.len(),
            balance = self.state.balance,
            "money requested from group"
        );

        self.persist_transactions().await;
        self.persist_balance().await;
        Ok(requests)
    }
}

fn parse_input(amount_text: &str) -> Result<Amount, AppError> {
    parse_amount(amount_text).map_err(|reason| AppError::InvalidAmount {
        input: amount_text.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;
    use crate::storage::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn model() -> LedgerModel<MemoryStore> {
        LedgerModel::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_fresh_model_defaults() {
        let model = model();
        assert_eq!(model.balance(), 100.0);
        assert!(model.transactions().is_empty());
        assert_eq!(model.groups().len(), 2);
        assert!(model.store().is_empty());
    }

    #[tokio::test]
    async fn test_send_payment_records_and_persists() {
        let mut model = model();
        let tx = model.send_payment("25.5", "Lunch").await.unwrap();

        assert_eq!(model.balance(), 74.5);
        assert_eq!(model.transactions()[0], tx);
        assert_eq!(tx.kind, TransactionKind::Sent);
        assert_eq!(tx.description, "Lunch");

        let stored_balance = model.store().get(BALANCE_KEY).await.unwrap().unwrap();
        assert_eq!(codec::decode_balance(&stored_balance).unwrap(), 74.5);
        assert!(model.store().get(TRANSACTIONS_KEY).await.unwrap().is_some());
        assert!(model.store().get(GROUPS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_send_payment_rejections_leave_state() {
        let mut model = model();
        let before = model.state().clone();

        for input in ["0", "-5", "abc", "", "100.01", "inf"] {
            assert!(model.send_payment(input, "x").await.is_err(), "{input}");
        }
        assert_eq!(model.state(), &before);
        assert!(model.store().is_empty());
    }

    #[tokio::test]
    async fn test_scan_receipt_is_within_range() {
        let mut model = model();
        let mut rng = StdRng::seed_from_u64(7);
        let tx = model.scan_receipt_with(&mut rng).await.unwrap();

        assert!((5.0..=100.0).contains(&tx.amount));
        assert_eq!(tx.kind, TransactionKind::Receipt);
        assert_eq!(tx.description, "Receipt scanned");
        assert_eq!(model.balance(), 100.0 - tx.amount);
    }

    #[tokio::test]
    async fn test_lost_write_keeps_mutation() {
        let mut model = model();
        model.store().reject_writes(true);

        let group = model.create_group("Trip").await.unwrap();
        assert_eq!(model.groups().last(), Some(&group));
        assert!(model.store().is_empty());
        assert!(model.save_groups().await.is_err());
    }

    #[tokio::test]
    async fn test_non_finite_balance_is_not_saved() {
        let mut model = model();
        assert!(model.save_balance().await.unwrap());

        model.state.balance = f64::NEG_INFINITY;
        assert!(!model.save_balance().await.unwrap());

        let stored = model.store().get(BALANCE_KEY).await.unwrap().unwrap();
        assert_eq!(codec::decode_balance(&stored).unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_scan_overflow_is_rejected() {
        let config = LedgerConfig::default()
            .with_initial_balance(-f64::MAX)
            .unwrap()
            .with_receipt_range(f64::MAX..=f64::MAX)
            .unwrap();
        let mut model = LedgerModel::with_config(MemoryStore::new(), config);
        let mut rng = StdRng::seed_from_u64(1);

        let err = model.scan_receipt_with(&mut rng).await.unwrap_err();
        assert!(matches!(err, AppError::BalanceOverflow { .. }));
        assert!(err.is_rejection());
        assert_eq!(model.balance(), -f64::MAX);
        assert!(model.transactions().is_empty());
        assert!(model.store().is_empty());
    }

    #[tokio::test]
    async fn test_failed_reads_keep_current_state() {
        let mut model = model();
        model.save_all().await.unwrap();
        model.send_payment("10", "Taxi").await.unwrap();
        model.create_group("Trip").await.unwrap();
        let before = model.state().clone();

        model.store().reject_reads(true);
        assert!(!model.load_balance().await);
        assert!(!model.load_transactions().await);
        assert!(!model.load_groups().await);
        assert_eq!(model.state(), &before);

        model.store().reject_reads(false);
        assert!(model.load_balance().await);
        assert_eq!(model.balance(), 90.0);
    }
}
