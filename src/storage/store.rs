use anyhow::Result;

/// Key under which the balance document is stored.
pub const BALANCE_KEY: &str = "balance";

/// Key under which the transaction list is stored.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Key under which the group list is stored.
pub const GROUPS_KEY: &str = "groups";

/// Durable byte storage addressed by string keys.
///
/// Each key is an independent document: there is no transaction spanning
/// several keys, and nothing is ever deleted.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Fetch the bytes stored under `key`, or `None` if nothing was ever written.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}
