// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use splitpay::application::LedgerModel;
use splitpay::storage::SqliteStore;
use tempfile::TempDir;

/// Helper to create a fresh model over a temporary database
pub async fn test_model() -> Result<(LedgerModel<SqliteStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = open_store(&temp_dir).await?;
    Ok((LedgerModel::open(store).await, temp_dir))
}

/// Open (or reopen) the store living in `temp_dir`
pub async fn open_store(temp_dir: &TempDir) -> Result<SqliteStore> {
    let db_path = temp_dir.path().join("test.db");
    SqliteStore::open(db_path.to_str().unwrap()).await
}

/// Build a second model over the same database, as a new process would
pub async fn reopen(temp_dir: &TempDir) -> Result<LedgerModel<SqliteStore>> {
    Ok(LedgerModel::open(open_store(temp_dir).await?).await)
}

/// Compare floats produced by different arithmetic paths
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
