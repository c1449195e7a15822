use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{Amount, Group, LedgerState, Transaction};

/// Full ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub balance: Amount,
    pub transactions: Vec<Transaction>,
    pub groups: Vec<Group>,
}

/// Exporter for converting ledger data to CSV or JSON.
pub struct Exporter<'a> {
    state: &'a LedgerState,
}

impl<'a> Exporter<'a> {
    pub fn new(state: &'a LedgerState) -> Self {
        Self { state }
    }

    /// Export transactions to CSV format, newest first
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "type", "description", "amount"])?;

        let mut count = 0;
        for tx in &self.state.transactions {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.kind.as_str().to_string(),
                tx.description.clone(),
                tx.amount.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export groups to CSV format. Members are joined with ';'.
    pub fn export_groups_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["id", "name", "members"])?;

        let mut count = 0;
        for group in &self.state.groups {
            csv_writer.write_record([
                group.id.to_string(),
                group.name.clone(),
                group.members.join(";"),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    pub fn export_transactions_json<W: Write>(&self, writer: W) -> Result<usize> {
        write_json(writer, &self.state.transactions)?;
        Ok(self.state.transactions.len())
    }

    pub fn export_groups_json<W: Write>(&self, writer: W) -> Result<usize> {
        write_json(writer, &self.state.groups)?;
        Ok(self.state.groups.len())
    }

    /// Export the whole ledger as a JSON snapshot
    pub fn export_full_json<W: Write>(&self, writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            balance: self.state.balance,
            transactions: self.state.transactions.clone(),
            groups: self.state.groups.clone(),
        };

        write_json(writer, &snapshot)?;
        Ok(snapshot)
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
