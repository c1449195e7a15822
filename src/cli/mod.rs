use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerModel;
use crate::domain::{Transaction, TransactionKind, format_amount};
use crate::storage::SqliteStore;

/// Splitpay - peer-to-peer payments demo ledger
#[derive(Parser)]
#[command(name = "splitpay")]
#[command(about = "Send money, split requests across groups and scan receipts against a local ledger")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "splitpay.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and write the starting ledger
    Init,

    /// Show the current balance
    Balance,

    /// List transactions, newest first
    Transactions {
        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only show one kind: sent, received, group, receipt, request
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Send money out of the balance
    Send {
        /// Amount to send (e.g., "12.50")
        amount: String,

        /// Description of the payment
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Scan a receipt and charge its total
    Scan,

    /// Group management commands
    #[command(subcommand)]
    Group(GroupCommands),

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, groups, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv, json for full)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// List groups with their members
    List,

    /// Create a new, empty group
    Create {
        /// Group name
        name: String,
    },

    /// Add a member to a group
    AddMember {
        /// Group number as shown by `group list`
        group: usize,

        /// Member display name
        name: String,
    },

    /// Request an amount split evenly across a group's members
    Request {
        /// Group number as shown by `group list`
        group: usize,

        /// Total amount to request (e.g., "90")
        amount: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let store = SqliteStore::open(&self.database)
            .await
            .with_context(|| format!("Failed to open database: {}", self.database))?;

        let mut model = LedgerModel::open(store).await;

        match self.command {
            Commands::Init => {
                model.save_all().await?;
                println!("Database initialized: {}", self.database);
                println!("Balance: {}", format_amount(model.balance()));
            }

            Commands::Balance => {
                println!("Balance: {}", format_amount(model.balance()));
            }

            Commands::Transactions { limit, kind } => {
                let kind = kind.as_deref().map(parse_kind).transpose()?;
                print_transactions(model.transactions(), kind, limit, self.verbose);
            }

            Commands::Send {
                amount,
                description,
            } => {
                let tx = model
                    .send_payment(&amount, description.as_deref().unwrap_or_default())
                    .await?;
                println!(
                    "Sent {} ({}) - balance {}",
                    format_amount(tx.amount),
                    tx.description,
                    format_amount(model.balance())
                );
            }

            Commands::Scan => {
                let tx = model.scan_receipt().await?;
                println!(
                    "Receipt total {} - balance {}",
                    format_amount(tx.amount),
                    format_amount(model.balance())
                );
            }

            Commands::Group(group_cmd) => {
                run_group_command(&mut model, group_cmd).await?;
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                run_export_command(&model, &export_type, output.as_deref(), format.as_deref())?;
            }
        }

        Ok(())
    }
}

fn parse_kind(s: &str) -> Result<TransactionKind> {
    TransactionKind::from_str(s).ok_or_else(|| {
        let valid: Vec<&str> = TransactionKind::ALL.iter().map(|k| k.as_str()).collect();
        anyhow::anyhow!(
            "Invalid transaction kind '{}'. Valid kinds: {}",
            s,
            valid.join(", ")
        )
    })
}

fn print_transactions(
    transactions: &[Transaction],
    kind: Option<TransactionKind>,
    limit: Option<usize>,
    verbose: bool,
) {
    let selected: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| kind.is_none_or(|k| tx.kind == k))
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    if selected.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<10} {:<8} {:<32} {:>10}",
        "TYPE", "COLOR", "DESCRIPTION", "AMOUNT"
    );
    println!("{}", "-".repeat(63));
    for tx in selected {
        println!(
            "{:<10} {:<8} {:<32} {:>10}",
            tx.kind,
            tx.kind.color(),
            truncate(&tx.description, 32),
            format_amount(tx.amount)
        );
        if verbose {
            println!("           icon {} id {}", tx.kind.icon(), tx.id);
        }
    }
}

async fn run_group_command(
    model: &mut LedgerModel<SqliteStore>,
    cmd: GroupCommands,
) -> Result<()> {
    match cmd {
        GroupCommands::List => {
            if model.groups().is_empty() {
                println!("No groups found.");
            } else {
                println!("{:<4} {:<20} MEMBERS", "#", "NAME");
                println!("{}", "-".repeat(50));
                for (index, group) in model.groups().iter().enumerate() {
                    let members = if group.members.is_empty() {
                        "-".to_string()
                    } else {
                        group.members.join(", ")
                    };
                    println!("{:<4} {:<20} {}", index, truncate(&group.name, 20), members);
                }
            }
        }

        GroupCommands::Create { name } => {
            let group = model.create_group(&name).await?;
            println!(
                "Created group #{}: {}",
                model.groups().len() - 1,
                group.name
            );
        }

        GroupCommands::AddMember { group, name } => {
            let updated = model.add_member_to_group(group, &name).await?;
            println!(
                "Added {} to {} ({} members)",
                name,
                updated.name,
                updated.member_count()
            );
        }

        GroupCommands::Request { group, amount } => {
            let requests = model.request_money_from_group(group, &amount).await?;
            for request in &requests {
                println!(
                    "{}: {}",
                    request.description,
                    format_amount(request.amount)
                );
            }
            println!("Balance: {}", format_amount(model.balance()));
        }
    }
    Ok(())
}

fn run_export_command(
    model: &LedgerModel<SqliteStore>,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(model.state());

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let json = match format {
        None => export_type == "full",
        Some("csv") => false,
        Some("json") => true,
        Some(other) => anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other),
    };

    match export_type {
        "transactions" => {
            let count = if json {
                exporter.export_transactions_json(writer)?
            } else {
                exporter.export_transactions_csv(writer)?
            };
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "groups" => {
            let count = if json {
                exporter.export_groups_json(writer)?
            } else {
                exporter.export_groups_csv(writer)?
            };
            if output.is_some() {
                eprintln!("Exported {} groups", count);
            }
        }
        "full" => {
            if !json {
                anyhow::bail!("Full export is only available as json");
            }
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported ledger: balance {}, {} transactions, {} groups",
                    format_amount(snapshot.balance),
                    snapshot.transactions.len(),
                    snapshot.groups.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, groups, full",
                export_type
            );
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
