use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money sent to someone else
    Sent,
    /// Money received from someone else
    Received,
    /// A payment made on behalf of a group
    Group,
    /// A scanned receipt charged to the balance
    Receipt,
    /// Money asked from a group member (not an actual transfer)
    Request,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 5] = [
        TransactionKind::Sent,
        TransactionKind::Received,
        TransactionKind::Group,
        TransactionKind::Receipt,
        TransactionKind::Request,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Sent => "sent",
            TransactionKind::Received => "received",
            TransactionKind::Group => "group",
            TransactionKind::Receipt => "receipt",
            TransactionKind::Request => "request",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sent" => Some(TransactionKind::Sent),
            "received" => Some(TransactionKind::Received),
            "group" => Some(TransactionKind::Group),
            "receipt" => Some(TransactionKind::Receipt),
            "request" => Some(TransactionKind::Request),
            _ => None,
        }
    }

    /// Icon name shown next to the transaction.
    pub fn icon(&self) -> &'static str {
        match self {
            TransactionKind::Sent => "arrow.up.circle.fill",
            TransactionKind::Received => "arrow.down.circle.fill",
            TransactionKind::Group => "person.3.fill",
            TransactionKind::Receipt => "doc.text.viewfinder",
            TransactionKind::Request => "hand.raised.fill",
        }
    }

    /// Color tag used when rendering the transaction.
    pub fn color(&self) -> &'static str {
        match self {
            TransactionKind::Sent => "red",
            TransactionKind::Received => "green",
            TransactionKind::Group => "blue",
            TransactionKind::Receipt => "orange",
            TransactionKind::Request => "purple",
        }
    }

    /// Description used when none was given.
    pub fn placeholder(&self) -> &'static str {
        match self {
            TransactionKind::Sent => "Payment sent",
            TransactionKind::Received => "Payment received",
            TransactionKind::Group => "Group payment",
            TransactionKind::Receipt => "Receipt scanned",
            TransactionKind::Request => "Money requested",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single balance-affecting event. Transactions are immutable once created;
/// the ledger only ever prepends new ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub amount: Amount,
}

impl Transaction {
    pub fn new(kind: TransactionKind, description: impl Into<String>, amount: Amount) -> Self {
        let description = description.into();
        let description = if description.is_empty() {
            kind.placeholder().to_string()
        } else {
            description
        };

        Self {
            id: Uuid::new_v4(),
            kind,
            description,
            amount,
        }
    }

    pub fn sent(description: impl Into<String>, amount: Amount) -> Self {
        Self::new(TransactionKind::Sent, description, amount)
    }

    pub fn receipt(amount: Amount) -> Self {
        Self::new(TransactionKind::Receipt, "", amount)
    }

    pub fn request_from(member: &str, amount: Amount) -> Self {
        Self::new(
            TransactionKind::Request,
            format!("Request from {}", member),
            amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in TransactionKind::ALL {
            assert_eq!(TransactionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::from_str("refund"), None);
    }

    #[test]
    fn test_display_tags_are_distinct() {
        let mut icons: Vec<_> = TransactionKind::ALL.iter().map(|k| k.icon()).collect();
        let mut colors: Vec<_> = TransactionKind::ALL.iter().map(|k| k.color()).collect();
        icons.sort();
        icons.dedup();
        colors.sort();
        colors.dedup();
        assert_eq!(icons.len(), 5);
        assert_eq!(colors.len(), 5);
        assert_eq!(format!("{:<8}|", TransactionKind::Sent), "sent    |");
    }

    #[test]
    fn test_empty_description_uses_placeholder() {
        let tx = Transaction::sent("", 10.0);
        assert_eq!(tx.description, "Payment sent");

        let tx = Transaction::receipt(12.0);
        assert_eq!(tx.description, "Receipt scanned");
    }

    #[test]
    fn test_description_kept_when_given() {
        let tx = Transaction::sent("Dinner", 10.0);
        assert_eq!(tx.description, "Dinner");
        assert_eq!(tx.kind, TransactionKind::Sent);
    }

    #[test]
    fn test_request_description_names_member() {
        let tx = Transaction::request_from("Alice", 30.0);
        assert_eq!(tx.kind, TransactionKind::Request);
        assert_eq!(tx.description, "Request from Alice");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Transaction::sent("", 1.0);
        let b = Transaction::sent("", 1.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialized_field_names() {
        let tx = Transaction::receipt(7.5);
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["type"], "receipt");
        assert_eq!(value["description"], "Receipt scanned");
        assert_eq!(value["amount"], 7.5);
        assert!(value.get("kind").is_none());
    }
}
