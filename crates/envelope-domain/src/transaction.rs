//! Immutable records of income and spend events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Spend,
}

impl TransactionKind {
    /// Note recorded when the user supplies none.
    pub fn default_note(self) -> &'static str {
        match self {
            TransactionKind::Income => "Received Funds",
            TransactionKind::Spend => "Purchased Item",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Spend => "spend",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    /// Opaque token. Documents written elsewhere may carry non-UUID ids.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: Money, note: Option<&str>) -> Self {
        Self::at(kind, amount, note, Utc::now())
    }

    pub fn at(
        kind: TransactionKind,
        amount: Money,
        note: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let note = note
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| kind.default_note());
        Self {
            id: Uuid::new_v4().simple().to_string(),
            kind,
            amount,
            timestamp,
            note: note.to_string(),
        }
    }
}
