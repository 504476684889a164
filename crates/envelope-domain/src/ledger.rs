//! Newest-first log of applied transactions.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Append-only audit log. The allocation engine never reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Ledger(Vec<Transaction>);

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `transaction` so the newest entry comes first.
    pub fn record(&mut self, transaction: Transaction) {
        self.0.insert(0, transaction);
    }

    /// Bulk discard used by the month reset.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn latest(&self) -> Option<&Transaction> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Transaction>> for Ledger {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self(transactions)
    }
}
