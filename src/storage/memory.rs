use anyhow::{Result, bail};
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::TransactionKind::{self, Expense, Income};
use crate::domain::{Cents, Transaction};

use super::{PeriodFilter, TransactionSource};

/// In-process transaction source backed by a vector.
/// Used for demo mode and tests.
#[derive(Debug, Default)]
pub struct MemorySource {
    records: RwLock<Vec<Transaction>>,
}

impl MemorySource {
    pub fn new(records: Vec<Transaction>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// A source pre-loaded with [`demo_transactions`].
    pub fn demo() -> Self {
        Self::new(demo_transactions())
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl TransactionSource for MemorySource {
    async fn list_transactions(&self, filter: PeriodFilter) -> Result<Vec<Transaction>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|t| filter.matches(t.date))
            .cloned()
            .collect())
    }

    async fn append_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|t| t.id == transaction.id) {
            bail!("Transaction already exists: {}", transaction.id);
        }
        debug!(id = %transaction.id, "appending transaction to memory source");
        records.push(transaction.clone());
        Ok(())
    }
}

type DemoRow = (
    &'static str,
    &'static str,
    Cents,
    TransactionKind,
    (i32, u32, u32),
    &'static str,
    &'static str,
);

const DEMO_ROWS: &[DemoRow] = &[
    ("1", "Consulting sale", 300000, Income, (2025, 7, 1), "Revenue", "Services"),
    ("2", "Office rent", -150000, Expense, (2025, 7, 5), "Housing", "Rent"),
    ("3", "Monthly groceries", -40000, Expense, (2025, 7, 10), "Food", "Groceries"),
    ("4", "Client dinner", -18000, Expense, (2025, 7, 12), "Food", "Restaurants"),
    ("5", "Gas", -12000, Expense, (2025, 7, 15), "Transport", "Fuel"),
    ("6", "SaaS software", -8000, Expense, (2025, 7, 20), "Work Supplies", "Software"),
    ("7", "DAS MEI", -7060, Expense, (2025, 7, 20), "Taxes", "DAS"),
    ("8", "Web project", 200000, Income, (2025, 7, 25), "Revenue", "Services"),
    ("9", "Cinema", -6000, Expense, (2025, 7, 28), "Leisure", "Cinema"),
    ("10", "Cleaning supplies", -5000, Expense, (2025, 7, 30), "Housing", "Maintenance"),
    ("11", "August revenue", 100000, Income, (2025, 8, 1), "Revenue", "Services"),
    ("12", "August rent", -100000, Expense, (2025, 8, 5), "Housing", "Rent"),
];

/// The sample ledger: July and August 2025 for a freelance consultant.
pub fn demo_transactions() -> Vec<Transaction> {
    DEMO_ROWS
        .iter()
        .filter_map(|&(id, description, value, kind, (y, m, d), category, sub)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            let record = Transaction::new(id, description, value, kind, date, category);
            Some(record.with_subcategory(sub))
        })
        .collect()
}
