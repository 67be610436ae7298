// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use autonomo::application::LedgerService;
use autonomo::domain::{Cents, NewTransaction, TransactionKind};
use autonomo::storage::Repository;
use chrono::NaiveDate;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService<Repository>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a YYYY-MM-DD string
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Draft an expense as a user would type it
pub fn expense(amount: Cents, date: &str, category: &str, sub: Option<&str>) -> NewTransaction {
    NewTransaction {
        amount,
        kind: TransactionKind::Expense,
        date: parse_date(date),
        description: format!("{} expense", category),
        category: category.into(),
        subcategory: sub.map(str::to_string),
    }
}

/// Draft an income entry under Revenue / Services
pub fn income(amount: Cents, date: &str) -> NewTransaction {
    NewTransaction {
        amount,
        kind: TransactionKind::Income,
        date: parse_date(date),
        description: "Client payment".into(),
        category: "Revenue".into(),
        subcategory: Some("Services".into()),
    }
}

/// The three-record scenario: revenue, rent and groceries in July 2025.
pub async fn record_july_scenario<S: autonomo::storage::TransactionSource>(
    service: &LedgerService<S>,
) -> Result<()> {
    service.record_transaction(income(300000, "2025-07-01")).await?;
    service
        .record_transaction(expense(150000, "2025-07-05", "Housing", Some("Rent")))
        .await?;
    service
        .record_transaction(expense(40000, "2025-07-10", "Food", Some("Groceries")))
        .await?;
    Ok(())
}
