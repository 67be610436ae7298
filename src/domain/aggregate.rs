//! Period filtering and reductions over a transaction collection.
//!
//! Every function here is pure: it only reads its input and allocates new
//! output, so callers may re-run the whole pipeline on each period change.

use serde::{Deserialize, Serialize};

use super::{Cents, Period, Transaction, TransactionKind, UNCATEGORIZED};

/// Income, expense and their difference for a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub income: Cents,
    pub expense: Cents,
    pub balance: Cents,
}

/// One entry of an ordered label -> total mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Cents,
}

/// Records whose date falls in the given month and year, in input order.
/// Months outside 1..=12 simply match nothing.
pub fn filter_by_period(records: &[Transaction], month: u32, year: i32) -> Vec<Transaction> {
    records
        .iter()
        .filter(|t| Period { year, month }.contains(t.date))
        .cloned()
        .collect()
}

/// Sum income and expense. Expenses count by magnitude whatever sign they carry.
/// Totals saturate at the `Cents` bounds.
pub fn summarize(records: &[Transaction]) -> Summary {
    let (income, expense): (Cents, Cents) = records
        .iter()
        .fold((0, 0), |(income, expense), t| match t.kind {
            TransactionKind::Income => (income.saturating_add(t.value), expense),
            TransactionKind::Expense => (income, expense.saturating_add(t.amount())),
        });

    Summary {
        income,
        expense,
        balance: income.saturating_sub(expense),
    }
}

/// Expense totals per category, in the order each category first appears.
pub fn group_by_category(records: &[Transaction]) -> Vec<CategoryTotal> {
    accumulate(
        records
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| (t.category.as_str(), t.amount())),
    )
}

/// Expense totals per subcategory within one category.
/// Records without a subcategory land in [`UNCATEGORIZED`].
pub fn group_by_subcategory(records: &[Transaction], category: &str) -> Vec<CategoryTotal> {
    accumulate(
        records
            .iter()
            .filter(|t| t.is_expense() && t.category == category)
            .map(|t| (t.subcategory.as_deref().unwrap_or(UNCATEGORIZED), t.amount())),
    )
}

/// The `limit` most recent records, newest first. Ties keep input order.
pub fn most_recent(records: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.into_iter().take(limit).cloned().collect()
}

// Output order is first-seen order.
fn accumulate<'a>(entries: impl Iterator<Item = (&'a str, Cents)>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for (name, amount) in entries {
        match totals.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.total = existing.total.saturating_add(amount),
            None => totals.push(CategoryTotal {
                name: name.to_string(),
                total: amount,
            }),
        }
    }
    totals
}
