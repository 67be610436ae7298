use autonomo::domain::{
    Cents, Transaction, TransactionKind, filter_by_period, group_by_category,
    group_by_subcategory, summarize,
};
use autonomo::storage::demo_transactions;
use chrono::NaiveDate;

const CATEGORIES: [(&str, &[&str]); 4] = [
    ("Food", &["Restaurants", "Groceries"]),
    ("Housing", &["Rent", "Utilities"]),
    ("Transport", &["Fuel"]),
    ("Taxes", &["DAS", "INSS"]),
];

/// Deterministic pseudo-random ledger spanning 2024-2025.
fn generated_ledger(seed: u64, len: usize) -> Vec<Transaction> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };

    (0..len)
        .map(|i| {
            let year = 2024 + (next() % 2) as i32;
            let month = 1 + (next() % 12) as u32;
            let day = 1 + (next() % 28) as u32;
            let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            let amount = 1 + (next() % 500_000) as Cents;

            if next() % 4 == 0 {
                Transaction::new(
                    i.to_string(),
                    "income",
                    amount,
                    TransactionKind::Income,
                    date,
                    "Revenue",
                )
            } else {
                let (category, subs) = CATEGORIES[(next() % 4) as usize];
                let tx = Transaction::new(
                    i.to_string(),
                    "expense",
                    -amount,
                    TransactionKind::Expense,
                    date,
                    category,
                );
                // leave some without a subcategory
                match next() % 3 {
                    0 => tx,
                    n => tx.with_subcategory(subs[(n as usize - 1) % subs.len()]),
                }
            }
        })
        .collect()
}

fn ledgers() -> Vec<Vec<Transaction>> {
    let mut ledgers = vec![Vec::new(), demo_transactions()];
    for seed in 1..=8 {
        ledgers.push(generated_ledger(seed, 200));
    }
    ledgers
}

#[test]
fn test_filter_returns_only_matching_records_from_input() {
    for ledger in ledgers() {
        for year in [2024, 2025] {
            for month in 1..=12 {
                let label = format!("{:04}-{:02}", year, month);
                let subset = filter_by_period(&ledger, month, year);
                for record in &subset {
                    assert!(ledger.contains(record));
                    assert_eq!(record.date.format("%Y-%m").to_string(), label);
                }
                let expected = ledger
                    .iter()
                    .filter(|t| t.date.format("%Y-%m").to_string() == label)
                    .count();
                assert_eq!(subset.len(), expected);
            }
        }
    }
}

#[test]
fn test_balance_is_income_minus_expense() {
    for ledger in ledgers() {
        for month in 1..=12 {
            let subset = filter_by_period(&ledger, month, 2025);
            let summary = summarize(&subset);
            assert_eq!(summary.balance, summary.income - summary.expense);
            assert!(summary.income >= 0);
            assert!(summary.expense >= 0);
        }
    }
}

#[test]
fn test_category_totals_sum_to_expense() {
    for ledger in ledgers() {
        for month in 1..=12 {
            let subset = filter_by_period(&ledger, month, 2024);
            let total: Cents = group_by_category(&subset).iter().map(|g| g.total).sum();
            assert_eq!(total, summarize(&subset).expense);
            assert!(group_by_category(&subset).iter().all(|g| g.total > 0));
        }
    }
}

#[test]
fn test_subcategory_totals_sum_to_category_total() {
    for ledger in ledgers() {
        let subset = filter_by_period(&ledger, 7, 2025);
        for group in group_by_category(&subset) {
            let total: Cents = group_by_subcategory(&subset, &group.name)
                .iter()
                .map(|g| g.total)
                .sum();
            assert_eq!(total, group.total, "category {}", group.name);
        }
    }
}

#[test]
fn test_operations_are_idempotent() {
    for ledger in ledgers() {
        let a = filter_by_period(&ledger, 3, 2025);
        let b = filter_by_period(&ledger, 3, 2025);
        assert_eq!(a, b);
        assert_eq!(summarize(&a), summarize(&b));
        assert_eq!(group_by_category(&a), group_by_category(&b));
        assert_eq!(
            group_by_subcategory(&a, "Food"),
            group_by_subcategory(&b, "Food")
        );
    }
}

#[test]
fn test_empty_input_gives_zero_summary() {
    let summary = summarize(&[]);
    assert_eq!((summary.income, summary.expense, summary.balance), (0, 0, 0));
    assert!(group_by_category(&[]).is_empty());
    assert!(group_by_subcategory(&[], "Food").is_empty());
}
