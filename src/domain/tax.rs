use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, Period, Transaction};

/// Day of the month the MEI DAS slip is due.
pub const DAS_DUE_DAY: u32 = 20;

pub const TAX_CATEGORY: &str = "Taxes";
pub const DAS_SUBCATEGORY: &str = "DAS";

/// Where the monthly DAS payment stands for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DasStatus {
    /// Tracking is switched off.
    NotConfigured,
    Due,
    Overdue,
    Paid { amount: Cents },
}

impl DasStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DasStatus::NotConfigured => "not configured",
            DasStatus::Due => "due",
            DasStatus::Overdue => "overdue",
            DasStatus::Paid { .. } => "paid",
        }
    }
}

impl std::fmt::Display for DasStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Due date of the DAS falling in a period.
pub fn das_due_date(period: Period) -> Option<NaiveDate> {
    period.day(DAS_DUE_DAY)
}

/// Total DAS paid within the given records.
pub fn das_paid(records: &[Transaction]) -> Cents {
    records
        .iter()
        .filter(|t| {
            t.is_expense()
                && t.category == TAX_CATEGORY
                && t.subcategory.as_deref() == Some(DAS_SUBCATEGORY)
        })
        .map(|t| t.amount())
        .sum()
}

/// Status of the DAS for `period`, given the records of that period.
pub fn das_status(
    period: Period,
    period_records: &[Transaction],
    today: NaiveDate,
    tracking_enabled: bool,
) -> DasStatus {
    if !tracking_enabled {
        return DasStatus::NotConfigured;
    }

    let paid = das_paid(period_records);
    if paid > 0 {
        return DasStatus::Paid { amount: paid };
    }

    match das_due_date(period) {
        Some(due) if today > due => DasStatus::Overdue,
        _ => DasStatus::Due,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn das_payment() -> Transaction {
        Transaction::new(
            "7",
            "DAS MEI",
            -7060,
            TransactionKind::Expense,
            date("2025-07-20"),
            TAX_CATEGORY,
        )
        .with_subcategory(DAS_SUBCATEGORY)
    }

    #[test]
    fn test_due_date() {
        let july = Period::new(7, 2025).unwrap();
        assert_eq!(das_due_date(july), Some(date("2025-07-20")));
    }

    #[test]
    fn test_status_transitions() {
        let july = Period::new(7, 2025).unwrap();

        assert_eq!(
            das_status(july, &[], date("2025-07-10"), false),
            DasStatus::NotConfigured
        );
        assert_eq!(das_status(july, &[], date("2025-07-10"), true), DasStatus::Due);
        assert_eq!(das_status(july, &[], date("2025-07-20"), true), DasStatus::Due);
        assert_eq!(
            das_status(july, &[], date("2025-07-21"), true),
            DasStatus::Overdue
        );
        assert_eq!(
            das_status(july, &[das_payment()], date("2025-07-25"), true),
            DasStatus::Paid { amount: 7060 }
        );
    }

    #[test]
    fn test_other_taxes_do_not_count() {
        let inss = Transaction::new(
            "8",
            "INSS",
            -1000,
            TransactionKind::Expense,
            date("2025-07-15"),
            TAX_CATEGORY,
        )
        .with_subcategory("INSS");
        assert_eq!(das_paid(&[inss]), 0);
    }
}
