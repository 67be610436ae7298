use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Cents, CategoryTotal, DasStatus, Period, Summary, Transaction, group_by_category,
    group_by_subcategory, summarize,
};

/// Palette for category slices, assigned in first-seen category order.
pub const CHART_COLORS: [&str; 15] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#CD5C5C", "#6A5ACD",
    "#20B2AA", "#FF6384B0", "#36A2EBB0", "#FFCE56B0", "#4BC0C0B0", "#9966FFB0", "#FF9F40B0",
];

pub const INCOME_COLOR: &str = "#28A745";
pub const EXPENSE_COLOR: &str = "#DC3545";

pub fn chart_color(index: usize) -> &'static str {
    CHART_COLORS[index % CHART_COLORS.len()]
}

/// One pie slice of the expense-by-category chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    pub total: Cents,
    pub percentage: f64,
    pub color: String,
}

/// One bar of the income vs expense chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowBar {
    pub label: String,
    pub total: Cents,
    pub color: String,
}

/// Everything the monthly statement shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractReport {
    pub period: Period,
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
    pub flow: Vec<FlowBar>,
    pub categories: Vec<CategorySlice>,
    pub selected_category: Option<String>,
    pub subcategories: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub today: NaiveDate,
    pub period: Period,
    /// Balance over every record ever stored
    pub balance: Cents,
    pub month: Summary,
    pub recent: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DasReport {
    pub period: Period,
    pub due_date: Option<NaiveDate>,
    pub status: DasStatus,
}

/// Build the statement for records already restricted to `period`.
pub fn build_extract(
    period: Period,
    records: Vec<Transaction>,
    category: Option<&str>,
) -> ExtractReport {
    let summary = summarize(&records);

    let categories = group_by_category(&records)
        .into_iter()
        .enumerate()
        .map(|(i, group)| CategorySlice {
            percentage: percentage(group.total, summary.expense),
            category: group.name,
            total: group.total,
            color: chart_color(i).to_string(),
        })
        .collect();

    let subcategories = category
        .map(|c| group_by_subcategory(&records, c))
        .unwrap_or_default();

    ExtractReport {
        period,
        flow: flow_bars(&summary),
        summary,
        categories,
        selected_category: category.map(str::to_string),
        subcategories,
        transactions: records,
    }
}

fn flow_bars(summary: &Summary) -> Vec<FlowBar> {
    vec![
        FlowBar {
            label: "Income".into(),
            total: summary.income,
            color: INCOME_COLOR.into(),
        },
        FlowBar {
            label: "Expense".into(),
            total: summary.expense,
            color: EXPENSE_COLOR.into(),
        },
    ]
}

fn percentage(part: Cents, whole: Cents) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::demo_transactions;
    use crate::domain::filter_by_period;

    #[test]
    fn test_build_extract_for_demo_july() {
        let july = Period::new(7, 2025).unwrap();
        let records = filter_by_period(&demo_transactions(), 7, 2025);
        let report = build_extract(july, records, Some("Food"));

        assert_eq!(report.transactions.len(), 10);
        assert_eq!(report.summary.balance, 253940);
        assert_eq!(report.flow[0].total, 500000);
        assert_eq!(report.flow[1].total, 246060);

        let names: Vec<&str> = report.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(
            names,
            vec!["Housing", "Food", "Transport", "Work Supplies", "Taxes", "Leisure"]
        );
        assert_eq!(report.categories[0].total, 155000);
        assert_eq!(report.categories[0].color, CHART_COLORS[0]);
        assert_eq!(report.categories[1].color, CHART_COLORS[1]);

        let share: f64 = report.categories.iter().map(|c| c.percentage).sum();
        assert!((share - 100.0).abs() < 1e-9);

        assert_eq!(report.selected_category.as_deref(), Some("Food"));
        assert_eq!(report.subcategories.len(), 2);
        assert_eq!(report.subcategories[0].name, "Groceries");
    }

    #[test]
    fn test_build_extract_empty() {
        let report = build_extract(Period::new(1, 2020).unwrap(), Vec::new(), None);
        assert_eq!(report.summary, Summary::default());
        assert!(report.categories.is_empty());
        assert!(report.subcategories.is_empty());
    }

    #[test]
    fn test_chart_color_wraps() {
        assert_eq!(chart_color(15), CHART_COLORS[0]);
    }
}
