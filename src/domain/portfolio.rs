use serde::{Deserialize, Serialize};

use super::Cents;

/// A position in the investment placeholder: what went in and what it is worth now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,
    pub invested: Cents,
    pub current_value: Cents,
}

impl Holding {
    pub fn new(name: impl Into<String>, invested: Cents, current_value: Cents) -> Self {
        Self {
            name: name.into(),
            invested,
            current_value,
        }
    }

    pub fn profit_loss(&self) -> Cents {
        self.current_value - self.invested
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_invested: Cents,
    pub current_value: Cents,
    pub profit_loss: Cents,
    /// Return on the invested total, in basis points (1% = 100)
    pub return_bps: i64,
    pub allocations: Vec<Allocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub name: String,
    pub current_value: Cents,
    pub profit_loss: Cents,
    /// Share of the current portfolio value, in basis points
    pub share_bps: i64,
}

pub fn summarize_portfolio(holdings: &[Holding]) -> PortfolioSummary {
    let total_invested: Cents = holdings.iter().map(|h| h.invested).sum();
    let current_value: Cents = holdings.iter().map(|h| h.current_value).sum();
    let profit_loss = current_value - total_invested;

    let allocations = holdings
        .iter()
        .map(|h| Allocation {
            name: h.name.clone(),
            current_value: h.current_value,
            profit_loss: h.profit_loss(),
            share_bps: basis_points(h.current_value, current_value),
        })
        .collect();

    PortfolioSummary {
        total_invested,
        current_value,
        profit_loss,
        return_bps: basis_points(profit_loss, total_invested),
        allocations,
    }
}

/// Sample positions shown until a real brokerage feed exists.
pub fn demo_holdings() -> Vec<Holding> {
    vec![
        Holding::new("Fund A (CDB)", 685000, 700000),
        Holding::new("Stocks B (BOVA11)", 505000, 500000),
        Holding::new("Crypto C (BTC)", 310000, 385075),
    ]
}

fn basis_points(part: Cents, whole: Cents) -> i64 {
    if whole == 0 {
        return 0;
    }
    ((part as i128 * 10_000) / whole as i128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_portfolio() {
        let summary = summarize_portfolio(&demo_holdings());
        assert_eq!(summary.total_invested, 1500000);
        assert_eq!(summary.current_value, 1585075);
        assert_eq!(summary.profit_loss, 85075);
        assert_eq!(summary.return_bps, 567);
        assert_eq!(summary.allocations.len(), 3);
        assert_eq!(summary.allocations[1].profit_loss, -5000);
    }

    #[test]
    fn test_empty_portfolio() {
        let summary = summarize_portfolio(&[]);
        assert_eq!(summary.current_value, 0);
        assert_eq!(summary.return_bps, 0);
        assert!(summary.allocations.is_empty());
    }
}
