use std::future::Future;

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::{Period, Transaction};

/// Which records a source should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    All,
    Month(Period),
}

impl PeriodFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            PeriodFilter::All => true,
            PeriodFilter::Month(period) => period.contains(date),
        }
    }
}

impl From<Period> for PeriodFilter {
    fn from(period: Period) -> Self {
        PeriodFilter::Month(period)
    }
}

impl From<Option<Period>> for PeriodFilter {
    fn from(period: Option<Period>) -> Self {
        period.map_or(PeriodFilter::All, PeriodFilter::Month)
    }
}

/// Where transaction records come from. Screens and commands only see this
/// trait; the aggregator consumes whatever collection it resolves to.
pub trait TransactionSource: Send + Sync {
    /// Records matching the filter, in insertion order.
    fn list_transactions(
        &self,
        filter: PeriodFilter,
    ) -> impl Future<Output = Result<Vec<Transaction>>> + Send;

    /// Append a new record. Sources never edit or delete.
    fn append_transaction(
        &self,
        transaction: &Transaction,
    ) -> impl Future<Output = Result<()>> + Send;
}
