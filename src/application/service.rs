use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{
    NewTransaction, Period, Taxonomy, Transaction, das_due_date, das_status, filter_by_period,
    most_recent, summarize,
};
use crate::storage::{MemorySource, PeriodFilter, Repository, TransactionSource};

use super::{AppError, DasReport, DashboardReport, ExtractReport, build_extract};

/// Application service: fetches records from a source and hands them to the
/// aggregator. This is the primary interface for any client (CLI, tests).
pub struct LedgerService<S> {
    source: S,
    taxonomy: Taxonomy,
}

impl LedgerService<Repository> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }
}

impl LedgerService<MemorySource> {
    /// A service over the built-in sample ledger.
    pub fn demo() -> Self {
        Self::new(MemorySource::demo())
    }
}

impl<S: TransactionSource> LedgerService<S> {
    pub fn new(source: S) -> Self {
        Self::with_taxonomy(source, Taxonomy::default())
    }

    pub fn with_taxonomy(source: S, taxonomy: Taxonomy) -> Self {
        Self { source, taxonomy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    // ========================
    // Recording
    // ========================

    /// Validate a draft, apply the sign for its kind and append it.
    pub async fn record_transaction(&self, draft: NewTransaction) -> Result<Transaction, AppError> {
        draft.validate(&self.taxonomy)?;
        let transaction = draft.into_transaction();
        self.source.append_transaction(&transaction).await?;

        info!(
            id = %transaction.id,
            kind = %transaction.kind,
            value = transaction.value,
            category = %transaction.category,
            "recorded transaction"
        );
        Ok(transaction)
    }

    /// Append a complete record from outside (e.g. an import), after checking it.
    pub async fn append_record(&self, transaction: Transaction) -> Result<Transaction, AppError> {
        transaction.validate(&self.taxonomy)?;
        if self.contains(&transaction.id).await? {
            return Err(AppError::DuplicateTransaction(transaction.id));
        }
        self.source.append_transaction(&transaction).await?;
        debug!(id = %transaction.id, "appended record");
        Ok(transaction)
    }

    /// Whether a record with this id is already stored.
    pub async fn contains(&self, id: &str) -> Result<bool, AppError> {
        let all = self.source.list_transactions(PeriodFilter::All).await?;
        Ok(all.iter().any(|t| t.id == id))
    }

    // ========================
    // Queries
    // ========================

    pub async fn list_transactions(
        &self,
        filter: PeriodFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        Ok(self.source.list_transactions(filter).await?)
    }

    /// Monthly statement, optionally drilling into one expense category.
    pub async fn extract(
        &self,
        period: Period,
        category: Option<&str>,
    ) -> Result<ExtractReport, AppError> {
        let records = self.source.list_transactions(period.into()).await?;
        debug!(%period, count = records.len(), "building extract");
        Ok(build_extract(period, records, category))
    }

    /// Home screen figures: all-time balance, current month and latest entries.
    pub async fn dashboard(
        &self,
        today: NaiveDate,
        recent_limit: usize,
    ) -> Result<DashboardReport, AppError> {
        let all = self.source.list_transactions(PeriodFilter::All).await?;
        let period = Period::containing(today);
        let month_records = filter_by_period(&all, period.month, period.year);

        Ok(DashboardReport {
            today,
            period,
            balance: summarize(&all).balance,
            month: summarize(&month_records),
            recent: most_recent(&all, recent_limit),
        })
    }

    pub async fn das_report(
        &self,
        period: Period,
        today: NaiveDate,
        tracking_enabled: bool,
    ) -> Result<DasReport, AppError> {
        let records = self.source.list_transactions(period.into()).await?;
        Ok(DasReport {
            period,
            due_date: das_due_date(period),
            status: das_status(period, &records, today, tracking_enabled),
        })
    }
}
