use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::{Transaction, TransactionKind};

use super::{MIGRATION_001_INITIAL, PeriodFilter, TransactionSource};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str =
    "SELECT id, description, value_cents, kind, date, category, subcategory FROM transactions";

/// Repository for persisting and querying transactions in SQLite.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Save a new transaction.
    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, description, value_cents, kind, date, category, subcategory, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.description)
        .bind(transaction.value)
        .bind(transaction.kind.as_str())
        .bind(transaction.date.format(DATE_FORMAT).to_string())
        .bind(&transaction.category)
        .bind(&transaction.subcategory)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save transaction {}", transaction.id))?;

        debug!(id = %transaction.id, "saved transaction");
        Ok(())
    }

    /// Get a transaction by ID.
    pub async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch transaction")?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    /// List transactions in insertion order, optionally restricted to one month.
    pub async fn list_transactions(&self, filter: PeriodFilter) -> Result<Vec<Transaction>> {
        let rows = match filter {
            PeriodFilter::All => {
                sqlx::query(&format!("{} ORDER BY rowid", SELECT_COLUMNS))
                    .fetch_all(&self.pool)
                    .await
            }
            PeriodFilter::Month(period) => {
                // Dates are stored as ISO strings, so a half-open range on text works.
                let (Some(start), Some(end)) = (period.first_day(), period.next().first_day())
                else {
                    return Ok(Vec::new());
                };
                sqlx::query(&format!(
                    "{} WHERE date >= ? AND date < ? ORDER BY rowid",
                    SELECT_COLUMNS
                ))
                .bind(start.format(DATE_FORMAT).to_string())
                .bind(end.format(DATE_FORMAT).to_string())
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Count all stored transactions.
    pub async fn count_transactions(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM transactions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count transactions")?;
        Ok(row.get("count"))
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let kind_str: String = row.get("kind");
        let date_str: String = row.get("date");

        Ok(Transaction {
            id: row.get("id"),
            description: row.get("description"),
            value: row.get("value_cents"),
            kind: TransactionKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .with_context(|| format!("Invalid transaction date: {}", date_str))?,
            category: row.get("category"),
            subcategory: row.get("subcategory"),
        })
    }
}

impl TransactionSource for Repository {
    async fn list_transactions(&self, filter: PeriodFilter) -> Result<Vec<Transaction>> {
        Repository::list_transactions(self, filter).await
    }

    async fn append_transaction(&self, transaction: &Transaction) -> Result<()> {
        self.save_transaction(transaction).await
    }
}
