use anyhow::Result;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Period, format_cents};
use crate::storage::{PeriodFilter, TransactionSource};

/// CSV header shared by export and import.
pub const CSV_HEADER: [&str; 7] = [
    "id",
    "date",
    "type",
    "value",
    "description",
    "category",
    "subcategory",
];

/// Exporter for converting ledger data to CSV or JSON
pub struct Exporter<'a, S> {
    service: &'a LedgerService<S>,
}

impl<'a, S: TransactionSource> Exporter<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    /// Export transactions to CSV format
    pub async fn export_transactions_csv<W: Write>(
        &self,
        writer: W,
        filter: PeriodFilter,
    ) -> Result<usize> {
        let transactions = self.service.list_transactions(filter).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(CSV_HEADER)?;

        for transaction in &transactions {
            csv_writer.write_record([
                transaction.id.as_str(),
                transaction.date.format("%Y-%m-%d").to_string().as_str(),
                transaction.kind.as_str(),
                format_cents(transaction.value).as_str(),
                transaction.description.as_str(),
                transaction.category.as_str(),
                transaction.subcategory.as_deref().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export transactions as a JSON array (values in cents)
    pub async fn export_transactions_json<W: Write>(
        &self,
        mut writer: W,
        filter: PeriodFilter,
    ) -> Result<usize> {
        let transactions = self.service.list_transactions(filter).await?;
        serde_json::to_writer_pretty(&mut writer, &transactions)?;
        writeln!(writer)?;
        Ok(transactions.len())
    }

    /// Export the monthly statement as JSON, ready for a chart front end
    pub async fn export_extract_json<W: Write>(
        &self,
        mut writer: W,
        period: Period,
        category: Option<&str>,
    ) -> Result<()> {
        let report = self.service.extract(period, category).await?;
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        Ok(())
    }
}
