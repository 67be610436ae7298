use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::LedgerService;
use crate::domain::{Transaction, TransactionKind, parse_cents};
use crate::storage::{PeriodFilter, TransactionSource};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

impl ImportError {
    fn new(line: usize, field: Option<&str>, error: impl Into<String>) -> Self {
        Self {
            line,
            field: field.map(str::to_string),
            error: error.into(),
        }
    }
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Check everything but write nothing
    pub dry_run: bool,
    /// Skip records whose id already exists instead of reporting an error
    pub skip_duplicates: bool,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<String>,
    date: String,
    #[serde(rename = "type")]
    kind: String,
    value: String,
    description: String,
    category: String,
    subcategory: Option<String>,
}

/// Importer for loading records into a ledger source
pub struct Importer<'a, S> {
    service: &'a LedgerService<S>,
}

impl<'a, S: TransactionSource> Importer<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    /// Import transactions from CSV (same columns as the exporter writes)
    pub async fn import_transactions_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(index, row)| {
                let line = index + 2; // header plus 1-based lines
                let parsed = row
                    .map_err(|e| ImportError::new(line, None, format!("CSV parse error: {}", e)))
                    .and_then(|row| parse_row(line, row));
                (line, parsed)
            })
            .collect();

        self.ingest(rows, options).await
    }

    /// Import transactions from a JSON array in the export format
    pub async fn import_transactions_json<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let records: Vec<Transaction> = serde_json::from_reader(reader)?;
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| (index + 1, Ok(record)))
            .collect();

        self.ingest(rows, options).await
    }

    async fn ingest(
        &self,
        rows: Vec<(usize, Result<Transaction, ImportError>)>,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut seen: HashSet<String> = self
            .service
            .list_transactions(PeriodFilter::All)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let mut result = ImportResult::default();

        for (line, row) in rows {
            let record = match row {
                Ok(record) => record,
                Err(e) => {
                    result.errors.push(e);
                    continue;
                }
            };

            if let Err(e) = record.validate(self.service.taxonomy()) {
                result
                    .errors
                    .push(ImportError::new(line, None, e.to_string()));
                continue;
            }

            if seen.contains(&record.id) {
                if options.skip_duplicates {
                    result.skipped += 1;
                } else {
                    result.errors.push(ImportError::new(
                        line,
                        Some("id"),
                        format!("duplicate transaction id '{}'", record.id),
                    ));
                }
                continue;
            }
            seen.insert(record.id.clone());

            if !options.dry_run {
                if let Err(e) = self.service.append_record(record).await {
                    warn!(line, error = %e, "failed to import record");
                    result
                        .errors
                        .push(ImportError::new(line, None, e.to_string()));
                    continue;
                }
            }
            result.imported += 1;
        }

        info!(
            imported = result.imported,
            skipped = result.skipped,
            errors = result.errors.len(),
            dry_run = options.dry_run,
            "import finished"
        );
        Ok(result)
    }
}

fn parse_row(line: usize, row: CsvRow) -> Result<Transaction, ImportError> {
    let kind = TransactionKind::from_str(&row.kind).ok_or_else(|| {
        ImportError::new(line, Some("type"), format!("invalid type '{}'", row.kind))
    })?;
    let value = parse_cents(&row.value)
        .map_err(|e| ImportError::new(line, Some("value"), e.to_string()))?;
    let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|_| {
        ImportError::new(
            line,
            Some("date"),
            format!("invalid date '{}', expected YYYY-MM-DD", row.date),
        )
    })?;

    let id = row
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut transaction = Transaction::new(id, row.description, value, kind, date, row.category);
    if let Some(sub) = row.subcategory.filter(|s| !s.trim().is_empty()) {
        transaction = transaction.with_subcategory(sub);
    }
    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MAX_AMOUNT, Period, summarize};
    use crate::storage::MemorySource;

    const CSV: &str = "\
id,date,type,value,description,category,subcategory
a1,2025-09-01,income,4200.00,Logo design,Revenue,Services
a2,2025-09-03,expense,-89.90,Internet,Housing,Utilities
a3,2025-09-04,expense,35.00,Lunch,Food,Restaurants
a4,2025-09-05,expense,-10.00,Pet food,Pets,
a5,2025-13-01,expense,-10.00,Bad date,Food,
";

    #[tokio::test]
    async fn test_import_csv_reports_per_line_errors() {
        let service = LedgerService::new(MemorySource::default());
        let importer = Importer::new(&service);

        let result = importer
            .import_transactions_csv(CSV.as_bytes(), ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(result.imported, 2);
        assert_eq!(result.skipped, 0);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        // a3: positive expense, a4: unknown category, a5: bad date
        assert_eq!(lines, vec![4, 5, 6]);
        assert_eq!(result.errors[2].field.as_deref(), Some("date"));
        assert_eq!(service.source().len().await, 2);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let service = LedgerService::new(MemorySource::default());
        let importer = Importer::new(&service);

        let options = ImportOptions {
            dry_run: true,
            ..Default::default()
        };
        let result = importer
            .import_transactions_csv(CSV.as_bytes(), options)
            .await
            .unwrap();

        assert_eq!(result.imported, 2);
        assert!(service.source().is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicates_skipped_or_reported() {
        let service = LedgerService::demo();
        let importer = Importer::new(&service);
        let csv = "id,date,type,value,description,category,subcategory\n\
                   1,2025-07-01,income,3000.00,Consulting sale,Revenue,Services\n";

        let reported = importer
            .import_transactions_csv(csv.as_bytes(), ImportOptions::default())
            .await
            .unwrap();
        assert_eq!(reported.errors.len(), 1);
        assert_eq!(reported.errors[0].field.as_deref(), Some("id"));

        let options = ImportOptions {
            skip_duplicates: true,
            ..Default::default()
        };
        let skipped = importer
            .import_transactions_csv(csv.as_bytes(), options)
            .await
            .unwrap();
        assert_eq!(skipped.skipped, 1);
        assert!(skipped.errors.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_amounts_are_rejected() {
        let service = LedgerService::new(MemorySource::default());
        let importer = Importer::new(&service);
        let json = format!(
            r#"[
            {{"id": "m1", "description": "Overflow", "value": {}, "type": "expense",
             "date": "2025-07-20", "category": "Taxes", "subcategory": "DAS"}},
            {{"id": "m2", "description": "Too much", "value": {}, "type": "income",
             "date": "2025-07-20", "category": "Revenue"}},
            {{"id": "m3", "description": "Ceiling", "value": {}, "type": "expense",
             "date": "2025-07-20", "category": "Taxes", "subcategory": "DAS"}}
        ]"#,
            i64::MIN,
            MAX_AMOUNT + 1,
            -MAX_AMOUNT
        );

        let result = importer
            .import_transactions_json(json.as_bytes(), ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(result.imported, 1);
        let lines: Vec<usize> = result.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 2]);

        let all = service.list_transactions(PeriodFilter::All).await.unwrap();
        assert_eq!(summarize(&all).expense, MAX_AMOUNT);
        let july = Period::new(7, 2025).unwrap();
        let report = service.extract(july, Some("Taxes")).await.unwrap();
        assert_eq!(report.summary.balance, -MAX_AMOUNT);
    }
}
