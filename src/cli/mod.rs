use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{DashboardReport, ExtractReport, LedgerService};
use crate::domain::{
    Holding, NewTransaction, Period, TransactionKind, demo_holdings, format_cents,
    format_currency, parse_cents, summarize_portfolio,
};
use crate::storage::{PeriodFilter, TransactionSource, demo_transactions};

/// Autonomo - income, expenses and DAS for self-employed workers
#[derive(Parser)]
#[command(name = "autonomo")]
#[command(about = "Track income and expenses, monthly statements and DAS status")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "AUTONOMO_DB", default_value = "autonomo.db")]
    pub database: String,

    /// Use the built-in sample ledger instead of a database (not for init or seed)
    #[arg(long, global = true, env = "AUTONOMO_DEMO")]
    pub demo: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Load the sample ledger into the database
    Seed,

    /// Record a new income or expense
    Add {
        /// Amount as typed, without sign (e.g. "70,60" or "1500")
        amount: String,

        /// Kind of record: income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Description of the record
        #[arg(short, long)]
        description: String,

        /// Category (see `autonomo categories`)
        #[arg(short, long)]
        category: String,

        /// Subcategory within the category
        #[arg(short, long)]
        subcategory: Option<String>,

        /// Date of the record (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List records
    List {
        /// Restrict to one month (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,

        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Monthly statement: totals, spending by category and subcategory
    Extract {
        /// Month to report (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        period: Option<String>,

        /// Drill into one expense category
        #[arg(short, long)]
        category: Option<String>,

        /// Output format: table, json, csv
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Balance, this month's figures and the latest records
    Dashboard {
        /// Number of recent records to show
        #[arg(short, long, default_value = "4")]
        recent: usize,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the category taxonomy
    Categories {
        /// Show subcategories of one category only
        category: Option<String>,
    },

    /// Show the DAS (MEI monthly tax) status
    Das {
        /// Month to check (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        period: Option<String>,

        /// Treat DAS tracking as switched off
        #[arg(long, env = "AUTONOMO_DAS_DISABLED")]
        disabled: bool,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Investment summary (sample holdings unless a file is given)
    Portfolio {
        /// JSON file with an array of {name, invested, current_value} in cents
        #[arg(long)]
        holdings: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, extract
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format for transactions: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Month (YYYY-MM); extract defaults to the current month
        #[arg(short, long)]
        period: Option<String>,

        /// Category to drill into (extract only)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Import transactions from CSV or JSON
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,

        /// Skip records whose id already exists
        #[arg(long)]
        skip_duplicates: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init | Commands::Seed if self.demo => {
                anyhow::bail!("init and seed write to the database; run them without --demo");
            }

            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Seed => {
                let service = LedgerService::init(&self.database).await?;
                let mut added = 0;
                for record in demo_transactions() {
                    if !service.contains(&record.id).await? {
                        service.append_record(record).await?;
                        added += 1;
                    }
                }
                println!("Seeded {} sample records into {}", added, self.database);
            }

            command if self.demo => {
                let service = LedgerService::demo();
                run_command(&service, command).await?;
            }

            command => {
                let service = LedgerService::connect(&self.database).await?;
                run_command(&service, command).await?;
            }
        }

        Ok(())
    }
}

async fn run_command<S: TransactionSource>(
    service: &LedgerService<S>,
    command: Commands,
) -> Result<()> {
    match command {
        // handled before a source is chosen
        Commands::Init | Commands::Seed => {}

        Commands::Add {
            amount,
            kind,
            description,
            category,
            subcategory,
            date,
        } => {
            let amount =
                parse_cents(&amount).context("Invalid amount format. Use '70,60' or '1500'")?;
            let kind = TransactionKind::from_str(&kind)
                .ok_or_else(|| anyhow::anyhow!("Invalid type '{}'. Use income or expense", kind))?;
            let date = parse_date_or_today(date.as_deref())?;

            let transaction = service
                .record_transaction(NewTransaction {
                    amount,
                    kind,
                    date,
                    description,
                    category,
                    subcategory,
                })
                .await?;

            println!(
                "Recorded {}: {} {} ({})",
                transaction.kind,
                format_currency(transaction.value),
                transaction.description,
                transaction.id
            );
        }

        Commands::List { period, limit } => {
            let filter = PeriodFilter::from(parse_period_opt(period.as_deref())?);
            let transactions = service.list_transactions(filter).await?;

            if transactions.is_empty() {
                println!("No records found.");
                return Ok(());
            }

            println!(
                "{:<10} {:<8} {:>12} {:<28} {:<16} {:<16}",
                "DATE", "TYPE", "VALUE", "DESCRIPTION", "CATEGORY", "SUBCATEGORY"
            );
            println!("{}", "-".repeat(95));
            for t in transactions.iter().take(limit.unwrap_or(usize::MAX)) {
                println!(
                    "{:<10} {:<8} {:>12} {:<28} {:<16} {:<16}",
                    t.date.format("%Y-%m-%d"),
                    t.kind,
                    format_cents(t.value),
                    truncate(&t.description, 28),
                    truncate(&t.category, 16),
                    t.subcategory.as_deref().unwrap_or("-")
                );
            }
        }

        Commands::Extract {
            period,
            category,
            format,
        } => {
            let period = parse_period_or_current(period.as_deref())?;
            let report = service.extract(period, category.as_deref()).await?;
            print_extract(&report, &format)?;
        }

        Commands::Dashboard { recent, date, json } => {
            let today = parse_date_or_today(date.as_deref())?;
            let report = service.dashboard(today, recent).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_dashboard(&report);
            }
        }

        Commands::Categories { category } => {
            let taxonomy = service.taxonomy();
            match category {
                Some(name) => {
                    let def = taxonomy
                        .category(&name)
                        .ok_or_else(|| anyhow::anyhow!("Unknown category '{}'", name))?;
                    println!("{}", def.name);
                    for sub in &def.subcategories {
                        println!("  {}", sub);
                    }
                }
                None => {
                    for def in taxonomy.categories() {
                        println!("{:<16} {}", def.name, def.subcategories.join(", "));
                    }
                }
            }
        }

        Commands::Das {
            period,
            disabled,
            date,
        } => {
            let today = parse_date_or_today(date.as_deref())?;
            let period = match period {
                Some(p) => p.parse::<Period>()?,
                None => Period::containing(today),
            };
            let report = service.das_report(period, today, !disabled).await?;

            println!("DAS MEI - {}", report.period.label());
            println!("  Status:    {}", report.status);
            if let Some(due) = report.due_date {
                println!("  Due date:  {}", due.format("%d/%m/%Y"));
            }
            if let crate::domain::DasStatus::Paid { amount } = report.status {
                println!("  Paid:      {}", format_currency(amount));
            }
        }

        Commands::Portfolio { holdings, json } => {
            let holdings: Vec<Holding> = match holdings {
                Some(path) => {
                    let file = std::fs::File::open(&path)
                        .with_context(|| format!("Failed to open holdings file: {}", path))?;
                    serde_json::from_reader(file).context("Invalid holdings file")?
                }
                None => demo_holdings(),
            };
            let summary = summarize_portfolio(&holdings);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Invested:       {:>18}", format_currency(summary.total_invested));
                println!("Current value:  {:>18}", format_currency(summary.current_value));
                println!(
                    "Profit/loss:    {:>18} ({})",
                    format_currency(summary.profit_loss),
                    format_bps(summary.return_bps)
                );
                println!();
                println!("{:<24} {:>16} {:>16} {:>8}", "ASSET", "VALUE", "P/L", "SHARE");
                println!("{}", "-".repeat(67));
                for a in &summary.allocations {
                    println!(
                        "{:<24} {:>16} {:>16} {:>8}",
                        truncate(&a.name, 24),
                        format_currency(a.current_value),
                        format_currency(a.profit_loss),
                        format_bps(a.share_bps)
                    );
                }
            }
        }

        Commands::Export {
            export_type,
            output,
            format,
            period,
            category,
        } => {
            run_export_command(
                service,
                &export_type,
                output.as_deref(),
                &format,
                period.as_deref(),
                category.as_deref(),
            )
            .await?;
        }

        Commands::Import {
            input,
            format,
            dry_run,
            skip_duplicates,
        } => {
            run_import_command(service, input.as_deref(), &format, dry_run, skip_duplicates)
                .await?;
        }
    }

    Ok(())
}

fn print_extract(report: &ExtractReport, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        "csv" => {
            println!("category,total,percentage");
            for slice in &report.categories {
                println!(
                    "{},{},{:.2}",
                    slice.category,
                    format_cents(slice.total),
                    slice.percentage
                );
            }
        }
        "table" => {
            println!("Statement - {}", report.period.label());
            println!();
            println!("Income:   {:>18}", format_currency(report.summary.income));
            println!("Expense:  {:>18}", format_currency(report.summary.expense));
            println!("{}", "-".repeat(28));
            println!("Balance:  {:>18}", format_currency(report.summary.balance));

            if !report.categories.is_empty() {
                println!();
                println!("{:<20} {:>16} {:>8}", "CATEGORY", "SPENT", "%");
                println!("{}", "-".repeat(46));
                for slice in &report.categories {
                    println!(
                        "{:<20} {:>16} {:>7.1}%",
                        slice.category,
                        format_currency(slice.total),
                        slice.percentage
                    );
                }
            }

            if let Some(category) = &report.selected_category {
                println!();
                println!("{} by subcategory:", category);
                if report.subcategories.is_empty() {
                    println!("  (no expenses)");
                }
                for sub in &report.subcategories {
                    println!("  {:<28} {:>16}", sub.name, format_currency(sub.total));
                }
            }
        }
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: table, json, csv", format),
    }
    Ok(())
}

fn print_dashboard(report: &DashboardReport) {
    println!("Balance:          {:>18}", format_currency(report.balance));
    println!();
    println!("{}:", report.period.label());
    println!("  Income:         {:>18}", format_currency(report.month.income));
    println!("  Expense:        {:>18}", format_currency(report.month.expense));

    if !report.recent.is_empty() {
        println!();
        println!("Latest records:");
        for t in &report.recent {
            println!(
                "  {}  {:<32} {:>16}",
                t.date.format("%d/%m/%Y"),
                truncate(&t.description, 32),
                format_currency(t.value)
            );
        }
    }
}

async fn run_export_command<S: TransactionSource>(
    service: &LedgerService<S>,
    export_type: &str,
    output: Option<&str>,
    format: &str,
    period: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let filter = PeriodFilter::from(parse_period_opt(period)?);
            let count = match format {
                "csv" => exporter.export_transactions_csv(writer, filter).await?,
                "json" => exporter.export_transactions_json(writer, filter).await?,
                _ => anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", format),
            };
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "extract" => {
            let period = parse_period_or_current(period)?;
            exporter
                .export_extract_json(writer, period, category)
                .await?;
            if output.is_some() {
                eprintln!("Exported statement for {}", period);
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, extract",
                export_type
            );
        }
    }

    Ok(())
}

async fn run_import_command<S: TransactionSource>(
    service: &LedgerService<S>,
    input: Option<&str>,
    format: &str,
    dry_run: bool,
    skip_duplicates: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{Read, stdin};

    let importer = Importer::new(service);

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let options = ImportOptions {
        dry_run,
        skip_duplicates,
    };

    let result = match format {
        "csv" => importer.import_transactions_csv(reader, options).await?,
        "json" => importer.import_transactions_json(reader, options).await?,
        _ => anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", format),
    };

    if dry_run {
        println!("Dry run complete");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Skipped:  {}", result.skipped);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            let field = error
                .field
                .as_ref()
                .map(|f| format!("{}: ", f))
                .unwrap_or_default();
            println!("  Line {}: {}{}", error.line, field, error.error);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn parse_date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", s)),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_period_opt(period: Option<&str>) -> Result<Option<Period>> {
    Ok(period.map(str::parse::<Period>).transpose()?)
}

fn parse_period_or_current(period: Option<&str>) -> Result<Period> {
    Ok(parse_period_opt(period)?.unwrap_or_else(|| Period::containing(Local::now().date_naive())))
}

fn format_bps(bps: i64) -> String {
    let sign = if bps < 0 { "-" } else { "" };
    let abs = bps.unsigned_abs();
    format!("{}{}.{:02}%", sign, abs / 100, abs % 100)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
