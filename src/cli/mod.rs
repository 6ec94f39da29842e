use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::application::{AppError, LedgerService, MonthlyReport};
use crate::domain::{format_money, EntryCandidate, EntryId, EntryType, Period};
use crate::settings::Settings;
use crate::storage::DeleteOutcome;

/// Tally - monthly income, expense and savings ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A local-first ledger for monthly income, expenses and savings")]
#[command(version)]
pub struct Cli {
    /// Database file path (overrides the config file)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Config file path (defaults to ./tally.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Month selection shared by the period-based commands.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct PeriodArgs {
    /// Month (1-12, defaults to the current month)
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Year (defaults to the current year)
    #[arg(short, long)]
    pub year: Option<i32>,
}

impl PeriodArgs {
    pub fn resolve(&self) -> Result<Period> {
        let current = Period::current();
        let month = self.month.unwrap_or(current.month());
        let year = self.year.unwrap_or(current.year());
        Ok(Period::new(month, year).map_err(AppError::from)?)
    }
}

/// Process exit status for a failed command: 2 when the input was wrong,
/// 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    let user_error = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<AppError>())
        .any(AppError::is_user_error);
    if user_error { 2 } else { 1 }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an income, expense or savings entry
    Add {
        /// Entry type: income, expense, savings
        #[arg(short = 't', long = "type")]
        entry_type: String,

        /// Category (see `tally categories`)
        #[arg(short, long)]
        category: String,

        /// Amount (e.g., "1200" or "1200.50")
        #[arg(short, long)]
        amount: String,

        /// Date of the entry (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an entry by id
    Delete {
        /// Entry id
        id: EntryId,
    },

    /// List the entries of a month
    List {
        #[command(flatten)]
        period: PeriodArgs,

        /// List every entry regardless of date
        #[arg(long, conflicts_with_all = ["month", "year"])]
        all: bool,
    },

    /// Monthly summary: totals, net balance and category breakdown
    Summary {
        #[command(flatten)]
        period: PeriodArgs,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Compare a month with the month before
    Compare {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show the allowed categories
    Categories {
        /// Only show one type: income, expense, savings
        #[arg(short = 't', long = "type")]
        entry_type: Option<String>,
    },

    /// Export entries or a monthly report
    Export {
        /// What to export: entries, report
        export_type: String,

        #[command(flatten)]
        period: PeriodArgs,

        /// Export entries from every month
        #[arg(long, conflicts_with_all = ["month", "year"])]
        all: bool,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import entries from CSV (date,type,category,amount)
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Validate without importing
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    pub async fn run(self, settings: Settings) -> Result<()> {
        let database = self.database.unwrap_or_else(|| settings.database.clone());

        if let Commands::Init = self.command {
            LedgerService::init(&database).await?;
            println!("Database initialized: {}", database);
            return Ok(());
        }

        let service = LedgerService::connect(&database)
            .await?
            .with_catalog(settings.catalog())
            .with_savings_target(settings.savings_target_percent);
        let symbol = settings.currency_symbol.as_str();

        match self.command {
            Commands::Init => {}

            Commands::Add {
                entry_type,
                category,
                amount,
                date,
            } => {
                let date =
                    date.unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());
                let entry = service
                    .add_entry(EntryCandidate::new(date, entry_type, category, amount))
                    .await?;

                println!(
                    "Recorded {}: {} {} on {} (id {})",
                    entry.entry_type,
                    format_money(symbol, entry.amount_cents),
                    entry.category,
                    entry.date,
                    entry.id
                );
            }

            Commands::Delete { id } => match service.delete_entry(id).await? {
                DeleteOutcome::Deleted => println!("Deleted entry {}", id),
                DeleteOutcome::NotFound => println!("No entry with id {}, nothing to delete", id),
            },

            Commands::List { period, all } => {
                let entries = if all {
                    service.list_entries().await?
                } else {
                    service.entries_for(period.resolve()?).await?
                };
                print_entries(&entries, symbol);
            }

            Commands::Summary { period, format } => {
                let report = service.monthly_report(period.resolve()?).await?;
                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                    "csv" => crate::io::write_report_csv(std::io::stdout(), &report)?,
                    "table" => print_report(&report, symbol),
                    other => anyhow::bail!(
                        "Invalid format '{}'. Valid formats: table, json, csv",
                        other
                    ),
                }
            }

            Commands::Compare { period } => {
                let cmp = service.compare_with_previous(period.resolve()?).await?;
                println!(
                    "{:<14} {:>16} {:>16}",
                    "", cmp.previous_period.to_string(), cmp.current_period.to_string()
                );
                println!("{}", "-".repeat(48));
                for entry_type in EntryType::ALL {
                    println!(
                        "{:<14} {:>16} {:>16}",
                        entry_type.label(),
                        format_money(symbol, cmp.previous.total(entry_type)),
                        format_money(symbol, cmp.current.total(entry_type))
                    );
                }
                println!(
                    "{:<14} {:>16} {:>16}",
                    "Net Balance",
                    format_money(symbol, cmp.previous.net),
                    format_money(symbol, cmp.current.net)
                );
                println!();
                println!("Change in net: {}", format_money(symbol, cmp.net_change));
            }

            Commands::Categories { entry_type } => {
                let types = match entry_type {
                    Some(t) => vec![EntryType::from_str(&t).ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid type '{}'. Valid types: income, expense, savings",
                            t
                        )
                    })?],
                    None => EntryType::ALL.to_vec(),
                };

                match service.catalog() {
                    Some(catalog) => {
                        for t in types {
                            println!("{}: {}", t, catalog.categories(t).join(", "));
                        }
                    }
                    None => println!("Any non-empty category is accepted."),
                }
            }

            Commands::Export {
                export_type,
                period,
                all,
                format,
                output,
            } => {
                let period = if all { None } else { Some(period.resolve()?) };
                run_export_command(&service, &export_type, period, &format, output.as_deref())
                    .await?;
            }

            Commands::Import { input, dry_run } => {
                run_import_command(&service, input.as_deref(), dry_run).await?;
            }
        }

        Ok(())
    }
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    period: Option<Period>,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match (export_type, format) {
        ("entries", "csv") => {
            let count = exporter.export_entries_csv(writer, period).await?;
            if output.is_some() {
                eprintln!("Exported {} entries", count);
            }
        }
        ("entries", "json") => {
            let snapshot = exporter.export_entries_json(writer, period).await?;
            if output.is_some() {
                eprintln!("Exported {} entries", snapshot.entries.len());
            }
        }
        ("report", _) => {
            let period = period.context("A report needs a month; --all is not supported")?;
            let report = match format {
                "json" => exporter.export_report_json(writer, period).await?,
                "csv" => exporter.export_report_csv(writer, period).await?,
                other => anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other),
            };
            if output.is_some() {
                eprintln!("Exported report for {}", report.period);
            }
        }
        ("entries", other) => {
            anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other);
        }
        (other, _) => {
            anyhow::bail!("Invalid export type '{}'. Valid types: entries, report", other);
        }
    }

    Ok(())
}

async fn run_import_command(
    service: &LedgerService,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{stdin, Read};

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let result = Importer::new(service)
        .import_entries_csv(reader, ImportOptions { dry_run })
        .await?;

    if dry_run {
        println!("Validation complete");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!("  Line {}: {}", error.line, error.error);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn print_entries(entries: &[crate::domain::Entry], symbol: &str) {
    if entries.is_empty() {
        println!("No entries found.");
        return;
    }

    println!(
        "{:>6} {:<12} {:<8} {:<18} {:>16}",
        "ID", "DATE", "TYPE", "CATEGORY", "AMOUNT"
    );
    println!("{}", "-".repeat(64));
    for entry in entries {
        println!(
            "{:>6} {:<12} {:<8} {:<18} {:>16}",
            entry.id,
            entry.date.format("%Y-%m-%d"),
            entry.entry_type.label(),
            truncate(&entry.category, 18),
            format_money(symbol, entry.amount_cents)
        );
    }
}

fn print_report(report: &MonthlyReport, symbol: &str) {
    let summary = &report.summary;

    println!("Monthly Summary: {}", report.period);
    println!(
        "Period: {} to {}",
        report.from_date.format("%Y-%m-%d"),
        report.to_date.format("%Y-%m-%d")
    );
    println!();
    println!("Income:       {:>18}", format_money(symbol, summary.income));
    println!("Expenses:     {:>18}", format_money(symbol, summary.expense));
    println!("Savings:      {:>18}", format_money(symbol, summary.savings));
    println!("{}", "-".repeat(32));
    println!("Net Balance:  {:>18}", format_money(symbol, summary.net));

    if report.is_empty() {
        println!();
        println!("No data for selected month.");
        return;
    }

    println!();
    println!(
        "{:<8} {:<18} {:>16} {:>6} {:>8}",
        "TYPE", "CATEGORY", "TOTAL", "COUNT", "PERCENT"
    );
    println!("{}", "-".repeat(60));
    for cat in &report.categories {
        println!(
            "{:<8} {:<18} {:>16} {:>6} {:>7.1}%",
            cat.entry_type.label(),
            truncate(&cat.category, 18),
            format_money(symbol, cat.total),
            cat.count,
            cat.percentage
        );
    }

    println!();
    match report.savings_rate {
        Some(rate) if report.meets_savings_target => println!(
            "Savings rate: {:.1}% of income (target {:.0}% met)",
            rate, report.savings_target_percent
        ),
        Some(rate) => println!(
            "Savings rate: {:.1}% of income (below the {:.0}% target)",
            rate, report.savings_target_percent
        ),
        None => println!("Savings rate: n/a (no income recorded)"),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
