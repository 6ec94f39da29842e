use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::{LedgerService, MonthlyReport};
use crate::domain::{format_cents, Entry, Period};
use crate::storage::LedgerStore;

/// Entries plus export metadata, written as one JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    /// The month the entries were limited to, if any
    pub period: Option<Period>,
    pub entries: Vec<Entry>,
}

/// Exporter for converting ledger data to CSV or JSON.
pub struct Exporter<'a, S> {
    service: &'a LedgerService<S>,
}

impl<'a, S: LedgerStore> Exporter<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    async fn load(&self, period: Option<Period>) -> Result<Vec<Entry>> {
        Ok(match period {
            Some(period) => self.service.entries_for(period).await?,
            None => self.service.list_entries().await?,
        })
    }

    /// Export entries (all, or one month) to CSV.
    pub async fn export_entries_csv<W: Write>(
        &self,
        writer: W,
        period: Option<Period>,
    ) -> Result<usize> {
        let entries = self.load(period).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "type", "category", "amount"])?;

        for entry in &entries {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.date.format("%Y-%m-%d").to_string(),
                entry.entry_type.label().to_string(),
                entry.category.clone(),
                format_cents(entry.amount_cents),
            ])?;
        }

        csv_writer.flush()?;
        Ok(entries.len())
    }

    /// Export entries (all, or one month) as a JSON snapshot.
    pub async fn export_entries_json<W: Write>(
        &self,
        mut writer: W,
        period: Option<Period>,
    ) -> Result<LedgerSnapshot> {
        let entries = self.load(period).await?;
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            period,
            entries,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(snapshot)
    }

    /// Export a monthly report as JSON.
    pub async fn export_report_json<W: Write>(
        &self,
        mut writer: W,
        period: Period,
    ) -> Result<MonthlyReport> {
        let report = self.service.monthly_report(period).await?;
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(report)
    }

    /// Export a monthly report's totals and category breakdown as CSV.
    pub async fn export_report_csv<W: Write>(
        &self,
        writer: W,
        period: Period,
    ) -> Result<MonthlyReport> {
        let report = self.service.monthly_report(period).await?;
        write_report_csv(writer, &report)?;
        Ok(report)
    }
}

/// Write a report as `section,type,category,amount,count` rows.
pub fn write_report_csv<W: Write>(writer: W, report: &MonthlyReport) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["section", "type", "category", "amount", "count"])?;

    let summary = &report.summary;
    for (label, cents) in [
        ("income", summary.income),
        ("expense", summary.expense),
        ("savings", summary.savings),
        ("net", summary.net),
    ] {
        csv_writer.write_record(["total", label, "", format_cents(cents).as_str(), ""])?;
    }

    for cat in &report.categories {
        csv_writer.write_record([
            "category",
            cat.entry_type.as_str(),
            cat.category.as_str(),
            format_cents(cat.total).as_str(),
            cat.count.to_string().as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
