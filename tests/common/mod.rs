// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tally::application::LedgerService;
use tally::domain::{Entry, EntryCandidate, Period};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to build a period, panicking on invalid input
pub fn period(month: u32, year: i32) -> Period {
    Period::new(month, year).unwrap()
}

/// Record an entry from plain strings
pub async fn add(
    service: &LedgerService,
    date: &str,
    entry_type: &str,
    category: &str,
    amount: &str,
) -> Result<Entry> {
    Ok(service
        .add_entry(EntryCandidate::new(date, entry_type, category, amount))
        .await?)
}

/// Test fixture: the February 2024 scenario plus a January neighbour
pub struct February2024;

impl February2024 {
    pub async fn create(service: &LedgerService) -> Result<()> {
        add(service, "2024-02-15", "Income", "Salary", "50000").await?;
        add(service, "2024-02-20", "Expense", "Food", "1200").await?;
        add(service, "2024-01-31", "Expense", "Rent", "15000").await?;
        Ok(())
    }
}
