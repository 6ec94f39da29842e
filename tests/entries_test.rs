mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{add, period, test_service};
use tally::application::{AppError, LedgerService};
use tally::domain::{EntryCandidate, EntryType, ValidationError};
use tally::storage::DeleteOutcome;

#[tokio::test]
async fn test_insert_then_select_round_trip() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let entry = add(&service, "2024-02-15", "Income", "Salary", "50000").await?;
    let all = service.list_entries().await?;

    assert_eq!(all.len(), 1);
    let stored = &all[0];
    assert_eq!(stored.id, entry.id);
    assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
    assert_eq!(stored.entry_type, EntryType::Income);
    assert_eq!(stored.category, "Salary");
    assert_eq!(stored.amount_cents, 5_000_000);
    assert_eq!(stored.recorded_at, entry.recorded_at);

    Ok(())
}

#[tokio::test]
async fn test_each_insert_gets_fresh_id() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = add(&service, "2024-02-15", "Expense", "Food", "10").await?;
    let second = add(&service, "2024-02-15", "Expense", "Food", "10").await?;
    assert_ne!(first.id, second.id);

    // Deleted ids are never handed out again
    service.delete_entry(second.id).await?;
    let third = add(&service, "2024-02-16", "Expense", "Food", "10").await?;
    assert!(third.id > second.id);

    Ok(())
}

#[tokio::test]
async fn test_delete_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let keep = add(&service, "2024-02-15", "Income", "Salary", "100").await?;
    let gone = add(&service, "2024-02-16", "Expense", "Food", "20").await?;

    assert_eq!(service.delete_entry(gone.id).await?, DeleteOutcome::Deleted);
    let after_first = service.list_entries().await?;

    assert_eq!(service.delete_entry(gone.id).await?, DeleteOutcome::NotFound);
    let after_second = service.list_entries().await?;

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.len(), 1);
    assert_eq!(after_second[0].id, keep.id);

    Ok(())
}

#[tokio::test]
async fn test_delete_unknown_id_is_success() -> Result<()> {
    let (service, _temp) = test_service().await?;
    assert_eq!(service.delete_entry(999).await?, DeleteOutcome::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_invalid_entries_are_not_stored() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let cases = [
        ("2024-02-15", "Expense", "Food", "-5"),
        ("2024-02-15", "Loan", "Food", "5"),
        ("2024-02-15", "Income", "Food", "5"),
        ("2024-02-15", "Expense", "", "5"),
        ("2023-02-29", "Expense", "Food", "5"),
    ];
    for (date, entry_type, category, amount) in cases {
        let result = service
            .add_entry(EntryCandidate::new(date, entry_type, category, amount))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    assert!(service.list_entries().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_negative_amount_reports_invalid_amount() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service
        .add_entry(EntryCandidate::new("2024-02-15", "Expense", "Food", "-5"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InvalidAmount(ref a)) if a == "-5"
    ));
    Ok(())
}

#[tokio::test]
async fn test_sqlite_range_query_matches_client_filter() -> Result<()> {
    let (service, _temp) = test_service().await?;

    add(&service, "2024-02-29", "Expense", "Food", "1").await?;
    add(&service, "2024-03-01", "Expense", "Food", "2").await?;
    add(&service, "2024-02-01", "Income", "Bonus", "3").await?;
    add(&service, "2024-01-31", "Savings", "PPF", "4").await?;

    let filtered = service.entries_for(period(2, 2024)).await?;
    let ranged = service.entries_in_range(period(2, 2024)).await?;

    assert_eq!(filtered, ranged);
    let amounts: Vec<i64> = filtered.iter().map(|e| e.amount_cents).collect();
    assert_eq!(amounts, vec![300, 100]);

    Ok(())
}

#[tokio::test]
async fn test_range_query_matches_client_filter_in_year_9999() -> Result<()> {
    let (service, _temp) = test_service().await?;

    add(&service, "9999-12-15", "Expense", "Food", "1").await?;
    add(&service, "9999-12-31", "Expense", "Food", "2").await?;
    add(&service, "9999-11-30", "Income", "Bonus", "3").await?;

    let filtered = service.entries_for(period(12, 9999)).await?;
    let ranged = service.entries_in_range(period(12, 9999)).await?;

    assert_eq!(filtered, ranged);
    assert_eq!(ranged.len(), 2);
    assert_eq!(service.entries_in_range(period(11, 9999)).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_five_digit_year_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = add(&service, "+10000-01-01", "Expense", "Food", "1")
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AppError>(),
        Some(AppError::Validation(ValidationError::InvalidDate(_)))
    ));
    assert!(service.list_entries().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_connect_to_missing_database_fails() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let missing = temp.path().join("nope.db");

    let result = LedgerService::connect(missing.to_str().unwrap()).await;
    assert!(matches!(result, Err(AppError::StoreUnavailable(_))));

    Ok(())
}

#[tokio::test]
async fn test_reopened_database_keeps_entries() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let path = temp.path().join("ledger.db");
    let path = path.to_str().unwrap();

    {
        let service = LedgerService::init(path).await?;
        add(&service, "2024-02-15", "Savings", "Emergency Fund", "500").await?;
    }

    let service = LedgerService::connect(path).await?;
    let entries = service.list_entries().await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category, "Emergency Fund");

    Ok(())
}
