use crate::domain::{
    aggregate, filter_period, validate, CategoryCatalog, Entry, EntryCandidate, EntryId, Period,
};
use crate::storage::{DeleteOutcome, LedgerStore, MemoryStore, Repository};

use super::{AppError, MonthlyReport, PeriodComparison};

/// Default share of income that should go to savings, in percent.
pub const DEFAULT_SAVINGS_TARGET_PERCENT: f64 = 20.0;

/// Application service providing high-level operations for the ledger.
/// Every method is one request/response pass against the store; the
/// service holds no per-session state.
pub struct LedgerService<S = Repository> {
    store: S,
    catalog: Option<CategoryCatalog>,
    savings_target_percent: f64,
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

impl LedgerService<MemoryStore> {
    /// A service backed by a throwaway in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: LedgerStore> LedgerService<S> {
    /// Create a new ledger service over the given store, validating
    /// categories against the default catalog.
    pub fn new(store: S) -> Self {
        Self {
            store,
            catalog: Some(CategoryCatalog::default()),
            savings_target_percent: DEFAULT_SAVINGS_TARGET_PERCENT,
        }
    }

    /// Replace the category catalog. `None` accepts any non-empty category.
    pub fn with_catalog(mut self, catalog: Option<CategoryCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_savings_target(mut self, percent: f64) -> Self {
        self.savings_target_percent = percent;
        self
    }

    pub fn catalog(&self) -> Option<&CategoryCatalog> {
        self.catalog.as_ref()
    }

    // ========================
    // Entry operations
    // ========================

    /// Validate and record a new entry.
    pub async fn add_entry(&self, candidate: EntryCandidate) -> Result<Entry, AppError> {
        let new_entry = match validate(&candidate, self.catalog.as_ref()) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(error = %err, "rejected entry");
                return Err(err.into());
            }
        };

        let entry = self.store.insert(&new_entry).await?;
        tracing::info!(
            id = entry.id,
            date = %entry.date,
            entry_type = entry.entry_type.as_str(),
            category = %entry.category,
            amount_cents = entry.amount_cents,
            "recorded entry"
        );
        Ok(entry)
    }

    /// Delete an entry by id. Deleting an id that does not exist succeeds
    /// and reports `NotFound`.
    pub async fn delete_entry(&self, id: EntryId) -> Result<DeleteOutcome, AppError> {
        let outcome = self.store.delete_by_id(id).await?;
        match outcome {
            DeleteOutcome::Deleted => tracing::info!(id, "deleted entry"),
            DeleteOutcome::NotFound => tracing::warn!(id, "delete requested for unknown entry"),
        }
        Ok(outcome)
    }

    /// List every entry in the ledger, in insertion order.
    pub async fn list_entries(&self) -> Result<Vec<Entry>, AppError> {
        Ok(self.store.select_all().await?)
    }

    /// Entries dated within the given month, ordered by date then id.
    pub async fn entries_for(&self, period: Period) -> Result<Vec<Entry>, AppError> {
        let all = self.store.select_all().await?;
        let mut entries: Vec<Entry> = filter_period(&all, period).into_iter().cloned().collect();
        entries.sort_by_key(|e| (e.date, e.id));
        tracing::debug!(%period, total = all.len(), selected = entries.len(), "filtered entries");
        Ok(entries)
    }

    /// Entries for the month using the store's own date-range query.
    pub async fn entries_in_range(&self, period: Period) -> Result<Vec<Entry>, AppError> {
        Ok(self.store.select_range(period.start(), period.end()).await?)
    }

    // ========================
    // Reporting
    // ========================

    /// Build the monthly summary: entries, totals, category breakdown and
    /// savings rate for one calendar month.
    pub async fn monthly_report(&self, period: Period) -> Result<MonthlyReport, AppError> {
        let entries = self.entries_for(period).await?;
        Ok(MonthlyReport::build(
            period,
            entries,
            self.savings_target_percent,
        ))
    }

    /// Compare a month to the one before it.
    pub async fn compare_with_previous(&self, period: Period) -> Result<PeriodComparison, AppError> {
        let all = self.store.select_all().await?;
        let current = aggregate(filter_period(&all, period));
        let previous = aggregate(filter_period(&all, period.previous()));
        Ok(PeriodComparison::new(period, current, previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryType, ValidationError};

    fn period(month: u32, year: i32) -> Period {
        Period::new(month, year).unwrap()
    }

    #[tokio::test]
    async fn test_rejected_entry_leaves_store_untouched() {
        let service = LedgerService::in_memory();
        service
            .add_entry(EntryCandidate::new("2024-02-15", "Income", "Salary", "100"))
            .await
            .unwrap();

        let err = service
            .add_entry(EntryCandidate::new("2024-02-15", "Expense", "Food", "-5"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidAmount(_))
        ));
        assert!(err.is_user_error());
        assert_eq!(service.list_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_without_catalog_any_category_is_accepted() {
        let service = LedgerService::in_memory().with_catalog(None);
        let entry = service
            .add_entry(EntryCandidate::new("2024-02-15", "expense", "Books", "20"))
            .await
            .unwrap();
        assert_eq!(entry.category, "Books");
        assert_eq!(entry.entry_type, EntryType::Expense);
    }

    #[tokio::test]
    async fn test_client_filter_matches_range_query() {
        let service = LedgerService::in_memory();
        for (date, amount) in [
            ("2024-01-31", "10"),
            ("2024-02-29", "20"),
            ("2024-02-01", "30"),
            ("2024-03-01", "40"),
        ] {
            service
                .add_entry(EntryCandidate::new(date, "Expense", "Food", amount))
                .await
                .unwrap();
        }

        let filtered = service.entries_for(period(2, 2024)).await.unwrap();
        let ranged = service.entries_in_range(period(2, 2024)).await.unwrap();
        assert_eq!(filtered, ranged);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].amount_cents, 3_000);
    }

    #[tokio::test]
    async fn test_savings_target() {
        let service = LedgerService::in_memory().with_savings_target(25.0);
        service
            .add_entry(EntryCandidate::new("2024-05-01", "Income", "Salary", "1000"))
            .await
            .unwrap();
        service
            .add_entry(EntryCandidate::new("2024-05-02", "Savings", "PPF", "200"))
            .await
            .unwrap();

        let report = service.monthly_report(period(5, 2024)).await.unwrap();
        assert_eq!(report.savings_rate, Some(20.0));
        assert!(!report.meets_savings_target);

        service
            .add_entry(EntryCandidate::new("2024-05-03", "Savings", "FD", "50"))
            .await
            .unwrap();
        let report = service.monthly_report(period(5, 2024)).await.unwrap();
        assert!(report.meets_savings_target);
    }

    #[tokio::test]
    async fn test_compare_with_previous_month() {
        let service = LedgerService::in_memory();
        service
            .add_entry(EntryCandidate::new("2024-01-10", "Income", "Salary", "100"))
            .await
            .unwrap();
        service
            .add_entry(EntryCandidate::new("2024-02-10", "Income", "Salary", "150"))
            .await
            .unwrap();
        service
            .add_entry(EntryCandidate::new("2024-02-11", "Expense", "Rent", "20"))
            .await
            .unwrap();

        let cmp = service.compare_with_previous(period(2, 2024)).await.unwrap();
        assert_eq!(cmp.previous_period, period(1, 2024));
        assert_eq!(cmp.previous.net, 10_000);
        assert_eq!(cmp.current.net, 13_000);
        assert_eq!(cmp.net_change, 3_000);
    }
}
