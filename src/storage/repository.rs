use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{Entry, EntryId, EntryType, NewEntry};

use super::{DeleteOutcome, LedgerStore, MIGRATION_001_ENTRIES};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed ledger store.
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
            .with_context(|| format!("Failed to connect to database {}", database_url))?;
        tracing::debug!(database_url, "connected to ledger database");
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_ENTRIES)
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

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<Entry> {
        let date_str: String = row.get("date");
        let type_str: String = row.get("entry_type");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Entry {
            id: row.get("id"),
            date: NaiveDate::parse_from_str(&date_str, DATE_FORMAT).context("Invalid entry date")?,
            entry_type: EntryType::from_str(&type_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid entry type: {}", type_str))?,
            category: row.get("category"),
            amount_cents: row.get("amount_cents"),
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}

impl LedgerStore for Repository {
    async fn insert(&self, entry: &NewEntry) -> Result<Entry> {
        let recorded_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO entries (date, entry_type, category, amount_cents, recorded_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.date.format(DATE_FORMAT).to_string())
        .bind(entry.entry_type.as_str())
        .bind(&entry.category)
        .bind(entry.amount_cents)
        .bind(recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save entry")?;

        let id: EntryId = result.last_insert_rowid();
        Ok(Entry::from_new(id, entry.clone(), recorded_at))
    }

    async fn select_all(&self) -> Result<Vec<Entry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, entry_type, category, amount_cents, recorded_at
            FROM entries
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn select_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Entry>> {
        // Four-digit ISO dates compare correctly as text. The upper bound is
        // bound as the last included day so it never needs a fifth year digit.
        let Some(last) = to.pred_opt().filter(|last| *last >= from) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            r#"
            SELECT id, date, entry_type, category, amount_cents, recorded_at
            FROM entries
            WHERE date >= ? AND date <= ?
            ORDER BY date, id
            "#,
        )
        .bind(from.format(DATE_FORMAT).to_string())
        .bind(last.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list entries in range")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn delete_by_id(&self, id: EntryId) -> Result<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete entry")?;

        Ok(if result.rows_affected() == 0 {
            DeleteOutcome::NotFound
        } else {
            DeleteOutcome::Deleted
        })
    }
}
