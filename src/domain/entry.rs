use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Store-assigned identifier. Never reused, even after the entry is deleted.
pub type EntryId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money coming in (salary, bonus, interest...)
    Income,
    /// Money spent
    Expense,
    /// Money set aside; subtracts from the net balance like an expense
    Savings,
}

impl EntryType {
    pub const ALL: [EntryType; 3] = [EntryType::Income, EntryType::Expense, EntryType::Savings];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
            EntryType::Savings => "savings",
        }
    }

    /// Human-facing label, as shown in summaries and tables.
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::Income => "Income",
            EntryType::Expense => "Expense",
            EntryType::Savings => "Savings",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(EntryType::Income),
            "expense" => Some(EntryType::Expense),
            "savings" => Some(EntryType::Savings),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Raw, unvalidated input for a new entry, exactly as a caller typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCandidate {
    pub date: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub category: String,
    pub amount: String,
}

impl EntryCandidate {
    pub fn new(
        date: impl Into<String>,
        entry_type: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            entry_type: entry_type.into(),
            category: category.into(),
            amount: amount.into(),
        }
    }
}

/// A validated entry that has not been stored yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub entry_type: EntryType,
    pub category: String,
    pub amount_cents: Cents,
}

/// One recorded financial transaction. Entries are immutable once stored;
/// the only way to get rid of one is to delete it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Calendar date of the transaction, the only field used for period filtering
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub category: String,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    /// When the entry was written to the store
    pub recorded_at: DateTime<Utc>,
}

impl Entry {
    /// Build a stored entry from its validated form and the id the store assigned.
    pub fn from_new(id: EntryId, new: NewEntry, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id,
            date: new.date,
            entry_type: new.entry_type,
            category: new.category,
            amount_cents: new.amount_cents,
            recorded_at,
        }
    }

    /// True when every user-supplied field equals the given new entry.
    pub fn matches(&self, new: &NewEntry) -> bool {
        self.date == new.date
            && self.entry_type == new.entry_type
            && self.category == new.category
            && self.amount_cents == new.amount_cents
    }
}
