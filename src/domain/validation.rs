use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::{
    parse_cents, CategoryCatalog, EntryCandidate, EntryType, NewEntry, MAX_AMOUNT_CENTS, MAX_YEAR,
    MIN_YEAR,
};

/// Why a candidate entry was rejected. Rejection never changes any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid amount '{0}': must be greater than zero and at most 10000000000.00")]
    InvalidAmount(String),

    #[error("Invalid type '{0}'. Valid types: income, expense, savings")]
    InvalidType(String),

    #[error("Invalid category '{category}' for {entry_type}")]
    InvalidCategory {
        entry_type: EntryType,
        category: String,
    },

    #[error("Invalid date '{0}'. Use YYYY-MM-DD with a year from 0001 to 9999")]
    InvalidDate(String),
}

/// Check a raw candidate and turn it into a storable entry.
///
/// Rules are applied in order (amount, type, category, date) and the first
/// failure is reported. When a catalog is given the category must belong to
/// the list for the chosen type, and is rewritten to the catalog's spelling.
pub fn validate(
    candidate: &EntryCandidate,
    catalog: Option<&CategoryCatalog>,
) -> Result<NewEntry, ValidationError> {
    let amount_cents = match parse_cents(&candidate.amount) {
        Ok(cents) if cents > 0 && cents <= MAX_AMOUNT_CENTS => cents,
        _ => return Err(ValidationError::InvalidAmount(candidate.amount.clone())),
    };

    let entry_type = EntryType::from_str(&candidate.entry_type)
        .ok_or_else(|| ValidationError::InvalidType(candidate.entry_type.clone()))?;

    let category = validate_category(entry_type, &candidate.category, catalog)?;

    let date = NaiveDate::parse_from_str(candidate.date.trim(), "%Y-%m-%d")
        .ok()
        .filter(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()))
        .ok_or_else(|| ValidationError::InvalidDate(candidate.date.clone()))?;

    Ok(NewEntry {
        date,
        entry_type,
        category,
        amount_cents,
    })
}

fn validate_category(
    entry_type: EntryType,
    category: &str,
    catalog: Option<&CategoryCatalog>,
) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidCategory {
        entry_type,
        category: category.to_string(),
    };

    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    match catalog {
        Some(catalog) => catalog
            .resolve(entry_type, trimmed)
            .map(str::to_string)
            .ok_or_else(invalid),
        None => Ok(trimmed.to_string()),
    }
}
