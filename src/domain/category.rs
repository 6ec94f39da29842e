use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::EntryType;

const DEFAULT_INCOME: &[&str] = &["Salary", "Bonus", "Interest", "Other"];

const DEFAULT_EXPENSE: &[&str] = &[
    "Food",
    "Groceries",
    "Transport",
    "Snacks",
    "Rent",
    "Bills",
    "Utilities",
    "Healthcare",
    "Electronics",
    "Fashion",
    "Entertainment",
    "Other",
];

const DEFAULT_SAVINGS: &[&str] = &["Emergency Fund", "Investments", "FD", "PPF", "Other"];

/// Allowed category labels for each entry type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    categories: BTreeMap<EntryType, Vec<String>>,
}

impl CategoryCatalog {
    /// An empty catalog: every type has an empty list, which accepts nothing.
    pub fn empty() -> Self {
        Self {
            categories: EntryType::ALL.iter().map(|t| (*t, Vec::new())).collect(),
        }
    }

    /// Replace the list of categories for one entry type.
    pub fn with_categories<I, S>(mut self, entry_type: EntryType, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = categories
            .into_iter()
            .map(Into::into)
            .map(|c: String| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self.categories.insert(entry_type, list);
        self
    }

    pub fn categories(&self, entry_type: EntryType) -> &[String] {
        self.categories
            .get(&entry_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a category for the given type, ignoring case and surrounding
    /// whitespace. Returns the catalog's own spelling.
    pub fn resolve(&self, entry_type: EntryType, category: &str) -> Option<&str> {
        let wanted = category.trim();
        self.categories(entry_type)
            .iter()
            .find(|c| c.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }

    pub fn contains(&self, entry_type: EntryType, category: &str) -> bool {
        self.resolve(entry_type, category).is_some()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::empty()
            .with_categories(EntryType::Income, DEFAULT_INCOME.iter().copied())
            .with_categories(EntryType::Expense, DEFAULT_EXPENSE.iter().copied())
            .with_categories(EntryType::Savings, DEFAULT_SAVINGS.iter().copied())
    }
}
