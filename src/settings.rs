//! Layered configuration: built-in defaults, then an optional TOML file,
//! then `TALLY_*` environment variables. Command-line flags are applied on
//! top by the CLI.
//!
//! ```toml
//! database = "tally.db"
//! log_level = "info"
//! currency_symbol = "₹"
//! savings_target_percent = 20.0
//!
//! [categories]
//! income = ["Salary", "Freelance", "Other"]
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::application::DEFAULT_SAVINGS_TARGET_PERCENT;
use crate::domain::{CategoryCatalog, EntryType};

pub const DEFAULT_CONFIG_PATH: &str = "tally.toml";

/// Per-type category overrides. A missing list keeps the default one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategorySettings {
    pub income: Option<Vec<String>>,
    pub expense: Option<Vec<String>>,
    pub savings: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: String,
    pub log_level: String,
    pub currency_symbol: String,
    pub savings_target_percent: f64,
    /// Accept any non-empty category instead of checking the catalog
    pub free_categories: bool,
    pub categories: CategorySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: "tally.db".to_string(),
            log_level: "info".to_string(),
            currency_symbol: "₹".to_string(),
            savings_target_percent: DEFAULT_SAVINGS_TARGET_PERCENT,
            free_categories: false,
            categories: CategorySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (or the default file, which may be
    /// missing) and the environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("TALLY"))
            .build()?
            .try_deserialize()
    }

    /// The catalog handed to the validator, or `None` for free-form categories.
    pub fn catalog(&self) -> Option<CategoryCatalog> {
        if self.free_categories {
            return None;
        }

        let mut catalog = CategoryCatalog::default();
        for (entry_type, list) in [
            (EntryType::Income, &self.categories.income),
            (EntryType::Expense, &self.categories.expense),
            (EntryType::Savings, &self.categories.savings),
        ] {
            if let Some(list) = list {
                catalog = catalog.with_categories(entry_type, list.iter().cloned());
            }
        }
        Some(catalog)
    }
}
