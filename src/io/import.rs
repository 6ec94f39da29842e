use anyhow::Result;
use std::io::Read;

use crate::application::{AppError, LedgerService};
use crate::domain::{validate, EntryCandidate};
use crate::storage::LedgerStore;

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred on one line of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    pub line: usize,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate every row but store nothing
    pub dry_run: bool,
}

/// Importer for loading entries into the ledger from CSV.
pub struct Importer<'a, S> {
    service: &'a LedgerService<S>,
}

impl<'a, S: LedgerStore> Importer<'a, S> {
    pub fn new(service: &'a LedgerService<S>) -> Self {
        Self { service }
    }

    /// Import entries from CSV with a `date,type,category,amount` header.
    /// Extra columns (such as an exported `id`) are ignored.
    ///
    /// Rows that fail validation are reported and skipped; the remaining
    /// rows are still imported. A store failure aborts the import.
    pub async fn import_entries_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut result = ImportResult::default();

        for (line_num, record) in csv_reader.deserialize::<EntryCandidate>().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let candidate = match record {
                Ok(c) => c,
                Err(e) => {
                    result.errors.push(ImportError {
                        line,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            if options.dry_run {
                match validate(&candidate, self.service.catalog()) {
                    Ok(_) => result.imported += 1,
                    Err(e) => result.errors.push(ImportError {
                        line,
                        error: e.to_string(),
                    }),
                }
                continue;
            }

            match self.service.add_entry(candidate).await {
                Ok(_) => result.imported += 1,
                Err(AppError::Validation(e)) => result.errors.push(ImportError {
                    line,
                    error: e.to_string(),
                }),
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            imported = result.imported,
            errors = result.errors.len(),
            dry_run = options.dry_run,
            "import finished"
        );
        Ok(result)
    }
}
