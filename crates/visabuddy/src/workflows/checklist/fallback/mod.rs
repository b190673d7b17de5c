//! Curated fallback path for checklist generation.
//!
//! When the model is unreachable or its output fails the quality gate, the
//! provider resolves a (country, visa type) pair to an authored list through a
//! deterministic default chain, so coverage gaps degrade to a known substitute
//! list and never to an empty checklist.

mod table;

pub use table::{FallbackDataError, FallbackDocument, FallbackEntry, FallbackTable};

use tracing::warn;

use super::domain::ChecklistItem;

/// Country anchoring the last link of the default chain.
pub const BASELINE_COUNTRY: &str = "US";
/// Visa type tried when the exact pair is absent, and the baseline visa type.
pub const DEFAULT_VISA_TYPE: &str = "tourist";

/// Resolves (country, visa type) pairs to concrete checklist items.
pub struct FallbackChecklistProvider {
    table: FallbackTable,
}

impl FallbackChecklistProvider {
    /// Wrap a loaded table. The table loader has already verified the baseline
    /// entry exists, which keeps [`FallbackChecklistProvider::get`] total.
    pub fn new(table: FallbackTable) -> Self {
        Self { table }
    }

    pub fn builtin() -> Result<Self, FallbackDataError> {
        Ok(Self::new(FallbackTable::builtin()?))
    }

    /// Resolve the curated list for the pair.
    ///
    /// Default chain, in order: exact `(country, visa_type)`, then
    /// `(country, "tourist")`, then the `("US", "tourist")` baseline. Falling
    /// through a link is a data-completeness gap worth surfacing to the table
    /// owners, hence the warning.
    pub fn get(&self, country_code: &str, visa_type: &str) -> Vec<ChecklistItem> {
        let entry = self
            .table
            .entry(country_code, visa_type)
            .or_else(|| {
                warn!(
                    country = country_code,
                    visa_type, "no curated entry for pair, trying country default"
                );
                self.table.entry(country_code, DEFAULT_VISA_TYPE)
            })
            .or_else(|| {
                warn!(
                    country = country_code,
                    visa_type, "no curated entry for country, serving baseline"
                );
                self.table.entry(BASELINE_COUNTRY, DEFAULT_VISA_TYPE)
            })
            .expect("baseline entry verified when the table was loaded");

        entry
            .items
            .iter()
            .enumerate()
            .map(|(index, document)| ChecklistItem {
                document_type: document.document_type.clone(),
                category: document.category,
                label: document.label_key.clone(),
                description: String::new(),
                order: index as u32 + 1,
            })
            .collect()
    }
}
