use std::collections::BTreeMap;

use serde::Deserialize;

use super::super::domain::DocumentCategory;
use super::{BASELINE_COUNTRY, DEFAULT_VISA_TYPE};

/// Curated document list authored for one (country, visa type) pair.
///
/// Entries are authored to the same bar enforced on model output: 10 to 16
/// items, at least one required item, never all optional. The authoring
/// contract is asserted by the table test suite, not at request time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackEntry {
    pub country_code: String,
    pub visa_type: String,
    pub items: Vec<FallbackDocument>,
}

/// One curated document. `label_key` is an i18n key resolved by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackDocument {
    pub document_type: String,
    pub category: DocumentCategory,
    pub label_key: String,
}

/// Immutable lookup table over the authored entries, loaded once at process
/// start and injected wherever a fallback list is needed.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    entries: BTreeMap<(String, String), FallbackEntry>,
}

const BUILTIN_TABLE: &str = include_str!("builtin.json");

impl FallbackTable {
    /// Parse a table from its JSON wire format, an array of entries.
    pub fn from_json(raw: &str) -> Result<Self, FallbackDataError> {
        let parsed: Vec<FallbackEntry> = serde_json::from_str(raw)?;

        let mut entries = BTreeMap::new();
        for entry in parsed {
            let key = normalized_key(&entry.country_code, &entry.visa_type);
            if entries.insert(key, entry.clone()).is_some() {
                return Err(FallbackDataError::DuplicateEntry {
                    country_code: entry.country_code,
                    visa_type: entry.visa_type,
                });
            }
        }

        let table = Self { entries };
        if table.entry(BASELINE_COUNTRY, DEFAULT_VISA_TYPE).is_none() {
            return Err(FallbackDataError::MissingBaseline {
                country_code: BASELINE_COUNTRY.to_string(),
                visa_type: DEFAULT_VISA_TYPE.to_string(),
            });
        }

        Ok(table)
    }

    /// The table shipped with the service.
    pub fn builtin() -> Result<Self, FallbackDataError> {
        Self::from_json(BUILTIN_TABLE)
    }

    pub fn entry(&self, country_code: &str, visa_type: &str) -> Option<&FallbackEntry> {
        self.entries.get(&normalized_key(country_code, visa_type))
    }

    pub fn entries(&self) -> impl Iterator<Item = &FallbackEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalized_key(country_code: &str, visa_type: &str) -> (String, String) {
    (
        country_code.trim().to_ascii_uppercase(),
        visa_type.trim().to_ascii_lowercase(),
    )
}

/// Error enumeration for fallback data loading.
#[derive(Debug, thiserror::Error)]
pub enum FallbackDataError {
    #[error("fallback table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate fallback entry for {country_code}/{visa_type}")]
    DuplicateEntry {
        country_code: String,
        visa_type: String,
    },
    #[error("fallback table is missing the {country_code}/{visa_type} baseline entry")]
    MissingBaseline {
        country_code: String,
        visa_type: String,
    },
}
