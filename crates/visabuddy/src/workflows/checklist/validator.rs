//! Quality gate over untrusted model output.
//!
//! Structural rules reject broken candidates outright; the item-count floor is
//! a content-quality bar on top of the schema, so a structurally clean but
//! short list still routes the gate to the curated fallback. Oversized lists
//! are corrected here rather than rejected.

use std::collections::BTreeSet;

use super::domain::{CandidateItem, ChecklistItem, DocumentCategory};

/// Minimum accepted item count; anything below is "weak" output.
pub const MIN_ITEMS: usize = 10;
/// Slot cap for the rendered list. Required items are never dropped to honor
/// it.
pub const MAX_ITEMS: usize = 16;

/// Result of validating a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(Vec<ChecklistItem>),
    Invalid(ValidationFailure),
}

/// Reasons a candidate list is rejected. Every variant routes the gate to the
/// fallback path without marking an AI error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("item at position {index} has an empty document type")]
    MissingDocumentType { index: usize },
    #[error("item '{document_type}' has unknown category '{category}'")]
    UnknownCategory {
        document_type: String,
        category: String,
    },
    #[error("item '{document_type}' has an empty label")]
    MissingLabel { document_type: String },
    #[error("duplicate document type '{document_type}'")]
    DuplicateDocumentType { document_type: String },
    #[error("weak output: {count} items below the minimum of {minimum}")]
    TooFewItems { count: usize, minimum: usize },
    #[error("every item is optional")]
    AllOptional,
    #[error("no required item present")]
    NoRequiredItems,
}

/// Validate and normalize a candidate list into committed checklist items.
///
/// Rules are applied in order: field presence, category membership, duplicate
/// document types, the minimum-count bar, deterministic truncation above
/// [`MAX_ITEMS`], and the category-distribution sanity checks. `order` is
/// assigned 1-based over the final list.
pub fn validate(candidates: &[CandidateItem]) -> ValidationOutcome {
    let mut typed: Vec<ChecklistItem> = Vec::with_capacity(candidates.len());
    let mut seen = BTreeSet::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let document_type = candidate.document_type.trim();
        if document_type.is_empty() {
            return ValidationOutcome::Invalid(ValidationFailure::MissingDocumentType { index });
        }

        let Some(category) = DocumentCategory::parse(&candidate.category) else {
            return ValidationOutcome::Invalid(ValidationFailure::UnknownCategory {
                document_type: document_type.to_string(),
                category: candidate.category.trim().to_string(),
            });
        };

        let label = candidate.label.trim();
        if label.is_empty() {
            return ValidationOutcome::Invalid(ValidationFailure::MissingLabel {
                document_type: document_type.to_string(),
            });
        }

        if !seen.insert(document_type.to_ascii_lowercase()) {
            return ValidationOutcome::Invalid(ValidationFailure::DuplicateDocumentType {
                document_type: document_type.to_string(),
            });
        }

        typed.push(ChecklistItem {
            document_type: document_type.to_string(),
            category,
            label: label.to_string(),
            description: candidate.description.trim().to_string(),
            order: 0,
        });
    }

    if typed.len() < MIN_ITEMS {
        return ValidationOutcome::Invalid(ValidationFailure::TooFewItems {
            count: typed.len(),
            minimum: MIN_ITEMS,
        });
    }

    if typed
        .iter()
        .all(|item| item.category == DocumentCategory::Optional)
    {
        return ValidationOutcome::Invalid(ValidationFailure::AllOptional);
    }

    if !typed
        .iter()
        .any(|item| item.category == DocumentCategory::Required)
    {
        return ValidationOutcome::Invalid(ValidationFailure::NoRequiredItems);
    }

    ValidationOutcome::Valid(assign_order(truncate(typed)))
}

/// Deterministic size correction: keep every required item (even past the
/// cap), then fill the remaining slots with highly recommended items in their
/// original order, then optional items, until the cap or the pool is
/// exhausted.
fn truncate(items: Vec<ChecklistItem>) -> Vec<ChecklistItem> {
    if items.len() <= MAX_ITEMS {
        return items;
    }

    let mut kept: Vec<ChecklistItem> = items
        .iter()
        .filter(|item| item.category == DocumentCategory::Required)
        .cloned()
        .collect();

    for category in [DocumentCategory::HighlyRecommended, DocumentCategory::Optional] {
        for item in items.iter().filter(|item| item.category == category) {
            if kept.len() >= MAX_ITEMS {
                return kept;
            }
            kept.push(item.clone());
        }
    }

    kept
}

fn assign_order(mut items: Vec<ChecklistItem>) -> Vec<ChecklistItem> {
    for (index, item) in items.iter_mut().enumerate() {
        item.order = index as u32 + 1;
    }
    items
}
