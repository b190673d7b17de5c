use serde::Serialize;

use super::domain::{ChecklistItem, ChecklistRecord, GenerationStatus};

/// Caller-facing projection of a generation record.
///
/// Both gate branches build their replies through [`from_record`], so the
/// processing and ready paths cannot drift apart.
///
/// [`from_record`]: ChecklistResponse::from_record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChecklistResponse {
    Processing,
    #[serde(rename_all = "camelCase")]
    Ready {
        items: Vec<ChecklistItem>,
        ai_fallback_used: bool,
        ai_error_occurred: bool,
    },
}

impl ChecklistResponse {
    pub fn from_record(record: &ChecklistRecord) -> Self {
        match (record.status, &record.outcome) {
            (GenerationStatus::Ready, Some(outcome)) => ChecklistResponse::Ready {
                items: outcome.items.clone(),
                ai_fallback_used: outcome.ai_fallback_used,
                ai_error_occurred: outcome.ai_error_occurred,
            },
            _ => ChecklistResponse::Processing,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ChecklistResponse::Ready { .. })
    }
}
