use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for visa applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Closed category set for checklist items. New categories require updating
/// every consumer, which is the point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Required,
    HighlyRecommended,
    Optional,
}

impl DocumentCategory {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentCategory::Required => "required",
            DocumentCategory::HighlyRecommended => "highly_recommended",
            DocumentCategory::Optional => "optional",
        }
    }

    /// Parse the wire spelling used by model output and the fallback table.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "required" => Some(DocumentCategory::Required),
            "highly_recommended" => Some(DocumentCategory::HighlyRecommended),
            "optional" => Some(DocumentCategory::Optional),
            _ => None,
        }
    }
}

/// One requested document inside a stored checklist. Immutable once part of a
/// committed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Stable identifier, e.g. `passport`.
    pub document_type: String,
    pub category: DocumentCategory,
    /// Display text for model-authored items, an i18n key for curated ones.
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// 1-based position in the rendered list.
    pub order: u32,
}

/// Unvalidated item as parsed from the model response. The validator is the
/// only component allowed to turn these into [`ChecklistItem`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    pub document_type: String,
    pub category: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// Generation lifecycle: `NONE -> CLAIMED -> READY`, with READY terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Claimed,
    Ready,
}

/// Terminal payload of a generation. Write-once: the flags and items never
/// change after commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub items: Vec<ChecklistItem>,
    pub ai_fallback_used: bool,
    pub ai_error_occurred: bool,
}

/// The single per-application generation record persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistRecord {
    pub application_id: ApplicationId,
    pub status: GenerationStatus,
    /// Present exactly when `status == Ready`.
    #[serde(flatten)]
    pub outcome: Option<GenerationOutcome>,
    pub created_at: DateTime<Utc>,
}

impl ChecklistRecord {
    pub fn claimed(application_id: ApplicationId, created_at: DateTime<Utc>) -> Self {
        Self {
            application_id,
            status: GenerationStatus::Claimed,
            outcome: None,
            created_at,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == GenerationStatus::Ready
    }
}
