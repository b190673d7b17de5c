use chrono::{DateTime, Utc};

use super::domain::{ApplicationId, ChecklistRecord, GenerationOutcome};

/// Persistence abstraction over the per-application generation record.
///
/// The claim is the only operation that needs true atomicity: backends must
/// implement it as a conditional create (compare-and-set or equivalent) so
/// that exactly one concurrent caller per application observes
/// [`ClaimOutcome::Won`]. Commit idempotency follows from the claim protocol,
/// not from dedup logic inside the store.
pub trait ChecklistStore: Send + Sync {
    /// Conditionally create a CLAIMED record for the application.
    fn claim(
        &self,
        application_id: &ApplicationId,
        created_at: DateTime<Utc>,
    ) -> Result<ClaimOutcome, StoreError>;

    /// Write the terminal READY record for a previously claimed application.
    /// Committing over an already READY record leaves it untouched and returns
    /// the stored record.
    fn commit_ready(
        &self,
        application_id: &ApplicationId,
        outcome: GenerationOutcome,
    ) -> Result<ChecklistRecord, StoreError>;

    fn get(&self, application_id: &ApplicationId) -> Result<Option<ChecklistRecord>, StoreError>;
}

/// Result of the atomic claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// This caller created the record and owns generation.
    Won,
    /// Another caller got there first; the existing record is returned so the
    /// loser can report its current state.
    Lost(ChecklistRecord),
}

/// Error enumeration for store failures. `Unavailable` is the only failure the
/// gate surfaces to callers; nothing can make progress without persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no claimed record for application {0}")]
    MissingClaim(String),
    #[error("checklist store unavailable: {0}")]
    Unavailable(String),
}
