//! Document checklist generation pipeline.
//!
//! Given an application's destination country and visa type, produce a
//! personalized list of required, highly recommended, and optional documents.
//! A model call is used when possible; an atomic claim protocol guarantees the
//! paid collaborator is invoked at most once per application, a validator
//! gates the untrusted output, and a curated fallback table guarantees every
//! request eventually resolves to a complete checklist.

pub mod context;
pub mod domain;
pub mod fallback;
pub mod gate;
pub mod generator;
pub mod response;
pub mod router;
pub mod store;
pub mod validator;

#[cfg(test)]
mod tests;

pub use context::{ApplicationContextProvider, BackendContextClient, ContextError, PromptContext};
pub use domain::{
    ApplicationId, CandidateItem, ChecklistItem, ChecklistRecord, DocumentCategory,
    GenerationOutcome, GenerationStatus,
};
pub use fallback::{
    FallbackChecklistProvider, FallbackDataError, FallbackDocument, FallbackEntry, FallbackTable,
    BASELINE_COUNTRY, DEFAULT_VISA_TYPE,
};
pub use gate::{ChecklistGateError, ChecklistRequestGate};
pub use generator::{
    AiChecklistGenerator, AiTransportError, CompletionGateway, GenerationError,
    OpenAiCompletionClient, ResponseParseError,
};
pub use response::ChecklistResponse;
pub use router::checklist_router;
pub use store::{ChecklistStore, ClaimOutcome, StoreError};
pub use validator::{validate, ValidationFailure, ValidationOutcome, MAX_ITEMS, MIN_ITEMS};
