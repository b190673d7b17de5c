//! Model-backed candidate generation.
//!
//! The generator owns exactly one concern: turn a prompt context into an
//! unvalidated candidate list through the completion collaborator, parsing the
//! response defensively. Quality judgment lives in the validator; persistence
//! and fallback routing live in the gate.

mod openai;
mod parser;

pub use openai::OpenAiCompletionClient;
pub use parser::ResponseParseError;

use std::sync::Arc;

use tracing::warn;

use super::context::PromptContext;
use super::domain::CandidateItem;

/// Outbound seam to the external text-generation collaborator.
pub trait CompletionGateway: Send + Sync {
    /// One completion call; the implementation applies its own bounded request
    /// timeout and reports it as a transport failure.
    fn complete(&self, context: &PromptContext) -> Result<String, AiTransportError>;
}

/// Transport-level failures of the completion collaborator: network, timeout,
/// quota. Never retried here; the gate resolves them through the fallback.
#[derive(Debug, thiserror::Error)]
pub enum AiTransportError {
    #[error("completion backend unavailable: {0}")]
    Backend(String),
    #[error("completion request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Failure signal returned to the gate when no usable candidates could be
/// produced.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Transport(#[from] AiTransportError),
    #[error("model response unusable after retry: {0}")]
    Malformed(#[from] ResponseParseError),
}

/// Calls the completion collaborator and parses its response into candidates.
pub struct AiChecklistGenerator<C> {
    gateway: Arc<C>,
}

impl<C> AiChecklistGenerator<C>
where
    C: CompletionGateway,
{
    pub fn new(gateway: Arc<C>) -> Self {
        Self { gateway }
    }

    /// Produce an unvalidated candidate list for the context.
    ///
    /// A malformed response earns exactly one retry; a transport failure earns
    /// none, so a slow or dead backend is handed to the fallback path without
    /// stacking further latency on the caller.
    pub fn generate(&self, context: &PromptContext) -> Result<Vec<CandidateItem>, GenerationError> {
        let raw = self.gateway.complete(context)?;
        match parser::parse_candidates(&raw) {
            Ok(candidates) => Ok(candidates),
            Err(first_failure) => {
                warn!(error = %first_failure, "malformed completion response, retrying once");
                let retried = self.gateway.complete(context)?;
                parser::parse_candidates(&retried).map_err(GenerationError::from)
            }
        }
    }
}
