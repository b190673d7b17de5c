use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::context::ApplicationContextProvider;
use super::domain::{ApplicationId, GenerationOutcome};
use super::fallback::{FallbackChecklistProvider, BASELINE_COUNTRY, DEFAULT_VISA_TYPE};
use super::generator::{AiChecklistGenerator, CompletionGateway};
use super::response::ChecklistResponse;
use super::store::{ChecklistStore, ClaimOutcome, StoreError};
use super::validator::{self, ValidationOutcome};

/// Orchestrator for checklist generation.
///
/// The gate converts "paid model calls must not be duplicated" into the claim
/// protocol: only the caller that wins the atomic claim drives generation, and
/// every winner commits a terminal READY record no matter how the model
/// behaves. Model failures of any kind are absorbed here and resolved through
/// the curated fallback; the only error surfaced to callers is the store
/// itself being unavailable.
pub struct ChecklistRequestGate<S, C, P> {
    store: Arc<S>,
    contexts: Arc<P>,
    generator: AiChecklistGenerator<C>,
    fallback: Arc<FallbackChecklistProvider>,
}

/// Error raised by the gate. Everything except persistence failures is a
/// normal branch.
#[derive(Debug, thiserror::Error)]
pub enum ChecklistGateError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<S, C, P> ChecklistRequestGate<S, C, P>
where
    S: ChecklistStore,
    C: CompletionGateway,
    P: ApplicationContextProvider,
{
    pub fn new(
        store: Arc<S>,
        contexts: Arc<P>,
        generator: AiChecklistGenerator<C>,
        fallback: Arc<FallbackChecklistProvider>,
    ) -> Self {
        Self {
            store,
            contexts,
            generator,
            fallback,
        }
    }

    /// Request the checklist for an application.
    ///
    /// READY records are returned unchanged with no model call. An existing
    /// CLAIMED record means another request is generating; the caller gets
    /// `processing` immediately instead of waiting on or duplicating the
    /// in-flight call. Otherwise this caller races for the claim and, if it
    /// wins, generates and commits the terminal record.
    pub fn request_checklist(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ChecklistResponse, ChecklistGateError> {
        if let Some(record) = self.store.get(application_id)? {
            return Ok(ChecklistResponse::from_record(&record));
        }

        match self.store.claim(application_id, Utc::now())? {
            ClaimOutcome::Lost(existing) => Ok(ChecklistResponse::from_record(&existing)),
            ClaimOutcome::Won => {
                let outcome = self.generate_outcome(application_id);
                let record = self.store.commit_ready(application_id, outcome)?;
                Ok(ChecklistResponse::from_record(&record))
            }
        }
    }

    /// Read-only view of the current record, if any. Never claims.
    pub fn peek(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<ChecklistResponse>, ChecklistGateError> {
        let record = self.store.get(application_id)?;
        Ok(record.as_ref().map(ChecklistResponse::from_record))
    }

    fn generate_outcome(&self, application_id: &ApplicationId) -> GenerationOutcome {
        let context = match self.contexts.context(application_id) {
            Ok(context) => context,
            Err(error) => {
                warn!(
                    application = %application_id.0,
                    %error,
                    "context fetch failed, serving baseline fallback"
                );
                return GenerationOutcome {
                    items: self.fallback.get(BASELINE_COUNTRY, DEFAULT_VISA_TYPE),
                    ai_fallback_used: true,
                    ai_error_occurred: true,
                };
            }
        };

        match self.generator.generate(&context) {
            Ok(candidates) => match validator::validate(&candidates) {
                ValidationOutcome::Valid(items) => {
                    info!(
                        application = %application_id.0,
                        items = items.len(),
                        "model checklist accepted"
                    );
                    GenerationOutcome {
                        items,
                        ai_fallback_used: false,
                        ai_error_occurred: false,
                    }
                }
                ValidationOutcome::Invalid(reason) => {
                    warn!(
                        application = %application_id.0,
                        %reason,
                        "model checklist rejected, serving curated fallback"
                    );
                    GenerationOutcome {
                        items: self.fallback.get(&context.country_code, &context.visa_type),
                        ai_fallback_used: true,
                        ai_error_occurred: false,
                    }
                }
            },
            Err(error) => {
                warn!(
                    application = %application_id.0,
                    %error,
                    "model generation failed, serving curated fallback"
                );
                GenerationOutcome {
                    items: self.fallback.get(&context.country_code, &context.visa_type),
                    ai_fallback_used: true,
                    ai_error_occurred: true,
                }
            }
        }
    }
}
