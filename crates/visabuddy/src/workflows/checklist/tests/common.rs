use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::workflows::checklist::context::{
    ApplicationContextProvider, ContextError, PromptContext,
};
use crate::workflows::checklist::domain::{
    ApplicationId, ChecklistRecord, GenerationOutcome, GenerationStatus,
};
use crate::workflows::checklist::fallback::FallbackChecklistProvider;
use crate::workflows::checklist::gate::ChecklistRequestGate;
use crate::workflows::checklist::generator::{
    AiChecklistGenerator, AiTransportError, CompletionGateway,
};
use crate::workflows::checklist::store::{ChecklistStore, ClaimOutcome, StoreError};

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<HashMap<ApplicationId, ChecklistRecord>>,
}

impl ChecklistStore for MemoryStore {
    fn claim(
        &self,
        application_id: &ApplicationId,
        created_at: DateTime<Utc>,
    ) -> Result<ClaimOutcome, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if let Some(existing) = guard.get(application_id) {
            return Ok(ClaimOutcome::Lost(existing.clone()));
        }
        guard.insert(
            application_id.clone(),
            ChecklistRecord::claimed(application_id.clone(), created_at),
        );
        Ok(ClaimOutcome::Won)
    }

    fn commit_ready(
        &self,
        application_id: &ApplicationId,
        outcome: GenerationOutcome,
    ) -> Result<ChecklistRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let record = guard
            .get_mut(application_id)
            .ok_or_else(|| StoreError::MissingClaim(application_id.0.clone()))?;
        if record.status != GenerationStatus::Ready {
            record.status = GenerationStatus::Ready;
            record.outcome = Some(outcome);
        }
        Ok(record.clone())
    }

    fn get(&self, application_id: &ApplicationId) -> Result<Option<ChecklistRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(application_id).cloned())
    }
}

/// Store double whose every operation reports the backend as unreachable.
pub(super) struct UnavailableStore;

impl ChecklistStore for UnavailableStore {
    fn claim(
        &self,
        _application_id: &ApplicationId,
        _created_at: DateTime<Utc>,
    ) -> Result<ClaimOutcome, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn commit_ready(
        &self,
        _application_id: &ApplicationId,
        _outcome: GenerationOutcome,
    ) -> Result<ChecklistRecord, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn get(&self, _application_id: &ApplicationId) -> Result<Option<ChecklistRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Completion double replaying a queue of scripted results and counting calls.
pub(super) struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<String, AiTransportError>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedGateway {
    pub(super) fn with_responses(
        responses: Vec<Result<String, AiTransportError>>,
    ) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Hold each completion for a moment so concurrent callers really race.
    pub(super) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionGateway for ScriptedGateway {
    fn complete(&self, _context: &PromptContext) -> Result<String, AiTransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.responses
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(AiTransportError::Backend("script exhausted".to_string())))
    }
}

/// Context double serving one fixed context, or a miss when none is set.
pub(super) struct StaticContexts {
    context: Option<PromptContext>,
}

impl StaticContexts {
    pub(super) fn serving(context: PromptContext) -> Self {
        Self {
            context: Some(context),
        }
    }

    pub(super) fn unavailable() -> Self {
        Self { context: None }
    }
}

impl ApplicationContextProvider for StaticContexts {
    fn context(&self, application_id: &ApplicationId) -> Result<PromptContext, ContextError> {
        self.context
            .clone()
            .ok_or_else(|| ContextError::Missing(application_id.0.clone()))
    }
}

pub(super) fn gb_student_context() -> PromptContext {
    PromptContext {
        country_code: "GB".to_string(),
        visa_type: "student".to_string(),
        applicant_summary: "27-year-old applicant, first study visa".to_string(),
    }
}

pub(super) fn application() -> ApplicationId {
    ApplicationId("app-0001".to_string())
}

pub(super) fn fallback_provider() -> Arc<FallbackChecklistProvider> {
    Arc::new(FallbackChecklistProvider::builtin().expect("builtin table loads"))
}

pub(super) fn build_gate<S, C>(
    store: Arc<S>,
    gateway: Arc<C>,
    contexts: StaticContexts,
) -> ChecklistRequestGate<S, C, StaticContexts>
where
    S: ChecklistStore,
    C: CompletionGateway,
{
    ChecklistRequestGate::new(
        store,
        Arc::new(contexts),
        AiChecklistGenerator::new(gateway),
        fallback_provider(),
    )
}

/// A well-formed model response with `count` items cycling through the three
/// categories, so any `count >= 3` has at least one required item.
pub(super) fn well_formed_response(count: usize) -> String {
    let categories = ["required", "highly_recommended", "optional"];
    let checklist: Vec<_> = (0..count)
        .map(|index| {
            json!({
                "documentType": format!("doc_{index}"),
                "category": categories[index % categories.len()],
                "label": format!("Document {index}"),
                "description": format!("Bring document {index} to the appointment"),
            })
        })
        .collect();

    json!({
        "type": "checklist",
        "visaType": "student",
        "country": "GB",
        "checklist": checklist,
        "notes": ["Verify requirements with the embassy."],
    })
    .to_string()
}
