use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use visabuddy::workflows::checklist::{
    AiTransportError, ApplicationContextProvider, ApplicationId, ChecklistRecord, ChecklistStore,
    ClaimOutcome, CompletionGateway, ContextError, GenerationOutcome, GenerationStatus,
    PromptContext, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local checklist store. A single map guarded by one mutex keeps the
/// claim check-and-insert atomic, which is all the pipeline relies on.
#[derive(Default, Clone)]
pub(crate) struct InMemoryChecklistStore {
    records: Arc<Mutex<HashMap<ApplicationId, ChecklistRecord>>>,
}

impl ChecklistStore for InMemoryChecklistStore {
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

/// Offline stand-in for the completion collaborator used by the CLI demo.
pub(crate) enum DemoGateway {
    Scripted,
    Outage,
}

impl CompletionGateway for DemoGateway {
    fn complete(&self, context: &PromptContext) -> Result<String, AiTransportError> {
        match self {
            DemoGateway::Scripted => Ok(scripted_completion(context)),
            DemoGateway::Outage => Err(AiTransportError::Backend(
                "demo outage: completion backend unreachable".to_string(),
            )),
        }
    }
}

/// Context provider used by the CLI demo so no backend service is needed.
pub(crate) struct DemoContexts {
    context: PromptContext,
}

impl DemoContexts {
    pub(crate) fn new(country_code: String, visa_type: String) -> Self {
        Self {
            context: PromptContext {
                country_code,
                visa_type,
                applicant_summary: "offline demo applicant".to_string(),
            },
        }
    }
}

impl ApplicationContextProvider for DemoContexts {
    fn context(&self, _application_id: &ApplicationId) -> Result<PromptContext, ContextError> {
        Ok(self.context.clone())
    }
}

fn scripted_completion(context: &PromptContext) -> String {
    let documents = [
        ("passport", "required", "Valid passport"),
        ("visa_application_form", "required", "Completed application form"),
        ("passport_photos", "required", "Passport-size photographs"),
        ("proof_of_funds", "required", "Bank statements"),
        ("travel_itinerary", "required", "Round-trip travel itinerary"),
        ("accommodation_proof", "highly_recommended", "Accommodation booking"),
        ("travel_insurance", "highly_recommended", "Travel medical insurance"),
        ("employment_letter", "highly_recommended", "Letter from employer"),
        ("invitation_letter", "optional", "Invitation letter"),
        ("previous_visas", "optional", "Copies of previous visas"),
        ("tax_returns", "optional", "Recent tax returns"),
        ("cover_letter", "optional", "Cover letter for the application"),
    ];

    let checklist: Vec<_> = documents
        .iter()
        .map(|(document_type, category, label)| {
            json!({
                "documentType": document_type,
                "category": category,
                "label": label,
                "description": format!(
                    "{label} for a {} visa to {}",
                    context.visa_type, context.country_code
                ),
            })
        })
        .collect();

    json!({ "checklist": checklist }).to_string()
}
