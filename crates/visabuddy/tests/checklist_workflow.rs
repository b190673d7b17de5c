//! Integration specifications for the checklist generation workflow.
//!
//! Scenarios exercise the public gate facade and the HTTP router end to end so
//! the claim protocol, quality gate, fallback routing, and response mapping
//! are validated without reaching into private modules.

mod common {
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Utc};
    use serde_json::json;

    use visabuddy::workflows::checklist::{
        AiChecklistGenerator, AiTransportError, ApplicationContextProvider, ApplicationId,
        ChecklistRecord, ChecklistRequestGate, ChecklistStore, ClaimOutcome, CompletionGateway,
        ContextError, FallbackChecklistProvider, GenerationOutcome, GenerationStatus,
        PromptContext, StoreError,
    };

    #[derive(Default)]
    pub(crate) struct MemoryStore {
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

        fn get(
            &self,
            application_id: &ApplicationId,
        ) -> Result<Option<ChecklistRecord>, StoreError> {
            let guard = self.records.lock().expect("store mutex poisoned");
            Ok(guard.get(application_id).cloned())
        }
    }

    pub(crate) struct FailingStore;

    impl ChecklistStore for FailingStore {
        fn claim(
            &self,
            _application_id: &ApplicationId,
            _created_at: DateTime<Utc>,
        ) -> Result<ClaimOutcome, StoreError> {
            Err(StoreError::Unavailable("backend offline".to_string()))
        }

        fn commit_ready(
            &self,
            _application_id: &ApplicationId,
            _outcome: GenerationOutcome,
        ) -> Result<ChecklistRecord, StoreError> {
            Err(StoreError::Unavailable("backend offline".to_string()))
        }

        fn get(
            &self,
            _application_id: &ApplicationId,
        ) -> Result<Option<ChecklistRecord>, StoreError> {
            Err(StoreError::Unavailable("backend offline".to_string()))
        }
    }

    pub(crate) struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<String, AiTransportError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedGateway {
        pub(crate) fn with_responses(
            responses: Vec<Result<String, AiTransportError>>,
        ) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionGateway for ScriptedGateway {
        fn complete(&self, _context: &PromptContext) -> Result<String, AiTransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .expect("script mutex poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(AiTransportError::Backend("script exhausted".to_string())))
        }
    }

    pub(crate) struct FixedContexts {
        context: PromptContext,
    }

    impl FixedContexts {
        pub(crate) fn new(country_code: &str, visa_type: &str) -> Self {
            Self {
                context: PromptContext {
                    country_code: country_code.to_string(),
                    visa_type: visa_type.to_string(),
                    applicant_summary: "integration fixture".to_string(),
                },
            }
        }
    }

    impl ApplicationContextProvider for FixedContexts {
        fn context(&self, _application_id: &ApplicationId) -> Result<PromptContext, ContextError> {
            Ok(self.context.clone())
        }
    }

    pub(crate) type TestGate = ChecklistRequestGate<MemoryStore, ScriptedGateway, FixedContexts>;

    pub(crate) fn build_gate(
        gateway: Arc<ScriptedGateway>,
        country_code: &str,
        visa_type: &str,
    ) -> (Arc<TestGate>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let gate = Arc::new(ChecklistRequestGate::new(
            store.clone(),
            Arc::new(FixedContexts::new(country_code, visa_type)),
            AiChecklistGenerator::new(gateway),
            Arc::new(FallbackChecklistProvider::builtin().expect("builtin table loads")),
        ));
        (gate, store)
    }

    pub(crate) fn model_response(count: usize) -> String {
        let categories = ["required", "highly_recommended", "optional"];
        let checklist: Vec<_> = (0..count)
            .map(|index| {
                json!({
                    "documentType": format!("doc_{index}"),
                    "category": categories[index % categories.len()],
                    "label": format!("Document {index}"),
                    "description": "",
                })
            })
            .collect();

        json!({
            "type": "checklist",
            "visaType": "student",
            "country": "GB",
            "checklist": checklist,
            "notes": [],
        })
        .to_string()
    }
}

mod workflow {
    use std::sync::Arc;

    use serde_json::Value;

    use super::common::{build_gate, model_response, ScriptedGateway};
    use visabuddy::workflows::checklist::{
        AiTransportError, ApplicationId, ChecklistResponse, ChecklistStore, GenerationStatus,
    };

    #[test]
    fn gb_student_outage_scenario_commits_the_curated_13_item_list() {
        let gateway = Arc::new(ScriptedGateway::with_responses(vec![Err(
            AiTransportError::Backend("connect timeout".to_string()),
        )]));
        let (gate, store) = build_gate(gateway, "GB", "student");
        let application = ApplicationId("app-gb-student".to_string());

        let response = gate
            .request_checklist(&application)
            .expect("request succeeds");

        let ChecklistResponse::Ready {
            items,
            ai_fallback_used,
            ai_error_occurred,
        } = response
        else {
            panic!("expected ready response");
        };
        assert_eq!(items.len(), 13);
        assert!(ai_fallback_used);
        assert!(ai_error_occurred);

        let record = store
            .get(&application)
            .expect("store reachable")
            .expect("record persisted");
        assert_eq!(record.status, GenerationStatus::Ready);
    }

    #[test]
    fn repeated_reads_serialize_identically() {
        let gateway = Arc::new(ScriptedGateway::with_responses(vec![Ok(model_response(
            12,
        ))]));
        let (gate, _) = build_gate(gateway.clone(), "GB", "student");
        let application = ApplicationId("app-idem".to_string());

        let first = gate
            .request_checklist(&application)
            .expect("first request succeeds");
        let second = gate
            .request_checklist(&application)
            .expect("second request succeeds");

        let first_json = serde_json::to_vec(&first).expect("serialize first");
        let second_json = serde_json::to_vec(&second).expect("serialize second");
        assert_eq!(first_json, second_json);
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn ready_payload_uses_the_documented_wire_shape() {
        let gateway = Arc::new(ScriptedGateway::with_responses(vec![Ok(model_response(
            12,
        ))]));
        let (gate, _) = build_gate(gateway, "GB", "student");

        let response = gate
            .request_checklist(&ApplicationId("app-wire".to_string()))
            .expect("request succeeds");
        let payload: Value =
            serde_json::to_value(&response).expect("response serializes");

        assert_eq!(payload.get("status").and_then(Value::as_str), Some("ready"));
        assert_eq!(
            payload.get("aiFallbackUsed").and_then(Value::as_bool),
            Some(false)
        );
        assert_eq!(
            payload.get("aiErrorOccurred").and_then(Value::as_bool),
            Some(false)
        );
        let first_item = payload
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .expect("items present");
        assert_eq!(
            first_item.get("documentType").and_then(Value::as_str),
            Some("doc_0")
        );
        assert_eq!(first_item.get("order").and_then(Value::as_u64), Some(1));
    }

    #[test]
    fn persisted_record_round_trips_through_its_wire_shape() {
        let gateway = Arc::new(ScriptedGateway::with_responses(vec![Ok(model_response(
            12,
        ))]));
        let (gate, store) = build_gate(gateway, "GB", "student");
        let application = ApplicationId("app-persist".to_string());

        gate.request_checklist(&application)
            .expect("request succeeds");

        let record = store
            .get(&application)
            .expect("store reachable")
            .expect("record persisted");
        let raw = serde_json::to_string(&record).expect("record serializes");
        let payload: Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(
            payload.get("applicationId").and_then(Value::as_str),
            Some("app-persist")
        );
        assert_eq!(payload.get("status").and_then(Value::as_str), Some("ready"));
        assert!(payload.get("createdAt").is_some());

        let restored: visabuddy::workflows::checklist::ChecklistRecord =
            serde_json::from_str(&raw).expect("record deserializes");
        assert_eq!(restored, record);
    }
}

mod routing {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::common::{build_gate, model_response, FailingStore, FixedContexts, ScriptedGateway};
    use visabuddy::workflows::checklist::{
        checklist_router, AiChecklistGenerator, ChecklistRequestGate, FallbackChecklistProvider,
    };

    async fn dispatch(router: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router dispatch");

        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json body");
        (status, payload)
    }

    #[tokio::test]
    async fn post_returns_a_ready_checklist() {
        let gateway = Arc::new(ScriptedGateway::with_responses(vec![Ok(model_response(
            12,
        ))]));
        let (gate, _) = build_gate(gateway, "GB", "student");
        let router = checklist_router(gate);

        let (status, payload) = dispatch(
            router,
            "POST",
            "/api/v1/applications/app-http/checklist",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.get("status").and_then(Value::as_str), Some("ready"));
        assert_eq!(
            payload
                .get("items")
                .and_then(Value::as_array)
                .map(|items| items.len()),
            Some(12)
        );
    }

    #[tokio::test]
    async fn get_peeks_without_claiming() {
        let gateway = Arc::new(ScriptedGateway::with_responses(vec![Ok(model_response(
            12,
        ))]));
        let (gate, _) = build_gate(gateway.clone(), "GB", "student");
        let router = checklist_router(gate);

        let (status, payload) = dispatch(
            router.clone(),
            "GET",
            "/api/v1/applications/app-peek/checklist",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(payload.get("error").is_some());
        assert_eq!(gateway.calls(), 0);

        let (status, _) = dispatch(
            router.clone(),
            "POST",
            "/api/v1/applications/app-peek/checklist",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, payload) = dispatch(
            router,
            "GET",
            "/api/v1/applications/app-peek/checklist",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.get("status").and_then(Value::as_str), Some("ready"));
    }

    #[tokio::test]
    async fn store_outage_maps_to_service_unavailable() {
        let gateway = Arc::new(ScriptedGateway::with_responses(vec![Ok(model_response(
            12,
        ))]));
        let gate = Arc::new(ChecklistRequestGate::new(
            Arc::new(FailingStore),
            Arc::new(FixedContexts::new("GB", "student")),
            AiChecklistGenerator::new(gateway),
            Arc::new(FallbackChecklistProvider::builtin().expect("builtin table loads")),
        ));
        let router = checklist_router(gate);

        let (status, payload) = dispatch(
            router,
            "POST",
            "/api/v1/applications/app-down/checklist",
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(payload
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .contains("unavailable"));
    }
}
