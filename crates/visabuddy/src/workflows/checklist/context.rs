use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::config::BackendConfig;

use super::domain::ApplicationId;

/// Prompt-context snapshot supplied by the questionnaire layer. Treated as
/// opaque prompt input; how it is assembled from questionnaire answers is the
/// backend's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptContext {
    pub country_code: String,
    pub visa_type: String,
    #[serde(default)]
    pub applicant_summary: String,
}

/// Collaborator resolving an application to its prompt context.
pub trait ApplicationContextProvider: Send + Sync {
    fn context(&self, application_id: &ApplicationId) -> Result<PromptContext, ContextError>;
}

/// Error enumeration for context resolution failures. All variants are
/// absorbed by the gate and resolved through the baseline fallback.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("context backend unavailable: {0}")]
    Backend(String),
    #[error("no context available for application {0}")]
    Missing(String),
}

/// Thin wrapper around the backend's internal AI-context endpoint allowing the
/// synchronous gate to fetch context without exposing async details.
pub struct BackendContextClient {
    http: Client,
    runtime: Runtime,
    base_url: String,
    auth_token: Option<String>,
}

impl BackendContextClient {
    pub fn from_config(config: &BackendConfig) -> Result<Self, ContextError> {
        let runtime = Runtime::new().map_err(|err| ContextError::Backend(err.to_string()))?;
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| ContextError::Backend(err.to_string()))?;

        Ok(Self {
            http,
            runtime,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }
}

impl std::fmt::Debug for BackendContextClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendContextClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApplicationContextProvider for BackendContextClient {
    fn context(&self, application_id: &ApplicationId) -> Result<PromptContext, ContextError> {
        let url = format!("{}/internal/ai-context/{}", self.base_url, application_id.0);

        let envelope = self
            .runtime
            .block_on(async {
                let mut request = self.http.get(&url);
                if let Some(token) = &self.auth_token {
                    request = request.bearer_auth(token);
                }
                request
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<ContextEnvelope>()
                    .await
            })
            .map_err(|err| ContextError::Backend(err.to_string()))?;

        let document = match (envelope.success, envelope.data) {
            (true, Some(document)) => document,
            _ => return Err(ContextError::Missing(application_id.0.clone())),
        };

        let summary = document
            .questionnaire_summary
            .map(|value| value.to_string())
            .unwrap_or_default();

        Ok(PromptContext {
            country_code: document.application.country,
            visa_type: document.application.visa_type,
            applicant_summary: summary,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ContextEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ContextDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextDocument {
    application: ApplicationFields,
    #[serde(default)]
    questionnaire_summary: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationFields {
    country: String,
    visa_type: String,
}
