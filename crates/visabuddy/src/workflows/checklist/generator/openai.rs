use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::runtime::Runtime;

use crate::config::AiConfig;

use super::super::context::PromptContext;
use super::{AiTransportError, CompletionGateway};

/// Instructions pinned to every checklist completion so the response matches
/// the schema the parser expects.
const SYSTEM_PROMPT: &str = "You are VisaBuddy, a visa document assistant. \
Respond with JSON only, no additional text, matching: \
{\"type\":\"checklist\",\"visaType\":\"...\",\"country\":\"...\",\"checklist\":[{\"documentType\":\"...\",\"category\":\"required|highly_recommended|optional\",\"label\":\"...\",\"description\":\"...\"}],\"notes\":[]} \
List between 10 and 16 documents, including required, highly recommended, and country-specific ones.";

/// Thin wrapper around an OpenAI-compatible chat completion endpoint allowing
/// the synchronous gate to call the model without exposing async details.
pub struct OpenAiCompletionClient {
    http: Client,
    runtime: Runtime,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAiCompletionClient {
    pub fn from_config(config: &AiConfig) -> Result<Self, AiTransportError> {
        let runtime = Runtime::new().map_err(|err| AiTransportError::Backend(err.to_string()))?;
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| AiTransportError::Backend(err.to_string()))?;

        Ok(Self {
            http,
            runtime,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> AiTransportError {
        if err.is_timeout() {
            AiTransportError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            AiTransportError::Backend(err.to_string())
        }
    }
}

impl std::fmt::Debug for OpenAiCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletionClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl CompletionGateway for OpenAiCompletionClient {
    fn complete(&self, context: &PromptContext) -> Result<String, AiTransportError> {
        let body = json!({
            "model": self.model,
            "temperature": 0.3,
            "max_tokens": 2000,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_message(context) },
            ],
        });

        let completion = self
            .runtime
            .block_on(async {
                self.http
                    .post(format!("{}/chat/completions", self.base_url))
                    .bearer_auth(&self.api_key)
                    .json(&body)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<ChatCompletion>()
                    .await
            })
            .map_err(|err| self.map_error(err))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiTransportError::Backend("completion returned no choices".to_string()))
    }
}

fn user_message(context: &PromptContext) -> String {
    format!(
        "Destination country: {}\nVisa type: {}\nApplicant summary: {}\n\n\
         Create the full document checklist for this applicant.",
        context.country_code,
        context.visa_type,
        if context.applicant_summary.is_empty() {
            "not provided"
        } else {
            &context.applicant_summary
        },
    )
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}
