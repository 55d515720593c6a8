//! Google Gemini client for one-shot security advice.
//!
//! Uses the non-streaming `models/{model}:generateContent` endpoint: each chat
//! submission is a single user turn with the ShieldGuard persona supplied as
//! `system_instruction`.

use std::time::Duration;

use serde_json::{Value, json};

use shieldguard_types::{ApiKey, ModelName};

use crate::{
    AdvisoryError, AdvisoryService, FALLBACK_ADVICE, GEMINI_API_BASE_URL, http_client,
    read_capped_error_body,
};

/// Persona and safety policy sent with every request.
pub const SYSTEM_INSTRUCTION: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/system_instruction.md"
));

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolved settings for [`GeminiAdvisor`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` degrades every request to the fallback text.
    pub api_key: Option<ApiKey>,
    pub model: ModelName,
    /// API root without trailing slash, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: String,
    pub temperature: f32,
    pub system_instruction: String,
    /// Total per-request timeout.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: ModelName::advisor_default(),
            base_url: GEMINI_API_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<ApiKey>) -> Self {
        self.api_key = api_key;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Build the request body for the GenerateContent API.
///
/// Note: Gemini API uses mixed casing:
/// - `system_instruction` (snake_case)
/// - `generationConfig` (camelCase)
/// - `contents` (lowercase)
fn build_request_body(prompt: &str, config: &GeminiConfig) -> Value {
    let mut body = serde_json::Map::new();
    body.insert(
        "contents".into(),
        json!([{
            "role": "user",
            "parts": [{ "text": prompt }]
        }]),
    );

    if !config.system_instruction.trim().is_empty() {
        body.insert(
            "system_instruction".into(),
            json!({
                "parts": [{ "text": config.system_instruction }]
            }),
        );
    }

    body.insert(
        "generationConfig".into(),
        json!({ "temperature": config.temperature }),
    );

    Value::Object(body)
}

/// Typed GenerateContent response.
mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Response {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
        pub prompt_feedback: Option<PromptFeedback>,
        pub error: Option<ErrorInfo>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Candidate {
        pub content: Option<Content>,
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Content {
        #[serde(default)]
        pub parts: Vec<Part>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Part {
        pub text: Option<String>,
        /// Thinking output, never shown to the user.
        #[serde(default)]
        pub thought: bool,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PromptFeedback {
        pub block_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct ErrorInfo {
        pub message: Option<String>,
    }
}

fn extract_text(response: wire::Response) -> Result<String, AdvisoryError> {
    if let Some(error) = response.error {
        return Err(AdvisoryError::Api(
            error.message.unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AdvisoryError::Blocked(reason));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(AdvisoryError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason.as_deref() {
        Some("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT") => Err(AdvisoryError::Blocked(
            candidate.finish_reason.unwrap_or_default(),
        )),
        _ => Err(AdvisoryError::EmptyResponse),
    }
}

/// Gemini-backed [`AdvisoryService`].
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    config: GeminiConfig,
    client: Option<reqwest::Client>,
}

impl GeminiAdvisor {
    /// Build an advisor with the hardened HTTPS client.
    ///
    /// Never fails: a client build error is logged and the advisor answers
    /// every prompt with the fallback text.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        let client = match http_client() {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!("Failed to build HTTP client for Gemini: {e}");
                None
            }
        };
        if config.api_key.is_none() {
            tracing::warn!("No Gemini API key configured; advisor will answer with fallback text");
        }
        Self { config, client }
    }

    /// Build an advisor around a caller-supplied client.
    #[must_use]
    pub fn with_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            client: Some(client),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send `prompt` and return the generated text, surfacing every failure.
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(AdvisoryError::MissingApiKey)?;
        let client = self
            .client
            .as_ref()
            .ok_or(AdvisoryError::ClientUnavailable)?;

        let body = build_request_body(prompt, &self.config);
        tracing::debug!(model = %self.config.model, chars = prompt.len(), "Sending advice request");

        let response = client
            .post(self.config.endpoint())
            .header("x-goog-api-key", api_key.as_str())
            .header("content-type", "application/json")
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            return Err(AdvisoryError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let parsed: wire::Response = serde_json::from_slice(&bytes)?;
        extract_text(parsed)
    }
}

impl AdvisoryService for GeminiAdvisor {
    async fn get_advice(&self, prompt: &str) -> String {
        match self.generate(prompt).await {
            Ok(text) => text,
            Err(e) if e.is_configuration() => {
                tracing::warn!("Gemini advisor unavailable: {e}");
                FALLBACK_ADVICE.to_string()
            }
            Err(e) => {
                tracing::error!("Gemini API error: {e}");
                FALLBACK_ADVICE.to_string()
            }
        }
    }
}
