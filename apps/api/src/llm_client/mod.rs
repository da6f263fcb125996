/// LLM Client — the single point of entry for all Gemini calls in Prepwise.
///
/// ARCHITECTURAL RULE: No other module may call the generative-model API directly.
/// Handlers depend on the `GenerativeModel` trait; `GeminiClient` is the production backend.
///
/// Calls are single-shot: no retry, no backoff, no client-side timeout. A transport or API
/// failure is returned to the caller as-is.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Returned in place of model text when a call succeeds but carries no text payload.
pub const FALLBACK_RESPONSE: &str = "No valid response from Gemini API";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Request / response model
// ────────────────────────────────────────────────────────────────────────────

/// Base64 payload with its declared MIME type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One ordered piece of a model request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentPart {
    Text(String),
    InlineData(InlineData),
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        ContentPart::InlineData(InlineData {
            mime_type: mime_type.into(),
            data: data.into(),
        })
    }
}

/// The composed payload for a single model call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelRequest {
    pub parts: Vec<ContentPart>,
}

impl ModelRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request made of a single text part.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new().with_part(ContentPart::text(text))
    }

    pub fn with_part(mut self, part: ContentPart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_part(ContentPart::text(text))
    }

    /// Concatenation of all text parts, in order. Used for logging and tests.
    pub fn text_parts(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(t) => Some(t.as_str()),
                ContentPart::InlineData(_) => None,
            })
            .collect()
    }
}

/// What came back from the model. `text` is `None` when no candidate carried text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub text: Option<String>,
    pub finish_reason: Option<String>,
}

impl ModelResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            finish_reason: Some("STOP".to_string()),
        }
    }

    /// The response text, or `FALLBACK_RESPONSE` when there is none.
    pub fn into_text(self) -> String {
        self.text.unwrap_or_else(|| FALLBACK_RESPONSE.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The generative-model seam. Carried in `AppState` as `Arc<dyn GenerativeModel>`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, LlmError>;

    /// Calls the model and substitutes the fallback string for a missing payload.
    async fn generate_text(&self, request: &ModelRequest) -> Result<String, LlmError> {
        Ok(self.generate(request).await?.into_text())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire format (private)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<WireContent<'a>>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    role: &'a str,
    parts: &'a [ContentPart],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate. Blank text counts as absent.
    fn into_model_response(self) -> ModelResponse {
        let Some(first) = self.candidates.into_iter().next() else {
            return ModelResponse::default();
        };

        let text: String = first
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        ModelResponse {
            text: (!text.trim().is_empty()).then_some(text),
            finish_reason: first.finish_reason,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![WireContent {
                role: "user",
                parts: &request.parts,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, body);
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        let model_response = parsed.into_model_response();
        if model_response.text.is_none() {
            warn!(
                "Gemini response carried no text (finish_reason={:?})",
                model_response.finish_reason
            );
        }
        Ok(model_response)
    }
}
