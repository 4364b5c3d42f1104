use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// How the model is asked to shape its output.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMode {
    PlainText,
    Json { schema: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub output: OutputMode,
}

impl GenerationOptions {
    pub fn plain_text() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 2048,
            output: OutputMode::PlainText,
        }
    }

    /// Strict JSON output with two string fields, `category` and `answer`.
    pub fn classified_answer() -> Self {
        Self {
            output: OutputMode::Json {
                schema: json!({
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "answer": { "type": "STRING" }
                    },
                    "required": ["category", "answer"]
                }),
            },
            ..Self::plain_text()
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model quota exhausted: {0}")]
    QuotaExceeded(String),
    #[error("failed to reach model: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model request failed ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("prompt blocked by model: {0}")]
    Blocked(String),
}

/// The single outbound seam: prompt plus options in, raw text out.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, ModelError>;
}

/// Client for the Generative Language `generateContent` endpoint.
pub struct GeminiBridge {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiBridge {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}

impl<'a> From<&'a GenerationOptions> for GenerationConfig<'a> {
    fn from(options: &'a GenerationOptions) -> Self {
        let (response_mime_type, response_schema) = match &options.output {
            OutputMode::PlainText => ("text/plain", None),
            OutputMode::Json { schema } => ("application/json", Some(schema)),
        };
        Self {
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            max_output_tokens: options.max_output_tokens,
            response_mime_type,
            response_schema,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[async_trait]
impl GenerativeModel for GeminiBridge {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, ModelError> {
        let payload = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: options.into(),
        };

        debug!(model = %self.model, "calling generateContent");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            warn!(%status, "generateContent failed");
            return Err(classify_failure(status, &body));
        }

        let body: GenerateResponse = response.json().await?;
        extract_text(body)
    }
}

fn classify_failure(status: StatusCode, body: &str) -> ModelError {
    let (message, api_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.trim().to_string(), String::new()),
    };

    if status == StatusCode::TOO_MANY_REQUESTS || api_status == "RESOURCE_EXHAUSTED" {
        ModelError::QuotaExceeded(message)
    } else {
        ModelError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

fn extract_text(body: GenerateResponse) -> Result<String, ModelError> {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if !text.is_empty() {
        return Ok(text);
    }

    match body.prompt_feedback.and_then(|feedback| feedback.block_reason) {
        Some(reason) => Err(ModelError::Blocked(reason)),
        None => Err(ModelError::EmptyResponse),
    }
}
