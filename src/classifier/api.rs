//! Gemini `generateContent` client for satellite image classification.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{AnalysisError, AnalysisFailure, Classifier, ImagePayload};
use crate::config::{ClassifierSettings, NetworkSettings};
use crate::http_client::{self, RetryConfig};
use crate::scan::{AnalysisResult, DisasterCategory};

/// Fallback variable consulted when the configured key variable is unset.
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";

const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
const MAX_ERROR_BODY_CHARS: usize = 512;

const INSTRUCTION: &str = "Analyze this satellite image for environmental disasters. \
Identify if it shows a Forest Fire (smoke plumes, active flame fronts, burn scars), \
a Tsunami (coastal inundation, massive receding water, destroyed infrastructure), \
or if it is a Normal landscape (standard urban, forest, or ocean patterns).";

/// Invalid classifier settings detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierSetupError {
    #[error("Invalid classifier endpoint {endpoint}: {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("Classifier endpoint must use http or https: {0}")]
    Scheme(String),
    #[error("Classifier model name is empty")]
    EmptyModel,
}

/// Where the API key comes from.
#[derive(Clone, Debug)]
enum ApiKey {
    /// Read from this environment variable on every request.
    Env(String),
    Fixed(String),
}

/// Blocking client for the Gemini vision model.
#[derive(Clone, Debug)]
pub struct GeminiClassifier {
    url: String,
    api_key: ApiKey,
    retry: RetryConfig,
}

impl GeminiClassifier {
    /// Build a client from persisted settings, validating the endpoint.
    pub fn new(
        settings: &ClassifierSettings,
        network: &NetworkSettings,
    ) -> Result<Self, ClassifierSetupError> {
        let endpoint = settings.endpoint.trim().trim_end_matches('/');
        let parsed = url::Url::parse(endpoint).map_err(|source| ClassifierSetupError::Endpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClassifierSetupError::Scheme(endpoint.to_string()));
        }
        let model = settings.model.trim();
        if model.is_empty() {
            return Err(ClassifierSetupError::EmptyModel);
        }
        Ok(Self {
            url: format!("{endpoint}/models/{model}:generateContent"),
            api_key: ApiKey::Env(settings.api_key_env.clone()),
            retry: network.retry_config(),
        })
    }

    /// Use a fixed key instead of reading the environment.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::Fixed(key.into());
        self
    }

    /// Full `generateContent` URL this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Startup hint shown when no key can be found in the environment.
    pub fn missing_api_key_warning(&self) -> Option<String> {
        match self.resolve_api_key() {
            Ok(_) => None,
            Err(_) => Some(missing_key_message(&self.api_key)),
        }
    }

    fn resolve_api_key(&self) -> Result<String, AnalysisFailure> {
        resolve_key_with(&self.api_key, |name| std::env::var(name).ok())
    }

    fn post_once(&self, api_key: &str, body: &serde_json::Value) -> Result<String, AnalysisFailure> {
        let request = http_client::agent()
            .post(&self.url)
            .set("Accept", "application/json")
            .set("Content-Type", "application/json")
            .set("x-goog-api-key", api_key);
        let response = match request.send_json(body) {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = http_client::read_body_text(response, MAX_RESPONSE_BYTES)
                    .unwrap_or_else(|err| err.to_string());
                return Err(AnalysisFailure::Status {
                    code,
                    body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
                });
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(AnalysisFailure::Transport(err.to_string()));
            }
        };
        http_client::read_body_text(response, MAX_RESPONSE_BYTES)
            .map_err(|err| AnalysisFailure::Response(err.to_string()))
    }
}

impl Classifier for GeminiClassifier {
    fn analyze(&self, image: &ImagePayload) -> Result<AnalysisResult, AnalysisError> {
        let outcome = self.resolve_api_key().and_then(|api_key| {
            let body = build_request(image);
            let text = http_client::retry_with_backoff(
                self.retry,
                || self.post_once(&api_key, &body),
                |err: &AnalysisFailure| {
                    let retry = err.is_retryable();
                    if retry {
                        tracing::warn!("Classifier request failed, retrying: {err}");
                    }
                    retry
                },
            )?;
            parse_generate_response(&text)
        });
        match outcome {
            Ok(result) => {
                tracing::info!(
                    category = %result.category(),
                    confidence = result.confidence(),
                    "Satellite image classified"
                );
                Ok(result)
            }
            Err(cause) => {
                tracing::error!("Analysis failed: {cause}");
                Err(AnalysisError::from(cause))
            }
        }
    }
}

fn resolve_key_with(
    api_key: &ApiKey,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, AnalysisFailure> {
    let var = match api_key {
        ApiKey::Fixed(key) => return Ok(key.clone()),
        ApiKey::Env(var) => var,
    };
    [var.as_str(), LEGACY_API_KEY_ENV]
        .into_iter()
        .filter_map(&lookup)
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| AnalysisFailure::MissingApiKey(var.clone()))
}

fn missing_key_message(api_key: &ApiKey) -> String {
    match api_key {
        ApiKey::Env(var) if var != LEGACY_API_KEY_ENV => {
            format!("No Gemini API key found. Set {var} or {LEGACY_API_KEY_ENV} and restart.")
        }
        _ => format!("No Gemini API key found. Set {LEGACY_API_KEY_ENV} and restart."),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPart<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

/// Request body: the image, the instruction and a schema-constrained JSON reply.
fn build_request(image: &ImagePayload) -> serde_json::Value {
    let parts = [
        RequestPart {
            inline_data: Some(InlineData {
                mime_type: image.mime_type(),
                data: image.base64_data(),
            }),
            text: None,
        },
        RequestPart {
            inline_data: None,
            text: Some(INSTRUCTION),
        },
    ];
    json!({
        "contents": [{ "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
        },
    })
}

fn response_schema() -> serde_json::Value {
    let labels: Vec<&str> = DisasterCategory::CLASSIFIED
        .iter()
        .map(|category| category.as_str())
        .collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "category": {
                "type": "STRING",
                "description": format!("The classification: {}", labels.join(", ")),
            },
            "confidence": {
                "type": "NUMBER",
                "description": "Confidence score between 0 and 1",
            },
            "reasoning": {
                "type": "STRING",
                "description": "Detailed explanation of why this classification was chosen.",
            },
            "detectedFeatures": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Key visual indicators found in the image.",
            },
            "recommendedAction": {
                "type": "STRING",
                "description": "Suggested emergency response action.",
            },
        },
        "required": ["category", "confidence", "reasoning", "detectedFeatures", "recommendedAction"],
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Structured reply. Every field is required.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisWire {
    category: String,
    confidence: f64,
    reasoning: String,
    detected_features: Vec<String>,
    recommended_action: String,
}

fn parse_generate_response(body: &str) -> Result<AnalysisResult, AnalysisFailure> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(AnalysisFailure::Response("Empty response body".to_string()));
    }
    let response: GenerateContentResponse = serde_json::from_str(trimmed).map_err(|err| {
        AnalysisFailure::Response(format!(
            "{err}: {}",
            truncate_chars(trimmed, MAX_ERROR_BODY_CHARS)
        ))
    })?;
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(AnalysisFailure::Response(format!("Request rejected: {reason}")));
    };
    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(AnalysisFailure::Response(format!(
            "Candidate has no text (finish reason: {reason})"
        )));
    }
    parse_analysis_text(&text)
}

fn parse_analysis_text(text: &str) -> Result<AnalysisResult, AnalysisFailure> {
    let json_text = strip_code_fence(text);
    let wire: AnalysisWire = serde_json::from_str(json_text)
        .map_err(|err| AnalysisFailure::Schema(err.to_string()))?;
    let category = DisasterCategory::from_label(&wire.category);
    if category == DisasterCategory::Unknown {
        tracing::warn!(label = %wire.category, "Classifier returned an unexpected category");
    }
    AnalysisResult::new(
        category,
        wire.confidence,
        wire.reasoning,
        wire.detected_features,
        wire.recommended_action,
    )
    .map_err(|err| AnalysisFailure::Schema(err.to_string()))
}

/// Models occasionally wrap JSON in a markdown fence despite the MIME hint.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}…", &text[..index]),
        None => text.to_string(),
    }
}
