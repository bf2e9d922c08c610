use std::env;
use std::time::Duration;

use anyhow::Context;
use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use serde_json::{json, Map, Value};

use crate::error::ServiceError;
use crate::service::{AnalysisRequest, GenerativeService, ImageRequest, TextRequest};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const IMAGE_OUTPUT_MIME: &str = "image/jpeg";

const PROVIDER_GEMINI: &str = "Gemini";
const PROVIDER_IMAGEN: &str = "Imagen";

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub text_model: String,
    pub image_model: String,
    /// `None` leaves requests without a deadline.
    pub request_timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout: None,
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: non_empty_env("GEMINI_API_BASE")
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            api_key: non_empty_env("GEMINI_API_KEY")
                .or_else(|| non_empty_env("GOOGLE_API_KEY"))
                .or_else(|| non_empty_env("API_KEY")),
            text_model: non_empty_env("PROMPTSMITH_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: non_empty_env("PROMPTSMITH_IMAGE_MODEL")
                .unwrap_or(defaults.image_model),
            request_timeout: non_empty_env("PROMPTSMITH_REQUEST_TIMEOUT_SECS")
                .and_then(|raw| parse_timeout_secs(&raw)),
        }
    }
}

/// Blocking client for the Gemini REST API.
pub struct GeminiClient {
    config: GeminiConfig,
    http: HttpClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> anyhow::Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, ServiceError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ServiceError::MissingApiKey)
    }

    fn endpoint_for_model(&self, model: &str, method: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:{}", self.config.api_base, model_path, method)
    }

    fn post_json(
        &self,
        provider: &'static str,
        endpoint: &str,
        payload: &Value,
    ) -> Result<Value, ServiceError> {
        let api_key = self.api_key()?;
        log::debug!("{provider} request -> {endpoint}");
        let response = self
            .http
            .post(endpoint)
            .query(&[("key", api_key)])
            .json(payload)
            .send()
            .map_err(|source| ServiceError::Transport {
                provider,
                endpoint: endpoint.to_string(),
                source,
            })?;
        response_json_or_error(provider, endpoint, response)
    }

    pub(crate) fn text_payload(request: &TextRequest) -> Value {
        let mut payload = Map::new();
        payload.insert(
            "contents".to_string(),
            json!([{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }]),
        );
        if let Some(instruction) = request.system_instruction.as_ref() {
            payload.insert(
                "systemInstruction".to_string(),
                json!({ "parts": [{ "text": instruction }] }),
            );
        }
        let mut generation_config = Map::new();
        if let Some(temperature) = request.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(top_p) = request.top_p {
            generation_config.insert("topP".to_string(), json!(top_p));
        }
        if !generation_config.is_empty() {
            payload.insert(
                "generationConfig".to_string(),
                Value::Object(generation_config),
            );
        }
        Value::Object(payload)
    }

    pub(crate) fn image_payload(request: &ImageRequest) -> Value {
        json!({
            "instances": [{
                "prompt": request.prompt,
            }],
            "parameters": {
                "sampleCount": 1,
                "outputOptions": { "mimeType": IMAGE_OUTPUT_MIME },
                "aspectRatio": request.aspect_ratio.as_str(),
            },
        })
    }

    pub(crate) fn analysis_payload(request: &AnalysisRequest) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": request.mime_type,
                            "data": request.image_base64,
                        }
                    },
                    { "text": request.question },
                ],
            }],
        })
    }

    /// Concatenated text parts of the first candidate.
    pub(crate) fn extract_text(response_payload: &Value) -> Result<String, ServiceError> {
        let parts = response_payload
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .and_then(|candidate| candidate.get("content"))
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut text = String::new();
        let mut found = false;
        for part in parts {
            if part.get("thought").and_then(Value::as_bool).unwrap_or(false) {
                continue;
            }
            if let Some(chunk) = part.get("text").and_then(Value::as_str) {
                text.push_str(chunk);
                found = true;
            }
        }
        if found {
            return Ok(text);
        }
        if let Some(reason) = response_payload
            .get("promptFeedback")
            .and_then(|feedback| feedback.get("blockReason"))
            .and_then(Value::as_str)
        {
            return Err(ServiceError::Blocked {
                provider: PROVIDER_GEMINI,
                reason: reason.to_string(),
            });
        }
        Err(ServiceError::Empty {
            provider: PROVIDER_GEMINI,
            what: "text",
        })
    }

    pub(crate) fn extract_image(response_payload: &Value) -> Result<String, ServiceError> {
        let predictions = response_payload
            .get("predictions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut filtered_reason: Option<String> = None;
        for row in predictions {
            let data = row
                .get("bytesBase64Encoded")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !data.is_empty() {
                return Ok(data.to_string());
            }
            if let Some(reason) = row.get("raiFilteredReason").and_then(Value::as_str) {
                filtered_reason.get_or_insert_with(|| reason.to_string());
            }
        }
        if let Some(reason) = filtered_reason {
            return Err(ServiceError::Blocked {
                provider: PROVIDER_IMAGEN,
                reason,
            });
        }
        Err(ServiceError::Empty {
            provider: PROVIDER_IMAGEN,
            what: "images",
        })
    }
}

impl GenerativeService for GeminiClient {
    fn generate_text(&self, request: &TextRequest) -> Result<String, ServiceError> {
        let endpoint = self.endpoint_for_model(&self.config.text_model, "generateContent");
        let response_payload =
            self.post_json(PROVIDER_GEMINI, &endpoint, &Self::text_payload(request))?;
        Self::extract_text(&response_payload)
    }

    fn generate_image(&self, request: &ImageRequest) -> Result<String, ServiceError> {
        let endpoint = self.endpoint_for_model(&self.config.image_model, "predict");
        let response_payload =
            self.post_json(PROVIDER_IMAGEN, &endpoint, &Self::image_payload(request))?;
        Self::extract_image(&response_payload)
    }

    fn analyze_image(&self, request: &AnalysisRequest) -> Result<String, ServiceError> {
        let endpoint = self.endpoint_for_model(&self.config.text_model, "generateContent");
        let response_payload =
            self.post_json(PROVIDER_GEMINI, &endpoint, &Self::analysis_payload(request))?;
        Self::extract_text(&response_payload)
    }
}

fn response_json_or_error(
    provider: &'static str,
    endpoint: &str,
    response: HttpResponse,
) -> Result<Value, ServiceError> {
    let status = response.status();
    let body = response.text().map_err(|source| ServiceError::Transport {
        provider,
        endpoint: endpoint.to_string(),
        source,
    })?;
    if !status.is_success() {
        return Err(ServiceError::Status {
            provider,
            status: status.as_u16(),
            body: api_error_message(&body),
        });
    }
    serde_json::from_str(&body).map_err(|source| ServiceError::InvalidPayload { provider, source })
}

/// `error.message` from a Google API error body, else the truncated body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| truncate_text(body.trim(), 512))
}

fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}

/// Positive, representable seconds; anything else means no timeout.
fn parse_timeout_secs(raw: &str) -> Option<Duration> {
    let secs = raw.trim().parse::<f64>().ok().filter(|secs| *secs > 0.0)?;
    match Duration::try_from_secs_f64(secs) {
        Ok(timeout) => Some(timeout),
        Err(err) => {
            log::warn!("ignoring request timeout '{raw}': {err}");
            None
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
