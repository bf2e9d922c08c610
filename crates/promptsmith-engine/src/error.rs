use std::error::Error as StdError;

use promptsmith_contracts::validation::ValidationError;
use thiserror::Error;

/// Failure talking to the generative service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("GEMINI_API_KEY or GOOGLE_API_KEY or API_KEY not set")]
    MissingApiKey,
    #[error("{provider} request failed ({endpoint})")]
    Transport {
        provider: &'static str,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} request failed ({status}): {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} returned invalid JSON payload")]
    InvalidPayload {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{provider} blocked the request: {reason}")]
    Blocked {
        provider: &'static str,
        reason: String,
    },
    #[error("{provider} returned no {what}")]
    Empty {
        provider: &'static str,
        what: &'static str,
    },
}

/// Failure of a user-facing action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to optimize prompt")]
    Optimize(#[source] ServiceError),
    #[error("Failed to generate image")]
    GenerateImage(#[source] ServiceError),
    #[error("Failed to analyze image")]
    AnalyzeImage(#[source] ServiceError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ActionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ActionError::Validation(_))
    }
}

/// Renders an error and its causes as one line, skipping repeated messages.
pub fn error_chain_text(err: &(dyn StdError + 'static)) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(cause) = current {
        let text = cause.to_string();
        let trimmed = text.trim();
        if !trimmed.is_empty()
            && !parts
                .last()
                .map(|existing| existing == trimmed)
                .unwrap_or(false)
        {
            parts.push(trimmed.to_string());
        }
        current = cause.source();
    }
    parts.join(": ")
}
