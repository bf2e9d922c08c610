use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Chat models a prompt can be optimized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetModel {
    ChatGPT,
    Claude,
    Gemini,
    Perplexity,
}

impl TargetModel {
    pub const ALL: [TargetModel; 4] = [
        TargetModel::ChatGPT,
        TargetModel::Claude,
        TargetModel::Gemini,
        TargetModel::Perplexity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetModel::ChatGPT => "ChatGPT",
            TargetModel::Claude => "Claude",
            TargetModel::Gemini => "Gemini",
            TargetModel::Perplexity => "Perplexity",
        }
    }
}

impl fmt::Display for TargetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetModel {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "chatgpt" | "gpt" | "openai" => Ok(TargetModel::ChatGPT),
            "claude" | "anthropic" => Ok(TargetModel::Claude),
            "gemini" | "google" => Ok(TargetModel::Gemini),
            "perplexity" => Ok(TargetModel::Perplexity),
            _ => Err(ValidationError::UnknownModel(raw.trim().to_string())),
        }
    }
}
