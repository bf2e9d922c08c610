use promptsmith_contracts::models::AspectRatio;

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// Base64-encoded image bytes.
    pub image_base64: String,
    pub mime_type: String,
    pub question: String,
}

/// The three request/response capabilities of the remote model API.
pub trait GenerativeService: Send + Sync {
    fn generate_text(&self, request: &TextRequest) -> Result<String, ServiceError>;

    /// Returns the generated image as base64.
    fn generate_image(&self, request: &ImageRequest) -> Result<String, ServiceError>;

    fn analyze_image(&self, request: &AnalysisRequest) -> Result<String, ServiceError>;
}
