use base64::Engine as _;
use promptsmith_contracts::models::AspectRatio;
use promptsmith_contracts::validation::ValidationError;

use crate::error::ActionError;
use crate::service::{AnalysisRequest, GenerativeService, ImageRequest};

/// Generates one image and returns it as base64 JPEG data.
pub fn generate_image(
    service: &dyn GenerativeService,
    prompt: &str,
    aspect_ratio: AspectRatio,
) -> Result<String, ActionError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ValidationError::EmptyImagePrompt.into());
    }
    log::info!("generating {aspect_ratio} image");
    service
        .generate_image(&ImageRequest {
            prompt: prompt.to_string(),
            aspect_ratio,
        })
        .map_err(ActionError::GenerateImage)
}

/// Asks a question about an image. The answer is returned verbatim.
pub fn analyze_image(
    service: &dyn GenerativeService,
    image_base64: &str,
    mime_type: &str,
    question: &str,
) -> Result<String, ActionError> {
    if image_base64.is_empty() || question.trim().is_empty() {
        return Err(ValidationError::MissingImageOrQuestion.into());
    }
    log::info!("analyzing {mime_type} image ({} base64 chars)", image_base64.len());
    service
        .analyze_image(&AnalysisRequest {
            image_base64: image_base64.to_string(),
            mime_type: mime_type.to_string(),
            question: question.to_string(),
        })
        .map_err(ActionError::AnalyzeImage)
}

pub fn encode_image_bytes(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
