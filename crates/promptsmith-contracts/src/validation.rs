use thiserror::Error;

/// Input problems caught before any external call is made.
///
/// Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a prompt and select at least one model.")]
    MissingPromptOrModels,
    #[error("Please enter a prompt to generate an image.")]
    EmptyImagePrompt,
    #[error("There is no optimized prompt to generate an image from yet.")]
    NoOptimizedPrompt,
    #[error("Please choose an image and enter a question about it.")]
    MissingImageOrQuestion,
    #[error("Unknown model '{0}'. Choose one of ChatGPT, Claude, Gemini, Perplexity.")]
    UnknownModel(String),
    #[error("Unsupported aspect ratio '{0}'. Choose one of 1:1, 16:9, 9:16, 4:3, 3:4.")]
    UnsupportedAspectRatio(String),
    #[error("Unknown theme '{0}'. Choose one of light, dark, gray.")]
    UnknownTheme(String),
    #[error("No prompt template matches '{0}'.")]
    UnknownTemplate(String),
}
