pub mod error;
pub mod gemini;
pub mod imaging;
pub mod optimizer;
pub mod service;
pub mod workbench;

pub use error::{error_chain_text, ActionError, ServiceError};
pub use gemini::{GeminiClient, GeminiConfig};
pub use service::{AnalysisRequest, GenerativeService, ImageRequest, TextRequest};
pub use workbench::{BusyFlag, Workbench};

#[cfg(test)]
pub(crate) mod testing;
