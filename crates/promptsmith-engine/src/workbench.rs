use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use promptsmith_contracts::collections::{FewShotLibrary, Gallery, GeneratedImageData};
use promptsmith_contracts::models::{AspectRatio, ModelSelection, TargetModel};
use promptsmith_contracts::store::LocalStore;
use promptsmith_contracts::validation::ValidationError;

use crate::error::{error_chain_text, ActionError};
use crate::service::GenerativeService;
use crate::{imaging, optimizer};

/// Raised while a remote call is in flight.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn begin(&self) -> BusyGuard {
        self.0.store(true, Ordering::SeqCst);
        BusyGuard(Arc::clone(&self.0))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Clears the flag on drop, on success and failure alike.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Prompt, model selection and last results of one working session.
pub struct Workbench {
    service: Arc<dyn GenerativeService>,
    selection: ModelSelection,
    prompt: String,
    optimized: Option<String>,
    last_image: Option<GeneratedImageData>,
    last_analysis: Option<String>,
    last_error: Option<String>,
    busy: BusyFlag,
    examples: FewShotLibrary,
    gallery: Gallery,
}

impl Workbench {
    pub fn new(service: Arc<dyn GenerativeService>, store: LocalStore) -> Self {
        Self {
            service,
            selection: ModelSelection::new(),
            prompt: String::new(),
            optimized: None,
            last_image: None,
            last_analysis: None,
            last_error: None,
            busy: BusyFlag::default(),
            examples: FewShotLibrary::load(store.clone()),
            gallery: Gallery::load(store),
        }
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    /// Returns whether `model` is selected afterwards.
    pub fn toggle_model(&mut self, model: TargetModel) -> bool {
        self.selection.toggle(model)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn optimized_prompt(&self) -> Option<&str> {
        self.optimized.as_deref()
    }

    pub fn last_image(&self) -> Option<&GeneratedImageData> {
        self.last_image.as_ref()
    }

    pub fn last_analysis(&self) -> Option<&str> {
        self.last_analysis.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn busy(&self) -> &BusyFlag {
        &self.busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    pub fn examples(&self) -> &FewShotLibrary {
        &self.examples
    }

    pub fn examples_mut(&mut self) -> &mut FewShotLibrary {
        &mut self.examples
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    /// Rewrites the current prompt for the selected models.
    pub fn optimize(&mut self) -> Result<String, ActionError> {
        self.last_error = None;
        if self.prompt.trim().is_empty() || self.selection.is_empty() {
            return self.record(Err(ValidationError::MissingPromptOrModels.into()));
        }
        self.optimized = None;
        let result = {
            let _busy = self.busy.begin();
            optimizer::optimize_prompt(
                self.service.as_ref(),
                &self.prompt,
                self.selection.models(),
                self.examples.list(),
            )
        };
        let optimized = self.record(result)?;
        self.optimized = Some(optimized.clone());
        Ok(optimized)
    }

    /// Generates an image from `prompt` and adds it to the gallery.
    pub fn generate_image(
        &mut self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImageData, ActionError> {
        self.last_error = None;
        self.last_image = None;
        let result = {
            let _busy = self.busy.begin();
            imaging::generate_image(self.service.as_ref(), prompt, aspect_ratio)
        };
        let image_data = self.record(result)?;
        let stored = self.gallery.add(image_data, prompt.trim(), aspect_ratio);
        let image = self.record(stored.map_err(ActionError::from))?;
        self.last_image = Some(image.clone());
        Ok(image)
    }

    /// Uses the last optimized prompt as the image prompt.
    pub fn generate_image_from_optimized(
        &mut self,
        aspect_ratio: AspectRatio,
    ) -> Result<GeneratedImageData, ActionError> {
        let Some(prompt) = self.optimized.clone() else {
            self.last_error = None;
            return self.record(Err(ValidationError::NoOptimizedPrompt.into()));
        };
        self.generate_image(&prompt, aspect_ratio)
    }

    /// Asks `question` about raw image bytes of type `mime_type`.
    pub fn analyze_image(
        &mut self,
        image_bytes: &[u8],
        mime_type: &str,
        question: &str,
    ) -> Result<String, ActionError> {
        self.last_error = None;
        self.last_analysis = None;
        let encoded = imaging::encode_image_bytes(image_bytes);
        let result = {
            let _busy = self.busy.begin();
            imaging::analyze_image(self.service.as_ref(), &encoded, mime_type, question)
        };
        let answer = self.record(result)?;
        self.last_analysis = Some(answer.clone());
        Ok(answer)
    }

    fn record<T>(&mut self, result: Result<T, ActionError>) -> Result<T, ActionError> {
        if let Err(err) = &result {
            let message = error_chain_text(err);
            if err.is_validation() {
                log::debug!("{message}");
            } else {
                log::error!("{message}");
            }
            self.last_error = Some(message);
        }
        result
    }
}
