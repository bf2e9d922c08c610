use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::ServiceError;
use crate::service::{AnalysisRequest, GenerativeService, ImageRequest, TextRequest};
use crate::workbench::BusyFlag;

type Scripted = Mutex<VecDeque<Result<String, ServiceError>>>;

/// Records every request and replays scripted results in order.
///
/// An exhausted script answers with an empty-response error.
#[derive(Default)]
pub(crate) struct FakeService {
    text_results: Scripted,
    image_results: Scripted,
    analysis_results: Scripted,
    text_requests: Mutex<Vec<TextRequest>>,
    image_requests: Mutex<Vec<ImageRequest>>,
    analysis_requests: Mutex<Vec<AnalysisRequest>>,
    watched_busy: Mutex<Option<BusyFlag>>,
    busy_during_calls: Mutex<Vec<bool>>,
}

impl FakeService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_text(self, result: Result<String, ServiceError>) -> Self {
        push(&self.text_results, result);
        self
    }

    pub(crate) fn with_image(self, result: Result<String, ServiceError>) -> Self {
        push(&self.image_results, result);
        self
    }

    pub(crate) fn with_analysis(self, result: Result<String, ServiceError>) -> Self {
        push(&self.analysis_results, result);
        self
    }

    /// Samples `flag` at the start of every later call.
    pub(crate) fn watch_busy(&self, flag: BusyFlag) {
        *self.watched_busy.lock().expect("lock") = Some(flag);
    }

    pub(crate) fn busy_during_calls(&self) -> Vec<bool> {
        self.busy_during_calls.lock().expect("lock").clone()
    }

    fn sample_busy(&self) {
        if let Some(flag) = self.watched_busy.lock().expect("lock").as_ref() {
            self.busy_during_calls
                .lock()
                .expect("lock")
                .push(flag.is_set());
        }
    }

    pub(crate) fn text_requests(&self) -> Vec<TextRequest> {
        self.text_requests.lock().expect("lock").clone()
    }

    pub(crate) fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.lock().expect("lock").clone()
    }

    pub(crate) fn analysis_requests(&self) -> Vec<AnalysisRequest> {
        self.analysis_requests.lock().expect("lock").clone()
    }
}

fn push(script: &Scripted, result: Result<String, ServiceError>) {
    script.lock().expect("lock").push_back(result);
}

fn next(script: &Scripted, what: &'static str) -> Result<String, ServiceError> {
    script
        .lock()
        .expect("lock")
        .pop_front()
        .unwrap_or(Err(ServiceError::Empty {
            provider: "Fake",
            what,
        }))
}

impl GenerativeService for FakeService {
    fn generate_text(&self, request: &TextRequest) -> Result<String, ServiceError> {
        self.sample_busy();
        self.text_requests.lock().expect("lock").push(request.clone());
        next(&self.text_results, "text")
    }

    fn generate_image(&self, request: &ImageRequest) -> Result<String, ServiceError> {
        self.sample_busy();
        self.image_requests.lock().expect("lock").push(request.clone());
        next(&self.image_results, "images")
    }

    fn analyze_image(&self, request: &AnalysisRequest) -> Result<String, ServiceError> {
        self.sample_busy();
        self.analysis_requests
            .lock()
            .expect("lock")
            .push(request.clone());
        next(&self.analysis_results, "text")
    }
}
