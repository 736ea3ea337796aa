use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value as JsonValue;

use super::{Outcome, ServiceStatus, SubmitError, Transport};
use crate::data::request::UploadRequest;

/// Scripted transport for tests: replays queued outcomes in order and records
/// every request it was given.
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
    submitted: Mutex<Vec<UploadRequest>>,
    status: ServiceStatus,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            status: ServiceStatus {
                message: "Rosetta Spectrum Analyzer API".into(),
                status: "running".into(),
                openai_configured: true,
            },
        }
    }

    pub fn with_outcome(self, outcome: Outcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_response(self, body: JsonValue) -> Self {
        self.with_outcome(Ok(body))
    }

    pub fn submitted(&self) -> Vec<UploadRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn submit(&self, request: &UploadRequest) -> Outcome {
        self.submitted.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SubmitError::Transport("no scripted response".into())))
    }

    fn status(&self) -> Result<ServiceStatus, SubmitError> {
        Ok(self.status.clone())
    }
}
