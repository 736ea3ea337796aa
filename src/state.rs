use serde_json::Value as JsonValue;

use crate::client::{Outcome, SubmitError};
use crate::data::model::{SpectrumPoint, TabFile};
use crate::data::preset::{self, FilterPreset, InvalidLevel};
use crate::data::request::{self, UploadRequest, ValidationError};
use crate::data::response;

// ---------------------------------------------------------------------------
// Session snapshot
// ---------------------------------------------------------------------------

/// Where the session is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Everything the UI renders, independent of rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub phase: Phase,
    /// Spectrum of the last successful response, if it carried one.
    pub spectrum: Option<Vec<SpectrumPoint>>,
    pub conclusion: String,
    pub loading: bool,
    pub error: Option<String>,
}

/// Inputs to [`transition`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A request was built and handed to the transport.
    Started,
    /// The submission was refused before reaching the transport.
    Rejected(String),
    Responded(JsonValue),
    Failed(SubmitError),
}

/// Pure state transition: the next snapshot for `event`.
pub fn transition(state: &SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::Started => SessionState {
            phase: Phase::Submitting,
            loading: true,
            ..SessionState::default()
        },
        // Earlier results stay on screen; only the banner changes. A request
        // already in flight keeps running and will still land.
        SessionEvent::Rejected(message) if state.phase == Phase::Submitting => SessionState {
            error: Some(message),
            ..state.clone()
        },
        SessionEvent::Rejected(message) => SessionState {
            phase: Phase::Failed,
            loading: false,
            error: Some(message),
            ..state.clone()
        },
        SessionEvent::Responded(raw) => {
            let normalized = response::normalize(&raw);
            SessionState {
                phase: Phase::Succeeded,
                spectrum: normalized.spectrum,
                conclusion: normalized.conclusion,
                loading: false,
                error: None,
            }
        }
        SessionEvent::Failed(err) => SessionState {
            phase: Phase::Failed,
            loading: false,
            error: Some(format!("Error processing file: {}", err.user_message())),
            ..state.clone()
        },
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Identifies one submission. Later submissions get larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// A request the caller must send, tagged with its id.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: RequestId,
    pub request: UploadRequest,
}

/// Owns the current snapshot and the preset selection, and decides which
/// completions are still wanted.
pub struct SessionController {
    state: SessionState,
    selected: &'static FilterPreset,
    next_id: u64,
    /// Id of the newest submission; anything else is stale.
    current: Option<RequestId>,
}

impl SessionController {
    pub fn new(default_level: i64) -> Result<Self, InvalidLevel> {
        Ok(Self {
            state: SessionState::default(),
            selected: preset::get(default_level)?,
            next_id: 0,
            current: None,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selected_level(&self) -> i64 {
        i64::from(self.selected.level)
    }

    pub fn selected_preset(&self) -> &'static FilterPreset {
        self.selected
    }

    /// Choose the preset for the next submission. In-flight requests keep the
    /// values they were built with.
    pub fn select_preset(&mut self, level: i64) -> Result<(), InvalidLevel> {
        self.selected = preset::get(level)?;
        Ok(())
    }

    /// Start a submission for `file` with the selected preset.
    ///
    /// A file that fails validation never gets an id, so it leaves any request
    /// already in flight current.
    pub fn select_file(&mut self, file: TabFile) -> Result<Submission, ValidationError> {
        let request = match request::build(file, self.selected_level()) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Rejected submission: {e}");
                self.apply(SessionEvent::Rejected(e.to_string()));
                return Err(e);
            }
        };
        log::info!(
            "Submitting {} ({} bytes) with preset {}",
            request.file.name,
            request.file.len(),
            request.preset_name
        );
        let id = self.issue_id();
        self.apply(SessionEvent::Started);
        Ok(Submission { id, request })
    }

    /// Report a problem found before a request could be built, such as an
    /// unreadable file.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.apply(SessionEvent::Rejected(message.into()));
    }

    /// Apply the outcome of submission `id`. Returns `false` and leaves the
    /// state untouched when `id` is not the newest submission.
    pub fn complete(&mut self, id: RequestId, outcome: Outcome) -> bool {
        if self.current != Some(id) || self.state.phase != Phase::Submitting {
            log::debug!("Discarding stale result for {id:?}");
            return false;
        }
        let event = match outcome {
            Ok(raw) => {
                log::info!("Submission {id:?} succeeded");
                SessionEvent::Responded(raw)
            }
            Err(e) => {
                log::error!("Submission {id:?} failed: {e}");
                SessionEvent::Failed(e)
            }
        };
        self.apply(event);
        true
    }

    fn issue_id(&mut self) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.current = Some(id);
        id
    }

    fn apply(&mut self, event: SessionEvent) {
        self.state = transition(&self.state, event);
    }
}
