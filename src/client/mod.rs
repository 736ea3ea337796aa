//! Transport seam between the session and the processing service.

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpTransport;

use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::data::request::UploadRequest;
use crate::data::response;

/// Shown when neither the server nor the transport gave a reason.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Failures of a submission once it has left the client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// Connection, timeout or I/O failure; carries the transport's description.
    #[error("{0}")]
    Transport(String),

    /// Non-2xx answer; `message` is the body's `error` field when present.
    #[error("Request failed with status code {status}")]
    Server { status: u16, message: Option<String> },
}

impl SubmitError {
    /// Best available explanation: the server's own message, then the
    /// transport description, then a generic fallback.
    pub fn user_message(&self) -> String {
        let message = match self {
            SubmitError::Server {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}

/// Result of one `/process` call, as handed back to the session.
pub type Outcome = Result<JsonValue, SubmitError>;

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub openai_configured: bool,
}

impl ServiceStatus {
    pub fn summary(&self) -> String {
        let conclusions = if self.openai_configured {
            "conclusions enabled"
        } else {
            "conclusions disabled"
        };
        format!("Service {} ({conclusions})", self.status)
    }
}

/// Anything able to carry an [`UploadRequest`] to the service.
///
/// Implementations block; callers run them off the UI thread.
pub trait Transport: Send + Sync {
    fn submit(&self, request: &UploadRequest) -> Outcome;

    fn status(&self) -> Result<ServiceStatus, SubmitError>;
}

/// Pull the `error` field out of an error body, if there is one.
pub fn server_error_message(body: &str) -> Option<String> {
    let parsed: JsonValue = serde_json::from_str(body).ok()?;
    match parsed.get("error")? {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The two fields of a `/process` body the UI reads. The conclusion is kept
/// as raw text so its nesting depth does not matter.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    spectrum: Option<JsonValue>,
    #[serde(default)]
    conclusion: Option<Box<RawValue>>,
}

/// Parse a 2xx body. Anything that is not JSON degrades to `null`, which the
/// normaliser turns into "no spectrum, empty conclusion".
///
/// A body nested too deeply for a full parse still yields its spectrum; the
/// conclusion is then shown as its raw JSON text.
pub fn parse_body(body: &str) -> JsonValue {
    let err = match serde_json::from_str(body) {
        Ok(value) => return value,
        Err(e) => e,
    };

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => {
            log::warn!("Response body could not be parsed in full ({err}); keeping its top-level fields");
            let mut fields = Map::new();
            if let Some(spectrum) = envelope.spectrum {
                fields.insert("spectrum".to_string(), spectrum);
            }
            if let Some(conclusion) = envelope.conclusion {
                let text = response::bounded(conclusion.get().to_string());
                fields.insert("conclusion".to_string(), JsonValue::String(text));
            }
            JsonValue::Object(fields)
        }
        Err(_) => {
            log::warn!("Response body is not valid JSON ({err}); showing an empty result");
            JsonValue::Null
        }
    }
}
