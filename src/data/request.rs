use thiserror::Error;

use super::model::TabFile;
use super::preset::{self, InvalidLevel, wire_number};

/// Only files with this exact (case-sensitive) suffix are accepted.
pub const TAB_SUFFIX: &str = ".tab";

/// The service always runs the high-grade pipeline; presets only tune it.
pub const FILTER_LEVEL_FLAG: &str = "high";

/// Pre-flight failures, raised before any network traffic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a .tab file (got \"{0}\")")]
    UnsupportedFileType(String),

    #[error(transparent)]
    InvalidLevel(#[from] InvalidLevel),
}

// ---------------------------------------------------------------------------
// UploadRequest – one frozen submission
// ---------------------------------------------------------------------------

/// Everything sent to `/process` for a single submission.
///
/// Parameter values are copied out of the catalog when the request is built,
/// already encoded for the wire, so later preset changes cannot reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file: TabFile,
    pub preset_name: &'static str,
    pub filter_level: &'static str,
    pub head_drop: String,
    pub mad_multiplier_rtof: String,
    pub cps_threshold_rtof: String,
    pub mad_multiplier_dfms: String,
    pub cps_threshold_dfms: String,
}

impl UploadRequest {
    /// Text fields of the multipart form, in transmission order.
    pub fn form_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("filter_level", self.filter_level),
            ("head_drop", &self.head_drop),
            ("mad_multiplier_rtof", &self.mad_multiplier_rtof),
            ("cps_threshold_rtof", &self.cps_threshold_rtof),
            ("mad_multiplier_dfms", &self.mad_multiplier_dfms),
            ("cps_threshold_dfms", &self.cps_threshold_dfms),
        ]
    }
}

/// Validate the file and level, then freeze the preset into a request.
///
/// The suffix is checked before the level.
pub fn build(file: TabFile, level: i64) -> Result<UploadRequest, ValidationError> {
    if !file.name.ends_with(TAB_SUFFIX) {
        return Err(ValidationError::UnsupportedFileType(file.name));
    }
    let preset = preset::get(level)?;

    Ok(UploadRequest {
        file,
        preset_name: preset.name,
        filter_level: FILTER_LEVEL_FLAG,
        head_drop: preset.head_drop.to_string(),
        mad_multiplier_rtof: wire_number(preset.mad_multiplier_rtof),
        cps_threshold_rtof: wire_number(preset.cps_threshold_rtof),
        mad_multiplier_dfms: wire_number(preset.mad_multiplier_dfms),
        cps_threshold_dfms: wire_number(preset.cps_threshold_dfms),
    })
}
