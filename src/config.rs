use anyhow::{Context, Result};

use crate::data::preset::{self, DEFAULT_LEVEL};

pub const API_URL_VAR: &str = "ROSETTA_API_URL";
pub const TIMEOUT_VAR: &str = "ROSETTA_TIMEOUT_SECS";
pub const DEFAULT_PRESET_VAR: &str = "ROSETTA_DEFAULT_PRESET";

const DEFAULT_API_URL: &str = "http://localhost:8000";

// Conclusions come from a text-generation model and can take minutes.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Start-up settings, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the processing service (no trailing slash).
    pub api_url: String,
    pub timeout_secs: u64,
    /// Preset selected when the window opens.
    pub default_level: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_level: DEFAULT_LEVEL,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset or blank keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get(API_URL_VAR) {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = get(TIMEOUT_VAR) {
            config.timeout_secs = raw
                .parse()
                .with_context(|| format!("{TIMEOUT_VAR}={raw} is not a number of seconds"))?;
        }

        if let Some(raw) = get(DEFAULT_PRESET_VAR) {
            let level: i64 = raw
                .parse()
                .with_context(|| format!("{DEFAULT_PRESET_VAR}={raw} is not an integer"))?;
            preset::get(level).with_context(|| format!("{DEFAULT_PRESET_VAR}={raw}"))?;
            config.default_level = level;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.default_level, 2);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://rosetta.example.org/api/"),
            (TIMEOUT_VAR, "45"),
            (DEFAULT_PRESET_VAR, "4"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://rosetta.example.org/api");
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.default_level, 4);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = AppConfig::from_lookup(lookup(&[(API_URL_VAR, "  "), (TIMEOUT_VAR, "")])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = AppConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(format!("{err:#}").contains(TIMEOUT_VAR));
    }

    #[test]
    fn rejects_level_outside_catalog() {
        let err = AppConfig::from_lookup(lookup(&[(DEFAULT_PRESET_VAR, "7")])).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Invalid filter level 7"), "{msg}");
    }
}
