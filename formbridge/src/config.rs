//! Engine configuration and host construction parameters.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigurationError;
use crate::host::HostProfile;
use crate::transition::{Easing, TransitionConfig};

/// Default form identity when neither the host nor the schema names one.
pub const DEFAULT_FORM_ID: &str = "form";

/// Tunables for rendering and transitions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Error-message fade-in duration in milliseconds.
    pub fade_in_ms: u64,
    /// Error-message fade-out duration in milliseconds.
    pub fade_out_ms: u64,
    pub easing: Easing,
    /// Composite date selector order when a field does not specify one.
    pub date_format: String,
    /// Year span around the current year offered by composite date pickers.
    pub years_diff: i32,
    pub host: HostProfile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_in_ms: 600,
            fade_out_ms: 600,
            easing: Easing::EaseOut,
            date_format: "dd/mm/yyyy".to_string(),
            years_diff: 100,
            host: HostProfile::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_host(mut self, host: HostProfile) -> Self {
        self.host = host;
        self
    }

    pub fn fade_in(&self) -> TransitionConfig {
        TransitionConfig::new(Duration::from_millis(self.fade_in_ms), self.easing)
    }

    pub fn fade_out(&self) -> TransitionConfig {
        TransitionConfig::new(Duration::from_millis(self.fade_out_ms), self.easing)
    }
}

/// Construction parameters a host passes when embedding a form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormParams {
    pub form_id: Option<String>,
    /// Project the form read-only right after population.
    pub read_only: bool,
    pub json_form: Option<Value>,
    pub json_populate_data: Option<Value>,
    /// Hosts that intercept event URLs rather than direct callbacks.
    pub is_mobile: bool,
}

impl FormParams {
    pub fn form_id(&self) -> &str {
        self.form_id.as_deref().unwrap_or(DEFAULT_FORM_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"fadeOutMs": 0, "easing": "linear"}"#).unwrap();
        assert_eq!(config.fade_out_ms, 0);
        assert_eq!(config.fade_in_ms, 600);
        assert_eq!(config.easing, Easing::Linear);
        assert_eq!(config.years_diff, 100);
        assert!(config.host.native_date);
    }

    #[test]
    fn test_host_profile_from_json() {
        let config = EngineConfig::from_json(
            r#"{"host": {"platform": {"kind": "android", "version": {"major": 4, "minor": 1}}}}"#,
        )
        .unwrap();
        assert!(config.host.legacy_android());
    }
}
