//! Host environment capabilities.
//!
//! The engine renders composite pickers and downgraded range inputs when the
//! embedding runtime cannot show the native control. Capability flags are
//! supplied by the host; the platform can be sniffed from a user agent.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static ANDROID_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Android\s([0-9.]*)").expect("static regex")
});

static WINDOWS_PHONE_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)iemobile|wpdesktop").expect("static regex")
});

/// Android release, compared as `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AndroidVersion {
    pub major: u32,
    pub minor: u32,
}

impl AndroidVersion {
    /// Oldest release whose WebView handles native date/time/range controls.
    pub const CHROMIUM: AndroidVersion = AndroidVersion { major: 4, minor: 4 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a leading `major[.minor]` from a version string like `4.1.2`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().and_then(|m| m.parse().ok()).unwrap_or(0);
        Some(Self { major, minor })
    }
}

/// Runtime the form is embedded in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Platform {
    Android {
        version: Option<AndroidVersion>,
    },
    WindowsPhone,
    #[default]
    Other,
}

/// What the host can render natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostProfile {
    pub platform: Platform,
    pub native_date: bool,
    pub native_time: bool,
    pub native_range: bool,
}

impl Default for HostProfile {
    fn default() -> Self {
        Self {
            platform: Platform::Other,
            native_date: true,
            native_time: true,
            native_range: true,
        }
    }
}

impl HostProfile {
    /// Profile with the platform detected from a user agent string and all
    /// native controls assumed available.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let platform = if let Some(caps) = ANDROID_UA.captures(user_agent) {
            Platform::Android {
                version: caps.get(1).and_then(|m| AndroidVersion::parse(m.as_str())),
            }
        } else if WINDOWS_PHONE_UA.is_match(user_agent) {
            Platform::WindowsPhone
        } else {
            Platform::Other
        };
        Self {
            platform,
            ..Self::default()
        }
    }

    /// Profile for a host lacking every native date/time/range control.
    pub fn without_native_controls() -> Self {
        Self {
            native_date: false,
            native_time: false,
            native_range: false,
            ..Self::default()
        }
    }

    /// Android WebViews older than 4.4 mis-render native date/time/range inputs.
    pub fn legacy_android(&self) -> bool {
        match self.platform {
            Platform::Android {
                version: Some(version),
            } => version < AndroidVersion::CHROMIUM,
            _ => false,
        }
    }

    pub fn uses_date_picker(&self) -> bool {
        !self.native_date || self.legacy_android()
    }

    pub fn uses_time_picker(&self) -> bool {
        !self.native_time || self.legacy_android()
    }

    pub fn uses_slider(&self) -> bool {
        self.native_range && !self.legacy_android()
    }
}
