//! Configuration for probing pages in headless Chrome.
//!
//! Values are read from environment variables; anything missing or
//! unparsable falls back to its default.

use core::time::Duration;
use std::env;
use std::path::PathBuf;

/// Browser and navigation settings for the probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Chrome executable; autodetected when `None`
    pub chrome_executable: Option<PathBuf>,
    /// Browser window width in pixels
    pub window_width: u32,
    /// Browser window height in pixels
    pub window_height: u32,
    /// Upper bound on navigation, in milliseconds
    pub navigation_timeout_ms: u64,
    /// Whether Chrome is launched with `--no-sandbox`
    pub no_sandbox: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            window_width: 800,
            window_height: 600,
            navigation_timeout_ms: 60_000,
            no_sandbox: false,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `AUTOSIZING_CHROME`: Chrome executable path (default: autodetect)
    /// - `AUTOSIZING_WINDOW_WIDTH`: Window width in pixels (default: 800)
    /// - `AUTOSIZING_WINDOW_HEIGHT`: Window height in pixels (default: 600)
    /// - `AUTOSIZING_NAV_TIMEOUT_MS`: Navigation timeout (default: 60000)
    /// - `AUTOSIZING_NO_SANDBOX`: Set to "1" to disable the Chrome sandbox
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let chrome_executable = lookup("AUTOSIZING_CHROME")
            .filter(|val| !val.is_empty())
            .map(PathBuf::from);
        let window_width = lookup("AUTOSIZING_WINDOW_WIDTH")
            .and_then(|val| val.parse::<u32>().ok())
            .filter(|width| *width > 0)
            .unwrap_or(defaults.window_width);
        let window_height = lookup("AUTOSIZING_WINDOW_HEIGHT")
            .and_then(|val| val.parse::<u32>().ok())
            .filter(|height| *height > 0)
            .unwrap_or(defaults.window_height);
        let navigation_timeout_ms = lookup("AUTOSIZING_NAV_TIMEOUT_MS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(defaults.navigation_timeout_ms)
            .max(1);
        let no_sandbox = lookup("AUTOSIZING_NO_SANDBOX").as_deref() == Some("1");
        Self {
            chrome_executable,
            window_width,
            window_height,
            navigation_timeout_ms,
            no_sandbox,
        }
    }

    /// The navigation timeout as a `Duration`.
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}
