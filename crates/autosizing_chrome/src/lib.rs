//! Live Chrome adapter for the autosizing check.
//!
//! Drives headless Chrome over the DevTools protocol, captures the autosizing
//! inputs from a page or one of its frames, and hands them to the detector as
//! a [`PageSnapshot`].

pub mod args;
mod browser;
mod config;
mod probe;

pub use browser::{ChromeBrowser, launch_browser, open_target, resolve_target};
pub use config::ProbeConfig;
pub use probe::{PROBE_SCRIPT, PageSnapshot, child_frames, probe_frame, probe_page};
