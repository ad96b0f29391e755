//! Reads the autosizing inputs out of a live page.
//!
//! A small script collects the document's meta tags and the top window's
//! widths. A `SecurityError` from the top window access is caught in the page
//! and returned as data so it can become an [`AutosizingError`] here instead
//! of an opaque evaluation failure.

use anyhow::{Context as _, Result, anyhow};
use autosizing::{AutosizingError, BrowsingContext, MetaTag, WindowWidths};
use chromiumoxide::cdp::browser_protocol::page::FrameId;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use log::{debug, trace};
use serde::Deserialize;
use serde_json::Value;

/// Evaluated in the probed frame.
pub const PROBE_SCRIPT: &str = r#"(() => {
    const metaTags = Array.from(document.getElementsByTagName("meta"), (tag) => ({
        name: tag.getAttribute("name"),
        content: tag.getAttribute("content"),
    }));
    try {
        const top = window.top;
        return { metaTags, topWindow: { inner: top.innerWidth, outer: top.outerWidth } };
    } catch (error) {
        if (error instanceof DOMException && error.name === "SecurityError") {
            return { metaTags, accessDenied: error.message };
        }
        throw error;
    }
})()"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProbePayload {
    meta_tags: Vec<MetaTag>,
    #[serde(default)]
    top_window: Option<WindowWidths>,
    #[serde(default)]
    access_denied: Option<String>,
}

/// The autosizing inputs captured from one frame at one point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct PageSnapshot {
    meta_tags: Vec<MetaTag>,
    top_window: Result<WindowWidths, AutosizingError>,
}

impl PageSnapshot {
    /// Decodes the value returned by [`PROBE_SCRIPT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not have the probe's shape.
    pub fn from_probe_value(value: Value) -> Result<Self> {
        let payload: ProbePayload =
            serde_json::from_value(value).context("Malformed autosizing probe result")?;
        let top_window = match (payload.access_denied, payload.top_window) {
            (Some(message), _) => Err(AutosizingError::CrossOriginAccessDenied(message)),
            (None, Some(widths)) => Ok(widths),
            (None, None) => {
                return Err(anyhow!(
                    "Autosizing probe returned neither top window widths nor an access error"
                ));
            }
        };
        Ok(Self {
            meta_tags: payload.meta_tags,
            top_window,
        })
    }
}

impl BrowsingContext for PageSnapshot {
    fn meta_tags(&self) -> &[MetaTag] {
        &self.meta_tags
    }

    fn top_window_widths(&self) -> Result<WindowWidths, AutosizingError> {
        self.top_window.clone()
    }
}

async fn evaluate_probe(page: &Page, params: EvaluateParams) -> Result<PageSnapshot> {
    let result = page.evaluate_expression(params).await?;
    let value: Value = result.into_value()?;
    trace!("autosizing probe returned {value}");
    PageSnapshot::from_probe_value(value)
}

/// Captures the autosizing inputs of the page's main frame.
///
/// # Errors
///
/// Returns an error if the script cannot be evaluated or returns an
/// unexpected value. A denied top window access is not an error here; it is
/// kept in the snapshot and reported by the detector.
pub async fn probe_page(page: &Page) -> Result<PageSnapshot> {
    let params = EvaluateParams::builder()
        .expression(PROBE_SCRIPT)
        .return_by_value(true)
        .build()
        .map_err(|err| anyhow!("Invalid probe evaluation: {err}"))?;
    let snapshot = evaluate_probe(page, params).await?;
    debug!("probed main frame: {} meta tags", snapshot.meta_tags.len());
    Ok(snapshot)
}

/// Captures the autosizing inputs as seen from inside `frame_id`.
///
/// # Errors
///
/// Returns an error if the frame has no execution context yet or the script
/// cannot be evaluated.
pub async fn probe_frame(page: &Page, frame_id: FrameId) -> Result<PageSnapshot> {
    let context_id = page
        .frame_execution_context(frame_id.clone())
        .await?
        .ok_or_else(|| anyhow!("Frame {frame_id:?} has no execution context"))?;
    let params = EvaluateParams::builder()
        .expression(PROBE_SCRIPT)
        .return_by_value(true)
        .context_id(context_id)
        .build()
        .map_err(|err| anyhow!("Invalid probe evaluation: {err}"))?;
    let snapshot = evaluate_probe(page, params).await?;
    debug!(
        "probed frame {frame_id:?}: {} meta tags",
        snapshot.meta_tags.len()
    );
    Ok(snapshot)
}

/// Child frames of the page, in the order Chrome reports them.
///
/// # Errors
///
/// Returns an error if the frame tree cannot be read.
pub async fn child_frames(page: &Page) -> Result<Vec<FrameId>> {
    let main = page.mainframe().await?;
    let frames = page.frames().await?;
    Ok(frames
        .into_iter()
        .filter(|frame| main.as_ref() != Some(frame))
        .collect())
}
