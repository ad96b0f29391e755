use serde::{Deserialize, Serialize};

use crate::detector::{
    ACCESSIBILITY_FONT_SCALE_FACTOR, WindowWidths, autosizing_score, device_scale_adjustment,
};
use crate::meta::{MetaTag, has_viewport_directive};

/// Every factor that went into one autosizing check, for diagnostics output.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosizingReport {
    /// Whether a non-empty `<meta name="viewport">` was found.
    pub viewport_directive: bool,
    /// Device scale adjustment that was applied.
    pub device_scale_adjustment: f64,
    /// Accessibility font scale factor that was applied.
    pub accessibility_font_scale_factor: f64,
    /// Top window widths the score was computed from.
    pub widths: WindowWidths,
    /// Product of the factors and the inner/outer width ratio.
    pub score: f64,
    /// Whether the score exceeds one, i.e. autosizing is running.
    pub active: bool,
}

impl AutosizingReport {
    /// Evaluates the check for the given meta tags and widths.
    pub fn evaluate(meta_tags: &[MetaTag], widths: WindowWidths) -> Self {
        let viewport_directive = has_viewport_directive(meta_tags);
        let score = autosizing_score(viewport_directive, widths);
        Self {
            viewport_directive,
            device_scale_adjustment: device_scale_adjustment(viewport_directive),
            accessibility_font_scale_factor: ACCESSIBILITY_FONT_SCALE_FACTOR,
            widths,
            score,
            active: score > 1.0,
        }
    }
}
