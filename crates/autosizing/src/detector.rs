//! The autosizing activation check.
//!
//! Chrome's `TextAutosizer` multiplies a device scale adjustment, the
//! accessibility font scale factor and the ratio of the top window's inner to
//! outer width, and autosizes when the product exceeds one.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::AutosizingError;
use crate::meta::{MetaTag, has_viewport_directive};
use crate::report::AutosizingReport;

/// Device scale adjustment applied when no viewport is declared.
///
/// Chrome maps the device's smallest screen width class onto the range
/// `(1.05, 1.3)`. That class cannot be observed from a page, so the midpoint
/// is used unconditionally.
pub const DEVICE_SCALE_ADJUSTMENT: f64 = 1.175;

/// Device scale adjustment when a viewport directive is present. A declared
/// viewport disables the adjustment.
pub const DECLARED_VIEWPORT_ADJUSTMENT: f64 = 1.0;

/// Accessibility font scale factor (100%).
///
/// Set through platform accessibility preferences and not readable from a
/// page, so the default is assumed.
pub const ACCESSIBILITY_FONT_SCALE_FACTOR: f64 = 1.0;

/// Inner and outer width of the top-level browsing context, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowWidths {
    /// `window.top.innerWidth`
    pub inner: f64,
    /// `window.top.outerWidth`
    pub outer: f64,
}

impl WindowWidths {
    pub const fn new(inner: f64, outer: f64) -> Self {
        Self { inner, outer }
    }
}

/// Read access to the state the detector consumes.
///
/// Implemented by adapters at the boundary with a real document: the static
/// HTML adapter, a live browser page, or a test fixture.
pub trait BrowsingContext {
    /// Meta tags of the current document, in document order.
    fn meta_tags(&self) -> &[MetaTag];

    /// Widths of the top-level browsing context.
    ///
    /// # Errors
    ///
    /// Returns [`AutosizingError::CrossOriginAccessDenied`] when the calling
    /// context is not same-origin with the top-level context.
    fn top_window_widths(&self) -> Result<WindowWidths, AutosizingError>;
}

/// Device scale adjustment for a document with or without a viewport directive.
pub const fn device_scale_adjustment(has_viewport_directive: bool) -> f64 {
    if has_viewport_directive {
        DECLARED_VIEWPORT_ADJUSTMENT
    } else {
        DEVICE_SCALE_ADJUSTMENT
    }
}

/// The autosizing score; autosizing runs when it is strictly greater than one.
///
/// Widths are used as given, so a zero outer width produces an infinite or NaN
/// score just as the browser-side arithmetic would.
pub fn autosizing_score(has_viewport_directive: bool, widths: WindowWidths) -> f64 {
    device_scale_adjustment(has_viewport_directive) * ACCESSIBILITY_FONT_SCALE_FACTOR * widths.inner
        / widths.outer
}

/// Whether Chrome's text autosizer is running for a document with these meta
/// tags and top window widths.
pub fn is_autosizing_active(meta_tags: &[MetaTag], widths: WindowWidths) -> bool {
    let score = autosizing_score(has_viewport_directive(meta_tags), widths);
    trace!("autosizing score {score} (inner {}, outer {})", widths.inner, widths.outer);
    score > 1.0
}

/// Runs the check against a browsing context.
///
/// # Errors
///
/// Propagates [`AutosizingError::CrossOriginAccessDenied`] from the context
/// unchanged; no fallback value is substituted.
pub fn detect<C>(context: &C) -> Result<bool, AutosizingError>
where
    C: BrowsingContext + ?Sized,
{
    report(context).map(|outcome| outcome.active)
}

/// Runs the check against a browsing context and keeps every intermediate
/// factor.
///
/// # Errors
///
/// Propagates [`AutosizingError::CrossOriginAccessDenied`] from the context.
pub fn report<C>(context: &C) -> Result<AutosizingReport, AutosizingError>
where
    C: BrowsingContext + ?Sized,
{
    let meta_tags = context.meta_tags();
    let widths = context.top_window_widths()?;
    Ok(AutosizingReport::evaluate(meta_tags, widths))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixtureContext {
        meta_tags: Vec<MetaTag>,
        widths: Result<WindowWidths, AutosizingError>,
    }

    impl BrowsingContext for FixtureContext {
        fn meta_tags(&self) -> &[MetaTag] {
            &self.meta_tags
        }

        fn top_window_widths(&self) -> Result<WindowWidths, AutosizingError> {
            self.widths.clone()
        }
    }

    fn approx_eq(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-12
    }

    #[test]
    fn no_viewport_uses_midpoint_adjustment() {
        assert!(approx_eq(device_scale_adjustment(false), 1.175));
        let tags = [MetaTag::named("description", "x")];
        let widths = WindowWidths::new(400.0, 400.0);
        let score = autosizing_score(has_viewport_directive(&tags), widths);
        assert!(approx_eq(score, 1.175));
    }

    #[test]
    fn viewport_disables_adjustment() {
        assert!(approx_eq(device_scale_adjustment(true), 1.0));
        let tags = [
            MetaTag::named("theme-color", "#fff"),
            MetaTag::named("viewport", "width=device-width"),
            MetaTag::new(Some("viewport"), None),
        ];
        let widths = WindowWidths::new(400.0, 400.0);
        let score = autosizing_score(has_viewport_directive(&tags), widths);
        assert!(approx_eq(score, 1.0));
    }

    #[test]
    fn scenario_equal_widths_without_viewport() {
        assert!(is_autosizing_active(&[], WindowWidths::new(400.0, 400.0)));
    }

    #[test]
    fn scenario_narrow_inner_width_without_viewport() {
        let widths = WindowWidths::new(300.0, 400.0);
        assert!(approx_eq(autosizing_score(false, widths), 0.881_25));
        assert!(!is_autosizing_active(&[], widths));
    }

    #[test]
    fn scenario_declared_viewport_hits_boundary() {
        let tags = [MetaTag::named("viewport", "width=device-width")];
        assert!(!is_autosizing_active(&tags, WindowWidths::new(400.0, 400.0)));
    }

    #[test]
    fn scenario_empty_viewport_content_is_ignored() {
        let tags = [MetaTag::named("viewport", "")];
        assert!(is_autosizing_active(&tags, WindowWidths::new(400.0, 400.0)));
    }

    #[test]
    fn score_of_exactly_one_is_inactive() {
        // 1.175 * 800 / 940 == 1.0 exactly in binary floating point.
        let widths = WindowWidths::new(800.0, 940.0);
        assert!(!is_autosizing_active(&[], widths));
        let tags = [MetaTag::named("viewport", "initial-scale=1")];
        assert!(!is_autosizing_active(&tags, WindowWidths::new(1280.0, 1280.0)));
        assert!(is_autosizing_active(&tags, WindowWidths::new(1281.0, 1280.0)));
    }

    #[test]
    fn repeated_checks_agree() {
        let tags = [MetaTag::named("viewport", "width=320")];
        let widths = WindowWidths::new(412.0, 400.0);
        let first = is_autosizing_active(&tags, widths);
        for _ in 0..8 {
            assert_eq!(is_autosizing_active(&tags, widths), first);
        }
    }

    #[test]
    fn zero_outer_width_follows_float_semantics() {
        assert!(is_autosizing_active(&[], WindowWidths::new(400.0, 0.0)));
        assert!(!is_autosizing_active(&[], WindowWidths::new(0.0, 0.0)));
    }

    #[test]
    fn detect_reads_context() -> Result<(), AutosizingError> {
        let context = FixtureContext {
            meta_tags: vec![MetaTag::named("viewport", "width=device-width")],
            widths: Ok(WindowWidths::new(400.0, 400.0)),
        };
        assert!(!detect(&context)?);

        let context = FixtureContext {
            meta_tags: Vec::new(),
            widths: Ok(WindowWidths::new(400.0, 400.0)),
        };
        assert!(detect(&context)?);
        Ok(())
    }

    #[test]
    fn detect_propagates_access_denied() {
        let denied = AutosizingError::CrossOriginAccessDenied(
            "Blocked a frame with origin \"null\" from accessing a cross-origin frame.".to_owned(),
        );
        let context = FixtureContext {
            meta_tags: vec![MetaTag::named("viewport", "width=device-width")],
            widths: Err(denied.clone()),
        };
        assert_eq!(detect(&context), Err(denied.clone()));
        assert_eq!(report(&context).map(|outcome| outcome.active), Err(denied));
    }

    #[test]
    fn detect_accepts_trait_objects() -> Result<(), AutosizingError> {
        let context: Box<dyn BrowsingContext> = Box::new(FixtureContext {
            meta_tags: Vec::new(),
            widths: Ok(WindowWidths::new(300.0, 400.0)),
        });
        assert!(!detect(context.as_ref())?);
        Ok(())
    }
}
