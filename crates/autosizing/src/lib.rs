//! Text autosizing ("font boosting") detection.
//!
//! Chrome enlarges text on small viewports unless the page declares a viewport.
//! This crate reproduces the activation check Chrome's text autosizer performs,
//! using only signals a page can observe: whether a `<meta name="viewport">`
//! directive is present and the inner/outer width of the top-level window.
//!
//! The decision itself is a pure function ([`is_autosizing_active`]). Adapters
//! that read a real document implement [`BrowsingContext`] and are driven
//! through [`detect`] or [`report`], which surface a denied top-window access
//! as [`AutosizingError::CrossOriginAccessDenied`].

mod detector;
mod error;
mod meta;
mod report;

pub use detector::{
    ACCESSIBILITY_FONT_SCALE_FACTOR, BrowsingContext, DECLARED_VIEWPORT_ADJUSTMENT,
    DEVICE_SCALE_ADJUSTMENT, WindowWidths, autosizing_score, detect, device_scale_adjustment,
    is_autosizing_active, report,
};
pub use error::AutosizingError;
pub use meta::{MetaTag, VIEWPORT_META_NAME, has_viewport_directive};
pub use report::AutosizingReport;
