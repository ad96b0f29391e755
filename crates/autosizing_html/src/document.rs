use crate::meta_scan::extract_meta_tags;
use anyhow::{Context as _, Result};
use autosizing::{AutosizingError, BrowsingContext, MetaTag, WindowWidths};
use log::debug;
use std::fs;
use std::path::Path;

/// How the calling context relates to the top-level browsing context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TopWindow {
    /// Same-origin access; the top window has these widths.
    SameOrigin(WindowWidths),
    /// The caller runs in a cross-origin frame and cannot read the top window.
    CrossOrigin,
}

/// A parsed HTML document viewed inside a top window.
#[derive(Clone, Debug)]
pub struct HtmlDocument {
    meta_tags: Vec<MetaTag>,
    top_window: TopWindow,
}

impl HtmlDocument {
    /// Parses `html` and places it in `top_window`.
    pub fn parse(html: &str, top_window: TopWindow) -> Self {
        Self {
            meta_tags: extract_meta_tags(html),
            top_window,
        }
    }

    /// Reads and parses an HTML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8 text.
    pub fn from_path(path: &Path, top_window: TopWindow) -> Result<Self> {
        let html = fs::read_to_string(path)
            .with_context(|| format!("Failed to read HTML document {}", path.display()))?;
        let document = Self::parse(&html, top_window);
        debug!(
            "parsed {} with {} meta tags",
            path.display(),
            document.meta_tags.len()
        );
        Ok(document)
    }

    /// The top window this document is evaluated against.
    pub const fn top_window(&self) -> TopWindow {
        self.top_window
    }
}

impl BrowsingContext for HtmlDocument {
    fn meta_tags(&self) -> &[MetaTag] {
        &self.meta_tags
    }

    fn top_window_widths(&self) -> Result<WindowWidths, AutosizingError> {
        match self.top_window {
            TopWindow::SameOrigin(widths) => Ok(widths),
            TopWindow::CrossOrigin => Err(AutosizingError::CrossOriginAccessDenied(
                "Blocked a frame from accessing a cross-origin frame.".to_owned(),
            )),
        }
    }
}
