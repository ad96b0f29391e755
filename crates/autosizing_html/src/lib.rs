//! Static HTML adapter for the autosizing check.
//!
//! Extracts the document's meta tags from HTML source and pairs them with
//! top window widths supplied by the caller, since a static document has no
//! window of its own.

mod document;
mod meta_scan;

pub use document::{HtmlDocument, TopWindow};
pub use meta_scan::extract_meta_tags;
