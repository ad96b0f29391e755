//! Document meta tags as seen by the detector.

use serde::{Deserialize, Serialize};

/// Value of the `name` attribute that marks a viewport directive.
pub const VIEWPORT_META_NAME: &str = "viewport";

/// A `<meta>` element reduced to the two attributes the detector reads.
///
/// Either attribute may be missing from the element, which is distinct from
/// being present but empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    /// The `name` attribute, if present.
    pub name: Option<String>,
    /// The `content` attribute, if present.
    pub content: Option<String>,
}

impl MetaTag {
    /// Creates a meta tag from optional `name` and `content` attributes.
    pub fn new(name: Option<&str>, content: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_owned),
            content: content.map(str::to_owned),
        }
    }

    /// Creates a meta tag carrying both attributes.
    pub fn named(name: &str, content: &str) -> Self {
        Self::new(Some(name), Some(content))
    }

    /// Whether this tag declares a viewport.
    ///
    /// The name must equal `"viewport"` exactly and the content must be
    /// non-empty. A tag with `content=""` does not count.
    pub fn is_viewport_directive(&self) -> bool {
        self.name.as_deref() == Some(VIEWPORT_META_NAME)
            && self.content.as_deref().is_some_and(|content| !content.is_empty())
    }
}

/// Whether any tag in document order declares a viewport.
///
/// Stops at the first match.
pub fn has_viewport_directive<'tag, I>(tags: I) -> bool
where
    I: IntoIterator<Item = &'tag MetaTag>,
{
    tags.into_iter().any(MetaTag::is_viewport_directive)
}
