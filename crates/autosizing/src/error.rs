use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Errors surfaced while reading the inputs of the autosizing check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutosizingError {
    /// The calling context is not same-origin with the top-level browsing
    /// context, so the top window's sizing properties cannot be read.
    /// Carries the host's message.
    CrossOriginAccessDenied(String),
}

impl Display for AutosizingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrossOriginAccessDenied(message) => {
                write!(f, "Cross-origin access to the top window denied: {message}")
            }
        }
    }
}

impl Error for AutosizingError {}
