//! Error results that can be returned from the scanner, parser and import resolver
use crate::byte_stream::Location;
use thiserror::Error;

/// Every failure the gritcss pipeline can report.
///
/// Lexical errors are non-fatal: the scanner reports them and resumes one code point later.
/// All other kinds abort the operation that produced them, unless the parser is configured to
/// recover from syntax errors.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CssError {
    #[error("illegal character '{character}' at {location}")]
    Lexical { character: char, location: Location },

    #[error("construction error: {message}")]
    Construction { message: String },

    #[error("syntax error at {location}: {message}")]
    Syntax { message: String, location: Location },

    #[error("could not resolve import '{location}': {reason}")]
    ImportResolution { location: String, reason: String },

    #[error("cyclic import: {}", path.join(" -> "))]
    CyclicImport { path: Vec<String> },
}

impl CssError {
    #[must_use]
    pub fn construction(message: &str) -> Self {
        CssError::Construction {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn syntax(message: &str, location: Location) -> Self {
        CssError::Syntax {
            message: message.to_string(),
            location,
        }
    }

    #[must_use]
    pub fn import_resolution(location: &str, reason: &str) -> Self {
        CssError::ImportResolution {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Location in the source where the error occurred, if the error kind carries one
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            CssError::Lexical { location, .. } | CssError::Syntax { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Returns true for errors that do not stop scanning or parsing
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CssError::Lexical { .. })
    }
}

pub type CssResult<T> = Result<T, CssError>;
