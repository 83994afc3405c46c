use std::fmt;
use std::io;

pub(crate) type ThemeResult<T> = Result<T, Error>;

/// Errors that can occur while loading or interpreting a theme document.
///
/// The matching/trie/metadata pipeline itself is total: once a `Theme` is built it cannot fail
/// to answer a query. The only fallible boundary is deserializing the raw theme document.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred when reading a theme file.
    Io(io::Error),

    /// JSON parsing failed when loading a theme document.
    Json(serde_json::Error),

    /// An invalid hex color was encountered by the general-purpose color parser.
    ///
    /// This can only come from [`crate::themes::color::parse_hex_rgba`] -- the interner used
    /// during theme compilation never fails on a malformed color, it just interns the input
    /// string opaquely.
    #[allow(missing_docs)]
    InvalidHexColor { value: String, reason: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON parsing error: {}", err),
            Error::InvalidHexColor { value, reason } => {
                write!(f, "invalid hex color '{}': {}", value, reason)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::InvalidHexColor { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
