//! Error types for memokey

use std::fmt;

/// Result type alias for key derivation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for key derivation
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Argument nesting went past the depth limit (cyclic argument graph)
    CyclicArgument {
        /// Depth limit that was exceeded
        limit: usize,
    },

    /// A `Serialize` impl failed or produced an unsupported shape
    Serialize(String),

    /// Canonical key could not be decoded
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CyclicArgument { limit } => {
                write!(f, "Cyclic argument: nesting exceeds {} levels", limit)
            }
            Error::Serialize(msg) => write!(f, "Serialize error: {}", msg),
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serialize(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Error::Parse(format!("{:?}", err))
    }
}
