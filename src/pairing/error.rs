//! Errors raised while building pairing tables.

use thiserror::Error;

/// Invalid pairing data. Raised only at construction; an engine that exists
/// has valid tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("opener '{0}' appears in more than one pair")]
    DuplicateOpener(char),

    #[error("'{0}' is paired with itself")]
    SelfPaired(char),

    #[error("'{0}' is used both as an opener and as a closer")]
    OpenerIsCloser(char),

    #[error("closer '{0}' is shared by more than one opener")]
    DuplicateCloser(char),

    #[error("key chord {0} is bound more than once")]
    DuplicateChord(String),

    #[error("key binding refers to '{0}', which is not an opener in the pairing table")]
    UnknownOpener(char),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}
