//! Keyer error types

use thiserror::Error;

/// Errors reported by a key sink
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key device error: {0}")]
    Device(String),
}

/// Errors that can occur while queuing or keying
#[derive(Debug, Error)]
pub enum KeyerError {
    #[error("unsupported character: {0:?}")]
    UnsupportedCharacter(char),

    #[error(transparent)]
    Key(#[from] KeyError),
}

impl KeyerError {
    /// Check if a message was rejected for an unkeyable character
    pub fn is_unsupported_character(&self) -> bool {
        matches!(self, KeyerError::UnsupportedCharacter(_))
    }

    /// The rejected character, if any
    pub fn unsupported_character(&self) -> Option<char> {
        match self {
            KeyerError::UnsupportedCharacter(c) => Some(*c),
            KeyerError::Key(_) => None,
        }
    }
}
