//! Error types for the application layer

use std::fmt;

use seedpass_crypto::{ComposeError, StreamError};
use thiserror::Error;

/// Master password requirement that was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterPasswordRule {
    /// At least one uppercase letter
    Uppercase,
    /// At least one digit
    Digit,
    /// At least eight characters
    Length,
}

impl fmt::Display for MasterPasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uppercase => f.write_str("password must contain at least 1 upper case character"),
            Self::Digit => f.write_str("password must contain at least 1 number"),
            Self::Length => f.write_str("password must be 8 or more characters"),
        }
    }
}

/// Malformed user input, rejected before any derivation.
///
/// Variants never carry the offending value: every input here is seed
/// material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A required field is empty after normalization
    #[error("{field} must not be empty")]
    EmptyField {
        /// Field name
        field: &'static str,
    },

    /// Birthdate is not a plausible `DDMMYYYY` date
    #[error("invalid birthdate: {reason}; write it as DDMMYYYY, e.g. 21021982")]
    InvalidBirthdate {
        /// What is wrong with it
        reason: &'static str,
    },

    /// Master password misses a requirement
    #[error("weak master password: {rule}")]
    WeakMasterPassword {
        /// The first requirement that failed
        rule: MasterPasswordRule,
    },
}

/// Errors from sessions and the fingerprint worker
#[derive(Debug, Error)]
pub enum SessionError {
    /// User input was rejected
    #[error(transparent)]
    Input(#[from] InputError),

    /// Password composition failed
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// Key derivation failed
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A password was requested before an identity fingerprint exists
    #[error("identity not set: enter person, birthdate and master password first")]
    IdentityNotReady,

    /// The fingerprint worker task has stopped
    #[error("fingerprint worker is no longer running")]
    WorkerGone,
}

impl SessionError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Input and quota errors are fixed by the user. A missing identity is
    /// fixed by setting one. Stream failures and a dead worker are bugs.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Input(_) => false,
            Self::Compose(err) => err.is_fatal(),
            Self::Stream(err) => err.is_fatal(),
            Self::IdentityNotReady => false,
            Self::WorkerGone => true,
        }
    }
}
