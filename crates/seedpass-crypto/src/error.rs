//! Error types for derivation operations

use thiserror::Error;

/// Errors from the keyed block stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A word was requested before any key was derived
    #[error("no key derived: call derive_key before reading the stream")]
    KeyNotDerived,

    /// PBKDF2 needs at least one round
    #[error("key derivation needs at least one iteration")]
    ZeroIterations,
}

impl StreamError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Both variants are integration bugs: retrying with the same
    /// configuration cannot succeed.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::KeyNotDerived => true,
            Self::ZeroIterations => true,
        }
    }
}

/// Errors from password composition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// The non-lowercase quotas leave fewer lowercase slots than required
    #[error(
        "quota violation: length {length} cannot hold {requested} non-lowercase characters \
         and {min_lowercase} lowercase"
    )]
    QuotaViolation {
        /// Requested password length
        length: u32,
        /// Sum of the uppercase, digit and symbol quotas
        requested: u64,
        /// Minimum number of lowercase characters
        min_lowercase: u32,
    },

    /// Requested length exceeds the supported maximum
    #[error("password length {length} exceeds the maximum of {max}")]
    LengthOutOfRange {
        /// Requested password length
        length: u32,
        /// Largest accepted length
        max: u32,
    },

    /// The underlying stream failed
    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl ComposeError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Quota and length errors are recoverable by adjusting the policy.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::QuotaViolation { .. } => false,
            Self::LengthOutOfRange { .. } => false,
            Self::Stream(err) => err.is_fatal(),
        }
    }
}
