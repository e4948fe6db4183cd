//! Errors raised by the terminal front end itself

use std::{io, path::PathBuf};

use thiserror::Error;

/// Front-end failures. Library errors pass through unchanged.
#[derive(Debug, Error)]
pub enum CliError {
    /// Master password could not be read from the terminal
    #[error("could not read master password: {0}")]
    Prompt(#[source] io::Error),

    /// Fingerprint derivation produced nothing for a validated identity
    #[error("fingerprint derivation failed; see log output")]
    FingerprintUnavailable,

    /// Fingerprint image could not be written
    #[error("could not write fingerprint to {}: {source}", path.display())]
    Export {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}
