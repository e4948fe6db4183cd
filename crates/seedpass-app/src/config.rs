//! Session configuration

use seedpass_crypto::{PasswordPolicy, StreamConfig};

/// Derivation cost and password shape for a [`crate::Session`].
///
/// Both halves feed into every derived password: changing either one
/// changes the output for the same inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// KDF cost and keystream batching
    pub stream: StreamConfig,
    /// Length and category quotas
    pub policy: PasswordPolicy,
}
