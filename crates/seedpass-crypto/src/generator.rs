//! Password generation context: one owned stream per generator

use crate::{
    composer::{PasswordPolicy, compose},
    error::{ComposeError, StreamError},
    fingerprint::IdentityDigest,
    stream::{KeyedBlockStream, Position, StreamConfig},
};

/// Derives service passwords from an identity digest.
///
/// Call order matters: [`set_key`](Self::set_key) resets the nonce, so
/// [`set_iteration`](Self::set_iteration) must follow it.
#[derive(Debug)]
pub struct PasswordGenerator {
    stream: KeyedBlockStream,
    iterations: u32,
}

impl PasswordGenerator {
    /// Create an unkeyed generator.
    pub fn new(config: &StreamConfig) -> Self {
        Self { stream: KeyedBlockStream::new(config.batch_blocks), iterations: config.iterations }
    }

    /// Key the generator with the identity digest, salted by the service seed.
    pub fn set_key(
        &mut self,
        identity: &IdentityDigest,
        service_seed: &str,
    ) -> Result<(), StreamError> {
        self.stream.derive_key(identity.as_bytes(), service_seed.as_bytes(), self.iterations)
    }

    /// Select the iteration. Each iteration is an independent nonce.
    pub fn set_iteration(&mut self, iteration: u64) {
        self.stream.set_position(Position::nonce(iteration));
    }

    /// Generate one password for the current key and iteration.
    ///
    /// Restarts the counter first, so repeated calls return the same password.
    pub fn generate(&mut self, policy: &PasswordPolicy) -> Result<String, ComposeError> {
        self.stream.set_position(Position::counter(0));
        compose(&mut self.stream, policy)
    }
}
