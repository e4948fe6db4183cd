//! Identity-bound password session

use std::{fmt, sync::Arc};

use seedpass_crypto::{Fingerprint, PasswordGenerator, render_and_digest};
use zeroize::Zeroizing;

use crate::{
    config::SessionConfig,
    error::SessionError,
    input::{IdentityInput, ServiceInput},
};

/// One derived password with its display label.
pub struct GeneratedPassword {
    /// Normalized service seed
    pub service: String,
    /// Iteration the password was derived at
    pub iteration: u64,
    /// The password itself
    pub password: Zeroizing<String>,
}

impl GeneratedPassword {
    /// Label shown next to the password: the service, plus the iteration
    /// when it is not zero.
    pub fn label(&self) -> String {
        if self.iteration > 0 {
            format!("{} (it.:{})", self.service, self.iteration)
        } else {
            self.service.clone()
        }
    }
}

impl fmt::Debug for GeneratedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedPassword")
            .field("service", &self.service)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

/// Holds the identity fingerprint and derives service passwords from it.
///
/// Owns its own [`PasswordGenerator`]; sessions never share stream state.
pub struct Session {
    config: SessionConfig,
    generator: PasswordGenerator,
    identity: Option<Arc<Fingerprint>>,
}

impl Session {
    /// Create a session without an identity.
    pub fn new(config: SessionConfig) -> Self {
        Self { config, generator: PasswordGenerator::new(&config.stream), identity: None }
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Validate the identity and derive its fingerprint.
    ///
    /// Blocks for one full key derivation.
    pub fn set_identity(&mut self, input: &IdentityInput) -> Result<Arc<Fingerprint>, SessionError> {
        let seed = input.validate()?;
        let fingerprint = Arc::new(render_and_digest(seed.as_bytes(), &self.config.stream)?);
        self.identity = Some(Arc::clone(&fingerprint));
        tracing::debug!("identity fingerprint derived");
        Ok(fingerprint)
    }

    /// Use a fingerprint derived elsewhere, e.g. by the
    /// [`FingerprintWorker`](crate::FingerprintWorker).
    pub fn adopt_fingerprint(&mut self, fingerprint: Arc<Fingerprint>) {
        self.identity = Some(fingerprint);
    }

    /// Current identity fingerprint.
    pub fn fingerprint(&self) -> Option<&Arc<Fingerprint>> {
        self.identity.as_ref()
    }

    /// Derive the password for `service`.
    pub fn generate(&mut self, service: &ServiceInput) -> Result<GeneratedPassword, SessionError> {
        let fingerprint = self.identity.as_ref().ok_or(SessionError::IdentityNotReady)?;
        let service_seed = service.seed()?;

        self.generator.set_key(fingerprint.digest(), &service_seed)?;
        self.generator.set_iteration(service.iteration);
        let password = Zeroizing::new(self.generator.generate(&self.config.policy)?);

        tracing::debug!(iteration = service.iteration, "password generated");
        Ok(GeneratedPassword { service: service_seed, iteration: service.iteration, password })
    }

    /// Forget the identity. Passwords can no longer be generated until a new
    /// identity is set.
    pub fn clear(&mut self) {
        self.identity = None;
        self.generator = PasswordGenerator::new(&self.config.stream);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("has_identity", &self.identity.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use seedpass_crypto::{PasswordPolicy, StreamConfig};

    use super::*;
    use crate::error::InputError;

    fn cheap() -> SessionConfig {
        SessionConfig {
            stream: StreamConfig { iterations: 1, batch_blocks: NonZeroUsize::new(16).unwrap() },
            policy: PasswordPolicy::default(),
        }
    }

    fn identity() -> IdentityInput {
        IdentityInput::new("John", "01011990", "Secret123")
    }

    #[test]
    fn generate_requires_identity() {
        let mut session = Session::new(cheap());
        let result = session.generate(&ServiceInput::new("example.com", "john"));

        assert!(matches!(result, Err(SessionError::IdentityNotReady)));
    }

    #[test]
    fn invalid_identity_is_rejected() {
        let mut session = Session::new(cheap());
        let result = session.set_identity(&IdentityInput::new("John", "01011990", "secret"));

        assert!(matches!(result, Err(SessionError::Input(InputError::WeakMasterPassword { .. }))));
        assert!(session.fingerprint().is_none());
    }

    #[test]
    fn generate_is_repeatable() {
        let mut session = Session::new(cheap());
        session.set_identity(&identity()).unwrap();
        let service = ServiceInput::new("example.com", "john");

        let first = session.generate(&service).unwrap();
        let second = session.generate(&service).unwrap();
        assert_eq!(first.password, second.password);
        assert_eq!(first.password.len(), 25);
    }

    #[test]
    fn iteration_changes_password_and_label() {
        let mut session = Session::new(cheap());
        session.set_identity(&identity()).unwrap();

        let base = session.generate(&ServiceInput::new("Example.com", "john")).unwrap();
        let rotated =
            session.generate(&ServiceInput::new("Example.com", "john").with_iteration(2)).unwrap();

        assert_ne!(base.password, rotated.password);
        assert_eq!(base.label(), "examplecom-john");
        assert_eq!(rotated.label(), "examplecom-john (it.:2)");
    }

    #[test]
    fn normalization_makes_inputs_equivalent() {
        let mut session = Session::new(cheap());
        session.set_identity(&IdentityInput::new("  JOHN. ", "01011990", "Secret123")).unwrap();
        let a = session.generate(&ServiceInput::new("Example.com", "JohnDoe")).unwrap();

        let mut other = Session::new(cheap());
        other.set_identity(&identity()).unwrap();
        let b = other.generate(&ServiceInput::new("EXAMPLE.COM", "johndoe")).unwrap();

        assert_eq!(a.password, b.password);
    }

    #[test]
    fn clear_forgets_identity() {
        let mut session = Session::new(cheap());
        session.set_identity(&identity()).unwrap();
        session.clear();

        assert!(session.fingerprint().is_none());
        assert!(matches!(
            session.generate(&ServiceInput::new("example.com", "")),
            Err(SessionError::IdentityNotReady)
        ));
    }

    #[test]
    fn quota_violation_surfaces() {
        let mut config = cheap();
        config.policy = PasswordPolicy::with_length(5).upper(3).digits(3).symbols(0);
        let mut session = Session::new(config);
        session.set_identity(&identity()).unwrap();

        let result = session.generate(&ServiceInput::new("example.com", ""));
        assert!(matches!(result, Err(SessionError::Compose(_))));
    }

    #[test]
    fn debug_hides_password() {
        let mut session = Session::new(cheap());
        session.set_identity(&identity()).unwrap();
        let generated = session.generate(&ServiceInput::new("example.com", "john")).unwrap();

        assert!(!format!("{generated:?}").contains(generated.password.as_str()));
    }
}
