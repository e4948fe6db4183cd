//! Normalized user input and the seeds built from it

use std::fmt;

use zeroize::Zeroizing;

use crate::{
    error::InputError,
    validate::{validate_birthdate, validate_master_password},
};

/// Fold free-form input into its canonical form.
///
/// Non-empty parts are joined with `-`, whitespace runs collapse to a single
/// space, the ends are trimmed, dots are removed and everything is
/// lowercased. "John  Doe" and "john doe." name the same person.
pub fn normalize_input(parts: &[&str]) -> String {
    let joined = parts.iter().filter(|part| !part.is_empty()).copied().collect::<Vec<_>>().join("-");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace('.', "").to_lowercase()
}

/// Seed material for the identity fingerprint.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentitySeed(Zeroizing<String>);

impl IdentitySeed {
    /// Seed bytes fed to key derivation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for IdentitySeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentitySeed(..)")
    }
}

/// Raw identity fields as typed by the user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IdentityInput {
    /// Person name, normalized before use
    pub person: Zeroizing<String>,
    /// Birthdate as `DDMMYYYY`, used verbatim
    pub birthdate: Zeroizing<String>,
    /// Master password, used verbatim
    pub master: Zeroizing<String>,
}

impl IdentityInput {
    /// Bundle the three identity fields.
    pub fn new(person: impl Into<String>, birthdate: impl Into<String>, master: impl Into<String>) -> Self {
        Self {
            person: Zeroizing::new(person.into()),
            birthdate: Zeroizing::new(birthdate.into()),
            master: Zeroizing::new(master.into()),
        }
    }

    /// Identity seed, or `None` while any field is still empty.
    ///
    /// No format validation happens here, so a preview can follow the user
    /// while they type.
    pub fn seed(&self) -> Option<IdentitySeed> {
        let person = Zeroizing::new(normalize_input(&[self.person.as_str()]));
        if person.is_empty() || self.birthdate.is_empty() || self.master.is_empty() {
            return None;
        }

        let mut seed = Zeroizing::new(String::with_capacity(
            person.len() + self.birthdate.len() + self.master.len(),
        ));
        seed.push_str(&person);
        seed.push_str(&self.birthdate);
        seed.push_str(&self.master);
        Some(IdentitySeed(seed))
    }

    /// Check every field, returning the seed when all pass.
    pub fn validate(&self) -> Result<IdentitySeed, InputError> {
        if normalize_input(&[self.person.as_str()]).is_empty() {
            return Err(InputError::EmptyField { field: "person" });
        }
        validate_birthdate(&self.birthdate)?;
        validate_master_password(&self.master)?;
        self.seed().ok_or(InputError::EmptyField { field: "master password" })
    }
}

impl fmt::Debug for IdentityInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityInput").finish_non_exhaustive()
    }
}

/// Per-service fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInput {
    /// Service name, e.g. a domain
    pub service: String,
    /// Login or user name at the service
    pub login: String,
    /// Bump to rotate the password without changing anything else
    pub iteration: u64,
}

impl ServiceInput {
    /// Service fields at iteration 0.
    pub fn new(service: impl Into<String>, login: impl Into<String>) -> Self {
        Self { service: service.into(), login: login.into(), iteration: 0 }
    }

    /// Same service at another iteration.
    pub fn with_iteration(mut self, iteration: u64) -> Self {
        self.iteration = iteration;
        self
    }

    /// Normalized service seed used as the key salt.
    pub fn seed(&self) -> Result<String, InputError> {
        if normalize_input(&[self.service.as_str()]).is_empty() {
            return Err(InputError::EmptyField { field: "service" });
        }
        Ok(normalize_input(&[self.service.as_str(), self.login.as_str()]))
    }
}
