//! Fuzz target for input normalization and validation
//!
//! Arbitrary UTF-8 goes through every user-facing entry point. Nothing here
//! may panic, whatever the input.
//!
//! # Invariants
//!
//! - Normalized output never contains dots
//! - An identity seed exists exactly when all three fields are non-empty
//!   after normalization
//! - A validated identity always has a seed

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use seedpass_app::{
    normalize_input, validate_birthdate, validate_master_password, IdentityInput, ServiceInput,
};

#[derive(Debug, Arbitrary)]
struct Input {
    person: String,
    birthdate: String,
    master: String,
    service: String,
    login: String,
}

fuzz_target!(|input: Input| {
    let normalized = normalize_input(&[input.service.as_str(), input.login.as_str()]);
    assert!(!normalized.contains('.'));

    let _ = validate_birthdate(&input.birthdate);
    let _ = validate_master_password(&input.master);

    let identity =
        IdentityInput::new(input.person.as_str(), input.birthdate.as_str(), input.master.as_str());
    let complete = !normalize_input(&[input.person.as_str()]).is_empty()
        && !input.birthdate.is_empty()
        && !input.master.is_empty();
    assert_eq!(identity.seed().is_some(), complete);

    if identity.validate().is_ok() {
        assert!(identity.seed().is_some());
    }

    let _ = ServiceInput::new(input.service, input.login).seed();
});
