//! Seedpass Application Layer
//!
//! Everything between raw user input and the cryptographic core: input
//! normalization and validation, a background fingerprint worker for live
//! previews, and a [`Session`] that turns an identity plus service fields
//! into passwords.
//!
//! # Flow
//!
//! ```text
//! IdentityInput ──► normalize ──► FingerprintWorker (preview while typing)
//!       │
//!       ▼ validate
//! Session::set_identity ──► Fingerprint
//!                                │
//! ServiceInput ──► normalize ────┴──► Session::generate ──► GeneratedPassword
//! ```
//!
//! Nothing is persisted. Dropping a [`Session`] forgets the identity; the
//! digest and any keyed stream state are zeroized.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod input;
pub mod session;
pub mod validate;
pub mod worker;

pub use config::SessionConfig;
pub use error::{InputError, MasterPasswordRule, SessionError};
pub use input::{IdentityInput, IdentitySeed, ServiceInput, normalize_input};
pub use session::{GeneratedPassword, Session};
pub use validate::{validate_birthdate, validate_master_password};
pub use worker::{FingerprintState, FingerprintWorker};
