//! Seedpass Cryptographic Core
//!
//! Deterministic derivation of service passwords and an identity fingerprint
//! from human-memorable inputs. Pure functions and owned state only: nothing
//! is stored, nothing touches the network, and the same inputs always
//! reproduce the same outputs.
//!
//! # Derivation
//!
//! ```text
//! identity seed (person + birthdate + master)
//!        │
//!        ▼ PBKDF2-SHA256, no salt
//! AES-256-CTR stream (nonce 0) ──► colour grid (preview)
//!        │
//!        ▼ low byte per cell
//! Identity digest (800 bits)
//!        │
//!        ▼ PBKDF2-SHA256, salt = service seed
//! AES-256-CTR stream (nonce = iteration, counter from 0)
//!        │
//!        ▼ bounded sampling + quota placement
//! Password
//! ```
//!
//! # Security
//!
//! Determinism:
//! - Every stream is keyed and positioned explicitly before use
//! - The password counter restarts at zero for each generation
//!
//! Independence:
//! - Each iteration index is its own nonce under the service key
//! - Each service seed salts its own key
//! - Fingerprint and password contexts never share a stream
//!
//! Compatibility:
//! - The modulo folding in [`fold_into_range`] is biased but fixed; changing
//!   it would change every previously derived password
//!
//! Hygiene:
//! - Derived keys, keystream buffers, digests and password slots are zeroized
//!   on drop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod composer;
pub mod error;
pub mod fingerprint;
pub mod generator;
pub mod sampler;
pub mod stream;

pub use composer::{DIGITS, LOWERCASE, PasswordPolicy, SYMBOLS, UPPERCASE, compose};
pub use error::{ComposeError, StreamError};
pub use fingerprint::{
    DEFAULT_CELL_PIXELS, DIGEST_LEN, Fingerprint, GRID_CELLS, IdentityDigest, PixelGrid, Rgb,
    render_and_digest,
};
pub use generator::PasswordGenerator;
pub use sampler::{BoundedSampler, WordSource, fold_into_range};
pub use stream::{
    DEFAULT_BATCH_BLOCKS, DEFAULT_KDF_ITERATIONS, KeyedBlockStream, Position, StreamConfig,
};
