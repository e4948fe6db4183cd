//! Quota-driven password composition
//!
//! Characters are placed category by category into a fixed array of slots:
//!
//! 1. Uppercase, then digits, then symbols. Each character draws a slot index,
//!    then a character. An occupied slot is resolved by linear probing with
//!    wraparound, forward when the drawn index is even and backward when odd.
//! 2. Every slot still empty gets a lowercase letter, in index order.
//!
//! Category order, draw order and the probe direction all determine which
//! words land where, so none of them can change without changing every
//! derived password.

use zeroize::Zeroizing;

use crate::{
    error::ComposeError,
    sampler::{BoundedSampler, WordSource},
};

/// Lowercase letters
pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Uppercase letters
pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Decimal digits
pub const DIGITS: &[u8] = b"0123456789";

/// 32 punctuation characters
pub const SYMBOLS: &[u8] = b"~`!@#$%^&*_-+=(){}[]|\\:;\"'<>,.?/";

/// Length and per-category quotas of a generated password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Total number of characters
    pub length: u32,
    /// Minimum number of lowercase letters left after the other quotas
    pub min_lowercase: u32,
    /// Exact number of uppercase letters
    pub num_upper: u32,
    /// Exact number of digits
    pub num_digits: u32,
    /// Exact number of symbols
    pub num_symbols: u32,
}

impl PasswordPolicy {
    /// Length used by [`PasswordPolicy::default`].
    pub const DEFAULT_LENGTH: u32 = 25;

    /// Longest password [`compose`] accepts.
    pub const MAX_LENGTH: u32 = 4096;

    /// Policy for `length` characters with `ceil(length / 8)` uppercase,
    /// digits and symbols and at least one lowercase letter.
    pub fn with_length(length: u32) -> Self {
        let quota = length.div_ceil(8);
        Self {
            length,
            min_lowercase: 1,
            num_upper: quota,
            num_digits: quota,
            num_symbols: quota,
        }
    }

    /// Set the minimum lowercase count.
    pub fn min_lowercase(mut self, count: u32) -> Self {
        self.min_lowercase = count;
        self
    }

    /// Set the uppercase quota.
    pub fn upper(mut self, count: u32) -> Self {
        self.num_upper = count;
        self
    }

    /// Set the digit quota.
    pub fn digits(mut self, count: u32) -> Self {
        self.num_digits = count;
        self
    }

    /// Set the symbol quota.
    pub fn symbols(mut self, count: u32) -> Self {
        self.num_symbols = count;
        self
    }

    /// Number of lowercase letters the password will contain.
    ///
    /// Fails if the length exceeds [`Self::MAX_LENGTH`] or the other quotas
    /// leave fewer than `min_lowercase` slots.
    pub fn num_lowercase(&self) -> Result<u32, ComposeError> {
        if self.length > Self::MAX_LENGTH {
            return Err(ComposeError::LengthOutOfRange {
                length: self.length,
                max: Self::MAX_LENGTH,
            });
        }

        let requested =
            u64::from(self.num_upper) + u64::from(self.num_digits) + u64::from(self.num_symbols);
        let violation = ComposeError::QuotaViolation {
            length: self.length,
            requested,
            min_lowercase: self.min_lowercase,
        };

        let Some(lowercase) = u64::from(self.length).checked_sub(requested) else {
            return Err(violation);
        };
        if lowercase < u64::from(self.min_lowercase) {
            return Err(violation);
        }
        Ok(lowercase as u32)
    }

    /// Placed categories in draw order.
    fn placed_categories(&self) -> [(&'static [u8], u32); 3] {
        [(UPPERCASE, self.num_upper), (DIGITS, self.num_digits), (SYMBOLS, self.num_symbols)]
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::with_length(Self::DEFAULT_LENGTH)
    }
}

/// Compose one password from `source` under `policy`.
///
/// Consumes words from wherever the source currently stands; callers that
/// need reproducible output reset the source first. On error no partial
/// password is returned.
pub fn compose<S>(source: &mut S, policy: &PasswordPolicy) -> Result<String, ComposeError>
where
    S: WordSource + ?Sized,
{
    policy.num_lowercase()?;

    let mut slots: Zeroizing<Vec<Option<u8>>> = Zeroizing::new(vec![None; policy.length as usize]);

    for (alphabet, quota) in policy.placed_categories() {
        for _ in 0..quota {
            // quota > 0 implies length > 0
            let mut index = source.sample_max(policy.length - 1)? as usize;
            let character = pick(source, alphabet)?;
            if slots[index].is_some() {
                index = probe(&slots, index);
            }
            slots[index] = Some(character);
        }
    }

    for slot in slots.iter_mut() {
        if slot.is_none() {
            *slot = Some(pick(source, LOWERCASE)?);
        }
    }

    Ok(slots.iter().flatten().map(|&byte| char::from(byte)).collect())
}

/// Draw one character of `alphabet`.
fn pick<S>(source: &mut S, alphabet: &[u8]) -> Result<u8, ComposeError>
where
    S: WordSource + ?Sized,
{
    let index = source.sample_max(alphabet.len() as u32 - 1)?;
    Ok(alphabet[index as usize])
}

/// Find the nearest empty slot from an occupied `start`.
///
/// Even indices scan forward, odd indices backward, both wrapping. At least
/// one slot is empty because the placed quotas never exceed the length.
fn probe(slots: &[Option<u8>], start: usize) -> usize {
    let len = slots.len();
    let forward = start % 2 == 0;
    let mut index = start;
    loop {
        index = if forward {
            (index + 1) % len
        } else {
            index.checked_sub(1).unwrap_or(len - 1)
        };
        if slots[index].is_none() {
            return index;
        }
    }
}
