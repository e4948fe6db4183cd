//! Fuzz target for password composition
//!
//! # Strategy
//!
//! - Word source: arbitrary scripted words, cycled, including all-zero and
//!   all-max runs that force long probe chains
//! - Policy: arbitrary small lengths and quotas, valid or overfull
//!
//! # Invariants
//!
//! - Overfull quotas MUST fail with a quota violation, never panic
//! - Accepted policies produce exactly `length` ASCII characters
//! - Each category appears exactly as often as its quota; lowercase fills
//!   the rest

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use seedpass_crypto::{
    compose, ComposeError, PasswordPolicy, StreamError, WordSource, DIGITS, LOWERCASE, SYMBOLS,
    UPPERCASE,
};

#[derive(Debug, Arbitrary)]
struct Input {
    length: u8,
    min_lowercase: u8,
    upper: u8,
    digits: u8,
    symbols: u8,
    words: Vec<u32>,
}

/// Replays `words` forever; an empty script yields zeros.
struct Cycle {
    words: Vec<u32>,
    next: usize,
}

impl WordSource for Cycle {
    fn next_word(&mut self) -> Result<u32, StreamError> {
        if self.words.is_empty() {
            return Ok(0);
        }
        let word = self.words[self.next % self.words.len()];
        self.next += 1;
        Ok(word)
    }
}

fn count(password: &str, alphabet: &[u8]) -> u32 {
    password.bytes().filter(|byte| alphabet.contains(byte)).count() as u32
}

fuzz_target!(|input: Input| {
    let policy = PasswordPolicy::with_length(u32::from(input.length))
        .min_lowercase(u32::from(input.min_lowercase))
        .upper(u32::from(input.upper))
        .digits(u32::from(input.digits))
        .symbols(u32::from(input.symbols));
    let mut source = Cycle { words: input.words, next: 0 };

    let placed = policy.num_upper + policy.num_digits + policy.num_symbols;
    let overfull = placed + policy.min_lowercase > policy.length;

    match compose(&mut source, &policy) {
        Ok(password) => {
            assert!(!overfull, "accepted overfull policy {policy:?}");
            assert_eq!(password.len(), policy.length as usize);
            assert_eq!(count(&password, UPPERCASE), policy.num_upper);
            assert_eq!(count(&password, DIGITS), policy.num_digits);
            assert_eq!(count(&password, SYMBOLS), policy.num_symbols);
            assert_eq!(count(&password, LOWERCASE), policy.length - placed);
        }
        Err(ComposeError::QuotaViolation { .. }) => assert!(overfull),
        Err(err) => panic!("unexpected error: {err:?}"),
    }
});
