//! Keyed block stream: a PBKDF2-keyed AES-256-CTR keystream read as words
//!
//! The key is stretched once from a low-entropy seed. Words are then cut from
//! the keystream produced by encrypting zero blocks in counter mode.
//!
//! ```text
//! IV (16 bytes)
//! ┌──────────────────────────┬──────────────────────────┐
//! │ nonce (u64, big-endian)  │ counter (u64, big-endian)│
//! └──────────────────────────┴──────────────────────────┘
//!   fixed per context          +1 per block, wraps mod 2^64
//! ```
//!
//! # Security
//!
//! - The (nonce, counter) pair never repeats under one key: the counter only
//!   moves forward while reading, and every refill advances it by the number
//!   of blocks consumed
//! - Key bytes are dropped right after the AES key schedule is built
//! - Buffered keystream words are zeroized when invalidated and on drop

use std::{fmt, num::NonZeroUsize};

use aes::{
    Aes256, Block,
    cipher::{BlockEncrypt, KeyInit},
};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::{error::StreamError, sampler::WordSource};

/// PBKDF2 rounds used when no other cost is configured
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Blocks encrypted per refill
pub const DEFAULT_BATCH_BLOCKS: NonZeroUsize = match NonZeroUsize::new(200) {
    Some(blocks) => blocks,
    None => unreachable!(),
};

/// AES-256 key size
const KEY_LEN: usize = 32;

/// AES block size
const BLOCK_LEN: usize = 16;

/// Bytes per emitted word
const WORD_LEN: usize = 4;

/// Cost and batching parameters for a [`KeyedBlockStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// PBKDF2-HMAC-SHA256 rounds
    pub iterations: u32,
    /// Blocks encrypted per refill. Never changes the emitted words, only
    /// how often the cipher is called.
    pub batch_blocks: NonZeroUsize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { iterations: DEFAULT_KDF_ITERATIONS, batch_blocks: DEFAULT_BATCH_BLOCKS }
    }
}

/// Partial update of the IV. Fields left as `None` are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Upper 64 bits of the IV
    pub nonce: Option<u64>,
    /// Lower 64 bits of the IV, counted in blocks
    pub counter: Option<u64>,
}

impl Position {
    /// Update only the nonce.
    pub fn nonce(nonce: u64) -> Self {
        Self { nonce: Some(nonce), counter: None }
    }

    /// Update only the counter.
    pub fn counter(counter: u64) -> Self {
        Self { nonce: None, counter: Some(counter) }
    }

    /// Start of the stream for `nonce`.
    pub fn origin(nonce: u64) -> Self {
        Self { nonce: Some(nonce), counter: Some(0) }
    }
}

/// Deterministic pseudorandom word stream keyed from a seed.
///
/// One instance serves one derivation context. Instances are never shared
/// between a fingerprint and a password generation.
pub struct KeyedBlockStream {
    /// AES key schedule, `None` until [`derive_key`](Self::derive_key)
    cipher: Option<Aes256>,
    nonce: u64,
    counter: u64,
    batch_blocks: NonZeroUsize,
    /// Keystream words from the last refill
    words: Vec<u32>,
    /// Next unread index into `words`
    cursor: usize,
}

impl KeyedBlockStream {
    /// Create an unkeyed stream that refills `batch_blocks` blocks at a time.
    pub fn new(batch_blocks: NonZeroUsize) -> Self {
        Self {
            cipher: None,
            nonce: 0,
            counter: 0,
            batch_blocks,
            words: Vec::with_capacity(batch_blocks.get() * BLOCK_LEN / WORD_LEN),
            cursor: 0,
        }
    }

    /// Stretch `seed` and `salt` into a fresh AES-256 key.
    ///
    /// Resets nonce, counter and any buffered words. Same seed, salt and
    /// iterations always produce the same key.
    pub fn derive_key(
        &mut self,
        seed: &[u8],
        salt: &[u8],
        iterations: u32,
    ) -> Result<(), StreamError> {
        if iterations == 0 {
            return Err(StreamError::ZeroIterations);
        }

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::pbkdf2_hmac::<Sha256>(seed, salt, iterations, &mut key[..]);

        let Ok(cipher) = Aes256::new_from_slice(&key[..]) else {
            unreachable!("AES-256 accepts a 32-byte key");
        };

        self.cipher = Some(cipher);
        self.nonce = 0;
        self.counter = 0;
        self.invalidate();
        Ok(())
    }

    /// Set either or both halves of the IV.
    ///
    /// Always discards buffered words, so the next read encrypts from the
    /// new position.
    pub fn set_position(&mut self, position: Position) {
        if let Some(nonce) = position.nonce {
            self.nonce = nonce;
        }
        if let Some(counter) = position.counter {
            self.counter = counter;
        }
        self.invalidate();
    }

    /// Current counter half of the IV.
    ///
    /// Counts blocks already encrypted into the buffer, not words read.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Current nonce half of the IV.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Index of the next word within the current buffer.
    pub fn buffer_index(&self) -> usize {
        self.cursor
    }

    /// Whether a key has been derived.
    pub fn is_keyed(&self) -> bool {
        self.cipher.is_some()
    }

    /// Next 32-bit word of the keystream.
    pub fn next_word(&mut self) -> Result<u32, StreamError> {
        if self.cursor == self.words.len() {
            self.refill()?;
        }
        let word = self.words[self.cursor];
        self.cursor += 1;
        Ok(word)
    }

    /// Encrypt the next batch of counter blocks into the word buffer.
    fn refill(&mut self) -> Result<(), StreamError> {
        let cipher = self.cipher.as_ref().ok_or(StreamError::KeyNotDerived)?;
        let blocks_len = self.batch_blocks.get();

        // E(IV) XOR zero plaintext is the keystream itself
        let mut blocks: Vec<Block> = (0..blocks_len)
            .map(|offset| counter_block(self.nonce, self.counter.wrapping_add(offset as u64)))
            .collect();
        cipher.encrypt_blocks(&mut blocks);

        self.words.zeroize();
        for block in &mut blocks {
            self.words.extend(
                block
                    .chunks_exact(WORD_LEN)
                    .map(|bytes| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
            );
            block.as_mut_slice().zeroize();
        }

        self.counter = self.counter.wrapping_add(blocks_len as u64);
        self.cursor = 0;
        Ok(())
    }

    fn invalidate(&mut self) {
        self.words.zeroize();
        self.cursor = 0;
    }
}

impl Default for KeyedBlockStream {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_BLOCKS)
    }
}

impl WordSource for KeyedBlockStream {
    fn next_word(&mut self) -> Result<u32, StreamError> {
        KeyedBlockStream::next_word(self)
    }
}

impl fmt::Debug for KeyedBlockStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedBlockStream")
            .field("keyed", &self.is_keyed())
            .field("nonce", &self.nonce)
            .field("counter", &self.counter)
            .field("buffered", &(self.words.len() - self.cursor))
            .finish_non_exhaustive()
    }
}

impl Drop for KeyedBlockStream {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}

/// Build one 16-byte counter block.
///
/// Structure:
/// - bytes 0-7: nonce (big-endian)
/// - bytes 8-15: counter (big-endian)
fn counter_block(nonce: u64, counter: u64) -> Block {
    let mut iv = [0u8; BLOCK_LEN];
    iv[0..8].copy_from_slice(&nonce.to_be_bytes());
    iv[8..16].copy_from_slice(&counter.to_be_bytes());
    Block::clone_from_slice(&iv)
}
