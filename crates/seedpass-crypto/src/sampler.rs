//! Bounded integer sampling over a word stream
//!
//! Words at or below the range width pass through unchanged; larger words
//! are folded with a modulo. No rejection sampling: the fold biases toward
//! the low end of ranges whose width is not `2^k - 1`. Every previously
//! derived password depends on this exact mapping.

use crate::error::StreamError;

/// Source of 32-bit pseudorandom words.
pub trait WordSource {
    /// Next word of the source.
    fn next_word(&mut self) -> Result<u32, StreamError>;
}

/// Integer sampling on top of any [`WordSource`].
pub trait BoundedSampler: WordSource {
    /// Raw unbounded word.
    fn sample_word(&mut self) -> Result<u32, StreamError> {
        self.next_word()
    }

    /// Integer in `[0, max]`.
    fn sample_max(&mut self, max: u32) -> Result<u32, StreamError> {
        self.sample_range(0, max)
    }

    /// Integer in `[min, max]`. Reversed bounds are swapped.
    fn sample_range(&mut self, min: u32, max: u32) -> Result<u32, StreamError> {
        let word = self.next_word()?;
        Ok(fold_into_range(word, min, max))
    }
}

impl<S: WordSource + ?Sized> BoundedSampler for S {}

/// Map one word into `[min, max]`.
pub fn fold_into_range(word: u32, min: u32, max: u32) -> u32 {
    let (low, high) = if min > max { (max, min) } else { (min, max) };
    let range = high - low;

    // word > range implies range < u32::MAX, so range + 1 cannot overflow
    let offset = if word > range { word % (range + 1) } else { word };
    low + offset
}
