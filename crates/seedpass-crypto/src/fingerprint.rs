//! Identity fingerprint: a symmetric colour grid plus the identity digest
//!
//! The identity seed keys its own stream (no salt, nonce 0). One word is
//! drawn per cell of the top-left quadrant:
//!
//! ```text
//!  x = 9 → 0 (outer), y = 9 → 0 (inner)
//!  ┌─────────┬─────────┐
//!  │ (x, y)  │ (M-x, y)│      M = GRID_CELLS - 1
//!  ├─────────┼─────────┤
//!  │ (x, M-y)│(M-x,M-y)│
//!  └─────────┴─────────┘
//! ```
//!
//! The low byte of each word, in draw order, becomes the 100-byte identity
//! digest that keys password generation. The grid lets a user check at a
//! glance that the seed was typed correctly before any password is derived.

use std::fmt;

use zeroize::Zeroize;

use crate::{
    error::StreamError,
    stream::{KeyedBlockStream, Position, StreamConfig},
};

/// Cells per grid side
pub const GRID_CELLS: usize = 20;

/// Cells per quadrant side
const QUADRANT_CELLS: usize = GRID_CELLS / 2;

/// Identity digest size (800 bits, one byte per quadrant cell)
pub const DIGEST_LEN: usize = QUADRANT_CELLS * QUADRANT_CELLS;

/// Default pixels per cell side (100 × 100 pixel image)
pub const DEFAULT_CELL_PIXELS: usize = 5;

/// Bytes per RGB pixel
const RGB_LEN: usize = 3;

/// 800-bit key material derived from the identity seed.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityDigest([u8; DIGEST_LEN]);

impl IdentityDigest {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Debug for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityDigest(..)")
    }
}

impl Drop for IdentityDigest {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// One cell colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Colour for one stream word: the word's low byte shifted by 0, 1 and 2
    /// bits.
    pub fn from_word(word: u32) -> Self {
        Self { r: word as u8, g: (word >> 1) as u8, b: (word >> 2) as u8 }
    }
}

/// Square grid of cell colours, symmetric about both axes.
#[derive(PartialEq, Eq)]
pub struct PixelGrid {
    /// Row-major RGB triples
    cells: [u8; GRID_CELLS * GRID_CELLS * RGB_LEN],
}

impl PixelGrid {
    fn blank() -> Self {
        Self { cells: [0; GRID_CELLS * GRID_CELLS * RGB_LEN] }
    }

    /// Cells per side.
    pub fn size(&self) -> usize {
        GRID_CELLS
    }

    /// Colour of the cell in column `x`, row `y`.
    pub fn cell(&self, x: usize, y: usize) -> Rgb {
        let offset = (y * GRID_CELLS + x) * RGB_LEN;
        Rgb { r: self.cells[offset], g: self.cells[offset + 1], b: self.cells[offset + 2] }
    }

    fn paint(&mut self, x: usize, y: usize, color: Rgb) {
        let offset = (y * GRID_CELLS + x) * RGB_LEN;
        self.cells[offset..offset + RGB_LEN].copy_from_slice(&[color.r, color.g, color.b]);
    }

    /// Row-major RGB8 pixel buffer with `cell_pixels` pixels per cell side.
    ///
    /// The image is `size() * cell_pixels` pixels wide and high.
    pub fn to_rgb(&self, cell_pixels: usize) -> Vec<u8> {
        let side = GRID_CELLS * cell_pixels;
        let mut pixels = Vec::with_capacity(side * side * RGB_LEN);
        for py in 0..side {
            for px in 0..side {
                let color = self.cell(px / cell_pixels, py / cell_pixels);
                pixels.extend_from_slice(&[color.r, color.g, color.b]);
            }
        }
        pixels
    }

    /// Binary PPM (P6) image of the grid.
    pub fn to_ppm(&self, cell_pixels: usize) -> Vec<u8> {
        let side = GRID_CELLS * cell_pixels;
        let mut image = format!("P6\n{side} {side}\n255\n").into_bytes();
        image.extend_from_slice(&self.to_rgb(cell_pixels));
        image
    }
}

impl fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelGrid").field("size", &GRID_CELLS).finish_non_exhaustive()
    }
}

// Red channels equal digest bytes
impl Drop for PixelGrid {
    fn drop(&mut self) {
        self.cells.zeroize();
    }
}

/// Digest and preview grid for one identity seed.
#[derive(Debug)]
pub struct Fingerprint {
    digest: IdentityDigest,
    grid: PixelGrid,
}

impl Fingerprint {
    /// Identity digest used as password key material.
    pub fn digest(&self) -> &IdentityDigest {
        &self.digest
    }

    /// Preview grid.
    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }
}

/// Derive the fingerprint of `identity_seed`.
///
/// Deterministic for a given seed and KDF cost. Runs one full PBKDF2
/// derivation, so callers on an async runtime should move it off the
/// reactor.
pub fn render_and_digest(
    identity_seed: &[u8],
    config: &StreamConfig,
) -> Result<Fingerprint, StreamError> {
    let mut stream = KeyedBlockStream::new(config.batch_blocks);
    stream.derive_key(identity_seed, &[], config.iterations)?;
    stream.set_position(Position::origin(0));

    let mut digest = [0u8; DIGEST_LEN];
    let mut grid = PixelGrid::blank();
    let mirror = GRID_CELLS - 1;
    let mut next = 0;

    for x in (0..QUADRANT_CELLS).rev() {
        for y in (0..QUADRANT_CELLS).rev() {
            let word = stream.next_word()?;
            digest[next] = word as u8;
            next += 1;

            let color = Rgb::from_word(word);
            grid.paint(x, y, color);
            grid.paint(mirror - x, y, color);
            grid.paint(mirror - x, mirror - y, color);
            grid.paint(x, mirror - y, color);
        }
    }

    let fingerprint = Fingerprint { digest: IdentityDigest(digest), grid };
    digest.zeroize();
    Ok(fingerprint)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn cheap() -> StreamConfig {
        StreamConfig { iterations: 1, batch_blocks: NonZeroUsize::new(8).unwrap() }
    }

    #[test]
    fn digest_is_800_bits() {
        assert_eq!(DIGEST_LEN, 100);
    }

    #[test]
    fn color_channels_from_word() {
        // 0xAEF6_8B90: low byte 0x90, >>1 low byte 0xC8, >>2 low byte 0xE4
        assert_eq!(Rgb::from_word(2_935_393_168), Rgb { r: 144, g: 200, b: 228 });
    }

    #[test]
    fn grid_is_symmetric() {
        let fingerprint = render_and_digest(b"symmetry", &cheap()).unwrap();
        let grid = fingerprint.grid();
        let m = GRID_CELLS - 1;

        for y in 0..GRID_CELLS {
            for x in 0..GRID_CELLS {
                let cell = grid.cell(x, y);
                assert_eq!(cell, grid.cell(m - x, y), "horizontal mirror at ({x}, {y})");
                assert_eq!(cell, grid.cell(x, m - y), "vertical mirror at ({x}, {y})");
                assert_eq!(cell, grid.cell(m - x, m - y), "rotation at ({x}, {y})");
            }
        }
    }

    #[test]
    fn digest_bytes_match_quadrant_red_channel() {
        let fingerprint = render_and_digest(b"order", &cheap()).unwrap();
        let digest = fingerprint.digest().as_bytes();

        // First draw is cell (9, 9), the eleventh is (8, 9)
        assert_eq!(fingerprint.grid().cell(9, 9).r, digest[0]);
        assert_eq!(fingerprint.grid().cell(9, 8).r, digest[1]);
        assert_eq!(fingerprint.grid().cell(8, 9).r, digest[10]);
        assert_eq!(fingerprint.grid().cell(0, 0).r, digest[99]);
    }

    #[test]
    fn same_seed_same_fingerprint() {
        let a = render_and_digest(b"again", &cheap()).unwrap();
        let b = render_and_digest(b"again", &cheap()).unwrap();

        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn rgb_buffer_dimensions() {
        let fingerprint = render_and_digest(b"pixels", &cheap()).unwrap();
        let pixels = fingerprint.grid().to_rgb(DEFAULT_CELL_PIXELS);

        assert_eq!(pixels.len(), 100 * 100 * 3);
        // pixel (7, 3) lies in cell (1, 0)
        let cell = fingerprint.grid().cell(1, 0);
        let offset = (3 * 100 + 7) * 3;
        assert_eq!(&pixels[offset..offset + 3], &[cell.r, cell.g, cell.b]);
    }

    #[test]
    fn ppm_header() {
        let fingerprint = render_and_digest(b"ppm", &cheap()).unwrap();
        let image = fingerprint.grid().to_ppm(2);

        let header = b"P6\n40 40\n255\n";
        assert_eq!(&image[..header.len()], header);
        assert_eq!(image.len(), header.len() + 40 * 40 * 3);
    }

    #[test]
    fn debug_redacts_digest() {
        let digest = IdentityDigest::from_bytes([0xAB; DIGEST_LEN]);
        assert_eq!(format!("{digest:?}"), "IdentityDigest(..)");
    }
}
