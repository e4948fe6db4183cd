//! Terminal and file output for the identity fingerprint

use std::{
    io::{self, Write},
    path::Path,
};

use seedpass_crypto::{PixelGrid, Rgb};

/// Reset all terminal attributes
const RESET: &str = "\x1b[0m";

/// Draw `grid` with 24-bit background colours, two columns per cell so
/// cells come out roughly square.
pub fn write_ansi<W: Write>(grid: &PixelGrid, out: &mut W) -> io::Result<()> {
    for y in 0..grid.size() {
        for x in 0..grid.size() {
            let Rgb { r, g, b } = grid.cell(x, y);
            write!(out, "\x1b[48;2;{r};{g};{b}m  ")?;
        }
        writeln!(out, "{RESET}")?;
    }
    out.flush()
}

/// Write `grid` as a binary PPM image.
pub fn export_ppm(grid: &PixelGrid, cell_pixels: usize, path: &Path) -> io::Result<()> {
    std::fs::write(path, grid.to_ppm(cell_pixels))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use seedpass_crypto::{Fingerprint, GRID_CELLS, StreamConfig, render_and_digest};

    use super::*;

    fn fingerprint() -> Fingerprint {
        let config = StreamConfig { iterations: 1, batch_blocks: NonZeroUsize::new(200).unwrap() };
        render_and_digest(b"john01011990Secret123", &config).unwrap()
    }

    #[test]
    fn ansi_draws_one_line_per_row() {
        let fingerprint = fingerprint();
        let mut out = Vec::new();
        write_ansi(fingerprint.grid(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), GRID_CELLS);
        for line in lines {
            assert_eq!(line.matches("\x1b[48;2;").count(), GRID_CELLS);
            assert!(line.ends_with(RESET));
        }
    }

    #[test]
    fn ansi_starts_with_top_left_cell() {
        let fingerprint = fingerprint();
        let mut out = Vec::new();
        write_ansi(fingerprint.grid(), &mut out).unwrap();

        let Rgb { r, g, b } = fingerprint.grid().cell(0, 0);
        let expected = format!("\x1b[48;2;{r};{g};{b}m  ");
        assert!(String::from_utf8(out).unwrap().starts_with(&expected));
    }

    #[test]
    fn export_writes_ppm() {
        let fingerprint = fingerprint();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fingerprint.ppm");

        export_ppm(fingerprint.grid(), 5, &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, fingerprint.grid().to_ppm(5));
        assert!(written.starts_with(b"P6\n100 100\n255\n"));
    }
}
