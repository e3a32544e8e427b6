//! Minimal BMP output for atlas pages and debugging.
//!
//! Always writes 24-bit uncompressed BMP with the 54-byte header and
//! rows padded to four bytes. Grayscale input is expanded by repeating
//! each byte across the three channels.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{ensure, Context, Result};

const HEADER_SIZE: u32 = 54;
// 72 DPI in pixels per meter
const RESOLUTION: u32 = 2835;

fn write_header(out: &mut impl Write, width: u32, height: u32) -> io::Result<u32> {
    let padded_width = (3 * width + 3) & !3;
    let bitmap_size = padded_width * height;

    out.write_all(&0x4d42u16.to_le_bytes())?;
    out.write_all(&(HEADER_SIZE + bitmap_size).to_le_bytes())?;
    out.write_all(&0u16.to_le_bytes())?;
    out.write_all(&0u16.to_le_bytes())?;
    out.write_all(&HEADER_SIZE.to_le_bytes())?;

    out.write_all(&40u32.to_le_bytes())?;
    out.write_all(&(width as i32).to_le_bytes())?;
    out.write_all(&(height as i32).to_le_bytes())?;
    out.write_all(&1u16.to_le_bytes())?;
    out.write_all(&24u16.to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;
    out.write_all(&bitmap_size.to_le_bytes())?;
    out.write_all(&RESOLUTION.to_le_bytes())?;
    out.write_all(&RESOLUTION.to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;
    out.write_all(&0u32.to_le_bytes())?;

    Ok(padded_width)
}

/// Writes one grayscale byte per pixel as 24-bit BMP.
pub fn write_bmp_gray(
    out: &mut impl Write,
    data: &[u8],
    width: u32,
    height: u32,
) -> io::Result<()> {
    let padded_width = write_header(out, width, height)?;
    let pad = vec![0u8; (padded_width - 3 * width) as usize];
    for row in data.chunks_exact(width as usize) {
        for &px in row {
            out.write_all(&[px, px, px])?;
        }
        out.write_all(&pad)?;
    }
    Ok(())
}

/// Writes RGB triplets as 24-bit BMP (stored BGR per the format).
pub fn write_bmp_rgb(out: &mut impl Write, data: &[u8], width: u32, height: u32) -> io::Result<()> {
    let padded_width = write_header(out, width, height)?;
    let pad = vec![0u8; (padded_width - 3 * width) as usize];
    for row in data.chunks_exact(3 * width as usize) {
        for px in row.chunks_exact(3) {
            out.write_all(&[px[2], px[1], px[0]])?;
        }
        out.write_all(&pad)?;
    }
    Ok(())
}

pub fn save_bmp_gray(path: &Path, data: &[u8], width: u32, height: u32) -> Result<()> {
    ensure!(
        data.len() == (width * height) as usize,
        "bitmap data length {} does not match {}x{}",
        data.len(),
        width,
        height
    );
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_bmp_gray(&mut out, data, width, height)
        .with_context(|| format!("writing {}", path.display()))?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_row_padding() {
        let mut out = Vec::new();
        // 3 pixels per row = 9 bytes, padded to 12
        write_bmp_gray(&mut out, &[0, 128, 255, 1, 2, 3], 3, 2).unwrap();
        assert_eq!(out.len(), 54 + 2 * 12);
        assert_eq!(&out[0..2], b"BM");
        assert_eq!(
            u32::from_le_bytes(out[2..6].try_into().unwrap()),
            54 + 24,
            "file size field"
        );
        assert_eq!(u32::from_le_bytes(out[10..14].try_into().unwrap()), 54);
        assert_eq!(i32::from_le_bytes(out[18..22].try_into().unwrap()), 3);
        assert_eq!(i32::from_le_bytes(out[22..26].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(out[28..30].try_into().unwrap()), 24);

        assert_eq!(&out[54..57], &[0, 0, 0], "gray byte repeated per channel");
        assert_eq!(&out[57..60], &[128, 128, 128]);
        assert_eq!(&out[63..66], &[0, 0, 0], "row padding is zero");
    }

    #[test]
    fn rgb_rows_are_stored_bgr() {
        let mut out = Vec::new();
        write_bmp_rgb(&mut out, &[10, 20, 30], 1, 1).unwrap();
        assert_eq!(&out[54..57], &[30, 20, 10]);
        assert_eq!(out.len(), 54 + 4, "one RGB pixel pads to four bytes");
    }
}
