//! Distance-field rasterization and page packing for a set of glyphs.

use log::warn;

use crate::distance::{distance_sign_correction, generate_sdf, FillRule, GeneratorConfig};
use crate::image::Bitmap;
use crate::pipeline::{GlyphGeometry, ProgressListener};

use super::slots::SlotArena;
use super::texture::TextureAtlas;

const GLYPH_FILL_RULE: FillRule = FillRule::NonZero;

#[derive(Clone, Copy, Debug)]
pub struct PackerConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// Resolve overlapping contours by winding during SDF generation.
    pub overlap_support: bool,
    /// Run the scanline sign-correction pass on every glyph bitmap.
    pub scanline_pass: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        PackerConfig {
            max_width: 1024,
            max_height: 1024,
            overlap_support: false,
            scanline_pass: false,
        }
    }
}

/// Rasterizes glyph boxes into byte bitmaps and packs them into one or
/// more fixed-size pages.
#[derive(Default)]
pub struct AtlasPacker {
    width: u32,
    height: u32,
    pages: Vec<Vec<u8>>,
}

fn pixel_float_to_byte(value: f32) -> u8 {
    ((256.0 * value) as i32).clamp(0, 255) as u8
}

impl AtlasPacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pages(&self) -> &[Vec<u8>] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Vec<u8>> {
        self.pages
    }

    /// Probes for the smallest page size that fits every glyph box,
    /// starting at 4x4 and doubling the smaller dimension until
    /// everything fits or the maximum is reached.
    fn probe_page_size(glyphs: &[&mut GlyphGeometry], max_width: u32, max_height: u32) -> (u32, u32) {
        let mut width = 4u32.min(max_width.max(1));
        let mut height = 4u32.min(max_height.max(1));
        loop {
            let mut arena = SlotArena::new(width, height);
            let enough = glyphs.iter().all(|glyph| {
                let (w, h) = glyph.box_size();
                w == 0 || h == 0 || arena.find_slot(w, h).is_some()
            });
            if enough || (width >= max_width && height >= max_height) {
                return (width, height);
            }
            if width <= height {
                width = max_width.min(2 * width);
            } else {
                height = max_height.min(2 * height);
            }
        }
    }

    /// Generates every glyph's SDF bitmap and packs them. Glyph box
    /// positions and texture indices are written back into the glyphs;
    /// the finished pages are kept on the packer.
    pub fn pack(
        &mut self,
        glyphs: &mut [&mut GlyphGeometry],
        config: &PackerConfig,
        listener: &mut dyn ProgressListener,
    ) {
        let (width, height) = Self::probe_page_size(glyphs, config.max_width, config.max_height);
        self.width = width;
        self.height = height;
        self.pages.clear();

        let generator_config = GeneratorConfig {
            overlap_support: config.overlap_support,
        };

        let total = glyphs.len();
        for (current, glyph) in glyphs.iter_mut().enumerate() {
            listener.update_progress(current, total);

            let (w, h) = glyph.box_size();
            let mut sdf = Bitmap::<f32>::new(w as usize, h as usize);
            generate_sdf(
                &mut sdf,
                glyph.shape(),
                &glyph.box_projection(),
                glyph.box_range(),
                &generator_config,
            );
            if config.scanline_pass {
                distance_sign_correction(
                    &mut sdf,
                    glyph.shape(),
                    &glyph.box_projection(),
                    GLYPH_FILL_RULE,
                );
            }

            // pages store rows top to bottom while the field is generated
            // bottom-up, so flip while converting to bytes
            let mut bitmap = Vec::with_capacity((w * h) as usize);
            for y in (0..h as usize).rev() {
                for x in 0..w as usize {
                    bitmap.push(pixel_float_to_byte(sdf.pixel(x, y)));
                }
            }
            glyph.bitmap = bitmap;
        }

        let mut atlas = TextureAtlas::new(width, height, 1);
        let mut texture_index = 0u32;
        for glyph in glyphs.iter_mut() {
            let (w, h) = glyph.box_size();
            if w == 0 || h == 0 {
                continue;
            }
            let placed = match atlas.add_texture(w, h, &glyph.bitmap) {
                Some(position) => Some(position),
                None => {
                    self.pages.push(atlas.finish_page());
                    texture_index += 1;
                    atlas.add_texture(w, h, &glyph.bitmap)
                }
            };
            match placed {
                Some((x, y)) => glyph.place_box(x, y),
                None => {
                    warn!(
                        "glyph box {}x{} exceeds the maximum page size {}x{}",
                        w, h, width, height
                    );
                    glyph.place_box(0, 0);
                }
            }
            glyph.texture_index = texture_index;
        }
        self.pages.push(atlas.finish_page());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_to_byte_conversion_clamps() {
        assert_eq!(pixel_float_to_byte(0.0), 0);
        assert_eq!(pixel_float_to_byte(-2.0), 0);
        assert_eq!(pixel_float_to_byte(1.0), 255);
        assert_eq!(pixel_float_to_byte(0.5), 128);
    }
}
