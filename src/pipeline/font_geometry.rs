//! Glyphs and metrics loaded from a single font face.

use std::collections::HashMap;

use crate::charset::{Charset, FontStyle};
use crate::font::{FontMetrics, FontSource};

use super::glyph::GlyphGeometry;

/// Fallback em size for fonts that report none.
const DEFAULT_EM_SIZE: f64 = 32.0;

#[derive(Default)]
pub struct FontGeometry {
    geometry_scale: f64,
    metrics: FontMetrics,
    style: FontStyle,
    glyphs: Vec<GlyphGeometry>,
    by_index: HashMap<u32, usize>,
    by_codepoint: HashMap<u32, usize>,
}

impl FontGeometry {
    pub fn new() -> Self {
        FontGeometry {
            geometry_scale: 1.0,
            ..Self::default()
        }
    }

    /// Reads the face metrics and rescales them so the em size equals
    /// `font_scale`. All glyphs loaded afterwards use the same scale.
    pub fn load_metrics(&mut self, font: &dyn FontSource, font_scale: f64) -> bool {
        let Some(mut metrics) = font.metrics() else {
            return false;
        };
        if metrics.em_size <= 0.0 {
            metrics.em_size = DEFAULT_EM_SIZE;
        }
        self.geometry_scale = font_scale / metrics.em_size;
        metrics.em_size *= self.geometry_scale;
        metrics.ascender_y *= self.geometry_scale;
        metrics.descender_y *= self.geometry_scale;
        metrics.line_height *= self.geometry_scale;
        metrics.underline_y *= self.geometry_scale;
        metrics.underline_thickness *= self.geometry_scale;
        self.metrics = metrics;
        true
    }

    /// Loads every code point of `charset` that the font can map and
    /// outline. Returns the number of glyphs loaded, or `None` when the
    /// face metrics cannot be read.
    pub fn load_charset(
        &mut self,
        font: &dyn FontSource,
        font_scale: f64,
        charset: &Charset,
    ) -> Option<usize> {
        if !self.load_metrics(font, font_scale) {
            return None;
        }
        self.glyphs.reserve(charset.len());
        let mut loaded = 0;
        for &codepoint in charset.codepoints() {
            if let Some(glyph) = GlyphGeometry::load_codepoint(font, self.geometry_scale, codepoint)
            {
                self.add_glyph(glyph);
                loaded += 1;
            }
        }
        self.style = charset.style();
        Some(loaded)
    }

    /// Like [`load_charset`](Self::load_charset) but the charset entries
    /// are raw glyph indices instead of code points.
    pub fn load_glyphset(
        &mut self,
        font: &dyn FontSource,
        font_scale: f64,
        charset: &Charset,
    ) -> Option<usize> {
        if !self.load_metrics(font, font_scale) {
            return None;
        }
        self.glyphs.reserve(charset.len());
        let mut loaded = 0;
        for &index in charset.codepoints() {
            if let Some(glyph) = GlyphGeometry::load(font, self.geometry_scale, index) {
                self.add_glyph(glyph);
                loaded += 1;
            }
        }
        self.style = charset.style();
        Some(loaded)
    }

    pub fn add_glyph(&mut self, glyph: GlyphGeometry) {
        let slot = self.glyphs.len();
        self.by_index.insert(glyph.index(), slot);
        if glyph.codepoint() != 0 {
            self.by_codepoint.insert(glyph.codepoint(), slot);
        }
        self.glyphs.push(glyph);
    }

    pub fn geometry_scale(&self) -> f64 {
        self.geometry_scale
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn glyphs(&self) -> &[GlyphGeometry] {
        &self.glyphs
    }

    pub fn glyphs_mut(&mut self) -> &mut [GlyphGeometry] {
        &mut self.glyphs
    }

    pub fn glyph_by_index(&self, index: u32) -> Option<&GlyphGeometry> {
        self.by_index.get(&index).map(|&slot| &self.glyphs[slot])
    }

    pub fn glyph_by_codepoint(&self, codepoint: u32) -> Option<&GlyphGeometry> {
        self.by_codepoint
            .get(&codepoint)
            .map(|&slot| &self.glyphs[slot])
    }
}
