//! Font file access built on `ttf-parser`.
//!
//! Everything is reported in raw font units; callers normalize by the em
//! size. The [`FontSource`] and [`FontLoader`] traits keep the pipeline
//! testable without shipping font binaries.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use kurbo::Point;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::geometry::{Contour, EdgeSegment, Shape};

/// Code point reserved for the missing-glyph box. Mapping it always
/// succeeds and resolves to glyph 0 when the font has no entry for it.
pub const MISSING_GLYPH_CODEPOINT: u32 = 0x7F;

/// Vertical metrics of one face, in font units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    pub em_size: f64,
    pub ascender_y: f64,
    pub descender_y: f64,
    pub line_height: f64,
    pub underline_y: f64,
    pub underline_thickness: f64,
}

/// One glyph's outline and horizontal metrics, in font units.
#[derive(Clone, Debug, Default)]
pub struct GlyphOutline {
    pub shape: Shape,
    pub advance: f64,
    pub bearing_x: f64,
    pub bearing_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Family and subfamily names of one face in a font file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceNames {
    pub family: String,
    pub style: String,
}

/// Read access to one loaded face.
pub trait FontSource {
    /// Maps a code point through the character map. Returns `None` when
    /// unmapped, except for [`MISSING_GLYPH_CODEPOINT`] which resolves
    /// to glyph 0.
    fn glyph_index(&self, codepoint: u32) -> Option<u32>;

    fn glyph_count(&self) -> u32;

    fn load_glyph(&self, index: u32) -> Option<GlyphOutline>;

    fn metrics(&self) -> Option<FontMetrics>;

    /// Advances of the space and tab characters. Unmapped characters
    /// fall back to glyph 0, matching what rasterizers do at layout
    /// time.
    fn whitespace_advances(&self) -> Option<(f64, f64)>;

    /// Horizontal kerning between two glyph indices, in font units.
    fn kerning(&self, _left: u32, _right: u32) -> Option<f64> {
        None
    }
}

/// Opens faces from font files.
pub trait FontLoader {
    fn open(&self, path: &Path, face_index: u32) -> Result<Box<dyn FontSource>>;

    fn face_count(&self, _path: &Path) -> Result<u32> {
        Ok(1)
    }

    fn face_names(&self, _path: &Path) -> Result<Vec<FaceNames>> {
        Ok(Vec::new())
    }
}

/// Loader for TrueType and OpenType files (and collections) backed by
/// `ttf-parser`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TtfFontLoader;

impl FontLoader for TtfFontLoader {
    fn open(&self, path: &Path, face_index: u32) -> Result<Box<dyn FontSource>> {
        let data = std::fs::read(path)
            .with_context(|| format!("reading font file {}", path.display()))?;
        Face::parse(&data, face_index)
            .map_err(|err| anyhow!("parsing {} face {}: {}", path.display(), face_index, err))?;
        Ok(Box::new(TtfFont { data, face_index }))
    }

    fn face_count(&self, path: &Path) -> Result<u32> {
        let data = std::fs::read(path)
            .with_context(|| format!("reading font file {}", path.display()))?;
        Ok(ttf_parser::fonts_in_collection(&data).unwrap_or(1))
    }

    fn face_names(&self, path: &Path) -> Result<Vec<FaceNames>> {
        let data = std::fs::read(path)
            .with_context(|| format!("reading font file {}", path.display()))?;
        let count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
        let mut names = Vec::with_capacity(count as usize);
        for index in 0..count {
            let face = Face::parse(&data, index)
                .map_err(|err| anyhow!("parsing {} face {}: {}", path.display(), index, err))?;
            let mut entry = FaceNames::default();
            for name in face.names() {
                if !name.is_unicode() {
                    continue;
                }
                match name.name_id {
                    ttf_parser::name_id::FAMILY if entry.family.is_empty() => {
                        if let Some(value) = name.to_string() {
                            entry.family = value;
                        }
                    }
                    ttf_parser::name_id::SUBFAMILY if entry.style.is_empty() => {
                        if let Some(value) = name.to_string() {
                            entry.style = value;
                        }
                    }
                    _ => {}
                }
            }
            names.push(entry);
        }
        Ok(names)
    }
}

/// One face of a loaded font file. The raw bytes are owned and the face
/// table directory is re-read per query, which is cheap since parsing
/// only locates table offsets.
pub struct TtfFont {
    data: Vec<u8>,
    face_index: u32,
}

impl TtfFont {
    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.face_index).ok()
    }
}

impl FontSource for TtfFont {
    fn glyph_index(&self, codepoint: u32) -> Option<u32> {
        let face = self.face()?;
        let mapped = char::from_u32(codepoint)
            .and_then(|c| face.glyph_index(c))
            .map(|id| u32::from(id.0));
        match mapped {
            Some(index) => Some(index),
            None if codepoint == MISSING_GLYPH_CODEPOINT => Some(0),
            None => None,
        }
    }

    fn glyph_count(&self) -> u32 {
        self.face()
            .map(|face| u32::from(face.number_of_glyphs()))
            .unwrap_or(0)
    }

    fn load_glyph(&self, index: u32) -> Option<GlyphOutline> {
        let face = self.face()?;
        if index >= u32::from(face.number_of_glyphs()) {
            return None;
        }
        let glyph = GlyphId(index as u16);

        let mut outline = GlyphOutline {
            advance: face.glyph_hor_advance(glyph).map(f64::from).unwrap_or(0.0),
            ..GlyphOutline::default()
        };

        let mut builder = ShapeBuilder::default();
        match face.outline_glyph(glyph, &mut builder) {
            Some(bbox) => {
                outline.bearing_x = f64::from(bbox.x_min);
                outline.bearing_y = f64::from(bbox.y_max);
                outline.width = f64::from(bbox.width());
                outline.height = f64::from(bbox.height());
            }
            // no outline: a whitespace glyph with metrics only
            None => {
                outline.bearing_x = face
                    .glyph_hor_side_bearing(glyph)
                    .map(f64::from)
                    .unwrap_or(0.0);
            }
        }
        outline.shape = builder.finish();
        Some(outline)
    }

    fn metrics(&self) -> Option<FontMetrics> {
        let face = self.face()?;
        let underline = face.underline_metrics();
        Some(FontMetrics {
            em_size: f64::from(face.units_per_em()),
            ascender_y: f64::from(face.ascender()),
            descender_y: f64::from(face.descender()),
            line_height: f64::from(face.height()) + f64::from(face.line_gap()),
            underline_y: underline.map(|m| f64::from(m.position)).unwrap_or(0.0),
            underline_thickness: underline.map(|m| f64::from(m.thickness)).unwrap_or(0.0),
        })
    }

    fn whitespace_advances(&self) -> Option<(f64, f64)> {
        let face = self.face()?;
        let advance = |c: char| {
            let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
            face.glyph_hor_advance(glyph).map(f64::from).unwrap_or(0.0)
        };
        Some((advance(' '), advance('\t')))
    }

    fn kerning(&self, left: u32, right: u32) -> Option<f64> {
        let face = self.face()?;
        let kern = face.tables().kern?;
        let (left, right) = (GlyphId(left as u16), GlyphId(right as u16));
        for subtable in kern.subtables {
            if !subtable.horizontal || subtable.variable {
                continue;
            }
            if let Some(value) = subtable.glyphs_kerning(left, right) {
                return Some(f64::from(value));
            }
        }
        None
    }
}

/// Collects `ttf-parser` outline callbacks into a [`Shape`]. Zero-length
/// line segments are dropped and every contour is explicitly closed back
/// to its start point.
#[derive(Default)]
struct ShapeBuilder {
    shape: Shape,
    contour: Contour,
    position: Point,
    start: Point,
}

impl ShapeBuilder {
    fn flush_contour(&mut self) {
        if !self.contour.edges.is_empty() {
            self.shape.add_contour(std::mem::take(&mut self.contour));
        }
    }

    fn finish(mut self) -> Shape {
        self.flush_contour();
        self.shape
    }
}

impl OutlineBuilder for ShapeBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush_contour();
        self.position = Point::new(f64::from(x), f64::from(y));
        self.start = self.position;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let end = Point::new(f64::from(x), f64::from(y));
        if end != self.position {
            self.contour
                .add_edge(EdgeSegment::linear(self.position, end));
            self.position = end;
        }
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let control = Point::new(f64::from(x1), f64::from(y1));
        let end = Point::new(f64::from(x), f64::from(y));
        self.contour
            .add_edge(EdgeSegment::quadratic(self.position, control, end));
        self.position = end;
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let control1 = Point::new(f64::from(x1), f64::from(y1));
        let control2 = Point::new(f64::from(x2), f64::from(y2));
        let end = Point::new(f64::from(x), f64::from(y));
        self.contour
            .add_edge(EdgeSegment::cubic(self.position, control1, control2, end));
        self.position = end;
    }

    fn close(&mut self) {
        if self.position != self.start {
            self.contour
                .add_edge(EdgeSegment::linear(self.position, self.start));
            self.position = self.start;
        }
        self.flush_contour();
    }
}
