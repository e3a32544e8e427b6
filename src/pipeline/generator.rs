//! End-to-end atlas generation from a list of font inputs.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::atlas::{AtlasPacker, PackerConfig};
use crate::charset::{Charset, CharsetCollector, FontStyle};
use crate::font::{FontHolder, FontLoader, FontSource};

use super::font_geometry::FontGeometry;
use super::glyph::GlyphGeometry;
use super::listener::ProgressListener;

/// How charset entries are interpreted when loading glyphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlyphIdentifier {
    #[default]
    Codepoint,
    GlyphIndex,
}

/// One font face plus the character set to render from it.
#[derive(Clone, Debug)]
pub struct FontInput {
    pub charset_name: String,
    pub filename: PathBuf,
    pub face_index: u32,
    pub style: FontStyle,
    /// Charset description; empty selects the ASCII fallback set.
    pub charset: String,
    pub identifier: GlyphIdentifier,
    /// Em size the glyph geometry is normalized to; values <= 0 mean 1.
    pub font_scale: f64,
    pub px_range: f64,
}

impl Default for FontInput {
    fn default() -> Self {
        FontInput {
            charset_name: String::new(),
            filename: PathBuf::new(),
            face_index: 0,
            style: FontStyle::Normal,
            charset: String::new(),
            identifier: GlyphIdentifier::Codepoint,
            font_scale: 0.0,
            px_range: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GeneratorSettings {
    pub max_width: u32,
    pub max_height: u32,
    pub overlap_support: bool,
    pub scanline_pass: bool,
    pub custom_baseline_offset: f32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            max_width: 1024,
            max_height: 1024,
            overlap_support: false,
            scanline_pass: false,
            custom_baseline_offset: 0.0,
        }
    }
}

/// One rendered glyph in the emitted character table.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct FontCharacter {
    pub start_u: f32,
    pub start_v: f32,
    pub u_size: f32,
    pub v_size: f32,
    pub advance: f32,
    pub horizontal_offset: f32,
    pub ascender_y: f32,
    pub scale: f32,
    pub texture_index: u32,
    pub screen_px_range_index: u32,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct KerningPair {
    pub left: u32,
    pub right: u32,
    pub advance: f32,
}

/// Everything a renderer needs to lay out text from the atlas.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FontInfo {
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub import_font_size: f32,
    pub line_height: f32,
    pub baseline: f32,
    pub baseline_offset: f32,
    pub underline_y: f32,
    pub underline_thickness: f32,
    pub space_advance: f32,
    pub tab_advance: f32,
    pub missing_glyph_index: Option<u32>,
    pub characters: Vec<FontCharacter>,
    pub screen_px_ranges: Vec<[f32; 2]>,
    pub kerning: Vec<KerningPair>,
    pub normal_remap: HashMap<u32, u32>,
    pub bold_remap: HashMap<u32, u32>,
    pub italic_remap: HashMap<u32, u32>,
    pub bold_italic_remap: HashMap<u32, u32>,
}

pub struct FontAtlas {
    pub info: FontInfo,
    /// Single-channel pages in top-left row order.
    pub pages: Vec<Vec<u8>>,
}

#[derive(Default)]
struct Supplements {
    space_advance: f32,
    tab_advance: f32,
    have_whitespace: bool,
    kerning: Vec<KerningPair>,
}

impl Supplements {
    fn collect(&mut self, font: &dyn FontSource, geometry: &FontGeometry) {
        if !self.have_whitespace {
            if let Some((space, tab)) = font.whitespace_advances() {
                self.space_advance = (space * geometry.geometry_scale()) as f32;
                self.tab_advance = (tab * geometry.geometry_scale()) as f32;
                self.have_whitespace = true;
            }
        }
        for left in geometry.glyphs() {
            if left.codepoint() == 0 {
                continue;
            }
            for right in geometry.glyphs() {
                if right.codepoint() == 0 {
                    continue;
                }
                if let Some(value) = font.kerning(left.index(), right.index()) {
                    if value != 0.0 {
                        self.kerning.push(KerningPair {
                            left: left.codepoint(),
                            right: right.codepoint(),
                            advance: (value * geometry.geometry_scale()) as f32,
                        });
                    }
                }
            }
        }
    }
}

/// Loads one input's glyphs. Always returns a geometry so the result
/// list stays parallel to the inputs; failures leave it empty. The
/// returned identifier is the one actually used, since the ASCII
/// fallback forces code point mode.
fn load_input(
    holder: &mut FontHolder,
    collector: &mut CharsetCollector,
    input: &FontInput,
    listener: &mut dyn ProgressListener,
    supplements: &mut Supplements,
) -> (FontGeometry, GlyphIdentifier) {
    let mut geometry = FontGeometry::new();

    let font = match holder.load(&input.filename, input.face_index) {
        Ok(font) => font,
        Err(err) => {
            listener.warning(&format!(
                "failed to load font file {}: {err:#}",
                input.filename.display()
            ));
            return (geometry, input.identifier);
        }
    };
    let font_scale = if input.font_scale <= 0.0 {
        1.0
    } else {
        input.font_scale
    };

    let mut identifier = input.identifier;
    let charset = if input.charset.is_empty() {
        identifier = GlyphIdentifier::Codepoint;
        Charset::ascii(input.style)
    } else {
        let mut charset = Charset::new(input.style);
        if let Err(err) = charset.parse_str(
            &input.charset,
            identifier != GlyphIdentifier::Codepoint,
            Some(&*collector),
        ) {
            listener.warning(&format!(
                "failed to parse charset {:?}: {err}",
                input.charset_name
            ));
        }
        charset
    };
    if charset.is_empty() {
        return (geometry, identifier);
    }

    let loaded = match identifier {
        GlyphIdentifier::Codepoint => geometry.load_charset(font, font_scale, &charset),
        GlyphIdentifier::GlyphIndex => geometry.load_glyphset(font, font_scale, &charset),
    };

    if loaded.unwrap_or(0) > 0 {
        let px_range = input.px_range.max(1.0);
        for glyph in geometry.glyphs_mut() {
            glyph.style = input.style;
            if !glyph.is_whitespace() {
                glyph.wrap_box(1.0, px_range, 0.0);
            }
        }
        supplements.collect(font, &geometry);
    }

    collector.push(charset);
    (geometry, identifier)
}

/// Renders every input into a packed single-channel SDF atlas and the
/// character table describing it. Inputs that fail to load are skipped
/// with a warning; ending up with zero glyphs is an error.
pub fn generate(
    loader: &dyn FontLoader,
    inputs: &[FontInput],
    settings: &GeneratorSettings,
    listener: &mut dyn ProgressListener,
) -> Result<FontAtlas> {
    let mut collector = CharsetCollector::new();
    let mut holder = FontHolder::new(loader);
    let mut supplements = Supplements::default();

    let mut font_geometries = Vec::with_capacity(inputs.len());
    let mut identifiers = Vec::with_capacity(inputs.len());
    for input in inputs {
        let (geometry, identifier) =
            load_input(&mut holder, &mut collector, input, listener, &mut supplements);
        font_geometries.push(geometry);
        identifiers.push(identifier);
    }

    let total_glyphs: usize = font_geometries.iter().map(|g| g.glyphs().len()).sum();
    if total_glyphs == 0 {
        listener.error("no glyphs loaded");
        bail!("no glyphs loaded");
    }

    let mut rectangles: Vec<&mut GlyphGeometry> = font_geometries
        .iter_mut()
        .flat_map(|geometry| geometry.glyphs_mut().iter_mut())
        .filter(|glyph| !glyph.is_whitespace())
        .collect();
    listener.begin_task(false, !rectangles.is_empty());
    let mut packer = AtlasPacker::new();
    packer.pack(
        &mut rectangles,
        &PackerConfig {
            max_width: settings.max_width,
            max_height: settings.max_height,
            overlap_support: settings.overlap_support,
            scanline_pass: settings.scanline_pass,
        },
        listener,
    );
    listener.end_task();
    drop(rectangles);

    let mut info = FontInfo {
        atlas_width: packer.width(),
        atlas_height: packer.height(),
        space_advance: supplements.space_advance,
        tab_advance: supplements.tab_advance,
        kerning: std::mem::take(&mut supplements.kerning),
        ..FontInfo::default()
    };

    // deduplicate px ranges by their integer part, in input order
    let mut px_range_map: HashMap<i64, u32> = HashMap::new();
    let mut px_range_indices = vec![0u32; inputs.len()];
    let mut max_import_font_size = 0.0f32;
    for (i, geometry) in font_geometries.iter().enumerate() {
        if geometry.glyphs().is_empty() {
            continue;
        }
        let px_range = inputs[i].px_range;
        let screen_px_ranges = &mut info.screen_px_ranges;
        let (atlas_width, atlas_height) = (info.atlas_width, info.atlas_height);
        px_range_indices[i] = *px_range_map.entry(px_range as i64).or_insert_with(|| {
            screen_px_ranges.push([
                (px_range / f64::from(atlas_width)) as f32,
                (px_range / f64::from(atlas_height)) as f32,
            ]);
            (screen_px_ranges.len() - 1) as u32
        });
        max_import_font_size = max_import_font_size.max(geometry.metrics().em_size as f32);
    }
    info.import_font_size = max_import_font_size;

    for geometry in &font_geometries {
        if geometry.glyphs().is_empty() {
            continue;
        }
        let metrics = geometry.metrics();
        let ratio = max_import_font_size / metrics.em_size as f32;

        let line_height = ratio * metrics.line_height as f32;
        info.line_height = info.line_height.max(line_height);

        let ascender = ratio * metrics.ascender_y as f32;
        let descender = ratio * metrics.descender_y as f32;
        let line_gap = line_height - ascender + descender;
        info.baseline = info.baseline.max(line_gap + ascender);

        let underline = ratio * metrics.underline_y as f32;
        if info.underline_y > underline {
            info.underline_y = underline;
        }
        info.underline_thickness = info
            .underline_thickness
            .max(ratio * metrics.underline_thickness as f32);
    }

    let mut character_index = 0u32;
    for (i, geometry) in font_geometries.iter().enumerate() {
        if geometry.glyphs().is_empty() {
            continue;
        }
        let scale = max_import_font_size / geometry.metrics().em_size as f32;
        for glyph in geometry.glyphs() {
            let rect = glyph.box_rect();
            let character = FontCharacter {
                start_u: rect.x as f32,
                start_v: rect.y as f32,
                u_size: rect.width as f32,
                v_size: rect.height as f32,
                advance: glyph.advance() as f32,
                horizontal_offset: (glyph.bearing_x()
                    - (f64::from(rect.width) - glyph.width()) * 0.5)
                    as f32,
                ascender_y: (glyph.bearing_y() + (f64::from(rect.height) - glyph.height()) * 0.5)
                    as f32,
                scale,
                texture_index: glyph.texture_index,
                screen_px_range_index: px_range_indices[i],
            };

            let codepoint = glyph.codepoint();
            if codepoint == 0x7F {
                info.missing_glyph_index = Some(character_index);
            } else if codepoint == 0x58 {
                // the capital X anchors the baseline offset
                info.baseline_offset = ((glyph.height() - glyph.bearing_y()) as f32
                    + settings.custom_baseline_offset)
                    / scale;
            }

            info.characters.push(character);

            let remap_key = match identifiers[i] {
                GlyphIdentifier::Codepoint => codepoint,
                GlyphIdentifier::GlyphIndex => glyph.index(),
            };
            let remap = match glyph.style {
                FontStyle::Normal => &mut info.normal_remap,
                FontStyle::Bold => &mut info.bold_remap,
                FontStyle::Italic => &mut info.italic_remap,
                FontStyle::BoldItalic => &mut info.bold_italic_remap,
            };
            remap.insert(remap_key, character_index);

            character_index += 1;
        }
    }

    Ok(FontAtlas {
        info,
        pages: packer.into_pages(),
    })
}
