//! Atlas generation pipeline: glyph loading, metrics, and the
//! orchestrating [`generate`] entry point.

mod font_geometry;
mod generator;
mod glyph;
mod listener;

pub use font_geometry::FontGeometry;
pub use generator::{
    generate, FontAtlas, FontCharacter, FontInfo, FontInput, GeneratorSettings, GlyphIdentifier,
    KerningPair,
};
pub use glyph::{GlyphGeometry, Rectangle};
pub use listener::{LogProgress, ProgressListener};
