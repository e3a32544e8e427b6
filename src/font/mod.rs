//! Font loading and face access.

mod face;
mod holder;

pub use face::{
    FaceNames, FontLoader, FontMetrics, FontSource, GlyphOutline, TtfFont, TtfFontLoader,
    MISSING_GLYPH_CODEPOINT,
};
pub use holder::FontHolder;
