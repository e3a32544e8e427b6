//! Character sets and the charset description grammar.

mod parser;

pub use parser::ParseError;

use std::collections::HashSet;

/// Style variant a charset (and the glyphs loaded from it) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// An ordered set of Unicode code points. Insertion order is preserved;
/// duplicates and code points already claimed by another charset of the
/// same style in the collector are silently skipped.
#[derive(Clone, Debug, Default)]
pub struct Charset {
    style: FontStyle,
    codepoints: Vec<u32>,
    seen: HashSet<u32>,
}

impl Charset {
    pub fn new(style: FontStyle) -> Self {
        Charset {
            style,
            ..Self::default()
        }
    }

    /// The fallback set: code points 0x00 through 0x100 inclusive, which
    /// covers ASCII, Latin-1 and the 0x7F missing-glyph sentinel.
    pub fn ascii(style: FontStyle) -> Self {
        let mut charset = Charset::new(style);
        for codepoint in 0x00..0x101 {
            charset.add(codepoint, None);
        }
        charset
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn add(&mut self, codepoint: u32, collector: Option<&CharsetCollector>) {
        if let Some(collector) = collector {
            if collector.contains_codepoint(codepoint, self.style) {
                return;
            }
        }
        if self.seen.insert(codepoint) {
            self.codepoints.push(codepoint);
        }
    }

    pub fn contains(&self, codepoint: u32) -> bool {
        self.seen.contains(&codepoint)
    }

    pub fn codepoints(&self) -> &[u32] {
        &self.codepoints
    }

    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }
}

/// Charsets already claimed during one generation run. Later entries
/// consult it so each (code point, style) pair is rendered only once.
#[derive(Debug, Default)]
pub struct CharsetCollector {
    charsets: Vec<Charset>,
}

impl CharsetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_codepoint(&self, codepoint: u32, style: FontStyle) -> bool {
        self.charsets
            .iter()
            .any(|charset| charset.style == style && charset.contains(codepoint))
    }

    pub fn push(&mut self, charset: Charset) {
        self.charsets.push(charset);
    }
}
