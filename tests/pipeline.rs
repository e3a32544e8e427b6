//! End-to-end generation against a synthetic in-memory font, so no
//! font binaries are needed.

use std::path::Path;

use anyhow::{bail, Result};
use kurbo::Point;

use sdfont::charset::FontStyle;
use sdfont::font::{FontLoader, FontMetrics, FontSource, GlyphOutline};
use sdfont::geometry::{Contour, EdgeSegment, Shape};
use sdfont::pipeline::{generate, FontInput, GeneratorSettings, ProgressListener};

const EM_SIZE: f64 = 1000.0;

fn square_contour(lo: f64, hi: f64) -> Contour {
    let mut contour = Contour::new();
    contour.add_edge(EdgeSegment::linear(Point::new(lo, lo), Point::new(lo, hi)));
    contour.add_edge(EdgeSegment::linear(Point::new(lo, hi), Point::new(hi, hi)));
    contour.add_edge(EdgeSegment::linear(Point::new(hi, hi), Point::new(hi, lo)));
    contour.add_edge(EdgeSegment::linear(Point::new(hi, lo), Point::new(lo, lo)));
    contour
}

fn square_shape(lo: f64, hi: f64) -> Shape {
    let mut shape = Shape::new();
    shape.add_contour(square_contour(lo, hi));
    shape
}

struct TestFont;

impl FontSource for TestFont {
    fn glyph_index(&self, codepoint: u32) -> Option<u32> {
        match codepoint {
            65 => Some(1),
            66 => Some(2),
            32 => Some(3),
            88 => Some(4),
            0x7F => Some(0),
            _ => None,
        }
    }

    fn glyph_count(&self) -> u32 {
        5
    }

    fn load_glyph(&self, index: u32) -> Option<GlyphOutline> {
        let mut outline = GlyphOutline {
            advance: 650.0,
            bearing_x: 100.0,
            bearing_y: 600.0,
            width: 500.0,
            height: 500.0,
            ..GlyphOutline::default()
        };
        match index {
            0 => {
                outline.shape = square_shape(0.0, 700.0);
                outline.advance = 600.0;
                outline.bearing_x = 0.0;
                outline.bearing_y = 700.0;
                outline.width = 700.0;
                outline.height = 700.0;
            }
            1 | 4 => outline.shape = square_shape(100.0, 600.0),
            2 => {
                let mut shape = square_shape(100.0, 600.0);
                let mut hole = square_contour(250.0, 450.0);
                hole.reverse();
                shape.add_contour(hole);
                outline.shape = shape;
            }
            3 => outline.advance = 500.0,
            _ => return None,
        }
        Some(outline)
    }

    fn metrics(&self) -> Option<FontMetrics> {
        Some(FontMetrics {
            em_size: EM_SIZE,
            ascender_y: 800.0,
            descender_y: -200.0,
            line_height: 1200.0,
            underline_y: -100.0,
            underline_thickness: 50.0,
        })
    }

    fn whitespace_advances(&self) -> Option<(f64, f64)> {
        Some((500.0, 2000.0))
    }

    fn kerning(&self, left: u32, right: u32) -> Option<f64> {
        (left == 1 && right == 2).then_some(-50.0)
    }
}

struct TestLoader;

impl FontLoader for TestLoader {
    fn open(&self, path: &Path, _face_index: u32) -> Result<Box<dyn FontSource>> {
        if path == Path::new("test.font") {
            Ok(Box::new(TestFont))
        } else {
            bail!("no such font: {}", path.display());
        }
    }
}

fn test_input() -> FontInput {
    FontInput {
        filename: "test.font".into(),
        font_scale: 32.0,
        px_range: 4.0,
        ..FontInput::default()
    }
}

#[test]
fn generates_a_complete_atlas() {
    let inputs = vec![test_input()];
    let atlas = generate(
        &TestLoader,
        &inputs,
        &GeneratorSettings::default(),
        &mut (),
    )
    .expect("generation succeeds");
    let info = &atlas.info;

    // A, B, space, X, and the 0x7F sentinel resolve; the rest of the
    // ASCII fallback set is unmapped and skipped
    assert_eq!(info.characters.len(), 5);
    assert_eq!(atlas.pages.len(), 1);
    assert!(
        info.atlas_width.is_power_of_two() && info.atlas_height.is_power_of_two(),
        "page size grows by doubling from 4x4"
    );
    assert_eq!(
        atlas.pages[0].len(),
        (info.atlas_width * info.atlas_height) as usize
    );

    let missing = info.missing_glyph_index.expect("0x7F was loaded") as usize;
    assert!(
        info.characters[missing].u_size > 0.0,
        "the missing-glyph box has an outline"
    );

    let space = info.normal_remap[&32] as usize;
    assert_eq!(info.characters[space].u_size, 0.0, "whitespace gets no box");
    assert_eq!(info.characters[space].advance, 16.0, "500 units at scale 32/1000");

    assert_eq!(info.import_font_size, 32.0);
    assert!((info.line_height - 38.4).abs() < 1e-3);
    assert!((info.baseline - 32.0).abs() < 1e-3, "line gap plus ascender");
    assert!((info.underline_y + 3.2).abs() < 1e-3);
    assert!((info.space_advance - 16.0).abs() < 1e-3);
    assert!((info.tab_advance - 64.0).abs() < 1e-3);
    // X: scaled outline height 16 minus bearing 19.2
    assert!((info.baseline_offset + 3.2).abs() < 1e-3);

    assert_eq!(info.screen_px_ranges.len(), 1);
    assert!(
        (info.screen_px_ranges[0][0] - 4.0 / info.atlas_width as f32).abs() < 1e-6
    );
}

#[test]
fn glyph_interior_reads_inside_on_the_page() {
    let inputs = vec![test_input()];
    let atlas = generate(
        &TestLoader,
        &inputs,
        &GeneratorSettings::default(),
        &mut (),
    )
    .expect("generation succeeds");
    let info = &atlas.info;
    let page = &atlas.pages[0];
    let width = info.atlas_width as usize;

    let a = info.characters[info.normal_remap[&65] as usize];
    let cx = (a.start_u + 0.5 * a.u_size) as usize;
    let cy = (a.start_v + 0.5 * a.v_size) as usize;
    assert!(
        page[cy * width + cx] > 128,
        "center of 'A' must be inside the outline"
    );
    assert_eq!(page[0], 0, "slot seams and free space stay empty");

    // the hole of 'B' reads outside
    let b = info.characters[info.normal_remap[&66] as usize];
    let hx = (b.start_u + 0.5 * b.u_size) as usize;
    let hy = (b.start_v + 0.5 * b.v_size) as usize;
    assert!(
        page[hy * width + hx] < 128,
        "center of the counter in 'B' must be outside"
    );
}

#[test]
fn kerning_pairs_are_collected_scaled() {
    let inputs = vec![test_input()];
    let atlas = generate(
        &TestLoader,
        &inputs,
        &GeneratorSettings::default(),
        &mut (),
    )
    .expect("generation succeeds");
    let kerning = &atlas.info.kerning;
    assert_eq!(kerning.len(), 1);
    assert_eq!((kerning[0].left, kerning[0].right), (65, 66));
    assert!((kerning[0].advance + 1.6).abs() < 1e-3, "-50 units at scale 32/1000");
}

#[test]
fn styles_pack_together_and_px_ranges_deduplicate() {
    let mut bold = test_input();
    bold.style = FontStyle::Bold;
    bold.px_range = 4.5;
    let inputs = vec![test_input(), bold];

    let atlas = generate(
        &TestLoader,
        &inputs,
        &GeneratorSettings::default(),
        &mut (),
    )
    .expect("generation succeeds");
    let info = &atlas.info;

    assert_eq!(info.characters.len(), 10, "both styles render all five glyphs");
    assert!(!info.normal_remap.is_empty() && !info.bold_remap.is_empty());
    assert_eq!(
        info.screen_px_ranges.len(),
        1,
        "4.0 and 4.5 share an integer px range"
    );
}

#[derive(Default)]
struct RecordingListener {
    begin: Option<(bool, bool)>,
    updates: usize,
    ended: bool,
}

impl ProgressListener for RecordingListener {
    fn begin_task(&mut self, cancelable: bool, show_progress: bool) {
        self.begin = Some((cancelable, show_progress));
    }

    fn update_progress(&mut self, _current: usize, _total: usize) {
        self.updates += 1;
    }

    fn end_task(&mut self) {
        self.ended = true;
    }
}

#[test]
fn listener_sees_the_packing_task() {
    let inputs = vec![test_input()];
    let mut listener = RecordingListener::default();
    generate(
        &TestLoader,
        &inputs,
        &GeneratorSettings::default(),
        &mut listener,
    )
    .expect("generation succeeds");
    assert_eq!(
        listener.begin,
        Some((false, true)),
        "packing is announced as non-cancelable with progress"
    );
    assert_eq!(listener.updates, 4, "one update per non-whitespace glyph");
    assert!(listener.ended);
}

#[test]
fn unknown_font_fails_with_no_glyphs() {
    let mut input = test_input();
    input.filename = "missing.font".into();
    let result = generate(
        &TestLoader,
        &[input],
        &GeneratorSettings::default(),
        &mut (),
    );
    assert!(result.is_err(), "a run that loads nothing is an error");
}

#[test]
fn sign_correction_pass_leaves_a_sound_field() {
    let inputs = vec![test_input()];
    let plain = generate(
        &TestLoader,
        &inputs,
        &GeneratorSettings::default(),
        &mut (),
    )
    .expect("generation succeeds");
    let corrected = generate(
        &TestLoader,
        &inputs,
        &GeneratorSettings {
            scanline_pass: true,
            ..GeneratorSettings::default()
        },
        &mut (),
    )
    .expect("generation succeeds");
    assert_eq!(
        plain.pages[0], corrected.pages[0],
        "well-wound glyphs need no correction"
    );
}
