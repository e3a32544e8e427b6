//! Command line driver for the atlas generator.

use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use sdfont::charset::FontStyle;
use sdfont::font::{FontLoader, TtfFontLoader};
use sdfont::image::save_bmp_gray;
use sdfont::pipeline::{generate, FontInput, GeneratorSettings, GlyphIdentifier, LogProgress};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StyleArg {
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl From<StyleArg> for FontStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Normal => FontStyle::Normal,
            StyleArg::Bold => FontStyle::Bold,
            StyleArg::Italic => FontStyle::Italic,
            StyleArg::BoldItalic => FontStyle::BoldItalic,
        }
    }
}

/// Single-channel SDF font atlas generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Font file to render, optionally with a face index as path:index
    /// (repeatable)
    #[arg(long = "font", required = true)]
    font: Vec<String>,

    /// Style tag for the matching --font entry
    #[arg(long = "style", value_enum)]
    style: Vec<StyleArg>,

    /// Charset description for the matching --font entry; empty means
    /// the ASCII fallback set
    #[arg(long = "charset")]
    charset: Vec<String>,

    /// Em size the glyphs are scaled to for the matching --font entry
    #[arg(long = "scale")]
    scale: Vec<f64>,

    /// Distance range in output pixels for the matching --font entry
    #[arg(long = "px-range")]
    px_range: Vec<f64>,

    /// Maximum atlas page size in pixels
    #[arg(long = "max-size", default_value_t = 1024)]
    max_size: u32,

    /// Resolve overlapping contours by winding
    #[arg(long, default_value_t = false)]
    overlap: bool,

    /// Skip the scanline sign-correction pass
    #[arg(long = "no-sign-correction", default_value_t = false)]
    no_sign_correction: bool,

    /// Extra offset folded into the baseline derived from the
    /// reference glyph
    #[arg(long = "baseline-offset", default_value_t = 0.0)]
    baseline_offset: f32,

    /// Output directory
    #[arg(long, default_value = "atlas_out")]
    out: PathBuf,

    /// Also write thresholded mask pages for inspecting distance signs
    #[arg(long = "debug-bmp", default_value_t = false)]
    debug_bmp: bool,

    /// List the faces in each font file and exit
    #[arg(long = "list-faces", default_value_t = false)]
    list_faces: bool,
}

/// Splits a `path:index` font argument. The suffix is only treated as
/// a face index when it parses as one, so plain paths containing
/// colons stay intact.
fn split_face_index(spec: &str) -> (PathBuf, u32) {
    if let Some((path, face)) = spec.rsplit_once(':') {
        if !path.is_empty() {
            if let Ok(index) = face.parse::<u32>() {
                return (PathBuf::from(path), index);
            }
        }
    }
    (PathBuf::from(spec), 0)
}

fn list_faces(loader: &TtfFontLoader, fonts: &[String]) -> Result<()> {
    for spec in fonts {
        let (path, _) = split_face_index(spec);
        let count = loader.face_count(&path)?;
        let names = loader.face_names(&path)?;
        println!("{}: {} face(s)", path.display(), count);
        for (index, face) in names.iter().enumerate() {
            println!("  {}: {} {}", index, face.family, face.style);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    sdfont::logger::init_logger();
    let args = CliArgs::parse();
    let loader = TtfFontLoader;

    if args.list_faces {
        return list_faces(&loader, &args.font);
    }

    let inputs: Vec<FontInput> = args
        .font
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let (filename, face_index) = split_face_index(spec);
            FontInput {
                charset_name: format!("charset {i}"),
                filename,
                face_index,
                style: args
                    .style
                    .get(i)
                    .copied()
                    .map(FontStyle::from)
                    .unwrap_or(FontStyle::Normal),
                charset: args.charset.get(i).cloned().unwrap_or_default(),
                identifier: GlyphIdentifier::Codepoint,
                font_scale: args.scale.get(i).copied().unwrap_or(32.0),
                px_range: args.px_range.get(i).copied().unwrap_or(4.0),
            }
        })
        .collect();

    let settings = GeneratorSettings {
        max_width: args.max_size,
        max_height: args.max_size,
        overlap_support: args.overlap,
        scanline_pass: !args.no_sign_correction,
        custom_baseline_offset: args.baseline_offset,
    };

    let mut listener = LogProgress;
    let atlas = generate(&loader, &inputs, &settings, &mut listener)?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let (width, height) = (atlas.info.atlas_width, atlas.info.atlas_height);
    for (index, page) in atlas.pages.iter().enumerate() {
        let path = args.out.join(format!("atlas_{index}.bmp"));
        save_bmp_gray(&path, page, width, height)?;
        info!("wrote {}", path.display());

        if args.debug_bmp {
            let mask: Vec<u8> = page
                .iter()
                .map(|&b| if b >= 128 { 255 } else { 0 })
                .collect();
            let path = args.out.join(format!("atlas_{index}_mask.bmp"));
            save_bmp_gray(&path, &mask, width, height)?;
            info!("wrote {}", path.display());
        }
    }

    let json_path = args.out.join("font.json");
    let file = fs::File::create(&json_path)
        .with_context(|| format!("creating {}", json_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &atlas.info)
        .with_context(|| format!("writing {}", json_path.display()))?;
    info!(
        "wrote {} with {} characters over {} page(s)",
        json_path.display(),
        atlas.info.characters.len(),
        atlas.pages.len()
    );
    Ok(())
}
