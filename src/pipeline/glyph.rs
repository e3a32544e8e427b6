//! Per-glyph geometry: the outline, its metrics, and the atlas box it
//! will be rendered into.

use kurbo::{Point, Vec2};

use crate::charset::FontStyle;
use crate::distance::SimpleTrueShapeDistanceFinder;
use crate::font::FontSource;
use crate::geometry::{Bounds, Projection, Shape};

/// Placement rectangle inside an atlas page, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, Default)]
struct GlyphBox {
    rect: Rectangle,
    range: f64,
    scale: f64,
    translate: Vec2,
}

#[derive(Clone, Debug)]
pub struct GlyphGeometry {
    index: u32,
    codepoint: u32,
    pub style: FontStyle,
    geometry_scale: f64,
    shape: Shape,
    bounds: Bounds,
    advance: f64,
    bearing_x: f64,
    bearing_y: f64,
    width: f64,
    height: f64,
    glyph_box: GlyphBox,
    /// Page the glyph landed on, assigned during packing.
    pub texture_index: u32,
    /// Byte SDF bitmap in top-left row order, filled during packing.
    pub bitmap: Vec<u8>,
}

impl GlyphGeometry {
    /// Loads a glyph by index. The outline stays in font units; the
    /// reported metrics are multiplied by `geometry_scale`. Contours
    /// wound inside out are detected with a distance probe at a point
    /// guaranteed to lie outside the bounds and reversed wholesale.
    pub fn load(font: &dyn FontSource, geometry_scale: f64, index: u32) -> Option<Self> {
        let outline = font.load_glyph(index)?;
        let mut shape = outline.shape;
        if !shape.validate() {
            return None;
        }
        shape.normalize();
        let bounds = shape.get_bounds(0.0, 0.0, 0);

        let outer_point = Point::new(
            bounds.left - (bounds.right - bounds.left) - 1.0,
            bounds.bottom - (bounds.top - bounds.bottom) - 1.0,
        );
        if SimpleTrueShapeDistanceFinder::one_shot_distance(&shape, outer_point) > 0.0 {
            for contour in &mut shape.contours {
                contour.reverse();
            }
        }

        Some(GlyphGeometry {
            index,
            codepoint: 0,
            style: FontStyle::default(),
            geometry_scale,
            shape,
            bounds,
            advance: outline.advance * geometry_scale,
            bearing_x: outline.bearing_x * geometry_scale,
            bearing_y: outline.bearing_y * geometry_scale,
            width: outline.width * geometry_scale,
            height: outline.height * geometry_scale,
            glyph_box: GlyphBox::default(),
            texture_index: 0,
            bitmap: Vec::new(),
        })
    }

    pub fn load_codepoint(
        font: &dyn FontSource,
        geometry_scale: f64,
        codepoint: u32,
    ) -> Option<Self> {
        let index = font.glyph_index(codepoint)?;
        let mut glyph = Self::load(font, geometry_scale, index)?;
        glyph.codepoint = codepoint;
        Some(glyph)
    }

    /// Computes the atlas box: the glyph bounds padded by half the
    /// distance range on every side, scaled, rounded up to whole pixels
    /// with one extra, and centered by the translation.
    pub fn wrap_box(&mut self, scale: f64, range: f64, miter_limit: f64) {
        let scale = scale * self.geometry_scale;
        let range = range / self.geometry_scale;
        self.glyph_box.range = range;
        self.glyph_box.scale = scale;

        if self.bounds.left < self.bounds.right && self.bounds.bottom < self.bounds.top {
            let mut bounds = Bounds {
                left: self.bounds.left - 0.5 * range,
                bottom: self.bounds.bottom - 0.5 * range,
                right: self.bounds.right + 0.5 * range,
                top: self.bounds.top + 0.5 * range,
            };
            if miter_limit > 0.0 {
                self.shape
                    .bound_miters(&mut bounds, 0.5 * range, miter_limit, 1);
            }
            let w = scale * (bounds.right - bounds.left);
            let h = scale * (bounds.top - bounds.bottom);
            self.glyph_box.rect.width = w.ceil() as u32 + 1;
            self.glyph_box.rect.height = h.ceil() as u32 + 1;
            self.glyph_box.translate = Vec2::new(
                -bounds.left + 0.5 * (f64::from(self.glyph_box.rect.width) - w) / scale,
                -bounds.bottom + 0.5 * (f64::from(self.glyph_box.rect.height) - h) / scale,
            );
        } else {
            self.glyph_box.rect.width = 0;
            self.glyph_box.rect.height = 0;
            self.glyph_box.translate = Vec2::ZERO;
        }
    }

    pub fn place_box(&mut self, x: u32, y: u32) {
        self.glyph_box.rect.x = x;
        self.glyph_box.rect.y = y;
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn codepoint(&self) -> u32 {
        self.codepoint
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn advance(&self) -> f64 {
        self.advance
    }

    pub fn bearing_x(&self) -> f64 {
        self.bearing_x
    }

    pub fn bearing_y(&self) -> f64 {
        self.bearing_y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn box_rect(&self) -> Rectangle {
        self.glyph_box.rect
    }

    pub fn box_size(&self) -> (u32, u32) {
        (self.glyph_box.rect.width, self.glyph_box.rect.height)
    }

    pub fn box_range(&self) -> f64 {
        self.glyph_box.range
    }

    pub fn box_scale(&self) -> f64 {
        self.glyph_box.scale
    }

    pub fn box_projection(&self) -> Projection {
        Projection::new(
            Vec2::new(self.glyph_box.scale, self.glyph_box.scale),
            self.glyph_box.translate,
        )
    }

    /// Glyph quad corners in em space, half a pixel inside the box.
    pub fn quad_plane_bounds(&self) -> (f64, f64, f64, f64) {
        let rect = self.glyph_box.rect;
        if rect.width == 0 || rect.height == 0 {
            return (0.0, 0.0, 0.0, 0.0);
        }
        let inv_scale = 1.0 / self.glyph_box.scale;
        let translate = self.glyph_box.translate;
        (
            self.geometry_scale * (-translate.x + 0.5 * inv_scale),
            self.geometry_scale * (-translate.y + 0.5 * inv_scale),
            self.geometry_scale * (-translate.x + (f64::from(rect.width) - 0.5) * inv_scale),
            self.geometry_scale * (-translate.y + (f64::from(rect.height) - 0.5) * inv_scale),
        )
    }

    /// Texel bounds of the glyph quad inside the atlas page.
    pub fn quad_atlas_bounds(&self) -> (f64, f64, f64, f64) {
        let rect = self.glyph_box.rect;
        if rect.width == 0 || rect.height == 0 {
            return (0.0, 0.0, 0.0, 0.0);
        }
        (
            f64::from(rect.x) + 0.5,
            f64::from(rect.y) + 0.5,
            f64::from(rect.x + rect.width) - 0.5,
            f64::from(rect.y + rect.height) - 0.5,
        )
    }

    pub fn is_whitespace(&self) -> bool {
        self.shape.contours.is_empty()
    }
}
