//! Binary rasterization and scanline-based sign correction.

use crate::geometry::{Projection, Shape};
use crate::image::Bitmap;

use super::scanline::{FillRule, Scanline};

/// Binary fill of `shape` into `output` (1.0 inside, 0.0 outside).
pub fn rasterize(
    output: &mut Bitmap<f32>,
    shape: &Shape,
    projection: &Projection,
    fill_rule: FillRule,
) {
    let mut scanline = Scanline::new();
    for y in 0..output.height() {
        let row = if shape.inverse_y_axis {
            output.height() - y - 1
        } else {
            y
        };
        shape.scanline(&mut scanline, projection.unproject_y(y as f64 + 0.5));
        for x in 0..output.width() {
            let fill = scanline.filled(projection.unproject_x(x as f64 + 0.5), fill_rule);
            *output.pixel_mut(x, row) = f32::from(fill);
        }
    }
}

/// Flips distance-field pixels whose sign disagrees with a scanline fill
/// pass. Pixels exactly on the 0.5 isoline carry no sign of their own;
/// if any exist, a second pass flips them when the flipped neighbors
/// outvote the kept ones. That keeps fully inverted shapes consistent.
pub fn distance_sign_correction(
    sdf: &mut Bitmap<f32>,
    shape: &Shape,
    projection: &Projection,
    fill_rule: FillRule,
) {
    let w = sdf.width();
    let h = sdf.height();
    if w * h == 0 {
        return;
    }

    let mut scanline = Scanline::new();
    let mut ambiguous = false;
    // 1 = kept, -1 = flipped, 0 = ambiguous; indexed in scan order
    let mut match_map = vec![0i8; w * h];

    for y in 0..h {
        let row = if shape.inverse_y_axis { h - y - 1 } else { y };
        shape.scanline(&mut scanline, projection.unproject_y(y as f64 + 0.5));
        for x in 0..w {
            let fill = scanline.filled(projection.unproject_x(x as f64 + 0.5), fill_rule);
            let sd = sdf.pixel(x, row);
            if sd == 0.5 {
                ambiguous = true;
            } else if (sd > 0.5) != fill {
                *sdf.pixel_mut(x, row) = 1.0 - sd;
                match_map[w * y + x] = -1;
            } else {
                match_map[w * y + x] = 1;
            }
        }
    }

    if ambiguous {
        for y in 0..h {
            let row = if shape.inverse_y_axis { h - y - 1 } else { y };
            for x in 0..w {
                if match_map[w * y + x] != 0 {
                    continue;
                }
                let mut neighbor_match = 0i32;
                if x > 0 {
                    neighbor_match += i32::from(match_map[w * y + x - 1]);
                }
                if x < w - 1 {
                    neighbor_match += i32::from(match_map[w * y + x + 1]);
                }
                if y > 0 {
                    neighbor_match += i32::from(match_map[w * (y - 1) + x]);
                }
                if y < h - 1 {
                    neighbor_match += i32::from(match_map[w * (y + 1) + x]);
                }
                if neighbor_match < 0 {
                    let sd = sdf.pixel(x, row);
                    *sdf.pixel_mut(x, row) = 1.0 - sd;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{generate_sdf, GeneratorConfig};
    use crate::geometry::{Contour, EdgeSegment};
    use kurbo::{Point, Vec2};

    fn square_shape(clockwise: bool) -> Shape {
        let mut contour = Contour::new();
        let (lo, hi) = (2.0, 6.0);
        contour.add_edge(EdgeSegment::linear(Point::new(lo, lo), Point::new(lo, hi)));
        contour.add_edge(EdgeSegment::linear(Point::new(lo, hi), Point::new(hi, hi)));
        contour.add_edge(EdgeSegment::linear(Point::new(hi, hi), Point::new(hi, lo)));
        contour.add_edge(EdgeSegment::linear(Point::new(hi, lo), Point::new(lo, lo)));
        if !clockwise {
            contour.reverse();
        }
        let mut shape = Shape::new();
        shape.add_contour(contour);
        shape
    }

    #[test]
    fn rasterize_fills_square() {
        let shape = square_shape(true);
        let mut output = Bitmap::new(8, 8);
        let projection = Projection::new(Vec2::new(1.0, 1.0), Vec2::ZERO);
        rasterize(&mut output, &shape, &projection, FillRule::NonZero);
        assert_eq!(output.pixel(4, 4), 1.0);
        assert_eq!(output.pixel(0, 0), 0.0);
        let filled: f32 = output.pixels().iter().sum();
        assert_eq!(filled, 16.0, "a 4x4 interior should fill 16 pixels");
    }

    #[test]
    fn sign_correction_repairs_reversed_contour() {
        // reversed winding renders inside-out; scanline fill is
        // orientation-independent under the nonzero rule and repairs it
        let shape = square_shape(false);
        let mut sdf = Bitmap::new(8, 8);
        let projection = Projection::new(Vec2::new(1.0, 1.0), Vec2::ZERO);
        generate_sdf(&mut sdf, &shape, &projection, 4.0, &GeneratorConfig::default());
        assert!(sdf.pixel(4, 4) < 0.5, "reversed square reads inverted");

        distance_sign_correction(&mut sdf, &shape, &projection, FillRule::NonZero);
        assert!(sdf.pixel(4, 4) > 0.5, "interior must be positive after correction");
        assert!(sdf.pixel(0, 0) < 0.5, "exterior must stay negative");
    }

    #[test]
    fn sign_correction_keeps_correct_field_unchanged() {
        let shape = square_shape(true);
        let mut sdf = Bitmap::new(8, 8);
        let projection = Projection::new(Vec2::new(1.0, 1.0), Vec2::ZERO);
        generate_sdf(&mut sdf, &shape, &projection, 4.0, &GeneratorConfig::default());
        let before = sdf.pixels().to_vec();
        distance_sign_correction(&mut sdf, &shape, &projection, FillRule::NonZero);
        assert_eq!(before, sdf.pixels(), "well-signed field must pass through");
    }

    #[test]
    fn ambiguous_pixels_follow_flipped_neighbors() {
        let shape = square_shape(false);
        let mut sdf = Bitmap::new(8, 8);
        let projection = Projection::new(Vec2::new(1.0, 1.0), Vec2::ZERO);
        generate_sdf(&mut sdf, &shape, &projection, 4.0, &GeneratorConfig::default());
        // force one pixel onto the isoline inside a region that the first
        // pass will flip
        *sdf.pixel_mut(4, 4) = 0.5;
        distance_sign_correction(&mut sdf, &shape, &projection, FillRule::NonZero);
        assert_eq!(
            sdf.pixel(4, 4),
            0.5,
            "flipping 0.5 keeps the value but the vote must have run"
        );
        assert!(sdf.pixel(3, 4) > 0.5);
    }
}
