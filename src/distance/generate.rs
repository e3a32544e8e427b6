//! Distance-field generation over a pixel grid.

use kurbo::Point;

use crate::geometry::{Projection, Shape};
use crate::image::Bitmap;

use super::combiner::{ContourCombiner, OverlappingContourCombiner, SimpleContourCombiner};
use super::finder::ShapeDistanceFinder;

#[derive(Clone, Copy, Debug, Default)]
pub struct GeneratorConfig {
    /// Resolve self-intersecting or overlapping contours by winding
    /// instead of treating all edges as one pool.
    pub overlap_support: bool,
}

fn generate_distance_field<C: ContourCombiner>(
    output: &mut Bitmap<f32>,
    shape: &Shape,
    projection: &Projection,
    range: f64,
) {
    let inv_range = 1.0 / range;
    let mut distance_finder = ShapeDistanceFinder::<C>::new(shape);
    let mut right_to_left = false;

    for y in 0..output.height() {
        let row = if shape.inverse_y_axis {
            output.height() - y - 1
        } else {
            y
        };
        // serpentine order keeps consecutive queries adjacent, which is
        // what the per-edge cache is tuned for
        for col in 0..output.width() {
            let x = if right_to_left {
                output.width() - col - 1
            } else {
                col
            };
            let p = projection.unproject(Point::new(x as f64 + 0.5, y as f64 + 0.5));
            let distance = distance_finder.distance(p);
            *output.pixel_mut(x, row) = (inv_range * distance + 0.5) as f32;
        }
        right_to_left = !right_to_left;
    }
}

/// Renders the signed distance field of `shape` into `output`, mapping
/// distance 0 to pixel value 0.5 and ±range/2 to 1 and 0.
pub fn generate_sdf(
    output: &mut Bitmap<f32>,
    shape: &Shape,
    projection: &Projection,
    range: f64,
    config: &GeneratorConfig,
) {
    if config.overlap_support {
        generate_distance_field::<OverlappingContourCombiner>(output, shape, projection, range);
    } else {
        generate_distance_field::<SimpleContourCombiner>(output, shape, projection, range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Contour, EdgeSegment};
    use kurbo::Vec2;

    fn square_shape() -> Shape {
        let mut contour = Contour::new();
        let (lo, hi) = (2.0, 6.0);
        contour.add_edge(EdgeSegment::linear(Point::new(lo, lo), Point::new(lo, hi)));
        contour.add_edge(EdgeSegment::linear(Point::new(lo, hi), Point::new(hi, hi)));
        contour.add_edge(EdgeSegment::linear(Point::new(hi, hi), Point::new(hi, lo)));
        contour.add_edge(EdgeSegment::linear(Point::new(hi, lo), Point::new(lo, lo)));
        let mut shape = Shape::new();
        shape.add_contour(contour);
        shape
    }

    #[test]
    fn sdf_midpoint_at_outline() {
        let shape = square_shape();
        let mut output = Bitmap::new(8, 8);
        let projection = Projection::new(Vec2::new(1.0, 1.0), Vec2::ZERO);
        generate_sdf(&mut output, &shape, &projection, 4.0, &GeneratorConfig::default());

        let center = output.pixel(4, 4);
        let outside = output.pixel(0, 0);
        assert!(center > 0.5, "inside pixel must be above the 0.5 isoline");
        assert!(outside < 0.5, "outside pixel must be below the 0.5 isoline");

        // pixel center (2.5, 4.5) is half a unit inside the left wall
        let near_wall = output.pixel(2, 4);
        assert!(
            (near_wall - (0.5 + 0.5 / 4.0)).abs() < 1e-6,
            "expected 0.625 at half a unit inside, got {near_wall}"
        );
    }

    #[test]
    fn rows_outside_the_outline_stay_below_the_isoline() {
        let shape = square_shape();
        let mut output = Bitmap::new(8, 8);
        let projection = Projection::new(Vec2::new(1.0, 1.0), Vec2::ZERO);
        generate_sdf(&mut output, &shape, &projection, 4.0, &GeneratorConfig::default());
        for x in 0..8 {
            assert!(
                output.pixel(x, 0) < 0.5,
                "pixel ({x}, 0) lies outside the square, got {}",
                output.pixel(x, 0)
            );
            assert!(
                (output.pixel(x, 0) - output.pixel(7 - x, 0)).abs() < 1e-6,
                "the field of a centered square must be symmetric"
            );
        }
    }

    #[test]
    fn overlap_support_matches_simple_on_plain_shape() {
        let shape = square_shape();
        let projection = Projection::new(Vec2::new(1.0, 1.0), Vec2::ZERO);
        let mut simple = Bitmap::new(8, 8);
        let mut overlapping = Bitmap::new(8, 8);
        generate_sdf(&mut simple, &shape, &projection, 4.0, &GeneratorConfig::default());
        generate_sdf(
            &mut overlapping,
            &shape,
            &projection,
            4.0,
            &GeneratorConfig {
                overlap_support: true,
            },
        );
        for (a, b) in simple.pixels().iter().zip(overlapping.pixels()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn inverse_y_axis_flips_rows() {
        let mut shape = square_shape();
        let projection = Projection::new(Vec2::new(1.0, 1.0), Vec2::ZERO);
        let mut straight = Bitmap::new(8, 8);
        generate_sdf(&mut straight, &shape, &projection, 4.0, &GeneratorConfig::default());
        shape.inverse_y_axis = true;
        let mut flipped = Bitmap::new(8, 8);
        generate_sdf(&mut flipped, &shape, &projection, 4.0, &GeneratorConfig::default());
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(straight.pixel(x, y), flipped.pixel(x, 7 - y));
            }
        }
    }
}
