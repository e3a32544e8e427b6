//! Distance queries against a whole shape.

use kurbo::Point;

use crate::geometry::Shape;

use super::combiner::{ContourCombiner, SimpleContourCombiner};
use super::selector::EdgeCache;

/// Finds the distance between a point and a shape. The combiner dictates
/// how contour distances merge.
pub struct ShapeDistanceFinder<'a, C: ContourCombiner> {
    shape: &'a Shape,
    contour_combiner: C,
    shape_edge_cache: Vec<EdgeCache>,
}

impl<'a, C: ContourCombiner> ShapeDistanceFinder<'a, C> {
    pub fn new(shape: &'a Shape) -> Self {
        ShapeDistanceFinder {
            shape,
            contour_combiner: C::new(shape),
            shape_edge_cache: vec![EdgeCache::default(); shape.edge_count()],
        }
    }

    /// Distance from `origin`. Fastest when subsequent queries are close
    /// together, which lets the per-edge cache prune most edges.
    pub fn distance(&mut self, origin: Point) -> f64 {
        self.contour_combiner.reset(origin);

        let mut cache_index = 0;
        for (index, contour) in self.shape.contours.iter().enumerate() {
            if contour.edges.is_empty() {
                continue;
            }
            let selector = self.contour_combiner.edge_selector(index);
            for edge in &contour.edges {
                selector.add_edge(&mut self.shape_edge_cache[cache_index], edge);
                cache_index += 1;
            }
        }

        self.contour_combiner.distance()
    }

    /// One-off query without the persistent cache.
    pub fn one_shot_distance(shape: &Shape, origin: Point) -> f64 {
        let mut combiner = C::new(shape);
        combiner.reset(origin);

        for (index, contour) in shape.contours.iter().enumerate() {
            if contour.edges.is_empty() {
                continue;
            }
            let selector = combiner.edge_selector(index);
            for edge in &contour.edges {
                let mut dummy = EdgeCache::default();
                selector.add_edge(&mut dummy, edge);
            }
        }

        combiner.distance()
    }
}

/// True-distance finder over a merged edge pool.
pub type SimpleTrueShapeDistanceFinder<'a> = ShapeDistanceFinder<'a, SimpleContourCombiner>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::OverlappingContourCombiner;
    use crate::geometry::{Contour, EdgeSegment};

    fn square_shape(lo: f64, hi: f64, clockwise: bool) -> Shape {
        let mut contour = Contour::new();
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
    fn inside_positive_outside_negative() {
        let shape = square_shape(0.0, 4.0, true);
        let mut finder = SimpleTrueShapeDistanceFinder::new(&shape);
        let inside = finder.distance(Point::new(2.0, 2.0));
        let outside = finder.distance(Point::new(-1.0, 2.0));
        assert!((inside - 2.0).abs() < 1e-12, "center is 2 units from walls");
        assert!((outside + 1.0).abs() < 1e-12, "outside distance is negative");
    }

    #[test]
    fn one_shot_matches_cached() {
        let shape = square_shape(0.0, 4.0, true);
        let mut finder = SimpleTrueShapeDistanceFinder::new(&shape);
        for p in [
            Point::new(1.0, 1.0),
            Point::new(1.5, 1.0),
            Point::new(5.0, 5.0),
        ] {
            let cached = finder.distance(p);
            let one_shot = SimpleTrueShapeDistanceFinder::one_shot_distance(&shape, p);
            assert!(
                (cached - one_shot).abs() < 1e-12,
                "cache must not change the result at {p:?}"
            );
        }
    }

    #[test]
    fn overlapping_combiner_handles_hole() {
        let mut shape = square_shape(0.0, 6.0, true);
        let hole = square_shape(2.0, 4.0, false).contours.pop().unwrap();
        // hole wound opposite to the outer ring
        assert_eq!(hole.winding(), -1);
        shape.contours.push(hole);

        let mut finder = ShapeDistanceFinder::<OverlappingContourCombiner>::new(&shape);
        let in_ring = finder.distance(Point::new(1.0, 3.0));
        let in_hole = finder.distance(Point::new(3.0, 3.0));
        assert!(in_ring > 0.0, "ring area is filled");
        assert!(in_hole < 0.0, "hole is empty, distance must be negative");
    }

    #[test]
    fn overlapping_matches_simple_for_plain_shape() {
        let shape = square_shape(0.0, 4.0, true);
        let mut simple = SimpleTrueShapeDistanceFinder::new(&shape);
        let mut overlapping = ShapeDistanceFinder::<OverlappingContourCombiner>::new(&shape);
        for p in [Point::new(2.0, 2.0), Point::new(-1.0, -1.0), Point::new(4.5, 2.0)] {
            assert!(
                (simple.distance(p) - overlapping.distance(p)).abs() < 1e-12,
                "combiners must agree on a single-contour shape at {p:?}"
            );
        }
    }
}
