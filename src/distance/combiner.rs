//! Combining per-contour distances into a shape distance.

use kurbo::Point;

use crate::geometry::Shape;

use super::selector::TrueDistanceSelector;

/// Strategy for merging contour distances. The simple combiner treats all
/// edges as one pool; the overlapping combiner keeps a selector per
/// contour and resolves overlaps by winding.
pub trait ContourCombiner {
    fn new(shape: &Shape) -> Self;
    fn reset(&mut self, point: Point);
    fn edge_selector(&mut self, index: usize) -> &mut TrueDistanceSelector;
    fn distance(&self) -> f64;
}

/// Simply selects the nearest contour.
pub struct SimpleContourCombiner {
    shape_edge_selector: TrueDistanceSelector,
}

impl ContourCombiner for SimpleContourCombiner {
    fn new(_shape: &Shape) -> Self {
        SimpleContourCombiner {
            shape_edge_selector: TrueDistanceSelector::new(),
        }
    }

    fn reset(&mut self, point: Point) {
        self.shape_edge_selector.reset(point);
    }

    fn edge_selector(&mut self, _index: usize) -> &mut TrueDistanceSelector {
        &mut self.shape_edge_selector
    }

    fn distance(&self) -> f64 {
        self.shape_edge_selector.distance()
    }
}

/// Selects the nearest contour that actually forms a border between
/// filled and unfilled area.
pub struct OverlappingContourCombiner {
    point: Point,
    windings: Vec<i32>,
    edge_selectors: Vec<TrueDistanceSelector>,
}

impl ContourCombiner for OverlappingContourCombiner {
    fn new(shape: &Shape) -> Self {
        let windings = shape.contours.iter().map(|c| c.winding()).collect::<Vec<_>>();
        let edge_selectors = vec![TrueDistanceSelector::new(); shape.contours.len()];
        OverlappingContourCombiner {
            point: Point::ZERO,
            windings,
            edge_selectors,
        }
    }

    fn reset(&mut self, point: Point) {
        self.point = point;
        for selector in &mut self.edge_selectors {
            selector.reset(point);
        }
    }

    fn edge_selector(&mut self, index: usize) -> &mut TrueDistanceSelector {
        &mut self.edge_selectors[index]
    }

    fn distance(&self) -> f64 {
        let contour_count = self.edge_selectors.len();

        let mut shape_edge_selector = TrueDistanceSelector::new();
        let mut inner_edge_selector = TrueDistanceSelector::new();
        let mut outer_edge_selector = TrueDistanceSelector::new();
        shape_edge_selector.reset(self.point);
        inner_edge_selector.reset(self.point);
        outer_edge_selector.reset(self.point);

        for index in 0..contour_count {
            let edge_distance = self.edge_selectors[index].distance();
            shape_edge_selector.merge(&self.edge_selectors[index]);
            if self.windings[index] > 0 && edge_distance >= 0.0 {
                inner_edge_selector.merge(&self.edge_selectors[index]);
            }
            if self.windings[index] < 0 && edge_distance <= 0.0 {
                outer_edge_selector.merge(&self.edge_selectors[index]);
            }
        }

        let shape_distance = shape_edge_selector.distance();
        let inner_distance = inner_edge_selector.distance();
        let outer_distance = outer_edge_selector.distance();

        let mut distance;
        let winding;
        if inner_distance >= 0.0 && inner_distance.abs() <= outer_distance.abs() {
            distance = inner_distance;
            winding = 1;
            for index in 0..contour_count {
                if self.windings[index] > 0 {
                    let contour_distance = self.edge_selectors[index].distance();
                    if contour_distance.abs() < outer_distance.abs()
                        && contour_distance > distance
                    {
                        distance = contour_distance;
                    }
                }
            }
        } else if outer_distance <= 0.0 && outer_distance.abs() < inner_distance.abs() {
            distance = outer_distance;
            winding = -1;
            for index in 0..contour_count {
                if self.windings[index] < 0 {
                    let contour_distance = self.edge_selectors[index].distance();
                    if contour_distance.abs() < inner_distance.abs()
                        && contour_distance < distance
                    {
                        distance = contour_distance;
                    }
                }
            }
        } else {
            return shape_distance;
        }

        for index in 0..contour_count {
            if self.windings[index] != winding {
                let contour_distance = self.edge_selectors[index].distance();
                if contour_distance * distance >= 0.0 && contour_distance.abs() < distance.abs() {
                    distance = contour_distance;
                }
            }
        }

        distance
    }
}
