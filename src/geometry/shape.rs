//! A vector shape: a set of closed contours.

use super::contour::Contour;
use super::segment::EdgeSegment;
use super::vector::normalize;
use crate::distance::Scanline;

/// Edges whose adjoining tangents differ from exactly opposite by less
/// than this are treated as converging corners and pulled apart.
pub const CORNER_DOT_EPSILON: f64 = 1e-6;
/// How far apart [`Shape::normalize`] pulls converging corner edges.
pub const DECONVERGENCE_FACTOR: f64 = 1e-6;

const LARGE_VALUE: f64 = 1e240;

/// Axis-aligned bounding box in shape coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    /// Inverted extremes, ready to be grown by bound operations.
    pub fn inverted() -> Self {
        Bounds {
            left: LARGE_VALUE,
            bottom: LARGE_VALUE,
            right: -LARGE_VALUE,
            top: -LARGE_VALUE,
        }
    }

    /// False when no bound operation ever hit the box.
    pub fn is_valid(&self) -> bool {
        self.left < self.right && self.bottom < self.top
    }
}

#[derive(Clone, Debug, Default)]
pub struct Shape {
    pub contours: Vec<Contour>,
    /// Set when the Y axis of the source coordinates points downward.
    pub inverse_y_axis: bool,
}

fn deconverge_edge(edge: &mut EdgeSegment, param: i32) {
    if let EdgeSegment::Quadratic { .. } = edge {
        *edge = edge.to_cubic();
    }
    if let EdgeSegment::Cubic { .. } = edge {
        edge.deconverge(param, DECONVERGENCE_FACTOR);
    }
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// Checks that every contour is a closed loop of connected edges.
    pub fn validate(&self) -> bool {
        for contour in &self.contours {
            if !contour.edges.is_empty() {
                let mut corner = contour.edges[contour.edges.len() - 1].point(1.0);
                for edge in &contour.edges {
                    if edge.point(0.0) != corner {
                        return false;
                    }
                    corner = edge.point(1.0);
                }
            }
        }
        true
    }

    /// Prepares the shape for distance queries: single-edge contours are
    /// split in thirds, and pairs of edges meeting at a fully converging
    /// corner (tangents exactly opposite) are bent slightly apart so the
    /// corner has a well-defined interior.
    pub fn normalize(&mut self) {
        for contour in &mut self.contours {
            if contour.edges.len() == 1 {
                let parts = contour.edges[0].split_in_thirds();
                contour.edges.clear();
                contour.edges.extend(parts);
            } else {
                let count = contour.edges.len();
                if count == 0 {
                    continue;
                }
                let mut prev = count - 1;
                for index in 0..count {
                    let prev_dir = normalize(contour.edges[prev].direction(1.0), false);
                    let cur_dir = normalize(contour.edges[index].direction(0.0), false);
                    if prev_dir.dot(cur_dir) < CORNER_DOT_EPSILON - 1.0 {
                        deconverge_edge(&mut contour.edges[prev], 1);
                        deconverge_edge(&mut contour.edges[index], 0);
                    }
                    prev = index;
                }
            }
        }
    }

    /// Extends `bounds` to cover the whole shape.
    pub fn bound(&self, bounds: &mut Bounds) {
        for contour in &self.contours {
            contour.bound(bounds);
        }
    }

    pub fn bound_miters(&self, bounds: &mut Bounds, border: f64, miter_limit: f64, polarity: i32) {
        for contour in &self.contours {
            contour.bound_miters(bounds, border, miter_limit, polarity);
        }
    }

    /// Bounding box of the shape, optionally grown by `border` and the
    /// miter points it implies.
    pub fn get_bounds(&self, border: f64, miter_limit: f64, polarity: i32) -> Bounds {
        let mut bounds = Bounds::inverted();
        self.bound(&mut bounds);
        if border > 0.0 {
            bounds.left -= border;
            bounds.bottom -= border;
            bounds.right += border;
            bounds.top += border;
            if miter_limit > 0.0 {
                self.bound_miters(&mut bounds, border, miter_limit, polarity);
            }
        }
        bounds
    }

    /// Loads the crossings of the horizontal line at `y` into `line`.
    pub fn scanline(&self, line: &mut Scanline, y: f64) {
        let mut intersections = Vec::new();
        let mut x = [0.0; 3];
        let mut dy = [0; 3];
        for contour in &self.contours {
            for edge in &contour.edges {
                let n = edge.scanline_intersections(&mut x, &mut dy, y);
                for index in 0..n {
                    intersections.push((x[index], dy[index]));
                }
            }
        }
        line.set_intersections(intersections);
    }

    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(|c| c.edges.len()).sum()
    }

    /// Fixes contour orientations so that nonzero-filled areas keep
    /// positive winding: each undecided contour is probed with a scanline
    /// through the whole shape at an irrational offset, crossing parity
    /// votes on its orientation, and losers are reversed.
    pub fn orient_contours(&mut self) {
        struct Intersection {
            x: f64,
            direction: i32,
            contour_index: usize,
        }

        // an irrational ratio to minimize the chance of intersecting a
        // corner or other point of interest
        let ratio = 0.5 * (5.0f64.sqrt() - 1.0);

        let mut orientations = vec![0i32; self.contours.len()];
        let mut intersections: Vec<Intersection> = Vec::new();

        for index in 0..self.contours.len() {
            if orientations[index] != 0 || self.contours[index].edges.is_empty() {
                continue;
            }

            // Find a Y that crosses the contour
            let y0 = self.contours[index].edges[0].point(0.0).y;
            let mut y1 = y0;
            for edge in &self.contours[index].edges {
                if y0 != y1 {
                    break;
                }
                y1 = edge.point(1.0).y;
            }
            // in case all endpoints are in a horizontal line
            for edge in &self.contours[index].edges {
                if y0 != y1 {
                    break;
                }
                y1 = edge.point(ratio).y;
            }
            let y = y0 + ratio * (y1 - y0);

            // Scanline through the whole shape at Y
            let mut x = [0.0; 3];
            let mut dy = [0; 3];
            for (j, contour) in self.contours.iter().enumerate() {
                for edge in &contour.edges {
                    let n = edge.scanline_intersections(&mut x, &mut dy, y);
                    for k in 0..n {
                        intersections.push(Intersection {
                            x: x[k],
                            direction: dy[k],
                            contour_index: j,
                        });
                    }
                }
            }

            intersections.sort_by(|a, b| {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            });

            // Disqualify multiple intersections
            for j in 1..intersections.len() {
                if intersections[j].x == intersections[j - 1].x {
                    intersections[j].direction = 0;
                    intersections[j - 1].direction = 0;
                }
            }

            // Inspect the scanline and deduce orientations of intersected contours
            for (j, intersection) in intersections.iter().enumerate() {
                if intersection.direction != 0 {
                    orientations[intersection.contour_index] +=
                        2 * ((j as i32 & 1) ^ i32::from(intersection.direction > 0)) - 1;
                }
            }

            intersections.clear();
        }

        // Reverse contours that have the opposite orientation
        for (contour, orientation) in self.contours.iter_mut().zip(&orientations) {
            if *orientation < 0 {
                contour.reverse();
            }
        }
    }
}
