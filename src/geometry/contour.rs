//! A closed loop of edge segments.

use kurbo::Point;

use super::segment::EdgeSegment;
use super::shape::Bounds;
use super::vector::{normalize, sign};

fn shoelace(a: Point, b: Point) -> f64 {
    (b.x - a.x) * (a.y + b.y)
}

fn bound_point(bounds: &mut Bounds, p: Point) {
    if p.x < bounds.left {
        bounds.left = p.x;
    }
    if p.y < bounds.bottom {
        bounds.bottom = p.y;
    }
    if p.x > bounds.right {
        bounds.right = p.x;
    }
    if p.y > bounds.top {
        bounds.top = p.y;
    }
}

#[derive(Clone, Debug, Default)]
pub struct Contour {
    pub edges: Vec<EdgeSegment>,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, edge: EdgeSegment) {
        self.edges.push(edge);
    }

    /// Extends `bounds` to cover every edge.
    pub fn bound(&self, bounds: &mut Bounds) {
        for edge in &self.edges {
            edge.bound(bounds);
        }
    }

    /// Extends `bounds` to cover miter points of convex corners when the
    /// contour is offset outward by `border`.
    pub fn bound_miters(&self, bounds: &mut Bounds, border: f64, miter_limit: f64, polarity: i32) {
        if self.edges.is_empty() {
            return;
        }

        let mut prev_dir = normalize(
            self.edges[self.edges.len() - 1].direction(1.0),
            true,
        );
        for edge in &self.edges {
            let dir = -normalize(edge.direction(0.0), true);
            if polarity as f64 * prev_dir.cross(dir) >= 0.0 {
                let mut miter_length = miter_limit;
                let q = 0.5 * (1.0 - prev_dir.dot(dir));
                if q > 0.0 {
                    miter_length = (1.0 / q.sqrt()).min(miter_limit);
                }

                let miter =
                    edge.point(0.0) + border * miter_length * normalize(prev_dir + dir, true);
                bound_point(bounds, miter);
            }
            prev_dir = normalize(edge.direction(1.0), true);
        }
    }

    /// Orientation of the contour: +1 when its interior carries positive
    /// signed distance, -1 for the opposite orientation, 0 when empty.
    /// Degenerate one- and two-edge contours are sampled at interior
    /// parameters so curvature still contributes area.
    pub fn winding(&self) -> i32 {
        if self.edges.is_empty() {
            return 0;
        }

        let mut total = 0.0;
        match self.edges.len() {
            1 => {
                let a = self.edges[0].point(0.0);
                let b = self.edges[0].point(1.0 / 3.0);
                let c = self.edges[0].point(2.0 / 3.0);
                total += shoelace(a, b);
                total += shoelace(b, c);
                total += shoelace(c, a);
            }
            2 => {
                let a = self.edges[0].point(0.0);
                let b = self.edges[0].point(0.5);
                let c = self.edges[1].point(0.0);
                let d = self.edges[1].point(0.5);
                total += shoelace(a, b);
                total += shoelace(b, c);
                total += shoelace(c, d);
                total += shoelace(d, a);
            }
            _ => {
                let mut prev = self.edges[self.edges.len() - 1].point(0.0);
                for edge in &self.edges {
                    let cur = edge.point(0.0);
                    total += shoelace(prev, cur);
                    prev = cur;
                }
            }
        }
        sign(total)
    }

    /// Reverses the direction of travel of the whole loop.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(a: f64) -> Contour {
        // clockwise in Y-up coordinates: interior gets positive distance
        let mut contour = Contour::new();
        contour.add_edge(EdgeSegment::linear(Point::new(0.0, 0.0), Point::new(0.0, a)));
        contour.add_edge(EdgeSegment::linear(Point::new(0.0, a), Point::new(a, a)));
        contour.add_edge(EdgeSegment::linear(Point::new(a, a), Point::new(a, 0.0)));
        contour.add_edge(EdgeSegment::linear(Point::new(a, 0.0), Point::new(0.0, 0.0)));
        contour
    }

    #[test]
    fn winding_sign_flips_on_reverse() {
        let mut contour = square(2.0);
        assert_eq!(contour.winding(), 1);
        contour.reverse();
        assert_eq!(contour.winding(), -1);
    }

    #[test]
    fn winding_of_single_edge_contour() {
        let mut contour = Contour::new();
        contour.add_edge(EdgeSegment::cubic(
            Point::new(0.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(-4.0, 4.0),
            Point::new(0.0, 0.0),
        ));
        assert_ne!(
            contour.winding(),
            0,
            "curved single-edge loop encloses area and must have a winding"
        );
    }

    #[test]
    fn reverse_keeps_closure() {
        let mut contour = square(1.0);
        contour.reverse();
        let mut corner = contour.edges[contour.edges.len() - 1].point(1.0);
        for edge in &contour.edges {
            assert_eq!(edge.point(0.0), corner, "reversed loop must stay closed");
            corner = edge.point(1.0);
        }
    }

    #[test]
    fn bound_miters_extends_past_plain_bounds() {
        let contour = square(2.0);
        let mut bounds = Bounds::inverted();
        contour.bound(&mut bounds);
        let plain_right = bounds.right;
        contour.bound_miters(&mut bounds, 0.5, 1.0, 1);
        assert!(
            bounds.right > plain_right,
            "miter points of a convex square should extend the bounds"
        );
    }
}
