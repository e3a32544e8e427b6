//! Edge selection for true (single-channel) distance.

use kurbo::Point;

use crate::geometry::{non_zero_sign, EdgeSegment};

use super::signed_distance::SignedDistance;

/// Ratio by which a cached distance bound is inflated per unit of query
/// movement. Slightly above 1 to absorb rounding.
const DISTANCE_DELTA_FACTOR: f64 = 1.001;

/// Per-edge memo of the previous query. Lets the selector skip edges that
/// cannot possibly beat the current minimum when consecutive queries are
/// close together.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeCache {
    pub point: Point,
    pub abs_distance: f64,
}

/// Tracks the minimum true distance over the edges it has been fed. The
/// winning edge and its nearest parameter are remembered so the reported
/// distance can be extended to a pseudo-distance past the segment ends;
/// selection itself always compares unmodified true distances, keeping a
/// perpendicular hit from losing to an extended-line tie.
#[derive(Clone, Debug)]
pub struct TrueDistanceSelector {
    point: Point,
    min_distance: SignedDistance,
    near_edge: Option<(EdgeSegment, f64)>,
}

impl Default for TrueDistanceSelector {
    fn default() -> Self {
        TrueDistanceSelector {
            point: Point::ZERO,
            min_distance: SignedDistance::INFINITE,
            near_edge: None,
        }
    }
}

impl TrueDistanceSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a query at `point`. The previous minimum is loosened by the
    /// distance moved so it remains a valid upper bound; the edge that
    /// produced it is forgotten and must win again at the new point.
    pub fn reset(&mut self, point: Point) {
        let delta = DISTANCE_DELTA_FACTOR * (point - self.point).hypot();
        self.min_distance.distance += non_zero_sign(self.min_distance.distance) * delta;
        self.point = point;
        self.near_edge = None;
    }

    pub fn add_edge(&mut self, cache: &mut EdgeCache, edge: &EdgeSegment) {
        let delta = DISTANCE_DELTA_FACTOR * (self.point - cache.point).hypot();
        if cache.abs_distance - delta <= self.min_distance.distance.abs() {
            let (distance, param) = edge.signed_distance(self.point);
            if distance < self.min_distance {
                self.min_distance = distance;
                self.near_edge = Some((edge.clone(), param));
            }
            cache.point = self.point;
            cache.abs_distance = distance.distance.abs();
        }
    }

    pub fn merge(&mut self, other: &TrueDistanceSelector) {
        if other.min_distance < self.min_distance {
            self.min_distance = other.min_distance;
            self.near_edge = other.near_edge.clone();
        }
    }

    pub fn distance(&self) -> f64 {
        let mut distance = self.min_distance;
        if let Some((edge, param)) = &self.near_edge {
            edge.distance_to_pseudo_distance(&mut distance, self.point, *param);
        }
        distance.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_picks_nearest_edge() {
        let near = EdgeSegment::linear(Point::new(0.0, 1.0), Point::new(4.0, 1.0));
        let far = EdgeSegment::linear(Point::new(0.0, 5.0), Point::new(4.0, 5.0));
        let mut selector = TrueDistanceSelector::new();
        selector.reset(Point::new(2.0, 0.0));
        let mut cache_near = EdgeCache::default();
        let mut cache_far = EdgeCache::default();
        selector.add_edge(&mut cache_near, &near);
        selector.add_edge(&mut cache_far, &far);
        assert!(
            (selector.distance().abs() - 1.0).abs() < 1e-12,
            "nearest edge is 1 unit away, got {}",
            selector.distance()
        );
    }

    #[test]
    fn cache_skips_stale_far_edges() {
        let near = EdgeSegment::linear(Point::new(0.0, 1.0), Point::new(4.0, 1.0));
        let far = EdgeSegment::linear(Point::new(0.0, 100.0), Point::new(4.0, 100.0));
        let mut selector = TrueDistanceSelector::new();
        let mut cache_near = EdgeCache::default();
        let mut cache_far = EdgeCache::default();

        selector.reset(Point::new(2.0, 0.0));
        selector.add_edge(&mut cache_near, &near);
        selector.add_edge(&mut cache_far, &far);
        let first = selector.distance();

        // move a tiny step; the far edge's cached bound keeps it skipped
        // but the result must stay correct
        selector.reset(Point::new(2.1, 0.0));
        selector.add_edge(&mut cache_near, &near);
        selector.add_edge(&mut cache_far, &far);
        assert!((selector.distance() - first).abs() < 1e-9);
    }

    #[test]
    fn extended_line_never_beats_a_closer_perpendicular_hit() {
        // clockwise square spanning [2, 6]; the query point sits below
        // the bottom edge, 1.5 away, but only 0.5 from the left edge's
        // extension past its start
        let edges = [
            EdgeSegment::linear(Point::new(2.0, 2.0), Point::new(2.0, 6.0)),
            EdgeSegment::linear(Point::new(2.0, 6.0), Point::new(6.0, 6.0)),
            EdgeSegment::linear(Point::new(6.0, 6.0), Point::new(6.0, 2.0)),
            EdgeSegment::linear(Point::new(6.0, 2.0), Point::new(2.0, 2.0)),
        ];
        let mut selector = TrueDistanceSelector::new();
        selector.reset(Point::new(2.5, 0.5));
        let mut caches = [EdgeCache::default(); 4];
        for (cache, edge) in caches.iter_mut().zip(&edges) {
            selector.add_edge(cache, edge);
        }
        assert!(
            (selector.distance() + 1.5).abs() < 1e-12,
            "outside point must read -1.5, got {}",
            selector.distance()
        );
    }

    #[test]
    fn merge_takes_closer_minimum() {
        let edge = EdgeSegment::linear(Point::new(0.0, 1.0), Point::new(4.0, 1.0));
        let origin = Point::new(2.0, 0.0);
        let mut a = TrueDistanceSelector::new();
        a.reset(origin);
        let mut b = TrueDistanceSelector::new();
        b.reset(origin);
        let mut cache = EdgeCache::default();
        b.add_edge(&mut cache, &edge);
        a.merge(&b);
        assert_eq!(a.distance(), b.distance());
    }
}
