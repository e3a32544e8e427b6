//! Edge segments: the line and bezier curve pieces contours are made of.
//!
//! Each segment can report the point and tangent at a parameter, its exact
//! signed distance to an arbitrary origin, its horizontal scanline
//! crossings, and its bounding box. Distance queries also return the
//! parameter of the closest point so the caller can convert the true
//! distance to a pseudo-distance when the projection falls outside the
//! segment.

use kurbo::{Point, Vec2};

use super::shape::Bounds;
use super::solver::{solve_cubic, solve_quadratic};
use super::vector::{mix, mix_vec, non_zero_sign, normalize, orthonormal, sign};
use crate::distance::SignedDistance;

/// Number of starting points for the cubic nearest-point search.
pub const CUBIC_SEARCH_STARTS: usize = 4;
/// Newton refinement steps per starting point.
pub const CUBIC_SEARCH_STEPS: usize = 4;

/// Channel tag for multi-channel generation. The single-channel pipeline
/// leaves every edge white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EdgeColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    #[default]
    White = 7,
}

/// A single edge of a contour.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeSegment {
    Linear {
        points: [Point; 2],
        color: EdgeColor,
    },
    Quadratic {
        points: [Point; 3],
        color: EdgeColor,
    },
    Cubic {
        points: [Point; 4],
        color: EdgeColor,
    },
}

fn point_bounds(p: Point, bounds: &mut Bounds) {
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

impl EdgeSegment {
    pub fn linear(p0: Point, p1: Point) -> Self {
        Self::linear_colored(p0, p1, EdgeColor::default())
    }

    pub fn linear_colored(p0: Point, p1: Point, color: EdgeColor) -> Self {
        EdgeSegment::Linear {
            points: [p0, p1],
            color,
        }
    }

    /// Control point coinciding with an endpoint is nudged to the chord
    /// midpoint so tangents stay well defined.
    pub fn quadratic(p0: Point, p1: Point, p2: Point) -> Self {
        Self::quadratic_colored(p0, p1, p2, EdgeColor::default())
    }

    pub fn quadratic_colored(p0: Point, mut p1: Point, p2: Point, color: EdgeColor) -> Self {
        if p1 == p0 || p1 == p2 {
            p1 = mix(p0, p2, 0.5);
        }
        EdgeSegment::Quadratic {
            points: [p0, p1, p2],
            color,
        }
    }

    /// Both control points degenerate to endpoints -> respaced at thirds.
    pub fn cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self::cubic_colored(p0, p1, p2, p3, EdgeColor::default())
    }

    pub fn cubic_colored(
        p0: Point,
        mut p1: Point,
        mut p2: Point,
        p3: Point,
        color: EdgeColor,
    ) -> Self {
        if (p1 == p0 || p1 == p3) && (p2 == p0 || p2 == p3) {
            p1 = mix(p0, p3, 1.0 / 3.0);
            p2 = mix(p0, p3, 2.0 / 3.0);
        }
        EdgeSegment::Cubic {
            points: [p0, p1, p2, p3],
            color,
        }
    }

    pub fn color(&self) -> EdgeColor {
        match self {
            EdgeSegment::Linear { color, .. }
            | EdgeSegment::Quadratic { color, .. }
            | EdgeSegment::Cubic { color, .. } => *color,
        }
    }

    pub fn set_color(&mut self, new_color: EdgeColor) {
        match self {
            EdgeSegment::Linear { color, .. }
            | EdgeSegment::Quadratic { color, .. }
            | EdgeSegment::Cubic { color, .. } => *color = new_color,
        }
    }

    /// Point on the segment at parameter `param` in [0, 1].
    pub fn point(&self, param: f64) -> Point {
        match self {
            EdgeSegment::Linear { points, .. } => mix(points[0], points[1], param),
            EdgeSegment::Quadratic { points, .. } => mix(
                mix(points[0], points[1], param),
                mix(points[1], points[2], param),
                param,
            ),
            EdgeSegment::Cubic { points, .. } => {
                let p12 = mix(points[1], points[2], param);
                mix(
                    mix(mix(points[0], points[1], param), p12, param),
                    mix(p12, mix(points[2], points[3], param), param),
                    param,
                )
            }
        }
    }

    /// Tangent direction at `param`. Falls back to the chord where the
    /// derivative vanishes at an endpoint.
    pub fn direction(&self, param: f64) -> Vec2 {
        match self {
            EdgeSegment::Linear { points, .. } => points[1] - points[0],
            EdgeSegment::Quadratic { points, .. } => {
                let tangent = mix_vec(points[1] - points[0], points[2] - points[1], param);
                if tangent.x == 0.0 && tangent.y == 0.0 {
                    return points[2] - points[0];
                }
                tangent
            }
            EdgeSegment::Cubic { points, .. } => {
                let tangent = mix_vec(
                    mix_vec(points[1] - points[0], points[2] - points[1], param),
                    mix_vec(points[2] - points[1], points[3] - points[2], param),
                    param,
                );
                if tangent.x == 0.0 && tangent.y == 0.0 {
                    if param == 0.0 {
                        return points[2] - points[0];
                    }
                    if param == 1.0 {
                        return points[3] - points[1];
                    }
                }
                tangent
            }
        }
    }

    /// Derivative of the tangent at `param`.
    pub fn direction_change(&self, param: f64) -> Vec2 {
        match self {
            EdgeSegment::Linear { .. } => Vec2::ZERO,
            EdgeSegment::Quadratic { points, .. } => {
                (points[2] - points[1]) - (points[1] - points[0])
            }
            EdgeSegment::Cubic { points, .. } => mix_vec(
                (points[2] - points[1]) - (points[1] - points[0]),
                (points[3] - points[2]) - (points[2] - points[1]),
                param,
            ),
        }
    }

    /// Signed distance from `origin` to the segment plus the parameter of
    /// the nearest point (may fall outside [0, 1]).
    pub fn signed_distance(&self, origin: Point) -> (SignedDistance, f64) {
        match self {
            EdgeSegment::Linear { points, .. } => {
                let aq = origin - points[0];
                let ab = points[1] - points[0];
                let param = aq.dot(ab) / ab.dot(ab);
                let eq = points[usize::from(param > 0.5)] - origin;
                let endpoint_distance = eq.hypot();
                if param > 0.0 && param < 1.0 {
                    let ortho_distance = orthonormal(ab, false, false).dot(aq);
                    if ortho_distance.abs() < endpoint_distance {
                        return (SignedDistance::new(ortho_distance, 0.0), param);
                    }
                }
                (
                    SignedDistance::new(
                        non_zero_sign(aq.cross(ab)) * endpoint_distance,
                        normalize(ab, false).dot(normalize(eq, false)).abs(),
                    ),
                    param,
                )
            }
            EdgeSegment::Quadratic { points, .. } => {
                let qa = points[0] - origin;
                let ab = points[1] - points[0];
                let br = points[2] - points[1] - ab;

                let a = br.dot(br);
                let b = 3.0 * ab.dot(br);
                let c = 2.0 * ab.dot(ab) + qa.dot(br);
                let d = qa.dot(ab);

                let mut t = [0.0; 3];
                let solutions = solve_cubic(&mut t, a, b, c, d);

                let mut ep_dir = self.direction(0.0);
                // distance from A
                let mut min_distance = non_zero_sign(ep_dir.cross(qa)) * qa.hypot();
                let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);
                {
                    ep_dir = self.direction(1.0);
                    // distance from B
                    let distance = (points[2] - origin).hypot();
                    if distance < min_distance.abs() {
                        min_distance =
                            non_zero_sign(ep_dir.cross(points[2] - origin)) * distance;
                        param = (origin - points[1]).dot(ep_dir) / ep_dir.dot(ep_dir);
                    }
                }

                for &root in t.iter().take(solutions.max(0) as usize) {
                    if root > 0.0 && root < 1.0 {
                        let qe = qa + 2.0 * root * ab + root * root * br;
                        let distance = qe.hypot();
                        if distance <= min_distance.abs() {
                            min_distance = non_zero_sign((ab + root * br).cross(qe)) * distance;
                            param = root;
                        }
                    }
                }

                if (0.0..=1.0).contains(&param) {
                    return (SignedDistance::new(min_distance, 0.0), param);
                }
                let dot = if param < 0.5 {
                    normalize(self.direction(0.0), false)
                        .dot(normalize(qa, false))
                        .abs()
                } else {
                    normalize(self.direction(1.0), false)
                        .dot(normalize(points[2] - origin, false))
                        .abs()
                };
                (SignedDistance::new(min_distance, dot), param)
            }
            EdgeSegment::Cubic { points, .. } => {
                let qa = points[0] - origin;
                let ab = points[1] - points[0];
                let br = points[2] - points[1] - ab;
                let a_s = (points[3] - points[2]) - (points[2] - points[1]) - br;

                let mut ep_dir = self.direction(0.0);
                // distance from A
                let mut min_distance = non_zero_sign(ep_dir.cross(qa)) * qa.hypot();
                let mut param = -qa.dot(ep_dir) / ep_dir.dot(ep_dir);
                {
                    ep_dir = self.direction(1.0);
                    // distance from B
                    let distance = (points[3] - origin).hypot();
                    if distance < min_distance.abs() {
                        min_distance =
                            non_zero_sign(ep_dir.cross(points[3] - origin)) * distance;
                        param = (ep_dir - (points[3] - origin)).dot(ep_dir) / ep_dir.dot(ep_dir);
                    }
                }

                // Iterative minimum distance search
                for index in 0..=CUBIC_SEARCH_STARTS {
                    let mut t = index as f64 / CUBIC_SEARCH_STARTS as f64;
                    let mut qe = qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * a_s;

                    for _ in 0..CUBIC_SEARCH_STEPS {
                        // Improve t
                        let d1 = 3.0 * ab + 6.0 * t * br + 3.0 * t * t * a_s;
                        let d2 = 6.0 * br + 6.0 * t * a_s;
                        t -= qe.dot(d1) / (d1.dot(d1) + qe.dot(d2));
                        if t <= 0.0 || t >= 1.0 {
                            break;
                        }

                        qe = qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * a_s;
                        let distance = qe.hypot();
                        if distance < min_distance.abs() {
                            min_distance = non_zero_sign(d1.cross(qe)) * distance;
                            param = t;
                        }
                    }
                }

                if (0.0..=1.0).contains(&param) {
                    return (SignedDistance::new(min_distance, 0.0), param);
                }
                let dot = if param < 0.5 {
                    normalize(self.direction(0.0), false)
                        .dot(normalize(qa, false))
                        .abs()
                } else {
                    normalize(self.direction(1.0), false)
                        .dot(normalize(points[3] - origin, false))
                        .abs()
                };
                (SignedDistance::new(min_distance, dot), param)
            }
        }
    }

    /// Converts a true distance to a pseudo-distance when the nearest
    /// parameter lies beyond an endpoint, extending the edge along its
    /// endpoint tangent.
    pub fn distance_to_pseudo_distance(
        &self,
        distance: &mut SignedDistance,
        origin: Point,
        param: f64,
    ) {
        if param < 0.0 {
            let dir = normalize(self.direction(0.0), false);
            let aq = origin - self.point(0.0);
            let ts = aq.dot(dir);
            if ts < 0.0 {
                let pseudo_distance = aq.cross(dir);
                if pseudo_distance.abs() <= distance.distance.abs() {
                    distance.distance = pseudo_distance;
                    distance.dot = 0.0;
                }
            }
        } else if param > 1.0 {
            let dir = normalize(self.direction(1.0), false);
            let bq = origin - self.point(1.0);
            let ts = bq.dot(dir);
            if ts > 0.0 {
                let pseudo_distance = bq.cross(dir);
                if pseudo_distance.abs() <= distance.distance.abs() {
                    distance.distance = pseudo_distance;
                    distance.dot = 0.0;
                }
            }
        }
    }

    /// Horizontal scanline crossings at height `y`. Writes up to three
    /// crossing X coordinates and their vertical directions, returns the
    /// crossing count.
    pub fn scanline_intersections(&self, x: &mut [f64; 3], dy: &mut [i32; 3], y: f64) -> usize {
        match self {
            EdgeSegment::Linear { points, .. } => {
                if (y >= points[0].y && y < points[1].y) || (y >= points[1].y && y < points[0].y) {
                    let param = (y - points[0].y) / (points[1].y - points[0].y);
                    x[0] = points[0].x + param * (points[1].x - points[0].x);
                    dy[0] = sign(points[1].y - points[0].y);
                    return 1;
                }
                0
            }
            EdgeSegment::Quadratic { points, .. } => {
                let mut total = 0usize;
                let mut next_dy = if y > points[0].y { 1 } else { -1 };
                x[total] = points[0].x;
                if points[0].y == y {
                    if points[0].y < points[1].y
                        || (points[0].y == points[1].y && points[0].y < points[2].y)
                    {
                        dy[total] = 1;
                        total += 1;
                    } else {
                        next_dy = 1;
                    }
                }

                {
                    let ab = points[1] - points[0];
                    let br = points[2] - points[1] - ab;
                    let mut t = [0.0; 2];
                    let solutions = solve_quadratic(&mut t, br.y, 2.0 * ab.y, points[0].y - y);

                    // Sort solutions
                    if solutions >= 2 && t[0] > t[1] {
                        t.swap(0, 1);
                    }

                    for &root in t.iter().take(solutions.max(0) as usize) {
                        if total >= 2 {
                            break;
                        }
                        if (0.0..=1.0).contains(&root) {
                            x[total] = points[0].x + 2.0 * root * ab.x + root * root * br.x;
                            if (next_dy as f64) * (ab.y + root * br.y) >= 0.0 {
                                dy[total] = next_dy;
                                total += 1;
                                next_dy = -next_dy;
                            }
                        }
                    }
                }

                if points[2].y == y {
                    if next_dy > 0 && total > 0 {
                        total -= 1;
                        next_dy = -1;
                    }
                    if (points[2].y < points[1].y
                        || (points[2].y == points[1].y && points[2].y < points[0].y))
                        && total < 2
                    {
                        x[total] = points[2].x;
                        if next_dy < 0 {
                            dy[total] = -1;
                            total += 1;
                            next_dy = 1;
                        }
                    }
                }

                if next_dy != if y >= points[2].y { 1 } else { -1 } {
                    if total > 0 {
                        total -= 1;
                    } else {
                        if (points[2].y - y).abs() < (points[0].y - y).abs() {
                            x[total] = points[2].x;
                        }
                        dy[total] = next_dy;
                        total += 1;
                    }
                }

                total
            }
            EdgeSegment::Cubic { points, .. } => {
                let mut total = 0usize;
                let mut next_dy = if y > points[0].y { 1 } else { -1 };
                x[total] = points[0].x;
                if points[0].y == y {
                    if points[0].y < points[1].y
                        || (points[0].y == points[1].y
                            && (points[0].y < points[2].y
                                || (points[0].y == points[2].y && points[0].y < points[3].y)))
                    {
                        dy[total] = 1;
                        total += 1;
                    } else {
                        next_dy = 1;
                    }
                }

                {
                    let ab = points[1] - points[0];
                    let br = points[2] - points[1] - ab;
                    let a_s = (points[3] - points[2]) - (points[2] - points[1]) - br;

                    let mut t = [0.0; 3];
                    let solutions =
                        solve_cubic(&mut t, a_s.y, 3.0 * br.y, 3.0 * ab.y, points[0].y - y);
                    // Sort solutions
                    if solutions >= 2 {
                        if t[0] > t[1] {
                            t.swap(0, 1);
                        }
                        if solutions >= 3 && t[1] > t[2] {
                            t.swap(1, 2);
                            if t[0] > t[1] {
                                t.swap(0, 1);
                            }
                        }
                    }

                    for &root in t.iter().take(solutions.max(0) as usize) {
                        if total >= 3 {
                            break;
                        }
                        if (0.0..=1.0).contains(&root) {
                            x[total] = points[0].x
                                + 3.0 * root * ab.x
                                + 3.0 * root * root * br.x
                                + root * root * root * a_s.x;
                            if (next_dy as f64) * (ab.y + 2.0 * root * br.y + root * root * a_s.y)
                                >= 0.0
                            {
                                dy[total] = next_dy;
                                total += 1;
                                next_dy = -next_dy;
                            }
                        }
                    }
                }

                if points[3].y == y {
                    if next_dy > 0 && total > 0 {
                        total -= 1;
                        next_dy = -1;
                    }
                    if (points[3].y < points[2].y
                        || (points[3].y == points[2].y
                            && (points[3].y < points[1].y
                                || (points[3].y == points[1].y && points[3].y < points[0].y))))
                        && total < 3
                    {
                        x[total] = points[3].x;
                        if next_dy < 0 {
                            dy[total] = -1;
                            total += 1;
                            next_dy = 1;
                        }
                    }
                }

                if next_dy != if y >= points[3].y { 1 } else { -1 } {
                    if total > 0 {
                        total -= 1;
                    } else {
                        if (points[3].y - y).abs() < (points[0].y - y).abs() {
                            x[total] = points[3].x;
                        }
                        dy[total] = next_dy;
                        total += 1;
                    }
                }

                total
            }
        }
    }

    /// Extends `bounds` to cover the segment.
    pub fn bound(&self, bounds: &mut Bounds) {
        match self {
            EdgeSegment::Linear { points, .. } => {
                point_bounds(points[0], bounds);
                point_bounds(points[1], bounds);
            }
            EdgeSegment::Quadratic { points, .. } => {
                point_bounds(points[0], bounds);
                point_bounds(points[2], bounds);

                let bot = (points[1] - points[0]) - (points[2] - points[1]);
                if bot.x != 0.0 {
                    let param = (points[1].x - points[0].x) / bot.x;
                    if param > 0.0 && param < 1.0 {
                        point_bounds(self.point(param), bounds);
                    }
                }
                if bot.y != 0.0 {
                    let param = (points[1].y - points[0].y) / bot.y;
                    if param > 0.0 && param < 1.0 {
                        point_bounds(self.point(param), bounds);
                    }
                }
            }
            EdgeSegment::Cubic { points, .. } => {
                point_bounds(points[0], bounds);
                point_bounds(points[3], bounds);

                let a0 = points[1] - points[0];
                let a1 = 2.0 * ((points[2] - points[1]) - a0);
                let a2 = (points[3] - points[0]) - 3.0 * (points[2] - points[1]);

                let mut params = [0.0; 2];
                for (a2c, a1c, a0c) in [(a2.x, a1.x, a0.x), (a2.y, a1.y, a0.y)] {
                    let solutions = solve_quadratic(&mut params, a2c, a1c, a0c);
                    for &param in params.iter().take(solutions.max(0) as usize) {
                        if param > 0.0 && param < 1.0 {
                            point_bounds(self.point(param), bounds);
                        }
                    }
                }
            }
        }
    }

    /// Reverses the direction of travel.
    pub fn reverse(&mut self) {
        match self {
            EdgeSegment::Linear { points, .. } => points.swap(0, 1),
            EdgeSegment::Quadratic { points, .. } => points.swap(0, 2),
            EdgeSegment::Cubic { points, .. } => {
                points.swap(0, 3);
                points.swap(1, 2);
            }
        }
    }

    /// Moves the start point, bending control points to keep the shape
    /// plausible. A quadratic reverts its control point if the start
    /// tangent would flip.
    pub fn move_start_point(&mut self, to: Point) {
        match self {
            EdgeSegment::Linear { points, .. } => points[0] = to,
            EdgeSegment::Quadratic { points, .. } => {
                let orig_s_dir = points[0] - points[1];
                let orig_p1 = points[1];

                let num = (points[0] - points[1]).cross(to - points[0]);
                let den = (points[0] - points[1]).cross(points[2] - points[1]);
                points[1] += num / den * (points[2] - points[1]);
                points[0] = to;

                if orig_s_dir.dot(points[0] - points[1]) < 0.0 {
                    points[1] = orig_p1;
                }
            }
            EdgeSegment::Cubic { points, .. } => {
                points[1] += to - points[0];
                points[0] = to;
            }
        }
    }

    pub fn move_end_point(&mut self, to: Point) {
        match self {
            EdgeSegment::Linear { points, .. } => points[1] = to,
            EdgeSegment::Quadratic { points, .. } => {
                let orig_e_dir = points[2] - points[1];
                let orig_p1 = points[1];

                let num = (points[2] - points[1]).cross(to - points[2]);
                let den = (points[2] - points[1]).cross(points[0] - points[1]);
                points[1] += num / den * (points[0] - points[1]);
                points[2] = to;

                if orig_e_dir.dot(points[2] - points[1]) < 0.0 {
                    points[1] = orig_p1;
                }
            }
            EdgeSegment::Cubic { points, .. } => {
                points[2] += to - points[3];
                points[3] = to;
            }
        }
    }

    /// Splits into three parts covering [0, 1/3], [1/3, 2/3], [2/3, 1].
    pub fn split_in_thirds(&self) -> [EdgeSegment; 3] {
        let color = self.color();
        match self {
            EdgeSegment::Linear { points, .. } => [
                EdgeSegment::linear_colored(points[0], self.point(1.0 / 3.0), color),
                EdgeSegment::linear_colored(self.point(1.0 / 3.0), self.point(2.0 / 3.0), color),
                EdgeSegment::linear_colored(self.point(2.0 / 3.0), points[1], color),
            ],
            EdgeSegment::Quadratic { points, .. } => [
                EdgeSegment::quadratic_colored(
                    points[0],
                    mix(points[0], points[1], 1.0 / 3.0),
                    self.point(1.0 / 3.0),
                    color,
                ),
                EdgeSegment::quadratic_colored(
                    self.point(1.0 / 3.0),
                    mix(
                        mix(points[0], points[1], 5.0 / 9.0),
                        mix(points[1], points[2], 4.0 / 9.0),
                        0.5,
                    ),
                    self.point(2.0 / 3.0),
                    color,
                ),
                EdgeSegment::quadratic_colored(
                    self.point(2.0 / 3.0),
                    mix(points[1], points[2], 2.0 / 3.0),
                    points[2],
                    color,
                ),
            ],
            EdgeSegment::Cubic { points, .. } => [
                EdgeSegment::cubic_colored(
                    points[0],
                    if points[0] == points[1] {
                        points[0]
                    } else {
                        mix(points[0], points[1], 1.0 / 3.0)
                    },
                    mix(
                        mix(points[0], points[1], 1.0 / 3.0),
                        mix(points[1], points[2], 1.0 / 3.0),
                        1.0 / 3.0,
                    ),
                    self.point(1.0 / 3.0),
                    color,
                ),
                EdgeSegment::cubic_colored(
                    self.point(1.0 / 3.0),
                    mix(
                        mix(
                            mix(points[0], points[1], 1.0 / 3.0),
                            mix(points[1], points[2], 1.0 / 3.0),
                            1.0 / 3.0,
                        ),
                        mix(
                            mix(points[1], points[2], 1.0 / 3.0),
                            mix(points[2], points[3], 1.0 / 3.0),
                            1.0 / 3.0,
                        ),
                        2.0 / 3.0,
                    ),
                    mix(
                        mix(
                            mix(points[0], points[1], 2.0 / 3.0),
                            mix(points[1], points[2], 2.0 / 3.0),
                            2.0 / 3.0,
                        ),
                        mix(
                            mix(points[1], points[2], 2.0 / 3.0),
                            mix(points[2], points[3], 2.0 / 3.0),
                            2.0 / 3.0,
                        ),
                        1.0 / 3.0,
                    ),
                    self.point(2.0 / 3.0),
                    color,
                ),
                EdgeSegment::cubic_colored(
                    self.point(2.0 / 3.0),
                    mix(
                        mix(points[1], points[2], 2.0 / 3.0),
                        mix(points[2], points[3], 2.0 / 3.0),
                        2.0 / 3.0,
                    ),
                    if points[2] == points[3] {
                        points[3]
                    } else {
                        mix(points[2], points[3], 2.0 / 3.0)
                    },
                    points[3],
                    color,
                ),
            ],
        }
    }

    /// Arc length. Closed form for lines and quadratics; cubics are not
    /// needed by any caller and fall back to chordal flattening.
    pub fn length(&self) -> f64 {
        match self {
            EdgeSegment::Linear { points, .. } => (points[1] - points[0]).hypot(),
            EdgeSegment::Quadratic { points, .. } => {
                let ab = points[1] - points[0];
                let br = points[2] - points[1] - ab;
                let ab_ab = ab.dot(ab);
                let ab_br = ab.dot(br);
                let br_br = br.dot(br);
                let ab_len = ab_ab.sqrt();
                let br_len = br_br.sqrt();
                let crs = ab.cross(br);
                let h = (ab_ab + ab_br + ab_br + br_br).sqrt();
                (br_len * ((ab_br + br_br) * h - ab_br * ab_len)
                    + crs * crs * ((br_len * h + ab_br + br_br) / (br_len * ab_len + ab_br)).ln())
                    / (br_br * br_len)
            }
            EdgeSegment::Cubic { .. } => {
                const STEPS: usize = 32;
                let mut total = 0.0;
                let mut prev = self.point(0.0);
                for step in 1..=STEPS {
                    let next = self.point(step as f64 / STEPS as f64);
                    total += (next - prev).hypot();
                    prev = next;
                }
                total
            }
        }
    }

    /// Quadratic-only: equivalent cubic segment.
    pub fn to_cubic(&self) -> EdgeSegment {
        match self {
            EdgeSegment::Quadratic { points, color } => EdgeSegment::cubic_colored(
                points[0],
                mix(points[0], points[1], 2.0 / 3.0),
                mix(points[1], points[2], 1.0 / 3.0),
                points[2],
                *color,
            ),
            other => other.clone(),
        }
    }

    /// Cubic-only: pushes the control point near the given endpoint
    /// (`param` 0 or 1) off the tangent line to break a degenerate corner.
    pub fn deconverge(&mut self, param: i32, amount: f64) {
        let dir = self.direction(param as f64);
        let normal = orthonormal(dir, true, false);
        let h = (self.direction_change(param as f64) - dir).dot(normal);
        if let EdgeSegment::Cubic { points, .. } = self {
            match param {
                0 => points[1] += amount * (dir + sign(h) as f64 * h.abs().sqrt() * normal),
                1 => points[2] -= amount * (dir - sign(h) as f64 * h.abs().sqrt() * normal),
                _ => {}
            }
        }
    }
}
