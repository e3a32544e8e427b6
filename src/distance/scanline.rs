//! Horizontal scanline: a sorted list of edge crossings.

use std::cell::Cell;

/// Fill rule deciding which winding counts mean "inside".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    Odd,
    Positive,
    Negative,
}

pub fn interpret_fill_rule(intersections: i32, fill_rule: FillRule) -> bool {
    match fill_rule {
        FillRule::NonZero => intersections != 0,
        FillRule::Odd => intersections & 1 != 0,
        FillRule::Positive => intersections > 0,
        FillRule::Negative => intersections < 0,
    }
}

#[derive(Clone, Copy, Debug)]
struct Intersection {
    x: f64,
    /// Direction of the crossing; replaced by the running winding sum
    /// during preprocessing.
    direction: i32,
}

/// Crossings of one horizontal line with a shape, queryable by X.
#[derive(Clone, Debug, Default)]
pub struct Scanline {
    intersections: Vec<Intersection>,
    last_index: Cell<usize>,
}

impl Scanline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the crossing list with `(x, direction)` pairs.
    pub fn set_intersections(&mut self, intersections: Vec<(f64, i32)>) {
        self.intersections = intersections
            .into_iter()
            .map(|(x, direction)| Intersection { x, direction })
            .collect();
        self.preprocess();
    }

    fn preprocess(&mut self) {
        self.last_index.set(0);
        if !self.intersections.is_empty() {
            self.intersections.sort_by(|a, b| {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut total_direction = 0;
            for intersection in &mut self.intersections {
                total_direction += intersection.direction;
                intersection.direction = total_direction;
            }
        }
    }

    /// Index of the rightmost crossing at or left of `x`. Cached between
    /// calls, so sweeping queries in either direction stay cheap.
    fn move_to(&self, x: f64) -> Option<usize> {
        if self.intersections.is_empty() {
            return None;
        }

        let mut index = self.last_index.get();
        if x < self.intersections[index].x {
            loop {
                if index == 0 {
                    self.last_index.set(0);
                    return None;
                }
                index -= 1;
                if x >= self.intersections[index].x {
                    break;
                }
            }
        } else {
            while index < self.intersections.len() - 1 && x >= self.intersections[index + 1].x {
                index += 1;
            }
        }
        self.last_index.set(index);
        Some(index)
    }

    /// Number of crossings left of `x`.
    pub fn count_intersections(&self, x: f64) -> usize {
        self.move_to(x).map_or(0, |index| index + 1)
    }

    /// Winding sum left of `x`.
    pub fn sum_intersections(&self, x: f64) -> i32 {
        self.move_to(x)
            .map_or(0, |index| self.intersections[index].direction)
    }

    /// Whether `x` lies in filled area under the given rule.
    pub fn filled(&self, x: f64, fill_rule: FillRule) -> bool {
        interpret_fill_rule(self.sum_intersections(x), fill_rule)
    }

    /// Length of the subset of [x_from, x_to] where `a` and `b` agree on
    /// being filled.
    pub fn overlap(a: &Scanline, b: &Scanline, x_from: f64, x_to: f64, fill_rule: FillRule) -> f64 {
        let mut total = 0.0;
        let mut a_inside = false;
        let mut b_inside = false;
        let mut ai = 0usize;
        let mut bi = 0usize;
        let mut ax = a.intersections.first().map_or(x_to, |i| i.x);
        let mut bx = b.intersections.first().map_or(x_to, |i| i.x);

        while ax < x_from || bx < x_from {
            let x_next = ax.min(bx);
            if ax == x_next && ai < a.intersections.len() {
                a_inside = interpret_fill_rule(a.intersections[ai].direction, fill_rule);
                ai += 1;
                ax = a.intersections.get(ai).map_or(x_to, |i| i.x);
            }
            if bx == x_next && bi < b.intersections.len() {
                b_inside = interpret_fill_rule(b.intersections[bi].direction, fill_rule);
                bi += 1;
                bx = b.intersections.get(bi).map_or(x_to, |i| i.x);
            }
        }

        let mut x = x_from;
        while ax < x_to || bx < x_to {
            let x_next = ax.min(bx);
            if a_inside == b_inside {
                total += x_next - x;
            }
            if ax == x_next && ai < a.intersections.len() {
                a_inside = interpret_fill_rule(a.intersections[ai].direction, fill_rule);
                ai += 1;
                ax = a.intersections.get(ai).map_or(x_to, |i| i.x);
            }
            if bx == x_next && bi < b.intersections.len() {
                b_inside = interpret_fill_rule(b.intersections[bi].direction, fill_rule);
                bi += 1;
                bx = b.intersections.get(bi).map_or(x_to, |i| i.x);
            }
            x = x_next;
        }

        if a_inside == b_inside {
            total += x_to - x;
        }
        total
    }
}
