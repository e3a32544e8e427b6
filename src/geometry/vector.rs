//! Small vector helpers on top of kurbo's value types.
//!
//! kurbo's `Vec2` normalizes through `hypot`, but the distance math here
//! needs explicit control over what a zero-length vector turns into, and
//! orthogonal vectors of selectable polarity. These free functions keep
//! that policy in one place.

use kurbo::{Point, Vec2};

/// Linear interpolation between two points.
pub fn mix(a: Point, b: Point, t: f64) -> Point {
    a.lerp(b, t)
}

/// Linear interpolation between two vectors.
pub fn mix_vec(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    a + t * (b - a)
}

/// Sign of `n` as -1, 0 or 1.
pub fn sign(n: f64) -> i32 {
    ((n > 0.0) as i32) - ((n < 0.0) as i32)
}

/// Sign of `n` with zero treated as negative, so the result is never 0.
pub fn non_zero_sign(n: f64) -> f64 {
    if n > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Unit vector in the direction of `v`. A zero vector yields the zero
/// vector when `allow_zero` is set, the +Y unit vector otherwise.
pub fn normalize(v: Vec2, allow_zero: bool) -> Vec2 {
    let len = v.hypot();
    if len == 0.0 {
        Vec2::new(0.0, if allow_zero { 0.0 } else { 1.0 })
    } else {
        Vec2::new(v.x / len, v.y / len)
    }
}

/// Vector perpendicular to `v`. Positive polarity rotates counter-clockwise.
pub fn orthogonal(v: Vec2, polarity: bool) -> Vec2 {
    if polarity {
        Vec2::new(-v.y, v.x)
    } else {
        Vec2::new(v.y, -v.x)
    }
}

/// Unit vector perpendicular to `v`, with the same zero-vector policy as
/// [`normalize`].
pub fn orthonormal(v: Vec2, polarity: bool, allow_zero: bool) -> Vec2 {
    let len = v.hypot();
    if len == 0.0 {
        let unit = if allow_zero { 0.0 } else { 1.0 };
        if polarity {
            Vec2::new(0.0, unit)
        } else {
            Vec2::new(0.0, -unit)
        }
    } else if polarity {
        Vec2::new(-v.y / len, v.x / len)
    } else {
        Vec2::new(v.y / len, -v.x / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_zero_vector() {
        assert_eq!(
            normalize(Vec2::ZERO, true),
            Vec2::ZERO,
            "zero vector with allow_zero should stay zero"
        );
        assert_eq!(
            normalize(Vec2::ZERO, false),
            Vec2::new(0.0, 1.0),
            "zero vector without allow_zero should become the +Y unit"
        );
    }

    #[test]
    fn orthonormal_polarity() {
        let v = Vec2::new(3.0, 0.0);
        assert_eq!(orthonormal(v, true, false), Vec2::new(0.0, 1.0));
        assert_eq!(orthonormal(v, false, false), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn orthogonal_is_perpendicular() {
        let v = Vec2::new(2.0, 5.0);
        assert_eq!(v.dot(orthogonal(v, true)), 0.0);
        assert_eq!(v.dot(orthogonal(v, false)), 0.0);
    }

    #[test]
    fn non_zero_sign_never_returns_zero() {
        assert_eq!(non_zero_sign(0.0), -1.0);
        assert_eq!(non_zero_sign(1e-300), 1.0);
        assert_eq!(non_zero_sign(-2.0), -1.0);
    }
}
