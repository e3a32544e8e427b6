//! Signed distance with an orthogonality tie-break.

/// Distance from a query point to an edge. When two edges are equally far
/// (a shared endpoint), `dot` breaks the tie: the edge whose tangent is
/// more orthogonal to the endpoint direction is considered closer.
#[derive(Clone, Copy, Debug)]
pub struct SignedDistance {
    pub distance: f64,
    pub dot: f64,
}

impl SignedDistance {
    /// Sentinel further away than any real distance.
    pub const INFINITE: SignedDistance = SignedDistance {
        distance: -1e240,
        dot: 1.0,
    };

    pub fn new(distance: f64, dot: f64) -> Self {
        SignedDistance { distance, dot }
    }
}

impl Default for SignedDistance {
    fn default() -> Self {
        Self::INFINITE
    }
}

impl PartialEq for SignedDistance {
    fn eq(&self, other: &Self) -> bool {
        self.distance.abs() == other.distance.abs() && self.dot == other.dot
    }
}

impl PartialOrd for SignedDistance {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        (self.distance.abs(), self.dot).partial_cmp(&(other.distance.abs(), other.dot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_dominates_ordering() {
        assert!(SignedDistance::new(-1.0, 0.9) < SignedDistance::new(2.0, 0.0));
        assert!(SignedDistance::new(3.0, 0.0) > SignedDistance::new(-2.0, 1.0));
    }

    #[test]
    fn dot_breaks_ties() {
        assert!(SignedDistance::new(1.0, 0.2) < SignedDistance::new(-1.0, 0.8));
    }

    #[test]
    fn infinite_is_farther_than_anything() {
        assert!(SignedDistance::new(1e9, 1.0) < SignedDistance::INFINITE);
    }
}
