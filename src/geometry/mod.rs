//! Geometry kernel for distance-field generation.
//!
//! Shapes are sets of closed contours, and contours are lists of line or
//! bezier segments. Everything works in the font's design units; a
//! [`Projection`] maps between that space and output pixels.

mod contour;
mod projection;
mod segment;
mod shape;
mod solver;
mod vector;

pub use contour::Contour;
pub use projection::Projection;
pub use segment::{EdgeColor, EdgeSegment, CUBIC_SEARCH_STARTS, CUBIC_SEARCH_STEPS};
pub use shape::{Bounds, Shape, CORNER_DOT_EPSILON, DECONVERGENCE_FACTOR};
pub use solver::{solve_cubic, solve_quadratic};
pub use vector::{mix, mix_vec, non_zero_sign, normalize, orthogonal, orthonormal, sign};
