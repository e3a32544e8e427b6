//! Signed-distance evaluation and field generation.

mod combiner;
mod finder;
mod generate;
mod scanline;
mod selector;
mod sign_correction;
mod signed_distance;

pub use combiner::{ContourCombiner, OverlappingContourCombiner, SimpleContourCombiner};
pub use finder::{ShapeDistanceFinder, SimpleTrueShapeDistanceFinder};
pub use generate::{generate_sdf, GeneratorConfig};
pub use scanline::{interpret_fill_rule, FillRule, Scanline};
pub use selector::{EdgeCache, TrueDistanceSelector};
pub use sign_correction::{distance_sign_correction, rasterize};
pub use signed_distance::SignedDistance;
