//! Mapping between shape coordinates and output pixel coordinates.

use kurbo::{Point, Vec2};

/// `pixel = scale * (shape + translate)` per axis.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    scale: Vec2,
    translate: Vec2,
}

impl Default for Projection {
    fn default() -> Self {
        Projection {
            scale: Vec2::new(1.0, 1.0),
            translate: Vec2::ZERO,
        }
    }
}

impl Projection {
    pub fn new(scale: Vec2, translate: Vec2) -> Self {
        Projection { scale, translate }
    }

    /// Shape coordinates to pixel coordinates.
    pub fn project(&self, coord: Point) -> Point {
        Point::new(
            self.scale.x * (coord.x + self.translate.x),
            self.scale.y * (coord.y + self.translate.y),
        )
    }

    /// Pixel coordinates to shape coordinates.
    pub fn unproject(&self, coord: Point) -> Point {
        Point::new(
            coord.x / self.scale.x - self.translate.x,
            coord.y / self.scale.y - self.translate.y,
        )
    }

    pub fn unproject_x(&self, x: f64) -> f64 {
        x / self.scale.x - self.translate.x
    }

    pub fn unproject_y(&self, y: f64) -> f64 {
        y / self.scale.y - self.translate.y
    }
}
