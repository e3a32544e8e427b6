//! Owned single-channel bitmap.

/// W x H pixel buffer in row-major order, row 0 first.
#[derive(Clone, Debug)]
pub struct Bitmap<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy + Default> Bitmap<T> {
    /// Zero-initialized bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Bitmap {
            pixels: vec![T::default(); width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> T {
        self.pixels[self.width * y + x]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut T {
        &mut self.pixels[self.width * y + x]
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_is_row_major() {
        let mut bitmap = Bitmap::<f32>::new(3, 2);
        *bitmap.pixel_mut(2, 1) = 7.0;
        assert_eq!(bitmap.pixel(2, 1), 7.0);
        assert_eq!(bitmap.pixels()[5], 7.0);
        assert_eq!(bitmap.pixel(0, 0), 0.0);
    }
}
