//! Pixel buffers and image file output.

mod bitmap;
mod bmp;

pub use bitmap::Bitmap;
pub use bmp::{save_bmp_gray, write_bmp_gray, write_bmp_rgb};
