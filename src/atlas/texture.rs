//! One atlas page of raw pixel bytes plus its slot bookkeeping.

use super::slots::SlotArena;

pub struct TextureAtlas {
    data: Vec<u8>,
    arena: SlotArena,
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
}

impl TextureAtlas {
    pub fn new(width: u32, height: u32, bytes_per_pixel: u32) -> Self {
        TextureAtlas {
            data: vec![0; (width * height * bytes_per_pixel) as usize],
            arena: SlotArena::new(width, height),
            width,
            height,
            bytes_per_pixel,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Places a `width` x `height` texture (top-left row order) and
    /// returns its position, or `None` when the page is full. The seam
    /// row and column reserved by the slot stay zero so bilinear
    /// sampling cannot bleed between neighbors.
    pub fn add_texture(&mut self, width: u32, height: u32, data: &[u8]) -> Option<(u32, u32)> {
        let index = self.arena.find_slot(width, height)?;
        let slot = *self.arena.slot(index);

        // zero-sized glyphs still claim a slot but have no bytes to copy
        if width > 0 && height > 0 {
            let bpp = self.bytes_per_pixel as usize;
            let source_width = (slot.width - 1) as usize;
            let dest_stride = self.width as usize * bpp;
            for row in 0..(slot.height - 1) as usize {
                let src = row * source_width * bpp;
                let dest = (slot.y as usize + row) * dest_stride + slot.x as usize * bpp;
                self.data[dest..dest + source_width * bpp]
                    .copy_from_slice(&data[src..src + source_width * bpp]);
            }
        }
        Some((slot.x, slot.y))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Takes the finished page and resets to a fresh empty one of the
    /// same size.
    pub fn finish_page(&mut self) -> Vec<u8> {
        self.arena = SlotArena::new(self.width, self.height);
        std::mem::replace(
            &mut self.data,
            vec![0; (self.width * self.height * self.bytes_per_pixel) as usize],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_rows_and_keeps_seams_zero() {
        let mut atlas = TextureAtlas::new(8, 8, 1);
        let texture = vec![9u8; 9];
        let (x, y) = atlas.add_texture(3, 3, &texture).expect("3x3 fits in 8x8");
        assert_eq!((x, y), (0, 0));
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(atlas.data()[(y + row) as usize * 8 + (x + col) as usize], 9);
            }
        }
        assert_eq!(atlas.data()[3], 0, "seam column right of the texture stays zero");
        assert_eq!(atlas.data()[3 * 8], 0, "seam row below the texture stays zero");
    }

    #[test]
    fn finish_page_resets_data_and_slots() {
        let mut atlas = TextureAtlas::new(4, 4, 1);
        atlas.add_texture(3, 3, &[1; 9]).expect("3x3 fits in 4x4");
        assert!(atlas.add_texture(3, 3, &[1; 9]).is_none(), "page is full");

        let page = atlas.finish_page();
        assert_eq!(page.iter().filter(|&&b| b == 1).count(), 9);
        assert!(atlas.data().iter().all(|&b| b == 0), "fresh page is zeroed");
        assert!(
            atlas.add_texture(3, 3, &[1; 9]).is_some(),
            "slots are reclaimed with the new page"
        );
    }
}
