//! Texture atlas packing.

mod packer;
mod slots;
mod texture;

pub use packer::{AtlasPacker, PackerConfig};
pub use slots::{Slot, SlotArena};
pub use texture::TextureAtlas;
