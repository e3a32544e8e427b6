//! Single-channel signed-distance-field font atlas generation.
//!
//! Glyph outlines are loaded from TrueType/OpenType files, converted
//! into true-distance SDF bitmaps, and packed into one or more atlas
//! pages together with a character table a text renderer can consume.
//!
//! The main entry point is [`pipeline::generate`]; the lower layers
//! (geometry kernel, distance engine, charset parser, atlas packer)
//! are usable on their own.

pub mod atlas;
pub mod charset;
pub mod distance;
pub mod font;
pub mod geometry;
pub mod image;
pub mod logger;
pub mod pipeline;
