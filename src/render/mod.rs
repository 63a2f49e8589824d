//! CPU raster output: surfaces, the frame painter, caption glyphs.

pub mod caption;
pub mod face;
pub mod surface;
