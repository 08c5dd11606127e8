//! Raster store: the height and masking texel buffers owned by a terrain.
//!
//! Both rasters are plain row-major buffers. They are never resized in place;
//! a change of terrain size or masking detail allocates a fresh buffer.

pub mod height;
pub mod masking;

pub use height::{HeightRaster, HEIGHT_NEUTRAL};
pub use masking::{MaskTexel, MaskingLayer, MaskingRaster};
