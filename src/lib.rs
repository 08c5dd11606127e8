//! Rterrain - height-field terrain with brush editing and the TERR_KJW file format

pub mod core;
pub mod math;
pub mod material;
pub mod raster;
pub mod format;
pub mod selection;
pub mod brush;
pub mod terrain;
pub mod preview;
