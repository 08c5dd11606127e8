//! Brush engine for terrain painting
//!
//! Two edit domains share the same cursor: discrete height steps on the
//! height raster and radial falloff weights on the masking raster.

pub mod height;
pub mod masking;

// Re-exports
pub use height::{HeightEdit, paint_heights};
pub use masking::{MaskBlend, MaskingStroke, falloff, paint_masking};
