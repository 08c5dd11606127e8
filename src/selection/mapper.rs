//! World to raster coordinate mapping.
//!
//! Terrain positions are 2D points on the ground plane stored as `Vec2`
//! with `x` = world X and `y` = world Z. The terrain quad is centred on the
//! origin; raster row 0 lies on the +Z edge, so Z is inverted when mapping
//! into raster space.

use crate::core::types::{Mat4, TerrainSize, Vec2, Vec3};

/// Snap one axis to the nearest whole unit (ties away from zero), then clamp
/// it to the whole-unit half extent.
pub fn snap_axis(value: f32, half_extent: f32) -> f32 {
    let offset = if value > 0.0 {
        value + 0.5
    } else if value < 0.0 {
        value - 0.5
    } else {
        value
    };
    let bound = half_extent.floor();
    offset.trunc().clamp(-bound, bound)
}

/// Texel-snapped cursor position for an analogue ground point.
pub fn digital_position(analogue: Vec2, size: TerrainSize) -> Vec2 {
    let half = size.half();
    Vec2::new(snap_axis(analogue.x, half.x), snap_axis(analogue.y, half.y))
}

/// Height raster column and row under a digital position.
pub fn height_center(digital: Vec2, size: TerrainSize) -> (i64, i64) {
    let (units_x, units_z) = size.whole_units();
    let x = digital.x as i64 + units_x as i64 / 2;
    let z = (-digital.y) as i64 + units_z as i64 / 2;
    (x, z)
}

/// Height raster index under a digital position, clamped into the raster.
pub fn height_index(digital: Vec2, size: TerrainSize, width: usize, len: usize) -> usize {
    debug_assert!(len > 0, "height index requested on an empty raster");
    let (x, z) = height_center(digital, size);
    let index = z * width as i64 + x;
    index.clamp(0, len.saturating_sub(1) as i64) as usize
}

/// Masking texel under an analogue position.
pub fn masking_center(analogue: Vec2, size: TerrainSize, detail: f32) -> (i64, i64) {
    let half = size.half();
    let u = ((half.x + analogue.x) * detail).floor() as i64;
    let v = (-(-half.y + analogue.y) * detail).floor() as i64;
    (u, v)
}

/// Transform taking world XZ onto the [0, 1] masking UV square.
///
/// Translates by half the size, then scales by its reciprocal.
pub fn masking_space(size: TerrainSize) -> Mat4 {
    let translation = Mat4::from_translation(Vec3::new(size.x / 2.0, 0.0, size.z / 2.0));
    let scaling = Mat4::from_scale(Vec3::new(1.0 / size.x, 1.0, 1.0 / size.z));
    scaling * translation
}
