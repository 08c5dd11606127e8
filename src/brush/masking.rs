//! Masking (material weight) painting

use rayon::prelude::*;

use crate::core::types::{TerrainSize, Vec2};
use crate::raster::{MaskingLayer, MaskingRaster};
use crate::selection::mapper::masking_center;

/// How a stroke combines with the existing channel weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskBlend {
    /// Keep the larger of the old and new weight (painting only raises)
    #[default]
    Max,
    /// Overwrite the channel
    ForceSet,
}

/// A single masking brush application
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskingStroke {
    pub layer: MaskingLayer,
    /// Brush centre, world X and Z
    pub position: Vec2,
    /// Target weight in [0, 1]
    pub value: f32,
    /// Radius in world units
    pub radius: f32,
    pub attenuation: f32,
    pub blend: MaskBlend,
}

impl MaskingStroke {
    pub fn new(layer: MaskingLayer, position: Vec2, value: f32, radius: f32, attenuation: f32) -> Self {
        Self {
            layer,
            position,
            value,
            radius,
            attenuation,
            blend: MaskBlend::Max,
        }
    }

    /// Force-set stroke with zero weight.
    pub fn erase(layer: MaskingLayer, position: Vec2, radius: f32, attenuation: f32) -> Self {
        Self::new(layer, position, 0.0, radius, attenuation).with_blend(MaskBlend::ForceSet)
    }

    /// Set blend mode (builder pattern)
    pub fn with_blend(mut self, blend: MaskBlend) -> Self {
        self.blend = blend;
        self
    }
}

/// Brush weight for a texel `dist_sq` texels² from the centre.
///
/// Combines a linear and a squared distance term, both scaled by
/// `attenuation`, and clamps to [0, 1].
pub fn falloff(dist_sq: f32, detail_sq: f32, radius: f32, attenuation: f32) -> f32 {
    if radius <= 0.0 {
        return if dist_sq == 0.0 { 1.0 } else { 0.0 };
    }

    let world_sq = dist_sq / detail_sq;
    let factor = 1.0
        - (world_sq.sqrt() / radius) * attenuation
        - (world_sq / radius) * attenuation;
    factor.clamp(0.0, 1.0)
}

/// Paint `stroke` into the masking raster. Returns the number of texels
/// inside the brush.
///
/// Every texel of the raster is tested; texels with `dist² <= radius²`
/// (in texel units) are written.
pub fn paint_masking(
    raster: &mut MaskingRaster,
    size: TerrainSize,
    detail: f32,
    stroke: &MaskingStroke,
) -> usize {
    let detail_sq = detail * detail;
    let radius_sq = stroke.radius * stroke.radius * detail_sq;
    let (center_u, center_v) = masking_center(stroke.position, size, detail);
    let width = raster.width();

    raster
        .texels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .map(|(v, row)| {
            let dv = (v as i64 - center_v) as f32;
            let mut inside = 0;

            for (u, texel) in row.iter_mut().enumerate() {
                let du = (u as i64 - center_u) as f32;
                let dist_sq = du * du + dv * dv;
                if dist_sq > radius_sq {
                    continue;
                }

                let factor = falloff(dist_sq, detail_sq, stroke.radius, stroke.attenuation);
                let weight = (stroke.value * factor * 255.0) as u8;
                let channel = texel.channel_mut(stroke.layer);
                *channel = match stroke.blend {
                    MaskBlend::ForceSet => weight,
                    MaskBlend::Max => (*channel).max(weight),
                };
                inside += 1;
            }
            inside
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::MaskTexel;

    const SIZE: TerrainSize = TerrainSize { x: 10.0, z: 10.0 };

    fn raster(detail: f32) -> MaskingRaster {
        MaskingRaster::allocate(SIZE, detail)
    }

    fn at(raster: &MaskingRaster, u: usize, v: usize) -> MaskTexel {
        raster.get(v * raster.width() + u)
    }

    #[test]
    fn test_falloff_shape() {
        assert_eq!(falloff(0.0, 1.0, 4.0, 0.5), 1.0);
        // d = 2, r = 4, att = 0.5: 1 - 0.25 - 0.5
        assert!((falloff(4.0, 1.0, 4.0, 0.5) - 0.25).abs() < 1e-6);
        assert_eq!(falloff(16.0, 1.0, 4.0, 1.0), 0.0);
        assert_eq!(falloff(9.0, 1.0, 4.0, 0.0), 1.0);
    }

    #[test]
    fn test_falloff_uses_world_distance() {
        // 4 texels at detail 2 is 2 world units
        assert_eq!(falloff(16.0, 4.0, 4.0, 0.5), falloff(4.0, 1.0, 4.0, 0.5));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let mut r = raster(1.0);
        // centre texel (5, 5)
        let stroke = MaskingStroke::new(MaskingLayer::G, Vec2::ZERO, 1.0, 2.0, 0.0);
        paint_masking(&mut r, SIZE, 1.0, &stroke);

        assert_eq!(at(&r, 7, 5).g, 255); // dist² == radius²
        assert_eq!(at(&r, 5, 3).g, 255);
        assert_eq!(at(&r, 7, 6).g, 0); // dist² == radius² + 1
        assert_eq!(at(&r, 5, 5).r, 0);
    }

    #[test]
    fn test_touched_count() {
        let mut r = raster(1.0);
        let stroke = MaskingStroke::new(MaskingLayer::R, Vec2::ZERO, 1.0, 1.0, 0.0);
        assert_eq!(paint_masking(&mut r, SIZE, 1.0, &stroke), 5);
    }

    #[test]
    fn test_max_blend_never_lowers() {
        let mut r = raster(2.0);
        let strong = MaskingStroke::new(MaskingLayer::B, Vec2::new(1.0, 1.0), 1.0, 2.0, 0.3);
        paint_masking(&mut r, SIZE, 2.0, &strong);
        let before = r.clone();

        for (i, pos) in [(0.5, 0.5), (1.0, 1.0), (-1.0, 2.0)].into_iter().enumerate() {
            let weak = MaskingStroke::new(MaskingLayer::B, Vec2::new(pos.0, pos.1), 0.2 + i as f32 * 0.1, 3.0, 0.8);
            paint_masking(&mut r, SIZE, 2.0, &weak);
        }

        for (old, new) in before.texels().iter().zip(r.texels()) {
            assert!(new.b >= old.b);
        }
    }

    #[test]
    fn test_erase_force_sets_zero() {
        let mut r = raster(1.0);
        paint_masking(&mut r, SIZE, 1.0, &MaskingStroke::new(MaskingLayer::A, Vec2::ZERO, 1.0, 3.0, 0.0));
        assert_eq!(at(&r, 5, 5).a, 255);

        paint_masking(&mut r, SIZE, 1.0, &MaskingStroke::erase(MaskingLayer::A, Vec2::ZERO, 1.0, 0.0));
        assert_eq!(at(&r, 5, 5).a, 0);
        assert_eq!(at(&r, 6, 5).a, 0);
        // outside the eraser
        assert_eq!(at(&r, 7, 5).a, 255);
    }

    #[test]
    fn test_force_set_can_lower() {
        let mut r = raster(1.0);
        paint_masking(&mut r, SIZE, 1.0, &MaskingStroke::new(MaskingLayer::R, Vec2::ZERO, 1.0, 1.0, 0.0));
        let half = MaskingStroke::new(MaskingLayer::R, Vec2::ZERO, 0.5, 1.0, 0.0).with_blend(MaskBlend::ForceSet);
        paint_masking(&mut r, SIZE, 1.0, &half);
        assert_eq!(at(&r, 5, 5).r, 127);
    }

    #[test]
    fn test_partial_trailing_row() {
        let texels = vec![MaskTexel::EMPTY; 25];
        let mut r = MaskingRaster::from_texels(SIZE, 1.0, texels);
        // centre (2, 4) lies past the stored rows; only (2, 2) is in reach
        let stroke = MaskingStroke::new(MaskingLayer::R, Vec2::new(-3.0, 1.0), 1.0, 2.0, 0.0);
        assert_eq!(paint_masking(&mut r, SIZE, 1.0, &stroke), 1);
        assert_eq!(r.get(22).r, 255);
    }
}
