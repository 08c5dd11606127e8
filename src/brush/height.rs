//! Height painting

use crate::core::types::{TerrainSize, Vec2};
use crate::raster::HeightRaster;
use crate::selection::EditMode;
use crate::selection::mapper::{height_center, height_index};

/// How a touched height sample changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightEdit {
    /// Overwrite with an absolute world height
    Set { target: f32, height_range: f32 },
    /// One step up or down, saturating
    Delta,
    /// Leave samples untouched
    Keep,
}

impl HeightEdit {
    /// Edit performed by a height stroke in the given mode.
    pub fn for_mode(mode: EditMode, target: f32, height_range: f32) -> Self {
        match mode {
            EditMode::SetHeight => Self::Set { target, height_range },
            EditMode::DeltaHeight => Self::Delta,
            EditMode::Masking | EditMode::None => Self::Keep,
        }
    }

    /// New value of `sample`. `raise` picks the direction of a delta step.
    pub fn apply(self, sample: u8, raise: bool) -> u8 {
        match self {
            Self::Set { target, height_range } => height_to_sample(target, height_range),
            Self::Delta if raise => sample.saturating_add(1),
            Self::Delta => sample.saturating_sub(1),
            Self::Keep => sample,
        }
    }
}

/// Quantize a world height into the raster's 0..=255 range.
pub fn height_to_sample(height: f32, height_range: f32) -> u8 {
    let normalized = ((height + height_range / 2.0) / height_range).clamp(0.0, 1.0);
    (normalized * 255.0) as u8
}

/// Apply `edit` around the digital cursor. Returns the number of samples
/// visited.
///
/// A brush one texel wide touches the single sample under the cursor, with
/// the index clamped into the raster. Wider brushes visit a square of
/// `2 * half_size + 1` texels and skip texels that fall off the raster
/// instead of clamping them.
pub fn paint_heights(
    raster: &mut HeightRaster,
    size: TerrainSize,
    digital: Vec2,
    half_size: f32,
    edit: HeightEdit,
    raise: bool,
) -> usize {
    if raster.is_empty() {
        return 0;
    }

    let selection_size = (half_size * 2.0) as i32;
    if selection_size == 1 {
        let index = height_index(digital, size, raster.width(), raster.len());
        raster.set(index, edit.apply(raster.get(index), raise));
        return 1;
    }

    let (center_x, center_z) = height_center(digital, size);
    let x_range = (center_x as f32 - half_size) as i64..=(center_x as f32 + half_size) as i64;
    let z_range = (center_z as f32 - half_size) as i64..=(center_z as f32 + half_size) as i64;

    let mut touched = 0;
    for x in x_range {
        for z in z_range.clone() {
            if x < 0 || z < 0 {
                continue;
            }
            let Some(index) = raster.index_of(x as usize, z as usize) else {
                continue;
            };

            raster.set(index, edit.apply(raster.get(index), raise));
            touched += 1;
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::HEIGHT_NEUTRAL;

    const SIZE: TerrainSize = TerrainSize { x: 10.0, z: 10.0 };

    fn raster() -> HeightRaster {
        HeightRaster::allocate(SIZE)
    }

    #[test]
    fn test_height_to_sample() {
        assert_eq!(height_to_sample(0.0, 10.0), 127);
        assert_eq!(height_to_sample(5.0, 10.0), 255);
        assert_eq!(height_to_sample(-5.0, 10.0), 0);
        assert_eq!(height_to_sample(100.0, 10.0), 255);
        assert_eq!(height_to_sample(-100.0, 10.0), 0);
        assert_eq!(height_to_sample(2.5, 10.0), 191);
    }

    #[test]
    fn test_delta_ratchet_saturates_high() {
        let mut r = raster();
        let index = height_index(Vec2::ZERO, SIZE, r.width(), r.len());
        r.set(index, 200);

        for _ in 0..60 {
            paint_heights(&mut r, SIZE, Vec2::ZERO, 0.5, HeightEdit::Delta, true);
        }
        assert_eq!(r.get(index), 255);
    }

    #[test]
    fn test_delta_ratchet_saturates_low() {
        let mut r = raster();
        let index = height_index(Vec2::ZERO, SIZE, r.width(), r.len());

        for _ in 0..300 {
            paint_heights(&mut r, SIZE, Vec2::ZERO, 0.5, HeightEdit::Delta, false);
        }
        assert_eq!(r.get(index), 0);
    }

    #[test]
    fn test_single_texel_touches_one_sample() {
        let mut r = raster();
        let touched = paint_heights(&mut r, SIZE, Vec2::new(2.0, 3.0), 0.5, HeightEdit::Delta, true);
        assert_eq!(touched, 1);

        let changed: Vec<usize> = (0..r.len()).filter(|&i| r.get(i) != HEIGHT_NEUTRAL).collect();
        // column 2 + 5, row -3 + 5
        assert_eq!(changed, vec![2 * 11 + 7]);
    }

    #[test]
    fn test_square_brush_same_step_everywhere() {
        let mut r = raster();
        let touched = paint_heights(&mut r, SIZE, Vec2::ZERO, 1.0, HeightEdit::Delta, true);
        assert_eq!(touched, 9);

        for x in 4..=6 {
            for z in 4..=6 {
                assert_eq!(r.get(z * 11 + x), HEIGHT_NEUTRAL + 1);
            }
        }
        assert_eq!(r.get(3 * 11 + 5), HEIGHT_NEUTRAL);
        assert_eq!(r.get(5 * 11 + 7), HEIGHT_NEUTRAL);
    }

    #[test]
    fn test_edge_texels_are_skipped_not_clamped() {
        let mut r = raster();
        // cursor on the -Z, +X corner: centre (10, 10)
        let touched = paint_heights(&mut r, SIZE, Vec2::new(5.0, -5.0), 2.0, HeightEdit::Delta, true);
        // only x, z in 8..=10 stay on the raster
        assert_eq!(touched, 9);
        assert_eq!(r.get(120), HEIGHT_NEUTRAL + 1);
        assert_eq!(r.get(8 * 11 + 8), HEIGHT_NEUTRAL + 1);
        // nothing wrapped onto the neighbouring row
        assert_eq!(r.get(9 * 11), HEIGHT_NEUTRAL);
        assert_eq!(r.get(0), HEIGHT_NEUTRAL);
    }

    #[test]
    fn test_set_height_overwrites() {
        let mut r = raster();
        let edit = HeightEdit::for_mode(EditMode::SetHeight, 5.0, 10.0);
        paint_heights(&mut r, SIZE, Vec2::new(-5.0, 5.0), 1.0, edit, false);

        // corner (0, 0): brush covers x, z in 0..=1
        for index in [0, 1, 11, 12] {
            assert_eq!(r.get(index), 255);
        }
        assert_eq!(r.get(2), HEIGHT_NEUTRAL);
    }

    #[test]
    fn test_fractional_half_size_window() {
        let mut r = raster();
        // half size 1.5 around column 5 truncates to 3..=6
        let touched = paint_heights(&mut r, SIZE, Vec2::ZERO, 1.5, HeightEdit::Delta, true);
        assert_eq!(touched, 16);
        assert_eq!(r.get(5 * 11 + 3), HEIGHT_NEUTRAL + 1);
        assert_eq!(r.get(5 * 11 + 6), HEIGHT_NEUTRAL + 1);
        assert_eq!(r.get(5 * 11 + 7), HEIGHT_NEUTRAL);
    }

    #[test]
    fn test_keep_mode_is_noop() {
        let mut r = raster();
        let edit = HeightEdit::for_mode(EditMode::None, 3.0, 10.0);
        paint_heights(&mut r, SIZE, Vec2::ZERO, 2.0, edit, true);
        assert_eq!(r, raster());
    }
}
