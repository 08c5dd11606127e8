//! Selection state and the constant block published to renderers

use bytemuck::{Pod, Zeroable};

use crate::core::types::Vec2;
use crate::raster::MaskingLayer;

/// What a paint action edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Overwrite heights with an absolute world height
    SetHeight,
    /// Raise or lower heights one step per edit
    DeltaHeight,
    /// Paint material weights into the masking raster
    Masking,
    #[default]
    None,
}

/// Cursor and brush state of the terrain editor.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    /// Unsnapped cursor position (world X, world Z)
    pub analogue_position: Vec2,
    /// Cursor snapped to whole units and clamped to the terrain
    pub digital_position: Vec2,
    /// Height brush half-size in texels
    pub selection_half_size: f32,
    /// Masking brush radius in world units
    pub masking_radius: f32,
    pub masking_attenuation: f32,
    pub masking_layer: MaskingLayer,
    pub edit_mode: EditMode,
    pub show_selection: bool,
    pub is_masking_mode: bool,
}

impl SelectionState {
    pub fn new(selection_half_size: f32, masking_radius: f32, masking_attenuation: f32) -> Self {
        Self {
            analogue_position: Vec2::ZERO,
            digital_position: Vec2::ZERO,
            selection_half_size,
            masking_radius,
            masking_attenuation,
            masking_layer: MaskingLayer::R,
            edit_mode: EditMode::None,
            show_selection: false,
            is_masking_mode: false,
        }
    }

    /// Pack into the GPU-facing layout.
    pub fn to_constants(&self) -> SelectionConstants {
        SelectionConstants {
            analogue_position: self.analogue_position.to_array(),
            digital_position: self.digital_position.to_array(),
            selection_half_size: self.selection_half_size,
            masking_radius: self.masking_radius,
            show_selection: self.show_selection as u32,
            is_masking_mode: self.is_masking_mode as u32,
        }
    }
}

/// Selection block as seen by a shader-constant uploader - 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SelectionConstants {
    pub analogue_position: [f32; 2],
    pub digital_position: [f32; 2],
    pub selection_half_size: f32,
    pub masking_radius: f32,
    pub show_selection: u32,
    pub is_masking_mode: u32,
}
