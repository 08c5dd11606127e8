//! Renderer-side collaborator of a terrain.
//!
//! The terrain never talks to a GPU directly. Every mutation is followed by a
//! synchronous call into a [`TerrainSink`], which may upload textures or
//! constant buffers however it likes.

use bytemuck::{Pod, Zeroable};

use crate::core::types::Mat4;
use crate::selection::SelectionConstants;

/// Terrain-wide constants for the vertex stage - 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TerrainConstants {
    pub size_x: f32,
    pub size_z: f32,
    pub height_range: f32,
    pub _pad: f32,
}

/// Receives raster uploads and published state. All methods default to no-ops.
pub trait TerrainSink {
    /// Full R8 height raster after a change.
    fn upload_height(&mut self, _raster: &[u8]) {}

    /// Full RGBA8 masking raster after a change.
    fn upload_masking(&mut self, _raster: &[u8]) {}

    /// Zero the selection marker stored in the base mesh texture coordinates
    /// and refresh the mesh buffer.
    fn clear_selection_marker(&mut self) {}

    fn publish_selection(&mut self, _selection: &SelectionConstants) {}

    fn publish_terrain(&mut self, _terrain: &TerrainConstants) {}

    /// World XZ to masking UV transform.
    fn publish_masking_space(&mut self, _transform: &Mat4) {}
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TerrainSink for NullSink {}
