//! Four-channel material masking raster

use bytemuck::{Pod, Zeroable};

use crate::core::types::TerrainSize;

/// Blend layer selector, one per material slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaskingLayer {
    #[default]
    R,
    G,
    B,
    A,
}

impl MaskingLayer {
    pub const ALL: [MaskingLayer; 4] = [Self::R, Self::G, Self::B, Self::A];

    /// Material index this layer blends.
    pub fn index(self) -> usize {
        match self {
            Self::R => 0,
            Self::G => 1,
            Self::B => 2,
            Self::A => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// RGBA8 masking texel - exactly 4 bytes, one weight per material.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct MaskTexel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl MaskTexel {
    pub const EMPTY: MaskTexel = MaskTexel { r: 0, g: 0, b: 0, a: 0 };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn channel(&self, layer: MaskingLayer) -> u8 {
        match layer {
            MaskingLayer::R => self.r,
            MaskingLayer::G => self.g,
            MaskingLayer::B => self.b,
            MaskingLayer::A => self.a,
        }
    }

    pub fn channel_mut(&mut self, layer: MaskingLayer) -> &mut u8 {
        match layer {
            MaskingLayer::R => &mut self.r,
            MaskingLayer::G => &mut self.g,
            MaskingLayer::B => &mut self.b,
            MaskingLayer::A => &mut self.a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// Material blend weights sampled at `detail` texels per world unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskingRaster {
    /// Texels per row
    width: usize,
    texels: Vec<MaskTexel>,
}

impl MaskingRaster {
    /// Row width and row count for a terrain size at a masking detail.
    ///
    /// None when the scaled size is not finite or the texel count does not
    /// fit the `u32` count of a terrain file.
    pub fn extent(size: TerrainSize, detail: f32) -> Option<(usize, usize)> {
        let (width, height) = ((size.x * detail).round(), (size.z * detail).round());
        if !width.is_finite() || !height.is_finite() {
            return None;
        }

        let width = width.max(0.0) as usize;
        let height = height.max(0.0) as usize;
        let limit = u32::MAX as usize;
        let count = width.checked_mul(height)?;
        (width <= limit && height <= limit && count <= limit).then_some((width, height))
    }

    /// Allocate an all-zero raster.
    ///
    /// # Panics
    /// If the size and detail have no [`extent`](Self::extent).
    pub fn allocate(size: TerrainSize, detail: f32) -> Self {
        let (width, height) = Self::extent(size, detail).expect("masking detail exceeds the masking raster limit");
        Self {
            width: width.max(1),
            texels: vec![MaskTexel::EMPTY; width * height],
        }
    }

    /// Wrap decoded texels, keeping the stored count.
    ///
    /// # Panics
    /// If the size and detail have no [`extent`](Self::extent).
    pub fn from_texels(size: TerrainSize, detail: f32, texels: Vec<MaskTexel>) -> Self {
        let (width, _) = Self::extent(size, detail).expect("masking detail exceeds the masking raster limit");
        Self {
            width: width.max(1),
            texels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows, counting a trailing partial row.
    pub fn height(&self) -> usize {
        self.texels.len().div_ceil(self.width)
    }

    pub fn len(&self) -> usize {
        self.texels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }

    /// # Panics
    /// If `index` is outside the raster.
    pub fn get(&self, index: usize) -> MaskTexel {
        assert!(index < self.texels.len(), "masking index {} out of bounds ({})", index, self.texels.len());
        self.texels[index]
    }

    /// # Panics
    /// If `index` is outside the raster.
    pub fn set(&mut self, index: usize, texel: MaskTexel) {
        assert!(index < self.texels.len(), "masking index {} out of bounds ({})", index, self.texels.len());
        self.texels[index] = texel;
    }

    pub fn texels(&self) -> &[MaskTexel] {
        &self.texels
    }

    pub(crate) fn texels_mut(&mut self) -> &mut [MaskTexel] {
        &mut self.texels
    }

    /// Raw RGBA bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    pub fn into_texels(self) -> Vec<MaskTexel> {
        self.texels
    }
}
