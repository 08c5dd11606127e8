//! Single-channel height raster

use crate::core::types::TerrainSize;

/// Sample value representing zero world height.
pub const HEIGHT_NEUTRAL: u8 = 127;

/// R8 height samples, one per terrain vertex.
///
/// A terrain of `x` by `z` units has `(x + 1) * (z + 1)` samples so that both
/// edges of every quad are covered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightRaster {
    /// Samples per row
    width: usize,
    samples: Vec<u8>,
}

impl HeightRaster {
    /// Row width and row count for a terrain size.
    ///
    /// None when the size is not finite or the sample count does not fit the
    /// `u32` count of a terrain file.
    pub fn extent(size: TerrainSize) -> Option<(usize, usize)> {
        if !size.x.is_finite() || !size.z.is_finite() {
            return None;
        }
        let (x, z) = size.whole_units();
        let width = x.checked_add(1)?;
        let depth = z.checked_add(1)?;
        let count = width.checked_mul(depth)?;
        (count <= u32::MAX as usize).then_some((width, depth))
    }

    /// Allocate a flat raster at neutral height.
    ///
    /// # Panics
    /// If `size` has no [`extent`](Self::extent).
    pub fn allocate(size: TerrainSize) -> Self {
        let (width, depth) = Self::extent(size).expect("terrain size exceeds the height raster limit");
        Self {
            width,
            samples: vec![HEIGHT_NEUTRAL; width * depth],
        }
    }

    /// Wrap decoded samples. The sample count is kept as stored even if it
    /// does not fill whole rows.
    ///
    /// # Panics
    /// If `size` has no [`extent`](Self::extent).
    pub fn from_samples(size: TerrainSize, samples: Vec<u8>) -> Self {
        let (width, _) = Self::extent(size).expect("terrain size exceeds the height raster limit");
        Self { width, samples }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows, counting a trailing partial row.
    pub fn depth(&self) -> usize {
        self.samples.len().div_ceil(self.width)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// # Panics
    /// If `index` is outside the raster.
    pub fn get(&self, index: usize) -> u8 {
        assert!(index < self.samples.len(), "height index {} out of bounds ({})", index, self.samples.len());
        self.samples[index]
    }

    /// # Panics
    /// If `index` is outside the raster.
    pub fn set(&mut self, index: usize, value: u8) {
        assert!(index < self.samples.len(), "height index {} out of bounds ({})", index, self.samples.len());
        self.samples[index] = value;
    }

    /// Row-major index of texel `(x, z)`, or None if it is not stored.
    pub fn index_of(&self, x: usize, z: usize) -> Option<usize> {
        if x >= self.width {
            return None;
        }
        let index = z * self.width + x;
        (index < self.samples.len()).then_some(index)
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Raw bytes for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }
}
