//! PNG previews of terrain rasters.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::core::Result;
use crate::raster::{HeightRaster, MaskTexel, MaskingRaster};

/// Export the height raster as an 8-bit grayscale PNG, one pixel per sample.
pub fn export_height_png(raster: &HeightRaster, path: &Path) -> Result<()> {
    let width = raster.width();
    let rows = raster.depth();
    let mut pixels = raster.samples().to_vec();
    // loaded rasters may end in a partial row
    pixels.resize(width * rows, 0);

    write_png(path, &pixels, width, rows, ExtendedColorType::L8)?;
    log::debug!("Wrote {}x{} height preview to {}", width, rows, path.display());
    Ok(())
}

/// Export the masking raster as an RGBA PNG, one channel per masking layer.
pub fn export_masking_png(raster: &MaskingRaster, path: &Path) -> Result<()> {
    let width = raster.width();
    let rows = raster.height();
    let mut texels = raster.texels().to_vec();
    texels.resize(width * rows, MaskTexel::EMPTY);

    write_png(path, bytemuck::cast_slice(&texels), width, rows, ExtendedColorType::Rgba8)?;
    log::debug!("Wrote {}x{} masking preview to {}", width, rows, path.display());
    Ok(())
}

fn write_png(path: &Path, data: &[u8], width: usize, rows: usize, color: ExtendedColorType) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(data, width as u32, rows as u32, color)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TerrainSize;
    use crate::raster::MaskingLayer;
    use tempfile::TempDir;

    #[test]
    fn test_height_preview() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("height.png");

        let mut raster = HeightRaster::allocate(TerrainSize::new(4.0, 2.0));
        raster.set(0, 255);
        export_height_png(&raster, &path).expect("export failed");

        let img = image::open(&path).expect("decode failed").to_luma8();
        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(1, 0).0, [127]);
    }

    #[test]
    fn test_masking_preview() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("masking.png");

        let mut raster = MaskingRaster::allocate(TerrainSize::new(2.0, 2.0), 2.0);
        let mut texel = MaskTexel::EMPTY;
        *texel.channel_mut(MaskingLayer::B) = 200;
        raster.set(5, texel);
        export_masking_png(&raster, &path).expect("export failed");

        let img = image::open(&path).expect("decode failed").to_rgba8();
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 200, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_partial_row_is_padded() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("partial.png");

        let size = TerrainSize::new(4.0, 4.0);
        let raster = HeightRaster::from_samples(size, vec![9; 7]);
        export_height_png(&raster, &path).expect("export failed");

        let img = image::open(&path).expect("decode failed").to_luma8();
        assert_eq!(img.dimensions(), (5, 2));
        assert_eq!(img.get_pixel(1, 1).0, [9]);
        assert_eq!(img.get_pixel(2, 1).0, [0]);
    }
}
