//! `TERR_KJW` binary terrain files.
//!
//! Layout (little-endian, sequential, no padding):
//!
//! ```text
//! 8B  magic "TERR_KJW"
//! 4B  f32 size x
//! 4B  f32 size z
//! 4B  f32 height range
//! 4B  f32 terrain tessellation factor
//! 1B  bool draw water
//! 4B  f32 water height
//! 4B  f32 water tessellation factor
//! 4B  f32 masking detail
//! 4B  u32 masking texel count, then count x RGBA8
//! 4B  u32 height sample count, then count x R8
//! 1B  u8  material count, then count x material record
//! ```
//!
//! A material record is `u32 name length, name (UTF-8), u32 payload length,
//! payload`. The payload belongs to the material store and is not interpreted.

use std::io::{self, Write};

use thiserror::Error;

use crate::core::types::TerrainSize;
use crate::material::{Material, MAX_MATERIALS};
use crate::raster::{HeightRaster, MaskTexel, MaskingRaster};

pub const MAGIC: &[u8; 8] = b"TERR_KJW";

/// File extension used by the editor for terrain files
pub const FILE_EXTENSION: &str = "terr";

/// Reasons a terrain file is rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    #[error("not a terrain file (magic {found:?})")]
    BadMagic { found: Vec<u8> },

    #[error("file truncated in {section}")]
    Truncated { section: &'static str },

    #[error("terrain size {size_x} x {size_z} at masking detail {detail} has no addressable raster")]
    InvalidDimensions { size_x: f32, size_z: f32, detail: f32 },

    #[error("{count} materials exceeds the limit of 4 masking layers")]
    TooManyMaterials { count: u8 },

    #[error("material {index} has a name that is not valid UTF-8")]
    InvalidMaterialName { index: usize },
}

/// Everything a terrain file stores.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainFile {
    pub size: TerrainSize,
    pub height_range: f32,
    pub terrain_tess_factor: f32,
    pub draw_water: bool,
    pub water_height: f32,
    pub water_tess_factor: f32,
    pub masking_detail: f32,
    pub masking: Vec<MaskTexel>,
    pub heights: Vec<u8>,
    pub materials: Vec<Material>,
}

/// Decode a complete terrain file held in memory.
pub fn decode(bytes: &[u8]) -> Result<TerrainFile, FormatError> {
    let mut input = bytes;

    let magic = take(&mut input, MAGIC.len(), "magic")?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic { found: magic.to_vec() });
    }

    let size_x = read_f32(&mut input, "size")?;
    let size_z = read_f32(&mut input, "size")?;
    let height_range = read_f32(&mut input, "height range")?;
    let terrain_tess_factor = read_f32(&mut input, "terrain tessellation factor")?;
    let draw_water = read_u8(&mut input, "draw water flag")? != 0;
    let water_height = read_f32(&mut input, "water height")?;
    let water_tess_factor = read_f32(&mut input, "water tessellation factor")?;
    let masking_detail = read_f32(&mut input, "masking detail")?;

    let size = TerrainSize::new(size_x, size_z);
    if !dimensions_valid(size, masking_detail) {
        return Err(FormatError::InvalidDimensions { size_x, size_z, detail: masking_detail });
    }

    let masking_count = read_u32(&mut input, "masking raster count")? as usize;
    let masking_bytes = take_array(&mut input, masking_count, 4, "masking raster")?;
    let masking = masking_bytes
        .chunks_exact(4)
        .map(|px| MaskTexel::new(px[0], px[1], px[2], px[3]))
        .collect();

    let height_count = read_u32(&mut input, "height raster count")? as usize;
    let heights = take_array(&mut input, height_count, 1, "height raster")?.to_vec();

    let material_count = read_u8(&mut input, "material count")?;
    if material_count as usize > MAX_MATERIALS {
        return Err(FormatError::TooManyMaterials { count: material_count });
    }

    let mut materials = Vec::with_capacity(material_count as usize);
    for index in 0..material_count as usize {
        let material = read_material(&mut input, index)?;
        materials.push(material.with_index(index as u8));
    }

    if !input.is_empty() {
        log::debug!("Ignoring {} trailing bytes after terrain materials", input.len());
    }

    Ok(TerrainFile {
        size,
        height_range,
        terrain_tess_factor,
        draw_water,
        water_height,
        water_tess_factor,
        masking_detail,
        masking,
        heights,
        materials,
    })
}

/// Encode a terrain file. Rasters are written exactly as held.
pub fn encode(file: &TerrainFile) -> Vec<u8> {
    let material_bytes: usize = file
        .materials
        .iter()
        .map(|m| 8 + m.name.len() + m.payload.len())
        .sum();
    let mut out = Vec::with_capacity(
        45 + file.masking.len() * 4 + file.heights.len() + material_bytes,
    );

    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&file.size.x.to_le_bytes());
    out.extend_from_slice(&file.size.z.to_le_bytes());
    out.extend_from_slice(&file.height_range.to_le_bytes());
    out.extend_from_slice(&file.terrain_tess_factor.to_le_bytes());
    out.push(file.draw_water as u8);
    out.extend_from_slice(&file.water_height.to_le_bytes());
    out.extend_from_slice(&file.water_tess_factor.to_le_bytes());
    out.extend_from_slice(&file.masking_detail.to_le_bytes());

    out.extend_from_slice(&(file.masking.len() as u32).to_le_bytes());
    out.extend_from_slice(bytemuck::cast_slice(&file.masking));

    out.extend_from_slice(&(file.heights.len() as u32).to_le_bytes());
    out.extend_from_slice(&file.heights);

    out.push(file.materials.len() as u8);
    for material in &file.materials {
        out.extend_from_slice(&(material.name.len() as u32).to_le_bytes());
        out.extend_from_slice(material.name.as_bytes());
        out.extend_from_slice(&(material.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&material.payload);
    }

    out
}

/// Encode into a writer.
pub fn write_to(writer: &mut impl Write, file: &TerrainFile) -> io::Result<()> {
    writer.write_all(&encode(file))?;
    writer.flush()
}

fn take<'a>(input: &mut &'a [u8], len: usize, section: &'static str) -> Result<&'a [u8], FormatError> {
    if input.len() < len {
        return Err(FormatError::Truncated { section });
    }
    let (head, rest) = input.split_at(len);
    *input = rest;
    Ok(head)
}

/// Take `count` elements of `stride` bytes, checking the declared count
/// against what is left before anything is allocated.
fn take_array<'a>(
    input: &mut &'a [u8],
    count: usize,
    stride: usize,
    section: &'static str,
) -> Result<&'a [u8], FormatError> {
    let len = count
        .checked_mul(stride)
        .ok_or(FormatError::Truncated { section })?;
    take(input, len, section)
}

fn read_u8(input: &mut &[u8], section: &'static str) -> Result<u8, FormatError> {
    Ok(take(input, 1, section)?[0])
}

fn read_u32(input: &mut &[u8], section: &'static str) -> Result<u32, FormatError> {
    let b = take(input, 4, section)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_f32(input: &mut &[u8], section: &'static str) -> Result<f32, FormatError> {
    let b = take(input, 4, section)?;
    Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Sizes and detail must be non-negative and give rasters a file can count.
fn dimensions_valid(size: TerrainSize, detail: f32) -> bool {
    size.x >= 0.0
        && size.z >= 0.0
        && detail >= 0.0
        && HeightRaster::extent(size).is_some()
        && MaskingRaster::extent(size, detail).is_some()
}

fn read_material(input: &mut &[u8], index: usize) -> Result<Material, FormatError> {
    let name_len = read_u32(input, "material record")? as usize;
    let name = take(input, name_len, "material record")?;
    let name = std::str::from_utf8(name)
        .map_err(|_| FormatError::InvalidMaterialName { index })?
        .to_string();

    let payload_len = read_u32(input, "material record")? as usize;
    let payload = take(input, payload_len, "material record")?.to_vec();

    Ok(Material::new(name, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file(width: usize, depth: usize) -> TerrainFile {
        let masking = (0..width * depth)
            .map(|i| MaskTexel::new(i as u8, (i * 3) as u8, (i * 7) as u8, 255 - i as u8))
            .collect();
        let heights = (0..(width + 1) * (depth + 1)).map(|i| (i % 251) as u8).collect();

        TerrainFile {
            size: TerrainSize::new(width as f32, depth as f32),
            height_range: 10.0,
            terrain_tess_factor: 4.0,
            draw_water: true,
            water_height: -0.75,
            water_tess_factor: 8.0,
            masking_detail: 1.0,
            masking,
            heights,
            materials: vec![
                Material::new("grass", vec![1, 2, 3]).with_index(0),
                Material::new("rock", Vec::new()).with_index(1),
            ],
        }
    }

    #[test]
    fn test_roundtrip() {
        let file = sample_file(8, 5);
        let decoded = decode(&encode(&file)).unwrap();
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_roundtrip_degenerate_and_large() {
        for (w, d) in [(1, 1), (512, 512)] {
            let file = sample_file(w, d);
            assert_eq!(decode(&encode(&file)).unwrap(), file);
        }
    }

    #[test]
    fn test_header_layout() {
        let file = sample_file(2, 2);
        let bytes = encode(&file);

        assert_eq!(&bytes[0..8], b"TERR_KJW");
        assert_eq!(f32::from_le_bytes(bytes[8..12].try_into().unwrap()), 2.0);
        assert_eq!(f32::from_le_bytes(bytes[16..20].try_into().unwrap()), 10.0);
        assert_eq!(bytes[24], 1); // draw water
        assert_eq!(f32::from_le_bytes(bytes[33..37].try_into().unwrap()), 1.0); // masking detail
        assert_eq!(u32::from_le_bytes(bytes[37..41].try_into().unwrap()), 4); // masking count
        // first masking texel follows directly
        assert_eq!(&bytes[41..45], &file.masking[0].to_array());
    }

    #[test]
    fn test_counts_are_trusted() {
        let mut file = sample_file(4, 4);
        file.heights.truncate(3);
        file.masking.clear();

        let decoded = decode(&encode(&file)).unwrap();
        assert_eq!(decoded.heights.len(), 3);
        assert!(decoded.masking.is_empty());
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = encode(&sample_file(2, 2));
        bytes[0] = b'X';
        assert!(matches!(decode(&bytes), Err(FormatError::BadMagic { .. })));
    }

    #[test]
    fn test_truncated_mid_masking() {
        let bytes = encode(&sample_file(4, 4));
        // header is 41 bytes, cut inside the fourth texel
        let err = decode(&bytes[..41 + 14]).unwrap_err();
        assert_eq!(err, FormatError::Truncated { section: "masking raster" });
    }

    #[test]
    fn test_truncated_everywhere_fails() {
        let bytes = encode(&sample_file(3, 2));
        for len in 0..bytes.len() {
            assert!(decode(&bytes[..len]).is_err(), "prefix of {} bytes decoded", len);
        }
    }

    #[test]
    fn test_huge_declared_count() {
        let mut bytes = encode(&sample_file(2, 2));
        bytes[37..41].copy_from_slice(&u32::MAX.to_le_bytes());
        assert_eq!(
            decode(&bytes).unwrap_err(),
            FormatError::Truncated { section: "masking raster" }
        );
    }

    #[test]
    fn test_unaddressable_dimensions_rejected() {
        let cases = [
            (1.0e10, 1.0e10, 1.0),
            (1.0e30, 4.0, 1.0),
            (8.0, 8.0, 1.0e10),
            (f32::NAN, 8.0, 1.0),
            (8.0, f32::INFINITY, 1.0),
            (-2.0, 8.0, 1.0),
            (8.0, 8.0, -1.0),
        ];
        for (x, z, detail) in cases {
            let mut file = sample_file(2, 2);
            file.size = TerrainSize::new(x, z);
            file.masking_detail = detail;
            assert!(
                matches!(decode(&encode(&file)), Err(FormatError::InvalidDimensions { .. })),
                "{} x {} at detail {} decoded",
                x,
                z,
                detail
            );
        }
    }

    #[test]
    fn test_too_many_materials() {
        let mut file = sample_file(2, 2);
        file.materials.clear();
        let mut bytes = encode(&file);
        let last = bytes.len() - 1;
        bytes[last] = 5;
        assert_eq!(decode(&bytes).unwrap_err(), FormatError::TooManyMaterials { count: 5 });
    }

    #[test]
    fn test_material_indices_follow_position() {
        let decoded = decode(&encode(&sample_file(2, 2))).unwrap();
        assert_eq!(decoded.materials[0].index(), 0);
        assert_eq!(decoded.materials[1].index(), 1);
        assert_eq!(decoded.materials[0].payload, vec![1, 2, 3]);
    }

    #[test]
    fn test_write_to() {
        let file = sample_file(2, 3);
        let mut out = Vec::new();
        write_to(&mut out, &file).unwrap();
        assert_eq!(out, encode(&file));
    }
}
