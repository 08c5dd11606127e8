//! Terrain editor configuration: value limits and creation defaults.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Limits applied to interactive edits and defaults for new terrains.
///
/// Out-of-range values passed to the editor are clamped into these bounds
/// rather than rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Smallest terrain extent per axis (world units).
    pub min_size: f32,
    /// Largest terrain extent per axis.
    pub max_size: f32,
    /// Masking texels per world unit, lower bound.
    pub min_masking_detail: f32,
    /// Masking texels per world unit, upper bound.
    pub max_masking_detail: f32,
    /// Height brush width in texels, lower bound.
    pub min_selection_size: f32,
    /// Height brush width in texels, upper bound.
    pub max_selection_size: f32,
    pub min_masking_radius: f32,
    pub max_masking_radius: f32,
    pub min_masking_attenuation: f32,
    pub max_masking_attenuation: f32,

    // -- Defaults for new terrains ---------------------------------------

    /// World height spanned by the 0..=255 height samples.
    pub height_range: f32,
    pub masking_detail: f32,
    pub terrain_tess_factor: f32,
    pub water_tess_factor: f32,
    pub water_height: f32,
    pub draw_water: bool,
    pub selection_size: f32,
    pub masking_radius: f32,
    pub masking_attenuation: f32,
    pub masking_value: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            min_size: 1.0,
            max_size: 4096.0,
            min_masking_detail: 1.0,
            max_masking_detail: 32.0,
            min_selection_size: 1.0,
            max_selection_size: 64.0,
            min_masking_radius: 0.5,
            max_masking_radius: 64.0,
            min_masking_attenuation: 0.0,
            max_masking_attenuation: 1.0,

            height_range: 10.0,
            masking_detail: 4.0,
            terrain_tess_factor: 2.0,
            water_tess_factor: 8.0,
            water_height: 0.0,
            draw_water: true,
            selection_size: 1.0,
            masking_radius: 2.0,
            masking_attenuation: 0.0,
            masking_value: 1.0,
        }
    }
}

impl TerrainConfig {
    pub fn clamp_size(&self, value: f32) -> f32 {
        clamp_logged("terrain size", value, self.min_size, self.max_size)
    }

    pub fn clamp_masking_detail(&self, value: f32) -> f32 {
        clamp_logged("masking detail", value, self.min_masking_detail, self.max_masking_detail)
    }

    pub fn clamp_selection_size(&self, value: f32) -> f32 {
        clamp_logged("selection size", value, self.min_selection_size, self.max_selection_size)
    }

    pub fn clamp_masking_radius(&self, value: f32) -> f32 {
        clamp_logged("masking radius", value, self.min_masking_radius, self.max_masking_radius)
    }

    pub fn clamp_masking_attenuation(&self, value: f32) -> f32 {
        clamp_logged(
            "masking attenuation",
            value,
            self.min_masking_attenuation,
            self.max_masking_attenuation,
        )
    }

    /// Check that every lower bound is positive where required and below
    /// its upper bound.
    pub fn validate(&self) -> Result<(), String> {
        let ranges = [
            ("size", self.min_size, self.max_size),
            ("masking detail", self.min_masking_detail, self.max_masking_detail),
            ("selection size", self.min_selection_size, self.max_selection_size),
            ("masking radius", self.min_masking_radius, self.max_masking_radius),
            ("masking attenuation", self.min_masking_attenuation, self.max_masking_attenuation),
        ];
        for (name, min, max) in ranges {
            if !(min <= max) {
                return Err(format!("{} range is empty ({} > {})", name, min, max));
            }
        }
        if self.min_size <= 0.0 || self.min_masking_detail <= 0.0 || self.min_masking_radius <= 0.0 {
            return Err("size, masking detail and masking radius must be positive".to_string());
        }
        if self.height_range <= 0.0 {
            return Err(format!("height range must be positive, got {}", self.height_range));
        }
        Ok(())
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<(), io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)
    }

    /// Load from file (sync). Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> crate::core::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| crate::core::Error::Config(e.to_string()))?;
        config.validate().map_err(crate::core::Error::Config)?;
        Ok(config)
    }
}

fn clamp_logged(name: &str, value: f32, min: f32, max: f32) -> f32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::debug!("Clamped {} {} into [{}, {}]", name, value, min, max);
    }
    clamped
}
