//! Editable height-field terrain

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::brush::{HeightEdit, MaskingStroke, paint_heights, paint_masking};
use crate::core::Result;
use crate::core::types::{Mat4, TerrainSize, Vec2};
use crate::format::{self, FormatError, TerrainFile};
use crate::material::{Material, MaterialTable};
use crate::math::{Plane, Ray};
use crate::raster::{HeightRaster, MaskingLayer, MaskingRaster};
use crate::selection::mapper;
use crate::selection::{EditMode, SelectionState};

use super::config::TerrainConfig;
use super::sink::{NullSink, TerrainConstants, TerrainSink};

/// Rasters of a created or loaded terrain
#[derive(Clone, Debug)]
struct Rasters {
    height: HeightRaster,
    masking: MaskingRaster,
}

/// A height-field terrain with its masking layers and brush editor state.
///
/// The terrain starts empty. [`Terrain::create`] or [`Terrain::load`] give it
/// a size and rasters; painting or saving an empty terrain is a caller bug
/// and panics.
pub struct Terrain<S: TerrainSink = NullSink> {
    config: TerrainConfig,
    sink: S,
    file_name: Option<PathBuf>,

    size: TerrainSize,
    height_range: f32,
    terrain_tess_factor: f32,
    should_tessellate: bool,
    draw_water: bool,
    water_height: f32,
    water_tess_factor: f32,
    masking_detail: f32,
    materials: MaterialTable,
    rasters: Option<Rasters>,

    selection: SelectionState,
    set_height_value: f32,
    masking_value: f32,
    masking_space: Mat4,
}

impl Terrain<NullSink> {
    /// Empty terrain with default limits and no renderer attached.
    pub fn with_defaults() -> Self {
        Self::new(TerrainConfig::default(), NullSink)
    }
}

impl<S: TerrainSink> Terrain<S> {
    /// Create an empty terrain.
    pub fn new(config: TerrainConfig, sink: S) -> Self {
        let selection = SelectionState::new(
            config.clamp_selection_size(config.selection_size) / 2.0,
            config.clamp_masking_radius(config.masking_radius),
            config.clamp_masking_attenuation(config.masking_attenuation),
        );

        Self {
            sink,
            file_name: None,
            size: TerrainSize::default(),
            height_range: config.height_range,
            terrain_tess_factor: config.terrain_tess_factor,
            should_tessellate: true,
            draw_water: config.draw_water,
            water_height: config.water_height,
            water_tess_factor: config.water_tess_factor,
            masking_detail: config.clamp_masking_detail(config.masking_detail),
            materials: MaterialTable::new(),
            rasters: None,
            selection,
            set_height_value: 0.0,
            masking_value: config.masking_value.clamp(0.0, 1.0),
            masking_space: Mat4::IDENTITY,
            config,
        }
    }

    /// Whether the terrain has been created or loaded.
    pub fn exists(&self) -> bool {
        self.rasters.is_some()
    }

    /// Build a flat terrain with a single material.
    ///
    /// Size and masking detail are clamped into the configured limits.
    pub fn create(&mut self, size: TerrainSize, material: Material, masking_detail: f32) {
        let size = TerrainSize::new(self.config.clamp_size(size.x), self.config.clamp_size(size.z));
        let detail = self.config.clamp_masking_detail(masking_detail);

        self.size = size;
        self.masking_detail = detail;
        self.height_range = self.config.height_range;
        self.terrain_tess_factor = self.config.terrain_tess_factor;
        self.water_tess_factor = self.config.water_tess_factor;
        self.water_height = self.config.water_height;
        self.draw_water = self.config.draw_water;
        self.file_name = None;

        self.materials = MaterialTable::new();
        self.materials.push(material);

        self.rasters = Some(Rasters {
            height: HeightRaster::allocate(size),
            masking: MaskingRaster::allocate(size, detail),
        });

        log::info!("Created {}x{} terrain, masking detail {}", size.x, size.z, detail);
        self.publish_all();
    }

    /// Load a terrain file. On error the current terrain is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        self.load_from_bytes(&bytes)?;

        log::info!("Loaded terrain from {}", path.display());
        self.file_name = Some(path.to_path_buf());
        Ok(())
    }

    /// Replace the terrain with a decoded file image.
    pub fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let file = format::decode(bytes)?;
        let material_count = file.materials.len();
        let materials = MaterialTable::from_materials(file.materials)
            .ok_or(FormatError::TooManyMaterials { count: material_count as u8 })?;

        let (Some(height_extent), Some(masking_extent)) = (
            HeightRaster::extent(file.size),
            MaskingRaster::extent(file.size, file.masking_detail),
        ) else {
            return Err(FormatError::InvalidDimensions {
                size_x: file.size.x,
                size_z: file.size.z,
                detail: file.masking_detail,
            }
            .into());
        };

        let expected_height = height_extent.0 * height_extent.1;
        if file.heights.len() != expected_height {
            log::warn!(
                "Height raster holds {} samples, {}x{} terrain expects {}",
                file.heights.len(),
                file.size.x,
                file.size.z,
                expected_height
            );
        }
        let expected_masking = masking_extent.0 * masking_extent.1;
        if file.masking.len() != expected_masking {
            log::warn!(
                "Masking raster holds {} texels, expected {}",
                file.masking.len(),
                expected_masking
            );
        }

        self.size = file.size;
        self.height_range = file.height_range;
        self.terrain_tess_factor = file.terrain_tess_factor;
        self.draw_water = file.draw_water;
        self.water_height = file.water_height;
        self.water_tess_factor = file.water_tess_factor;
        self.masking_detail = file.masking_detail;
        self.materials = materials;
        self.rasters = Some(Rasters {
            height: HeightRaster::from_samples(file.size, file.heights),
            masking: MaskingRaster::from_texels(file.size, file.masking_detail, file.masking),
        });

        self.publish_all();
        Ok(())
    }

    /// Write the terrain to `path`.
    ///
    /// The file is fully encoded in memory and written to a sibling temporary
    /// file that is then renamed over `path`.
    ///
    /// # Panics
    /// If no terrain has been created or loaded.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        assert!(self.exists(), "terrain saved before create or load");
        let path = path.as_ref();
        let bytes = format::encode(&self.to_file());

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let written = (|| -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            std::fs::rename(&temp_path, path)
        })();
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }

        log::info!("Saved terrain to {} ({} bytes)", path.display(), bytes.len());
        self.file_name = Some(path.to_path_buf());
        Ok(())
    }

    /// Snapshot of everything the terrain file stores.
    ///
    /// # Panics
    /// If no terrain has been created or loaded.
    pub fn to_file(&self) -> TerrainFile {
        let rasters = self.rasters();
        TerrainFile {
            size: self.size,
            height_range: self.height_range,
            terrain_tess_factor: self.terrain_tess_factor,
            draw_water: self.draw_water,
            water_height: self.water_height,
            water_tess_factor: self.water_tess_factor,
            masking_detail: self.masking_detail,
            masking: rasters.masking.texels().to_vec(),
            heights: rasters.height.samples().to_vec(),
            materials: self.materials.to_vec(),
        }
    }

    /// Change the terrain size. Both rasters are reallocated and cleared.
    ///
    /// # Panics
    /// If no terrain has been created or loaded.
    pub fn resize(&mut self, size: TerrainSize) {
        assert!(self.exists(), "terrain resized before create or load");
        let size = TerrainSize::new(self.config.clamp_size(size.x), self.config.clamp_size(size.z));
        log::debug!("Resizing terrain to {}x{}", size.x, size.z);

        self.size = size;
        self.rasters = Some(Rasters {
            height: HeightRaster::allocate(size),
            masking: MaskingRaster::allocate(size, self.masking_detail),
        });
        self.publish_all();
    }

    /// Change the masking density. The masking raster is reallocated and
    /// cleared; returns the clamped detail.
    ///
    /// # Panics
    /// If no terrain has been created or loaded.
    pub fn set_masking_detail(&mut self, detail: f32) -> f32 {
        assert!(self.exists(), "masking detail changed before create or load");
        let detail = self.config.clamp_masking_detail(detail);
        self.masking_detail = detail;

        let size = self.size;
        let rasters = self.rasters_mut();
        rasters.masking = MaskingRaster::allocate(size, detail);
        log::debug!("Masking raster reallocated at detail {} ({} texels)", detail, rasters.masking.len());

        self.upload_masking();
        detail
    }

    // -- Editing ------------------------------------------------------------

    /// Move the cursor along a picking ray and optionally paint.
    ///
    /// In masking mode the primary button paints the masking value and the
    /// secondary button erases; in the height modes it picks the direction of
    /// a delta step.
    pub fn select(&mut self, ray: &Ray, should_edit: bool, primary: bool) {
        self.update_selection(ray);
        if !should_edit {
            return;
        }

        if self.selection.edit_mode == EditMode::Masking {
            let s = &self.selection;
            let stroke = if primary {
                MaskingStroke::new(
                    s.masking_layer,
                    s.analogue_position,
                    self.masking_value,
                    s.masking_radius,
                    s.masking_attenuation,
                )
            } else {
                MaskingStroke::erase(s.masking_layer, s.analogue_position, s.masking_radius, s.masking_attenuation)
            };
            self.update_masking(&stroke);
        } else {
            self.update_heights(primary);
        }
    }

    /// Update analogue and digital cursor positions from a picking ray.
    /// Returns false (leaving the cursor alone) when the ray misses the ground.
    pub fn update_selection(&mut self, ray: &Ray) -> bool {
        let Some(point) = ray.plane_point(&Plane::ground()) else {
            return false;
        };

        self.selection.analogue_position = Vec2::new(point.x, point.z);
        self.selection.digital_position = mapper::digital_position(self.selection.analogue_position, self.size);
        self.publish_selection();
        true
    }

    /// Paint the height raster at the digital cursor with the current mode.
    ///
    /// # Panics
    /// If no terrain has been created or loaded.
    pub fn update_heights(&mut self, raise: bool) -> usize {
        let edit = HeightEdit::for_mode(self.selection.edit_mode, self.set_height_value, self.height_range);
        let rasters = self.rasters.as_mut().expect("terrain painted before create or load");

        let touched = paint_heights(
            &mut rasters.height,
            self.size,
            self.selection.digital_position,
            self.selection.selection_half_size,
            edit,
            raise,
        );
        self.sink.upload_height(rasters.height.as_bytes());
        touched
    }

    /// Paint a stroke into the masking raster.
    ///
    /// # Panics
    /// If no terrain has been created or loaded.
    pub fn update_masking(&mut self, stroke: &MaskingStroke) -> usize {
        let rasters = self.rasters.as_mut().expect("terrain painted before create or load");
        let touched = paint_masking(&mut rasters.masking, self.size, self.masking_detail, stroke);
        self.upload_masking();
        touched
    }

    /// Brush width in texels; returns the clamped value.
    pub fn set_selection_size(&mut self, size: f32) -> f32 {
        let size = self.config.clamp_selection_size(size);
        self.selection.selection_half_size = size / 2.0;
        self.publish_selection();
        size
    }

    pub fn set_masking_layer(&mut self, layer: MaskingLayer) {
        self.selection.masking_layer = layer;
    }

    pub fn set_masking_attenuation(&mut self, attenuation: f32) {
        self.selection.masking_attenuation = self.config.clamp_masking_attenuation(attenuation);
    }

    pub fn set_masking_radius(&mut self, radius: f32) {
        self.selection.masking_radius = self.config.clamp_masking_radius(radius);
        self.publish_selection();
    }

    /// Target world height for [`EditMode::SetHeight`].
    pub fn set_set_height_value(&mut self, value: f32) {
        self.set_height_value = value;
    }

    /// Weight painted by the primary button in masking mode, in [0, 1].
    pub fn set_masking_value(&mut self, value: f32) {
        self.masking_value = value.clamp(0.0, 1.0);
    }

    pub fn set_should_show_selection(&mut self, show: bool) {
        self.selection.show_selection = show;
        self.publish_selection();
    }

    /// Switch edit mode. Entering masking mode clears the selection marker
    /// baked into the mesh.
    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.selection.edit_mode = mode;

        if mode == EditMode::Masking {
            self.sink.clear_selection_marker();
            self.selection.is_masking_mode = true;
        } else {
            self.selection.is_masking_mode = false;
        }

        self.publish_selection();
    }

    pub fn edit_mode(&self) -> EditMode {
        self.selection.edit_mode
    }

    // -- Materials ----------------------------------------------------------

    /// Append a material. Ignored once all four layers are bound.
    ///
    /// # Panics
    /// If no terrain has been created or loaded.
    pub fn add_material(&mut self, material: Material) -> bool {
        assert!(self.exists(), "material added before create or load");
        let added = self.materials.push(material);
        if !added {
            log::warn!("Terrain already has {} materials, ignoring new material", self.materials.len());
        }
        added
    }

    /// # Panics
    /// If no terrain exists or `index` is not a bound material.
    pub fn set_material(&mut self, index: usize, material: Material) {
        assert!(self.exists(), "material set before create or load");
        self.materials.set(index, material);
    }

    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    // -- Properties ---------------------------------------------------------

    pub fn size(&self) -> TerrainSize {
        self.size
    }

    pub fn height_range(&self) -> f32 {
        self.height_range
    }

    pub fn masking_detail(&self) -> f32 {
        self.masking_detail
    }

    pub fn water_height(&self) -> f32 {
        self.water_height
    }

    pub fn set_water_height(&mut self, value: f32) {
        self.water_height = value;
    }

    pub fn terrain_tess_factor(&self) -> f32 {
        self.terrain_tess_factor
    }

    pub fn set_terrain_tess_factor(&mut self, value: f32) {
        self.terrain_tess_factor = value;
    }

    pub fn water_tess_factor(&self) -> f32 {
        self.water_tess_factor
    }

    pub fn set_water_tess_factor(&mut self, value: f32) {
        self.water_tess_factor = value;
    }

    pub fn should_draw_water(&self) -> bool {
        self.draw_water
    }

    pub fn set_should_draw_water(&mut self, value: bool) {
        self.draw_water = value;
    }

    /// False until a terrain exists.
    pub fn should_tessellate(&self) -> bool {
        self.exists() && self.should_tessellate
    }

    pub fn set_should_tessellate(&mut self, value: bool) {
        self.should_tessellate = value;
    }

    /// Digital cursor position.
    pub fn selection_position(&self) -> Vec2 {
        self.selection.digital_position
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    /// World XZ to masking UV transform of the current size.
    pub fn masking_space(&self) -> Mat4 {
        self.masking_space
    }

    pub fn height_raster(&self) -> Option<&HeightRaster> {
        self.rasters.as_ref().map(|r| &r.height)
    }

    pub fn masking_raster(&self) -> Option<&MaskingRaster> {
        self.rasters.as_ref().map(|r| &r.masking)
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // -- Publishing ---------------------------------------------------------

    fn rasters(&self) -> &Rasters {
        self.rasters.as_ref().expect("terrain used before create or load")
    }

    fn rasters_mut(&mut self) -> &mut Rasters {
        self.rasters.as_mut().expect("terrain used before create or load")
    }

    fn publish_selection(&mut self) {
        self.sink.publish_selection(&self.selection.to_constants());
    }

    fn upload_masking(&mut self) {
        let rasters = self.rasters.as_ref().expect("terrain used before create or load");
        self.sink.upload_masking(rasters.masking.as_bytes());

        self.masking_space = mapper::masking_space(self.size);
        self.sink.publish_masking_space(&self.masking_space);
    }

    /// Push every piece of derived state after the terrain was rebuilt.
    fn publish_all(&mut self) {
        self.sink.publish_terrain(&TerrainConstants {
            size_x: self.size.x,
            size_z: self.size.z,
            height_range: self.height_range,
            _pad: 0.0,
        });

        let rasters = self.rasters.as_ref().expect("terrain used before create or load");
        self.sink.upload_height(rasters.height.as_bytes());
        self.upload_masking();

        self.selection.digital_position = mapper::digital_position(self.selection.analogue_position, self.size);
        self.publish_selection();
    }
}
