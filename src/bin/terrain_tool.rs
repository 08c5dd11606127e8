//! Terrain file tool: create, inspect, paint and preview `.terr` files.
//!
//! Usage: cargo run --release --bin terrain_tool -- <COMMAND> <FILE> [OPTIONS]
//!
//! Commands:
//!   create <FILE>    Write a flat terrain
//!   info <FILE>      Print header values and material list
//!   paint <FILE>     Apply brush strokes and save in place
//!   preview <FILE>   Export height and masking rasters as PNG
//!
//! Options:
//!   --config <PATH>      Editor limits and defaults (JSON)
//!   --size <UNITS>       Terrain width (create, default: 64)
//!   --depth <UNITS>      Terrain depth (create, default: same as --size)
//!   --detail <N>         Masking texels per unit (create, default: config)
//!   --material <NAME>    First material name (create, default: "default")
//!   --mode <MODE>        raise | lower | set | mask | erase (paint, default: raise)
//!   --x <X> --z <Z>      Stroke centre in world units (paint, default: 0 0)
//!   --brush <N>          Height brush width in texels (paint, default: 1)
//!   --radius <R>         Masking radius (paint, default: config)
//!   --layer <0-3>        Masking layer (paint, default: 0)
//!   --value <V>          Set height or masking weight (paint)
//!   --count <N>          Number of strokes (paint, default: 1)
//!   --out <DIR>          Preview output directory (default: next to FILE)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glam::Vec3;

use rterrain::core::types::TerrainSize;
use rterrain::material::Material;
use rterrain::math::Ray;
use rterrain::preview::{export_height_png, export_masking_png};
use rterrain::raster::MaskingLayer;
use rterrain::selection::EditMode;
use rterrain::terrain::{NullSink, Terrain, TerrainConfig};

fn main() -> ExitCode {
    rterrain::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let (Some(command), Some(file)) = (args.get(1), args.get(2)) else {
        eprintln!("Usage: terrain_tool <create|info|paint|preview> <FILE> [OPTIONS]");
        return ExitCode::FAILURE;
    };
    let file = PathBuf::from(file);

    let config = match parse_str_arg(&args, "--config") {
        Some(path) => match TerrainConfig::load_sync(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => TerrainConfig::default(),
    };

    let result = match command.as_str() {
        "create" => create(&args, &file, config),
        "info" => info(&file, config),
        "paint" => paint(&args, &file, config),
        "preview" => preview(&args, &file, config),
        other => {
            eprintln!("Unknown command: {}", other);
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn create(args: &[String], file: &Path, config: TerrainConfig) -> rterrain::core::Result<()> {
    let size_x = parse_f32_arg(args, "--size").unwrap_or(64.0);
    let size_z = parse_f32_arg(args, "--depth").unwrap_or(size_x);
    let detail = parse_f32_arg(args, "--detail").unwrap_or(config.masking_detail);
    let material = parse_str_arg(args, "--material").unwrap_or_else(|| "default".to_string());

    let mut terrain = Terrain::new(config, NullSink);
    terrain.create(TerrainSize::new(size_x, size_z), Material::new(material, Vec::new()), detail);
    terrain.save(file)?;

    let size = terrain.size();
    println!("Created {}x{} terrain, masking detail {}", size.x, size.z, terrain.masking_detail());
    Ok(())
}

fn info(file: &Path, config: TerrainConfig) -> rterrain::core::Result<()> {
    let mut terrain = Terrain::new(config, NullSink);
    terrain.load(file)?;

    let size = terrain.size();
    println!("=== {} ===", file.display());
    println!("Size:            {} x {}", size.x, size.z);
    println!("Height range:    {}", terrain.height_range());
    println!("Masking detail:  {}", terrain.masking_detail());
    println!("Terrain tess:    {}", terrain.terrain_tess_factor());
    println!(
        "Water:           {} at {} (tess {})",
        if terrain.should_draw_water() { "shown" } else { "hidden" },
        terrain.water_height(),
        terrain.water_tess_factor()
    );
    if let (Some(height), Some(masking)) = (terrain.height_raster(), terrain.masking_raster()) {
        println!("Height samples:  {} ({} per row)", height.len(), height.width());
        println!("Masking texels:  {} ({} per row)", masking.len(), masking.width());
    }
    for material in terrain.materials().iter() {
        println!(
            "Material {}:      {} ({} byte payload)",
            material.index(),
            material.name,
            material.payload.len()
        );
    }
    Ok(())
}

fn paint(args: &[String], file: &Path, config: TerrainConfig) -> rterrain::core::Result<()> {
    let mut terrain = Terrain::new(config, NullSink);
    terrain.load(file)?;

    let x = parse_f32_arg(args, "--x").unwrap_or(0.0);
    let z = parse_f32_arg(args, "--z").unwrap_or(0.0);
    let count = parse_usize_arg(args, "--count").unwrap_or(1);
    let mode = parse_str_arg(args, "--mode").unwrap_or_else(|| "raise".to_string());

    if let Some(brush) = parse_f32_arg(args, "--brush") {
        terrain.set_selection_size(brush);
    }
    if let Some(radius) = parse_f32_arg(args, "--radius") {
        terrain.set_masking_radius(radius);
    }
    let layer = parse_usize_arg(args, "--layer").and_then(MaskingLayer::from_index).unwrap_or_default();
    terrain.set_masking_layer(layer);

    let (edit_mode, primary) = match mode.as_str() {
        "raise" => (EditMode::DeltaHeight, true),
        "lower" => (EditMode::DeltaHeight, false),
        "set" => (EditMode::SetHeight, true),
        "mask" => (EditMode::Masking, true),
        "erase" => (EditMode::Masking, false),
        other => {
            return Err(rterrain::core::Error::Config(format!("unknown paint mode '{}'", other)));
        }
    };
    if let Some(value) = parse_f32_arg(args, "--value") {
        match edit_mode {
            EditMode::Masking => terrain.set_masking_value(value),
            _ => terrain.set_set_height_value(value),
        }
    }
    terrain.set_edit_mode(edit_mode);

    let ray = Ray::new(Vec3::new(x, terrain.height_range() + 1.0, z), Vec3::NEG_Y);
    for _ in 0..count {
        terrain.select(&ray, true, primary);
    }
    terrain.save(file)?;

    let cursor = terrain.selection_position();
    println!("Applied {} {} stroke(s) at ({}, {})", count, mode, cursor.x, cursor.y);
    Ok(())
}

fn preview(args: &[String], file: &Path, config: TerrainConfig) -> rterrain::core::Result<()> {
    let mut terrain = Terrain::new(config, NullSink);
    terrain.load(file)?;

    let out_dir = parse_str_arg(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| file.parent().map(Path::to_path_buf).unwrap_or_default());
    std::fs::create_dir_all(&out_dir)?;

    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("terrain");
    let height_path = out_dir.join(format!("{}_height.png", stem));
    let masking_path = out_dir.join(format!("{}_masking.png", stem));

    if let (Some(height), Some(masking)) = (terrain.height_raster(), terrain.masking_raster()) {
        export_height_png(height, &height_path)?;
        export_masking_png(masking, &masking_path)?;
    }

    println!("Wrote {}", height_path.display());
    println!("Wrote {}", masking_path.display());
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
