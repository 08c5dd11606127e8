//! Editable terrain: configuration, renderer sink and the terrain aggregate

pub mod config;
pub use config::TerrainConfig;

pub mod sink;
pub use sink::{NullSink, TerrainConstants, TerrainSink};

pub mod heightfield;
pub use heightfield::Terrain;
