//! Error types for the terrain crate

use thiserror::Error;

use crate::format::FormatError;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terrain file error: {0}")]
    Format(#[from] FormatError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
