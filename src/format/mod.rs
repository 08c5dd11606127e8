//! On-disk terrain format

pub mod terr;

pub use terr::{decode, encode, write_to, FormatError, TerrainFile, FILE_EXTENSION, MAGIC};
