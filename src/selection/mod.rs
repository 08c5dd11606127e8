//! Brush selection: cursor mapping and the published selection block

pub mod mapper;
pub mod state;

pub use state::{EditMode, SelectionConstants, SelectionState};
