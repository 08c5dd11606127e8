//! Mathematical primitives used by terrain picking

pub mod ray;
pub mod plane;

pub use ray::Ray;
pub use plane::Plane;
