//! Core data structures and traits for vtkcrate
//!
//! This crate provides the fundamental types shared by the I/O and
//! visualization crates: the point table exchanged with callers, cell
//! types and their surface triangulation, bounding boxes and the common
//! error type.

pub mod point;
pub mod point_table;
pub mod cell;
pub mod bounds;
pub mod transform;
pub mod error;

pub use point::*;
pub use point_table::*;
pub use cell::*;
pub use bounds::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4};
