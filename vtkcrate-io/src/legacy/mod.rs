//! The legacy `.vtk` file format
//!
//! A legacy file is a short ASCII header followed by a dataset description
//! (geometry and topology) and optional point and cell attributes. Bodies are
//! either whitespace-separated ASCII or big-endian binary blocks.

pub mod scalar;
pub mod scanner;
pub mod model;
pub mod reader;
pub mod writer;

pub use scalar::ScalarType;
pub use model::*;
pub use reader::{read_vtk, read_vtk_from_bytes};
pub use writer::{write_vtk, write_vtk_to_bytes, CellLayout, VtkWriter, WriteOptions};
