//! I/O for legacy VTK mesh files
//!
//! This crate reads and writes the legacy `.vtk` format and provides
//! [`VtkHandler`], which exchanges point coordinates between mesh files and
//! [`PointTable`]s while keeping the rest of the mesh intact.

pub mod legacy;
pub mod handler;

#[cfg(test)]
mod tests;

pub use handler::{FileHandler, VtkHandler};
pub use legacy::{read_vtk, read_vtk_from_bytes, write_vtk, write_vtk_to_bytes, VtkFile, WriteOptions};

use std::path::Path;
use vtkcrate_core::{PointTable, Result};

/// Trait for reading whole datasets from files
pub trait DataSetReader {
    fn read_dataset<P: AsRef<Path>>(path: P) -> Result<VtkFile>;
}

/// Trait for writing whole datasets to files
pub trait DataSetWriter {
    fn write_dataset<P: AsRef<Path>>(file: &VtkFile, path: P) -> Result<()>;
}

/// Reader for the legacy format
pub struct LegacyReader;

/// Writer for the legacy format, keeping the source encoding and version
pub struct LegacyWriter;

impl DataSetReader for LegacyReader {
    fn read_dataset<P: AsRef<Path>>(path: P) -> Result<VtkFile> {
        read_vtk(path)
    }
}

impl DataSetWriter for LegacyWriter {
    fn write_dataset<P: AsRef<Path>>(file: &VtkFile, path: P) -> Result<()> {
        write_vtk(file, path, &WriteOptions::default())
    }
}

/// Read only the point coordinates of a `.vtk` file
pub fn read_points<P: AsRef<Path>>(path: P) -> Result<PointTable> {
    Ok(LegacyReader::read_dataset(path)?.points())
}
