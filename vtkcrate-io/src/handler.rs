//! File handlers exchanging point tables with mesh files
//!
//! A handler reads the point coordinates of a mesh file into a
//! [`PointTable`], remembers which file they came from, and writes a
//! modified table back into a copy of that file with every other part of the
//! mesh left untouched.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vtkcrate_core::{Error, PointTable, Result};

use crate::legacy::{read_vtk, write_vtk, VtkFile, WriteOptions};

/// Path bookkeeping and validation shared by file handlers
pub trait FileHandler {
    /// Extension including the leading dot, e.g. `".vtk"`
    fn extension(&self) -> &str;

    /// The file most recently parsed
    fn infile(&self) -> Option<&Path>;

    /// The file most recently written
    fn outfile(&self) -> Option<&Path>;

    /// Fail unless the path is usable as a file name
    fn check_filename_type(&self, path: &Path) -> Result<()> {
        match path.to_str() {
            Some(s) if !s.is_empty() => Ok(()),
            Some(_) => Err(Error::InvalidArgument("file name is empty".to_string())),
            None => Err(Error::InvalidArgument(format!(
                "file name {} is not valid UTF-8",
                path.display()
            ))),
        }
    }

    /// Fail unless the path ends with the handler's extension
    fn check_extension(&self, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        if extension == self.extension() {
            Ok(())
        } else {
            Err(Error::InvalidArgument(format!(
                "file {} does not have the {} extension",
                path.display(),
                self.extension()
            )))
        }
    }

    /// Fail unless a file has been parsed, returning its path
    fn check_infile_instantiation(&self) -> Result<&Path> {
        self.infile().ok_or_else(|| {
            Error::MissingInput("parse a file before writing or displaying it".to_string())
        })
    }
}

/// Handler for legacy `.vtk` files
#[derive(Debug, Clone, Default)]
pub struct VtkHandler {
    infile: Option<PathBuf>,
    outfile: Option<PathBuf>,
    write_options: WriteOptions,
}

impl VtkHandler {
    /// Extension handled by this type
    pub const EXTENSION: &'static str = ".vtk";

    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that writes with the given options
    pub fn with_write_options(write_options: WriteOptions) -> Self {
        Self {
            write_options,
            ..Self::default()
        }
    }

    pub fn write_options(&self) -> &WriteOptions {
        &self.write_options
    }

    pub fn set_write_options(&mut self, write_options: WriteOptions) {
        self.write_options = write_options;
    }

    /// Read the point coordinates of `path` and remember it as the input file.
    ///
    /// Row `i` of the result is point `i` of the mesh.
    pub fn parse<P: AsRef<Path>>(&mut self, path: P) -> Result<PointTable> {
        let path = path.as_ref();
        self.check_filename_type(path)?;
        self.check_extension(path)?;

        self.infile = Some(path.to_path_buf());

        let file = read_vtk(path)?;
        let points = file.points();
        debug!("parsed {} points from {}", points.len(), path.display());
        Ok(points)
    }

    /// Write a copy of the input file with its points replaced by `points`.
    ///
    /// The table must have one row per point of the input file; cells,
    /// attributes and field data are carried over unchanged.
    pub fn write<P: AsRef<Path>>(&mut self, points: &PointTable, path: P) -> Result<()> {
        let path = path.as_ref();
        self.check_filename_type(path)?;
        self.check_extension(path)?;
        let infile = self.check_infile_instantiation()?.to_path_buf();

        self.outfile = Some(path.to_path_buf());

        let mut file = read_vtk(&infile)?;
        file.set_points(points)?;
        write_vtk(&file, path, &self.write_options)?;
        info!("wrote {} with points from {}", path.display(), infile.display());
        Ok(())
    }

    /// Read the whole dataset of any `.vtk` file
    pub fn read_dataset<P: AsRef<Path>>(&self, path: P) -> Result<VtkFile> {
        let path = path.as_ref();
        self.check_filename_type(path)?;
        self.check_extension(path)?;
        read_vtk(path)
    }

    /// Read the whole dataset of the input file
    pub fn source_dataset(&self) -> Result<VtkFile> {
        read_vtk(self.check_infile_instantiation()?)
    }

    /// Pick the file to display: a checked user path, else the input file
    pub fn resolve_input(&self, path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => {
                self.check_filename_type(path)?;
                self.check_extension(path)?;
                Ok(path.to_path_buf())
            }
            None => Ok(self.check_infile_instantiation()?.to_path_buf()),
        }
    }
}

impl FileHandler for VtkHandler {
    fn extension(&self) -> &str {
        Self::EXTENSION
    }

    fn infile(&self) -> Option<&Path> {
        self.infile.as_deref()
    }

    fn outfile(&self) -> Option<&Path> {
        self.outfile.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check() {
        let handler = VtkHandler::new();
        assert!(handler.check_extension(Path::new("mesh.vtk")).is_ok());
        assert!(handler.check_extension(Path::new("dir.v2/mesh.vtk")).is_ok());
        assert!(handler.check_extension(Path::new("mesh.vtu")).is_err());
        assert!(handler.check_extension(Path::new("mesh.VTK")).is_err());
        assert!(handler.check_extension(Path::new("mesh")).is_err());
    }

    #[test]
    fn test_filename_type_check() {
        let handler = VtkHandler::new();
        assert!(handler.check_filename_type(Path::new("mesh.vtk")).is_ok());
        assert!(matches!(
            handler.check_filename_type(Path::new("")),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_write_before_parse_fails() {
        let mut handler = VtkHandler::new();
        let err = handler.write(&PointTable::zeros(1), "out.vtk").unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
        assert!(handler.outfile().is_none());
    }

    #[test]
    fn test_parse_rejects_extension_before_io() {
        let mut handler = VtkHandler::new();
        let err = handler.parse("does/not/exist.stl").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(handler.infile().is_none());
    }

    #[test]
    fn test_resolve_input_defaults_to_infile() {
        let handler = VtkHandler::new();
        assert!(matches!(handler.resolve_input(None), Err(Error::MissingInput(_))));
        assert!(handler.resolve_input(Some(Path::new("a.png"))).is_err());
        assert_eq!(
            handler.resolve_input(Some(Path::new("a.vtk"))).unwrap(),
            PathBuf::from("a.vtk")
        );
    }
}
