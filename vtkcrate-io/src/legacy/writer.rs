//! Legacy VTK writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::info;
use vtkcrate_core::Result;

use super::model::*;
use super::scanner::encode_name;
use super::ScalarType;

/// Values per line in ASCII output
const VALUES_PER_LINE: usize = 9;

/// Options controlling how a file is written
///
/// Unset fields keep the setting of the file being written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    pub encoding: Option<Encoding>,
    pub version: Option<Version>,
}

impl WriteOptions {
    /// Write ASCII regardless of the source encoding
    pub fn ascii() -> Self {
        Self {
            encoding: Some(Encoding::Ascii),
            ..Default::default()
        }
    }

    /// Write big-endian binary regardless of the source encoding
    pub fn binary() -> Self {
        Self {
            encoding: Some(Encoding::Binary),
            ..Default::default()
        }
    }

    /// Target a specific file version
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }
}

/// How cell lists are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellLayout {
    /// `n id0 id1 ...` per cell
    Classic,
    /// Separate `OFFSETS` and `CONNECTIVITY` arrays
    OffsetsConnectivity,
}

impl From<Version> for CellLayout {
    fn from(version: Version) -> Self {
        if version.uses_offsets_layout() {
            CellLayout::OffsetsConnectivity
        } else {
            CellLayout::Classic
        }
    }
}

/// Serializes a `VtkFile` in the legacy format
pub struct VtkWriter<W: Write> {
    out: W,
    encoding: Encoding,
    version: Version,
    layout: CellLayout,
}

impl<W: Write> VtkWriter<W> {
    /// Create a writer for a target encoding and version
    pub fn new(out: W, encoding: Encoding, version: Version) -> Self {
        Self {
            out,
            encoding,
            version,
            layout: CellLayout::from(version),
        }
    }

    /// Cell layout chosen for the target version
    pub fn layout(&self) -> CellLayout {
        self.layout
    }

    /// Write the whole file
    pub fn write(&mut self, file: &VtkFile) -> Result<()> {
        writeln!(self.out, "# vtk DataFile Version {}", self.version)?;
        let title = file.title.lines().next().unwrap_or("");
        writeln!(self.out, "{}", title)?;
        writeln!(self.out, "{}", self.encoding)?;

        // A field-only file has no DATASET line
        if file.dataset != DataSet::Field {
            writeln!(self.out, "DATASET {}", file.dataset.keyword())?;
        }
        if let Some(field) = &file.field_data {
            self.write_field(field)?;
        }
        self.write_dataset(&file.dataset)?;

        if let Some(section) = &file.point_data {
            writeln!(self.out, "POINT_DATA {}", section.count)?;
            self.write_attributes(section)?;
        }
        if let Some(section) = &file.cell_data {
            writeln!(self.out, "CELL_DATA {}", section.count)?;
            self.write_attributes(section)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Recover the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_dataset(&mut self, dataset: &DataSet) -> Result<()> {
        match dataset {
            DataSet::StructuredPoints { dimensions, origin, spacing } => {
                writeln!(self.out, "DIMENSIONS {} {} {}", dimensions[0], dimensions[1], dimensions[2])?;
                writeln!(self.out, "SPACING {} {} {}", spacing[0], spacing[1], spacing[2])?;
                writeln!(self.out, "ORIGIN {} {} {}", origin[0], origin[1], origin[2])?;
            }
            DataSet::StructuredGrid { dimensions, points } => {
                writeln!(self.out, "DIMENSIONS {} {} {}", dimensions[0], dimensions[1], dimensions[2])?;
                self.write_points(points)?;
            }
            DataSet::RectilinearGrid { dimensions, x, y, z } => {
                writeln!(self.out, "DIMENSIONS {} {} {}", dimensions[0], dimensions[1], dimensions[2])?;
                for (keyword, axis) in [("X_COORDINATES", x), ("Y_COORDINATES", y), ("Z_COORDINATES", z)] {
                    writeln!(self.out, "{} {} {}", keyword, axis.values.len(), axis.data_type)?;
                    self.write_values(axis.data_type, &axis.values, VALUES_PER_LINE)?;
                }
            }
            DataSet::PolyData { points, vertices, lines, polygons, strips } => {
                self.write_points(points)?;
                for (keyword, cells) in [
                    ("VERTICES", vertices),
                    ("LINES", lines),
                    ("POLYGONS", polygons),
                    ("TRIANGLE_STRIPS", strips),
                ] {
                    if !cells.is_empty() {
                        self.write_cells(keyword, cells)?;
                    }
                }
            }
            DataSet::UnstructuredGrid { points, cells, cell_types } => {
                self.write_points(points)?;
                self.write_cells("CELLS", cells)?;
                writeln!(self.out, "CELL_TYPES {}", cell_types.len())?;
                let types: Vec<f64> = cell_types.iter().map(|&t| t as f64).collect();
                self.write_values(ScalarType::Int, &types, 1)?;
            }
            DataSet::Field => {}
        }
        Ok(())
    }

    fn write_points(&mut self, points: &Points) -> Result<()> {
        writeln!(self.out, "POINTS {} {}", points.len(), points.data_type)?;
        self.write_values(points.data_type, &points.coords[..points.len() * 3], VALUES_PER_LINE)
    }

    fn write_cells(&mut self, keyword: &str, cells: &CellArray) -> Result<()> {
        match self.layout {
            CellLayout::Classic => {
                writeln!(self.out, "{} {} {}", keyword, cells.len(), cells.classic_size())?;
                if self.encoding == Encoding::Binary {
                    let flat: Vec<f64> = cells
                        .cells
                        .iter()
                        .flat_map(|ids| std::iter::once(ids.len()).chain(ids.iter().copied()))
                        .map(|v| v as f64)
                        .collect();
                    self.write_values(ScalarType::Int, &flat, 0)?;
                } else {
                    for ids in &cells.cells {
                        let mut line = ids.len().to_string();
                        for id in ids {
                            line.push(' ');
                            line.push_str(&id.to_string());
                        }
                        writeln!(self.out, "{}", line)?;
                    }
                }
            }
            CellLayout::OffsetsConnectivity => {
                writeln!(self.out, "{} {} {}", keyword, cells.len() + 1, cells.connectivity_len())?;
                let mut offsets = Vec::with_capacity(cells.len() + 1);
                offsets.push(0.0);
                let mut total = 0;
                for ids in &cells.cells {
                    total += ids.len();
                    offsets.push(total as f64);
                }
                let connectivity: Vec<f64> = cells.cells.iter().flatten().map(|&id| id as f64).collect();

                writeln!(self.out, "OFFSETS {}", ScalarType::Int64)?;
                self.write_values(ScalarType::Int64, &offsets, VALUES_PER_LINE)?;
                writeln!(self.out, "CONNECTIVITY {}", ScalarType::Int64)?;
                self.write_values(ScalarType::Int64, &connectivity, VALUES_PER_LINE)?;
            }
        }
        Ok(())
    }

    fn write_attributes(&mut self, section: &AttributeSection) -> Result<()> {
        for attribute in &section.attributes {
            match attribute {
                Attribute::Scalars { array, lookup_table } => {
                    writeln!(
                        self.out,
                        "SCALARS {} {} {}",
                        encode_name(&array.name),
                        array.data_type,
                        array.num_components
                    )?;
                    writeln!(self.out, "LOOKUP_TABLE {}", lookup_table)?;
                    self.write_values(array.data_type, &array.values, array.num_components.max(1))?;
                }
                Attribute::ColorScalars { name, num_components, values } => {
                    writeln!(self.out, "COLOR_SCALARS {} {}", encode_name(name), num_components)?;
                    self.write_colors(values, *num_components)?;
                }
                Attribute::LookupTable { name, colors } => {
                    writeln!(self.out, "LOOKUP_TABLE {} {}", encode_name(name), colors.len())?;
                    let values: Vec<f64> = colors.iter().flatten().copied().collect();
                    self.write_colors(&values, 4)?;
                }
                Attribute::Vectors(array) | Attribute::Normals(array) | Attribute::Tensors(array) => {
                    writeln!(
                        self.out,
                        "{} {} {}",
                        attribute.keyword(),
                        encode_name(&array.name),
                        array.data_type
                    )?;
                    self.write_values(array.data_type, &array.values, array.num_components)?;
                }
                Attribute::TextureCoordinates(array) => {
                    writeln!(
                        self.out,
                        "TEXTURE_COORDINATES {} {} {}",
                        encode_name(&array.name),
                        array.num_components,
                        array.data_type
                    )?;
                    self.write_values(array.data_type, &array.values, array.num_components)?;
                }
                Attribute::GlobalIds(array) | Attribute::PedigreeIds(array) => {
                    writeln!(
                        self.out,
                        "{} {} {}",
                        attribute.keyword(),
                        encode_name(&array.name),
                        array.data_type
                    )?;
                    self.write_values(array.data_type, &array.values, VALUES_PER_LINE)?;
                }
                Attribute::Field(field) => self.write_field(field)?,
            }
        }
        Ok(())
    }

    fn write_field(&mut self, field: &FieldData) -> Result<()> {
        writeln!(self.out, "FIELD {} {}", encode_name(&field.name), field.arrays.len())?;
        for array in &field.arrays {
            writeln!(
                self.out,
                "{} {} {} {}",
                encode_name(&array.name),
                array.num_components,
                array.len(),
                array.data_type
            )?;
            self.write_values(array.data_type, &array.values, array.num_components.max(1))?;
        }
        Ok(())
    }

    fn write_colors(&mut self, values: &[f64], per_line: usize) -> Result<()> {
        match self.encoding {
            Encoding::Binary => {
                let bytes: Vec<u8> = values
                    .iter()
                    .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                    .collect();
                self.out.write_all(&bytes)?;
                writeln!(self.out)?;
            }
            Encoding::Ascii => self.write_ascii(ScalarType::Float, values, per_line)?,
        }
        Ok(())
    }

    /// Write a value block; `per_line` of zero writes one line
    fn write_values(&mut self, ty: ScalarType, values: &[f64], per_line: usize) -> Result<()> {
        match self.encoding {
            Encoding::Binary => {
                self.out.write_all(&ty.encode(values))?;
                writeln!(self.out)?;
            }
            Encoding::Ascii => self.write_ascii(ty, values, per_line)?,
        }
        Ok(())
    }

    fn write_ascii(&mut self, ty: ScalarType, values: &[f64], per_line: usize) -> Result<()> {
        let per_line = if per_line == 0 { values.len().max(1) } else { per_line };
        for row in values.chunks(per_line) {
            let line: Vec<String> = row.iter().map(|&v| ty.format_ascii(v)).collect();
            writeln!(self.out, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Write a legacy VTK file to disk
pub fn write_vtk<P: AsRef<Path>>(file: &VtkFile, path: P, options: &WriteOptions) -> Result<()> {
    let path = path.as_ref();
    let encoding = options.encoding.unwrap_or(file.encoding);
    let version = options.version.unwrap_or(file.version);

    let out = BufWriter::new(File::create(path)?);
    let mut writer = VtkWriter::new(out, encoding, version);
    writer.write(file)?;

    info!(
        "wrote {} points and {} cells to {} ({}, version {})",
        file.number_of_points(),
        file.number_of_cells(),
        path.display(),
        encoding,
        version
    );
    Ok(())
}

/// Serialize a legacy VTK file to memory
pub fn write_vtk_to_bytes(file: &VtkFile, options: &WriteOptions) -> Result<Vec<u8>> {
    let encoding = options.encoding.unwrap_or(file.encoding);
    let version = options.version.unwrap_or(file.version);
    let mut writer = VtkWriter::new(Vec::new(), encoding, version);
    writer.write(file)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::read_vtk_from_bytes;

    fn quad_mesh() -> VtkFile {
        let mut file = VtkFile::new(
            "quad",
            Encoding::Ascii,
            DataSet::PolyData {
                points: Points::new(
                    ScalarType::Float,
                    vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
                ),
                vertices: CellArray::default(),
                lines: CellArray::default(),
                polygons: CellArray::new(vec![vec![0, 1, 2], vec![0, 2, 3]]),
                strips: CellArray::default(),
            },
        );
        file.point_data = Some(AttributeSection {
            count: 4,
            attributes: vec![
                Attribute::Scalars {
                    array: DataArray::new("height field", ScalarType::Double, 1, vec![0.0, 0.25, 0.5, 1.0]),
                    lookup_table: "default".to_string(),
                },
                Attribute::ColorScalars {
                    name: "rgb".to_string(),
                    num_components: 3,
                    values: vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
                },
            ],
        });
        file
    }

    #[test]
    fn test_cell_layout_follows_version() {
        let writer = VtkWriter::new(Vec::new(), Encoding::Ascii, Version::new(4, 2));
        assert_eq!(writer.layout(), CellLayout::Classic);
        let writer = VtkWriter::new(Vec::new(), Encoding::Ascii, Version::new(5, 1));
        assert_eq!(writer.layout(), CellLayout::OffsetsConnectivity);
    }

    #[test]
    fn test_ascii_output_text() {
        let bytes = write_vtk_to_bytes(&quad_mesh(), &WriteOptions::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("# vtk DataFile Version 4.2\nquad\nASCII\nDATASET POLYDATA\n"));
        assert!(text.contains("POLYGONS 2 8\n3 0 1 2\n3 0 2 3\n"));
        assert!(text.contains("SCALARS height%20field double 1\nLOOKUP_TABLE default\n"));
    }

    #[test]
    fn test_every_encoding_and_layout_reads_back() {
        let source = quad_mesh();
        for options in [
            WriteOptions::ascii(),
            WriteOptions::binary(),
            WriteOptions::ascii().with_version(Version::OFFSETS),
            WriteOptions::binary().with_version(Version::OFFSETS),
        ] {
            let bytes = write_vtk_to_bytes(&source, &options).unwrap();
            let back = read_vtk_from_bytes(&bytes).unwrap();

            assert_eq!(back.dataset, source.dataset, "{:?}", options);
            assert_eq!(back.point_data, source.point_data, "{:?}", options);
        }
    }

    #[test]
    fn test_field_only_file() {
        let mut file = VtkFile::new("fields", Encoding::Ascii, DataSet::Field);
        file.field_data = Some(FieldData {
            name: "FieldData".to_string(),
            arrays: vec![DataArray::new("time", ScalarType::Double, 1, vec![0.5])],
        });
        let bytes = write_vtk_to_bytes(&file, &WriteOptions::default()).unwrap();
        let back = read_vtk_from_bytes(&bytes).unwrap();
        assert_eq!(back.dataset, DataSet::Field);
        assert_eq!(back.field_data, file.field_data);
        assert_eq!(back.number_of_points(), 0);
    }
}
