//! In-memory model of a legacy VTK file
//!
//! The model keeps everything a legacy file can carry (geometry, topology,
//! point and cell attributes, field data) so that a file can be read,
//! have its point coordinates replaced, and be written back with all other
//! structure intact. Array values are held as `f64` together with their
//! declared type; integers above 2^53 are not represented exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use vtkcrate_core::{Cell, CellType, Error, PointTable, Result};

use super::ScalarType;

/// File format version from the `# vtk DataFile Version x.y` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// Version written by classic writers
    pub const CLASSIC: Version = Version { major: 4, minor: 2 };
    /// First version using the OFFSETS / CONNECTIVITY cell layout
    pub const OFFSETS: Version = Version { major: 5, minor: 1 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Check if cells are stored as separate offset and connectivity arrays
    pub fn uses_offsets_layout(&self) -> bool {
        *self >= Version::OFFSETS
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::CLASSIC
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Encoding of the file body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    Ascii,
    Binary,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Ascii => f.write_str("ASCII"),
            Encoding::Binary => f.write_str("BINARY"),
        }
    }
}

/// Explicit point coordinates with their declared type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Points {
    pub data_type: ScalarType,
    /// Interleaved `x y z` coordinates
    pub coords: Vec<f64>,
}

impl Points {
    pub fn new(data_type: ScalarType, coords: Vec<f64>) -> Self {
        Self { data_type, coords }
    }

    pub fn len(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// A list of cells given as point id lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellArray {
    pub cells: Vec<Vec<usize>>,
}

impl CellArray {
    pub fn new(cells: Vec<Vec<usize>>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total number of point ids over all cells
    pub fn connectivity_len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// Size of the classic `n id0 id1 ...` layout
    pub fn classic_size(&self) -> usize {
        self.connectivity_len() + self.cells.len()
    }
}

/// Geometry and topology of a legacy file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataSet {
    StructuredPoints {
        dimensions: [usize; 3],
        origin: [f64; 3],
        spacing: [f64; 3],
    },
    StructuredGrid {
        dimensions: [usize; 3],
        points: Points,
    },
    RectilinearGrid {
        dimensions: [usize; 3],
        x: Coordinates,
        y: Coordinates,
        z: Coordinates,
    },
    PolyData {
        points: Points,
        vertices: CellArray,
        lines: CellArray,
        polygons: CellArray,
        strips: CellArray,
    },
    UnstructuredGrid {
        points: Points,
        cells: CellArray,
        cell_types: Vec<u32>,
    },
    /// A file carrying only field data
    Field,
}

/// One coordinate axis of a rectilinear grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub data_type: ScalarType,
    pub values: Vec<f64>,
}

impl DataSet {
    /// The `DATASET` keyword of this dataset kind
    pub fn keyword(&self) -> &'static str {
        match self {
            DataSet::StructuredPoints { .. } => "STRUCTURED_POINTS",
            DataSet::StructuredGrid { .. } => "STRUCTURED_GRID",
            DataSet::RectilinearGrid { .. } => "RECTILINEAR_GRID",
            DataSet::PolyData { .. } => "POLYDATA",
            DataSet::UnstructuredGrid { .. } => "UNSTRUCTURED_GRID",
            DataSet::Field => "FIELD",
        }
    }

    /// Explicit points, if this dataset stores them
    pub fn explicit_points(&self) -> Option<&Points> {
        match self {
            DataSet::StructuredGrid { points, .. }
            | DataSet::PolyData { points, .. }
            | DataSet::UnstructuredGrid { points, .. } => Some(points),
            _ => None,
        }
    }
}

/// The numeric contents of one named array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataArray {
    pub name: String,
    pub data_type: ScalarType,
    pub num_components: usize,
    pub values: Vec<f64>,
}

impl DataArray {
    pub fn new(name: impl Into<String>, data_type: ScalarType, num_components: usize, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data_type,
            num_components,
            values,
        }
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        if self.num_components == 0 {
            0
        } else {
            self.values.len() / self.num_components
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Min and max of one component, `None` when empty
    pub fn component_range(&self, component: usize) -> Option<(f64, f64)> {
        if component >= self.num_components {
            return None;
        }
        self.values
            .iter()
            .skip(component)
            .step_by(self.num_components)
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// A named collection of arrays (`FIELD` block)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    pub name: String,
    pub arrays: Vec<DataArray>,
}

/// A point or cell attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    Scalars {
        array: DataArray,
        lookup_table: String,
    },
    /// Color scalars; values are in `[0, 1]`
    ColorScalars {
        name: String,
        num_components: usize,
        values: Vec<f64>,
    },
    /// RGBA entries in `[0, 1]`
    LookupTable {
        name: String,
        colors: Vec<[f64; 4]>,
    },
    Vectors(DataArray),
    Normals(DataArray),
    TextureCoordinates(DataArray),
    Tensors(DataArray),
    GlobalIds(DataArray),
    PedigreeIds(DataArray),
    Field(FieldData),
}

impl Attribute {
    /// Name of the attribute as written in the file
    pub fn name(&self) -> &str {
        match self {
            Attribute::Scalars { array, .. } => &array.name,
            Attribute::ColorScalars { name, .. } | Attribute::LookupTable { name, .. } => name,
            Attribute::Vectors(array)
            | Attribute::Normals(array)
            | Attribute::TextureCoordinates(array)
            | Attribute::Tensors(array)
            | Attribute::GlobalIds(array)
            | Attribute::PedigreeIds(array) => &array.name,
            Attribute::Field(field) => &field.name,
        }
    }

    /// Attribute keyword as written in the file
    pub fn keyword(&self) -> &'static str {
        match self {
            Attribute::Scalars { .. } => "SCALARS",
            Attribute::ColorScalars { .. } => "COLOR_SCALARS",
            Attribute::LookupTable { .. } => "LOOKUP_TABLE",
            Attribute::Vectors(_) => "VECTORS",
            Attribute::Normals(_) => "NORMALS",
            Attribute::TextureCoordinates(_) => "TEXTURE_COORDINATES",
            Attribute::Tensors(array) if array.num_components == 6 => "TENSORS6",
            Attribute::Tensors(_) => "TENSORS",
            Attribute::GlobalIds(_) => "GLOBAL_IDS",
            Attribute::PedigreeIds(_) => "PEDIGREE_IDS",
            Attribute::Field(_) => "FIELD",
        }
    }
}

/// `POINT_DATA` or `CELL_DATA` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSection {
    /// Number of tuples every attribute in the section holds
    pub count: usize,
    pub attributes: Vec<Attribute>,
}

/// Whether an attribute belongs to points or cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Association {
    Point,
    Cell,
}

/// A scalar array together with where it lives
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField<'a> {
    pub association: Association,
    pub array: &'a DataArray,
}

/// A complete legacy file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VtkFile {
    pub version: Version,
    pub title: String,
    pub encoding: Encoding,
    pub dataset: DataSet,
    /// Dataset-level field data written between the `DATASET` line and the geometry
    pub field_data: Option<FieldData>,
    pub point_data: Option<AttributeSection>,
    pub cell_data: Option<AttributeSection>,
}

impl VtkFile {
    /// Create a file with no attributes
    pub fn new(title: impl Into<String>, encoding: Encoding, dataset: DataSet) -> Self {
        Self {
            version: Version::default(),
            title: title.into(),
            encoding,
            dataset,
            field_data: None,
            point_data: None,
            cell_data: None,
        }
    }

    /// Number of points of the dataset, explicit or implicit
    pub fn number_of_points(&self) -> usize {
        match &self.dataset {
            DataSet::StructuredPoints { dimensions, .. } => dimensions.iter().product(),
            DataSet::RectilinearGrid { x, y, z, .. } => x.values.len() * y.values.len() * z.values.len(),
            DataSet::StructuredGrid { points, .. }
            | DataSet::PolyData { points, .. }
            | DataSet::UnstructuredGrid { points, .. } => points.len(),
            DataSet::Field => 0,
        }
    }

    /// Point coordinates as an N x 3 table, in point-id order.
    ///
    /// Implicit points of structured points and rectilinear grids are
    /// generated with x varying fastest, then y, then z.
    pub fn points(&self) -> PointTable {
        match &self.dataset {
            DataSet::StructuredGrid { points, .. }
            | DataSet::PolyData { points, .. }
            | DataSet::UnstructuredGrid { points, .. } => {
                // Points::len truncates a ragged coordinate list
                let n = points.len() * 3;
                PointTable::from_flat(&points.coords[..n]).unwrap_or_else(|_| PointTable::zeros(0))
            }
            DataSet::StructuredPoints { dimensions, origin, spacing } => {
                let [nx, ny, nz] = *dimensions;
                let mut coords = Vec::with_capacity(nx * ny * nz * 3);
                for k in 0..nz {
                    for j in 0..ny {
                        for i in 0..nx {
                            coords.push(origin[0] + i as f64 * spacing[0]);
                            coords.push(origin[1] + j as f64 * spacing[1]);
                            coords.push(origin[2] + k as f64 * spacing[2]);
                        }
                    }
                }
                PointTable::from_flat(&coords).unwrap_or_else(|_| PointTable::zeros(0))
            }
            DataSet::RectilinearGrid { x, y, z, .. } => {
                let mut coords = Vec::with_capacity(x.values.len() * y.values.len() * z.values.len() * 3);
                for &zk in &z.values {
                    for &yj in &y.values {
                        for &xi in &x.values {
                            coords.extend_from_slice(&[xi, yj, zk]);
                        }
                    }
                }
                PointTable::from_flat(&coords).unwrap_or_else(|_| PointTable::zeros(0))
            }
            DataSet::Field => PointTable::zeros(0),
        }
    }

    /// Replace the point coordinates, row `i` becoming point `i`.
    ///
    /// The table must have exactly as many rows as the dataset has points.
    /// Datasets with implicit geometry are converted to a structured grid of
    /// the same dimensions, which keeps their topology and attributes.
    pub fn set_points(&mut self, table: &PointTable) -> Result<()> {
        let expected = self.number_of_points();
        if table.len() != expected {
            return Err(Error::PointCountMismatch {
                expected,
                actual: table.len(),
            });
        }

        let coords = table.to_flat();
        match &mut self.dataset {
            DataSet::StructuredGrid { points, .. }
            | DataSet::PolyData { points, .. }
            | DataSet::UnstructuredGrid { points, .. } => {
                points.coords = coords;
            }
            DataSet::StructuredPoints { dimensions, .. } => {
                debug!("converting structured points to a structured grid");
                self.dataset = DataSet::StructuredGrid {
                    dimensions: *dimensions,
                    points: Points::new(ScalarType::Float, coords),
                };
            }
            DataSet::RectilinearGrid { dimensions, x, .. } => {
                debug!("converting rectilinear grid to a structured grid");
                let data_type = if x.data_type.is_float() { x.data_type } else { ScalarType::Float };
                self.dataset = DataSet::StructuredGrid {
                    dimensions: *dimensions,
                    points: Points::new(data_type, coords),
                };
            }
            DataSet::Field => {
                return Err(Error::Unsupported(
                    "a field-only file has no points to replace".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// All cells of the dataset in cell-id order.
    ///
    /// Poly data cells come in the order vertices, lines, polygons, strips.
    /// Structured datasets yield their implicit cells.
    pub fn cells(&self) -> Vec<Cell> {
        match &self.dataset {
            DataSet::UnstructuredGrid { cells, cell_types, .. } => cells
                .cells
                .iter()
                .enumerate()
                .map(|(i, ids)| {
                    let ty = cell_types.get(i).copied().map(CellType::from_id).unwrap_or(CellType::Empty);
                    Cell::new(ty, ids.clone())
                })
                .collect(),
            DataSet::PolyData { vertices, lines, polygons, strips, .. } => {
                let mut out = Vec::with_capacity(
                    vertices.len() + lines.len() + polygons.len() + strips.len(),
                );
                out.extend(vertices.cells.iter().map(|ids| {
                    let ty = if ids.len() == 1 { CellType::Vertex } else { CellType::PolyVertex };
                    Cell::new(ty, ids.clone())
                }));
                out.extend(lines.cells.iter().map(|ids| {
                    let ty = if ids.len() == 2 { CellType::Line } else { CellType::PolyLine };
                    Cell::new(ty, ids.clone())
                }));
                out.extend(polygons.cells.iter().map(|ids| {
                    let ty = match ids.len() {
                        3 => CellType::Triangle,
                        4 => CellType::Quad,
                        _ => CellType::Polygon,
                    };
                    Cell::new(ty, ids.clone())
                }));
                out.extend(strips.cells.iter().map(|ids| Cell::new(CellType::TriangleStrip, ids.clone())));
                out
            }
            DataSet::StructuredPoints { dimensions, .. } => structured_cells(*dimensions, true),
            DataSet::RectilinearGrid { dimensions, .. } => structured_cells(*dimensions, true),
            DataSet::StructuredGrid { dimensions, .. } => structured_cells(*dimensions, false),
            DataSet::Field => Vec::new(),
        }
    }

    /// Number of cells of the dataset
    pub fn number_of_cells(&self) -> usize {
        match &self.dataset {
            DataSet::UnstructuredGrid { cells, .. } => cells.len(),
            DataSet::PolyData { vertices, lines, polygons, strips, .. } => {
                vertices.len() + lines.len() + polygons.len() + strips.len()
            }
            DataSet::StructuredPoints { dimensions, .. }
            | DataSet::RectilinearGrid { dimensions, .. }
            | DataSet::StructuredGrid { dimensions, .. } => dimensions
                .iter()
                .filter(|&&d| d > 1)
                .map(|&d| d - 1)
                .product::<usize>()
                * usize::from(dimensions.iter().all(|&d| d > 0)),
            DataSet::Field => 0,
        }
    }

    /// The scalars used for color mapping: the first point scalars, else
    /// the first cell scalars
    pub fn active_scalars(&self) -> Option<ScalarField<'_>> {
        first_scalars(self.point_data.as_ref())
            .map(|array| ScalarField { association: Association::Point, array })
            .or_else(|| {
                first_scalars(self.cell_data.as_ref())
                    .map(|array| ScalarField { association: Association::Cell, array })
            })
    }

    /// Range of the first component of the point and cell scalars.
    ///
    /// Returns `(0.0, 1.0)` when the file has no scalars.
    pub fn scalar_range(&self) -> (f64, f64) {
        let ranges = [
            first_scalars(self.point_data.as_ref()).and_then(|a| a.component_range(0)),
            first_scalars(self.cell_data.as_ref()).and_then(|a| a.component_range(0)),
        ];
        ranges
            .iter()
            .flatten()
            .fold(None, |acc: Option<(f64, f64)>, &(lo, hi)| match acc {
                None => Some((lo, hi)),
                Some((a, b)) => Some((a.min(lo), b.max(hi))),
            })
            .unwrap_or((0.0, 1.0))
    }

    /// Names of all point and cell attributes, prefixed with their section
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for (prefix, section) in [("point", &self.point_data), ("cell", &self.cell_data)] {
            if let Some(section) = section {
                for attribute in &section.attributes {
                    names.push(format!("{}:{}:{}", prefix, attribute.keyword(), attribute.name()));
                }
            }
        }
        names
    }
}

fn first_scalars(section: Option<&AttributeSection>) -> Option<&DataArray> {
    section?.attributes.iter().find_map(|a| match a {
        Attribute::Scalars { array, .. } => Some(array),
        _ => None,
    })
}

/// Implicit cells of a structured dataset with the given point dimensions
fn structured_cells(dimensions: [usize; 3], axis_aligned: bool) -> Vec<Cell> {
    if dimensions.iter().any(|&d| d == 0) {
        return Vec::new();
    }
    let stride = [1, dimensions[0], dimensions[0] * dimensions[1]];
    let axes: Vec<usize> = (0..3).filter(|&a| dimensions[a] > 1).collect();
    let mut cells = Vec::new();

    match axes.as_slice() {
        [] => cells.push(Cell::new(CellType::Vertex, vec![0])),
        [a] => {
            for u in 0..dimensions[*a] - 1 {
                let p = u * stride[*a];
                cells.push(Cell::new(CellType::Line, vec![p, p + stride[*a]]));
            }
        }
        [a, b] => {
            let (sa, sb) = (stride[*a], stride[*b]);
            for v in 0..dimensions[*b] - 1 {
                for u in 0..dimensions[*a] - 1 {
                    let p = u * sa + v * sb;
                    if axis_aligned {
                        cells.push(Cell::new(CellType::Pixel, vec![p, p + sa, p + sb, p + sa + sb]));
                    } else {
                        cells.push(Cell::new(CellType::Quad, vec![p, p + sa, p + sa + sb, p + sb]));
                    }
                }
            }
        }
        _ => {
            let (sx, sy, sz) = (stride[0], stride[1], stride[2]);
            for k in 0..dimensions[2] - 1 {
                for j in 0..dimensions[1] - 1 {
                    for i in 0..dimensions[0] - 1 {
                        let p = i * sx + j * sy + k * sz;
                        let ids = if axis_aligned {
                            vec![p, p + sx, p + sy, p + sx + sy, p + sz, p + sx + sz, p + sy + sz, p + sx + sy + sz]
                        } else {
                            vec![p, p + sx, p + sx + sy, p + sy, p + sz, p + sx + sz, p + sx + sy + sz, p + sy + sz]
                        };
                        let ty = if axis_aligned { CellType::Voxel } else { CellType::Hexahedron };
                        cells.push(Cell::new(ty, ids));
                    }
                }
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtkcrate_core::Point3d;

    fn two_triangles() -> VtkFile {
        VtkFile::new(
            "two triangles",
            Encoding::Ascii,
            DataSet::UnstructuredGrid {
                points: Points::new(
                    ScalarType::Float,
                    vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
                ),
                cells: CellArray::new(vec![vec![0, 1, 2], vec![0, 2, 3]]),
                cell_types: vec![5, 5],
            },
        )
    }

    #[test]
    fn test_points_and_cells() {
        let file = two_triangles();
        assert_eq!(file.number_of_points(), 4);
        assert_eq!(file.number_of_cells(), 2);

        let table = file.points();
        assert_eq!(table.len(), 4);
        assert_eq!(table.point(2), Point3d::new(1.0, 1.0, 0.0));

        let cells = file.cells();
        assert!(cells.iter().all(|c| c.is_triangle()));
        assert_eq!(cells[1].point_ids, vec![0, 2, 3]);
    }

    #[test]
    fn test_set_points_checks_row_count() {
        let mut file = two_triangles();
        let err = file.set_points(&PointTable::zeros(3)).unwrap_err();
        assert!(matches!(err, Error::PointCountMismatch { expected: 4, actual: 3 }));

        let mut table = file.points();
        table.translate(&vtkcrate_core::Vector3d::new(1.0, 0.0, 0.0));
        file.set_points(&table).unwrap();
        assert_eq!(file.points().point(0), Point3d::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_structured_points_generate_coordinates() {
        let file = VtkFile::new(
            "image",
            Encoding::Ascii,
            DataSet::StructuredPoints {
                dimensions: [3, 2, 1],
                origin: [1.0, 0.0, 0.0],
                spacing: [0.5, 2.0, 1.0],
            },
        );
        let table = file.points();
        assert_eq!(table.len(), 6);
        assert_eq!(table.point(1), Point3d::new(1.5, 0.0, 0.0));
        assert_eq!(table.point(3), Point3d::new(1.0, 2.0, 0.0));

        let cells = file.cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(file.number_of_cells(), 2);
        assert_eq!(cells[0], Cell::new(CellType::Pixel, vec![0, 1, 3, 4]));
    }

    #[test]
    fn test_set_points_on_image_converts_to_structured_grid() {
        let mut file = VtkFile::new(
            "image",
            Encoding::Ascii,
            DataSet::StructuredPoints {
                dimensions: [2, 2, 2],
                origin: [0.0; 3],
                spacing: [1.0; 3],
            },
        );
        let table = file.points();
        file.set_points(&table).unwrap();

        assert!(matches!(file.dataset, DataSet::StructuredGrid { dimensions: [2, 2, 2], .. }));
        assert_eq!(file.number_of_cells(), 1);
        assert_eq!(file.cells()[0].cell_type, CellType::Hexahedron);
        assert!(file.points().approx_eq(&table, 0.0));
    }

    #[test]
    fn test_poly_data_cell_order() {
        let file = VtkFile::new(
            "poly",
            Encoding::Ascii,
            DataSet::PolyData {
                points: Points::new(ScalarType::Double, vec![0.0; 15]),
                vertices: CellArray::new(vec![vec![4]]),
                lines: CellArray::new(vec![vec![0, 1, 2]]),
                polygons: CellArray::new(vec![vec![0, 1, 2, 3]]),
                strips: CellArray::default(),
            },
        );
        let types: Vec<CellType> = file.cells().iter().map(|c| c.cell_type).collect();
        assert_eq!(types, vec![CellType::Vertex, CellType::PolyLine, CellType::Quad]);
    }

    #[test]
    fn test_scalar_range_defaults_and_union() {
        let mut file = two_triangles();
        assert_eq!(file.scalar_range(), (0.0, 1.0));
        assert!(file.active_scalars().is_none());

        file.point_data = Some(AttributeSection {
            count: 4,
            attributes: vec![Attribute::Scalars {
                array: DataArray::new("temp", ScalarType::Float, 1, vec![2.0, 5.0, 3.0, 4.0]),
                lookup_table: "default".to_string(),
            }],
        });
        file.cell_data = Some(AttributeSection {
            count: 2,
            attributes: vec![Attribute::Scalars {
                array: DataArray::new("id", ScalarType::Int, 1, vec![0.0, 1.0]),
                lookup_table: "default".to_string(),
            }],
        });

        assert_eq!(file.scalar_range(), (0.0, 5.0));
        let active = file.active_scalars().unwrap();
        assert_eq!(active.association, Association::Point);
        assert_eq!(active.array.name, "temp");
        assert_eq!(
            file.attribute_names(),
            vec!["point:SCALARS:temp".to_string(), "cell:SCALARS:id".to_string()]
        );
    }
}
