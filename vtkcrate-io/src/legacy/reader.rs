//! Legacy VTK reader
//!
//! Reads every dataset kind of the legacy format, ASCII or binary, together
//! with all point and cell attributes and field data.

use std::path::Path;
use tracing::{debug, warn};
use vtkcrate_core::{Error, Result};

use super::model::*;
use super::scanner::{decode_name, to_index, Scanner};
use super::ScalarType;

/// Longest title the format allows
const MAX_TITLE_LEN: usize = 256;

/// Read a legacy VTK file from disk
pub fn read_vtk<P: AsRef<Path>>(path: P) -> Result<VtkFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    read_vtk_from_bytes(&bytes)
}

/// Read a legacy VTK file from memory
pub fn read_vtk_from_bytes(bytes: &[u8]) -> Result<VtkFile> {
    LegacyReader::new(bytes).read()
}

/// Geometry pieces collected before the dataset kind is assembled
#[derive(Default)]
struct Geometry {
    dimensions: Option<[usize; 3]>,
    origin: Option<[f64; 3]>,
    spacing: Option<[f64; 3]>,
    points: Option<Points>,
    x: Option<Coordinates>,
    y: Option<Coordinates>,
    z: Option<Coordinates>,
    vertices: Option<CellArray>,
    lines: Option<CellArray>,
    polygons: Option<CellArray>,
    strips: Option<CellArray>,
    cells: Option<CellArray>,
    cell_types: Option<Vec<u32>>,
}

/// Which attribute section new attributes go to
#[derive(Clone, Copy)]
enum Section {
    Point,
    Cell,
}

struct LegacyReader<'a> {
    scanner: Scanner<'a>,
    version: Version,
    binary: bool,
}

impl<'a> LegacyReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            scanner: Scanner::new(bytes),
            version: Version::default(),
            binary: false,
        }
    }

    fn read(mut self) -> Result<VtkFile> {
        self.version = self.read_header()?;

        let mut title = self.scanner.read_line()?.to_string();
        if title.len() > MAX_TITLE_LEN {
            warn!("title longer than {} characters, truncating", MAX_TITLE_LEN);
            let mut end = MAX_TITLE_LEN;
            while !title.is_char_boundary(end) {
                end -= 1;
            }
            title.truncate(end);
        }

        let encoding = match self.scanner.expect_token("ASCII or BINARY")?.to_ascii_uppercase().as_str() {
            "ASCII" => Encoding::Ascii,
            "BINARY" => Encoding::Binary,
            other => return Err(self.scanner.error(format!("unknown file encoding '{}'", other))),
        };
        self.binary = encoding == Encoding::Binary;

        let kind = match self.scanner.expect_token("DATASET")?.to_ascii_uppercase().as_str() {
            "DATASET" => self.scanner.expect_token("dataset type")?.to_ascii_uppercase(),
            "FIELD" => "FIELD".to_string(),
            other => {
                return Err(self.scanner.error(format!("expected DATASET, found '{}'", other)));
            }
        };
        debug!("legacy file version {} ({}), dataset {}", self.version, encoding, kind);

        let mut field_data = None;
        if kind == "FIELD" {
            field_data = Some(self.read_field()?);
        }

        let mut geometry = Geometry::default();
        let mut point_data: Option<AttributeSection> = None;
        let mut cell_data: Option<AttributeSection> = None;
        let mut section: Option<Section> = None;

        while let Some(token) = self.scanner.next_token()? {
            let keyword = token.to_ascii_uppercase();
            match keyword.as_str() {
                "POINT_DATA" => {
                    let count = self.scanner.next_usize("point data count")?;
                    point_data.get_or_insert_with(AttributeSection::default).count = count;
                    section = Some(Section::Point);
                }
                "CELL_DATA" => {
                    let count = self.scanner.next_usize("cell data count")?;
                    cell_data.get_or_insert_with(AttributeSection::default).count = count;
                    section = Some(Section::Cell);
                }
                "METADATA" => self.scanner.skip_metadata()?,
                _ => match section {
                    Some(which) => {
                        let target = match which {
                            Section::Point => point_data.get_or_insert_with(AttributeSection::default),
                            Section::Cell => cell_data.get_or_insert_with(AttributeSection::default),
                        };
                        let count = target.count;
                        let attribute = self.read_attribute(&keyword, count)?;
                        target.attributes.push(attribute);
                    }
                    None if keyword == "FIELD" => field_data = Some(self.read_field()?),
                    None => self.read_geometry(&keyword, &mut geometry)?,
                },
            }
        }

        let dataset = self.assemble(&kind, geometry)?;
        Ok(VtkFile {
            version: self.version,
            title,
            encoding,
            dataset,
            field_data,
            point_data,
            cell_data,
        })
    }

    fn read_header(&mut self) -> Result<Version> {
        let line = self.scanner.read_line()?;
        let lower = line.to_ascii_lowercase();
        if !lower.starts_with("# vtk datafile version") {
            return Err(Error::parse(1, "not a legacy VTK file: missing '# vtk DataFile Version' header"));
        }
        let number = line["# vtk DataFile Version".len()..].trim();
        let (major, minor) = number.split_once('.').unwrap_or((number, "0"));
        match (major.parse(), minor.parse()) {
            (Ok(major), Ok(minor)) => Ok(Version::new(major, minor)),
            _ => Err(Error::parse(1, format!("invalid file version '{}'", number))),
        }
    }

    fn read_geometry(&mut self, keyword: &str, geometry: &mut Geometry) -> Result<()> {
        match keyword {
            "DIMENSIONS" => {
                let dimensions = [
                    self.scanner.next_usize("dimension")?,
                    self.scanner.next_usize("dimension")?,
                    self.scanner.next_usize("dimension")?,
                ];
                let plane = self.scanner.product(dimensions[0], dimensions[1], "grid points")?;
                let count = self.scanner.product(plane, dimensions[2], "grid points")?;
                self.scanner.product(count, 3, "grid coordinates")?;
                geometry.dimensions = Some(dimensions);
            }
            "ORIGIN" => geometry.origin = Some(self.scanner.next_triple("origin")?),
            "SPACING" | "ASPECT_RATIO" => geometry.spacing = Some(self.scanner.next_triple("spacing")?),
            "POINTS" => {
                let n = self.scanner.next_usize("point count")?;
                let data_type = self.scanner.next_scalar_type()?;
                let len = self.scanner.product(n, 3, "point coordinates")?;
                let coords = self.scanner.read_values(data_type, len, self.binary)?;
                geometry.points = Some(Points::new(data_type, coords));
            }
            "X_COORDINATES" => geometry.x = Some(self.read_coordinates()?),
            "Y_COORDINATES" => geometry.y = Some(self.read_coordinates()?),
            "Z_COORDINATES" => geometry.z = Some(self.read_coordinates()?),
            "VERTICES" => geometry.vertices = Some(self.read_cell_array()?),
            "LINES" => geometry.lines = Some(self.read_cell_array()?),
            "POLYGONS" => geometry.polygons = Some(self.read_cell_array()?),
            "TRIANGLE_STRIPS" => geometry.strips = Some(self.read_cell_array()?),
            "CELLS" => geometry.cells = Some(self.read_cell_array()?),
            "CELL_TYPES" => {
                let n = self.scanner.next_usize("cell type count")?;
                let types = self.scanner.read_values(ScalarType::Int, n, self.binary)?;
                let types = types
                    .into_iter()
                    .map(|t| match to_index(t, "cell type") {
                        Ok(id) if id <= u32::MAX as usize => Ok(id as u32),
                        Ok(_) => Err(self.scanner.error(format!("invalid cell type '{}'", t))),
                        Err(message) => Err(self.scanner.error(message)),
                    })
                    .collect::<Result<Vec<u32>>>()?;
                geometry.cell_types = Some(types);
            }
            other => {
                return Err(self.scanner.error(format!("unexpected keyword '{}'", other)));
            }
        }
        Ok(())
    }

    fn read_coordinates(&mut self) -> Result<Coordinates> {
        let n = self.scanner.next_usize("coordinate count")?;
        let data_type = self.scanner.next_scalar_type()?;
        let values = self.scanner.read_values(data_type, n, self.binary)?;
        Ok(Coordinates { data_type, values })
    }

    /// Read a cell list in the layout implied by the file version
    fn read_cell_array(&mut self) -> Result<CellArray> {
        let first = self.scanner.next_usize("cell count")?;
        let second = self.scanner.next_usize("cell array size")?;

        if self.version.uses_offsets_layout() {
            let offsets = self.read_typed_block("OFFSETS", first)?;
            let connectivity = self.read_typed_block("CONNECTIVITY", second)?;
            return cells_from_offsets(&offsets, &connectivity)
                .map_err(|message| self.scanner.error(message));
        }

        let flat = self.scanner.read_values(ScalarType::Int, second, self.binary)?;
        cells_from_counts(first, &flat).map_err(|message| self.scanner.error(message))
    }

    /// Read `OFFSETS type` or `CONNECTIVITY type` followed by its values
    fn read_typed_block(&mut self, keyword: &str, count: usize) -> Result<Vec<f64>> {
        let token = self.scanner.expect_token(keyword)?;
        if !token.eq_ignore_ascii_case(keyword) {
            return Err(self.scanner.error(format!("expected {}, found '{}'", keyword, token)));
        }
        let data_type = self.scanner.next_scalar_type()?;
        self.scanner.read_values(data_type, count, self.binary)
    }

    fn read_array(&mut self, name: &str, components: usize, tuples: usize) -> Result<DataArray> {
        let data_type = self.scanner.next_scalar_type()?;
        let len = self.scanner.product(components, tuples, "array size")?;
        let values = self.scanner.read_values(data_type, len, self.binary)?;
        Ok(DataArray::new(decode_name(name), data_type, components, values))
    }

    fn read_attribute(&mut self, keyword: &str, count: usize) -> Result<Attribute> {
        let attribute = match keyword {
            "SCALARS" => {
                let name = self.scanner.expect_token("scalars name")?;
                let data_type = self.scanner.next_scalar_type()?;
                let components = match self.scanner.next_token_on_line()? {
                    Some(token) => token
                        .parse()
                        .map_err(|_| self.scanner.error(format!("invalid component count '{}'", token)))?,
                    None => 1,
                };
                let mut lookup_table = "default".to_string();
                if self
                    .scanner
                    .peek_token()
                    .is_some_and(|t| t.eq_ignore_ascii_case("LOOKUP_TABLE"))
                {
                    self.scanner.next_token()?;
                    lookup_table = self.scanner.expect_token("lookup table name")?.to_string();
                }
                let len = self.scanner.product(components, count, "scalars size")?;
                let values = self.scanner.read_values(data_type, len, self.binary)?;
                Attribute::Scalars {
                    array: DataArray::new(decode_name(name), data_type, components, values),
                    lookup_table,
                }
            }
            "COLOR_SCALARS" => {
                let name = decode_name(self.scanner.expect_token("color scalars name")?);
                let components = self.scanner.next_usize("color component count")?;
                let len = self.scanner.product(components, count, "color scalars size")?;
                let values = self.read_colors(len)?;
                Attribute::ColorScalars { name, num_components: components, values }
            }
            "LOOKUP_TABLE" => {
                let name = decode_name(self.scanner.expect_token("lookup table name")?);
                let size = self.scanner.next_usize("lookup table size")?;
                let len = self.scanner.product(size, 4, "lookup table size")?;
                let values = self.read_colors(len)?;
                let colors = values
                    .chunks_exact(4)
                    .map(|c| [c[0], c[1], c[2], c[3]])
                    .collect();
                Attribute::LookupTable { name, colors }
            }
            "VECTORS" => {
                let name = self.scanner.expect_token("vectors name")?;
                Attribute::Vectors(self.read_array(name, 3, count)?)
            }
            "NORMALS" => {
                let name = self.scanner.expect_token("normals name")?;
                Attribute::Normals(self.read_array(name, 3, count)?)
            }
            "TEXTURE_COORDINATES" => {
                let name = self.scanner.expect_token("texture coordinates name")?;
                let dim = self.scanner.next_usize("texture dimension")?;
                if !(1..=3).contains(&dim) {
                    return Err(self.scanner.error(format!("texture dimension {} out of range", dim)));
                }
                Attribute::TextureCoordinates(self.read_array(name, dim, count)?)
            }
            "TENSORS" => {
                let name = self.scanner.expect_token("tensors name")?;
                Attribute::Tensors(self.read_array(name, 9, count)?)
            }
            "TENSORS6" => {
                let name = self.scanner.expect_token("tensors name")?;
                Attribute::Tensors(self.read_array(name, 6, count)?)
            }
            "GLOBAL_IDS" => {
                let name = self.scanner.expect_token("global ids name")?;
                Attribute::GlobalIds(self.read_array(name, 1, count)?)
            }
            "PEDIGREE_IDS" => {
                let name = self.scanner.expect_token("pedigree ids name")?;
                Attribute::PedigreeIds(self.read_array(name, 1, count)?)
            }
            "FIELD" => Attribute::Field(self.read_field()?),
            other => {
                return Err(self.scanner.error(format!("unknown attribute '{}'", other)));
            }
        };
        debug!("read {} '{}'", attribute.keyword(), attribute.name());
        Ok(attribute)
    }

    /// Colors are floats in ASCII files and bytes in binary files
    fn read_colors(&mut self, count: usize) -> Result<Vec<f64>> {
        if self.binary {
            let bytes = self.scanner.read_bytes(count)?;
            Ok(bytes.iter().map(|&b| b as f64 / 255.0).collect())
        } else {
            self.scanner.read_ascii(count)
        }
    }

    /// Read `FIELD name n` and its arrays; the keyword is already consumed
    fn read_field(&mut self) -> Result<FieldData> {
        let name = decode_name(self.scanner.expect_token("field name")?);
        let n = self.scanner.next_usize("field array count")?;
        let mut arrays = Vec::with_capacity(n.min(self.scanner.remaining()));
        for _ in 0..n {
            if self
                .scanner
                .peek_token()
                .is_some_and(|t| t.eq_ignore_ascii_case("METADATA"))
            {
                self.scanner.next_token()?;
                self.scanner.skip_metadata()?;
            }
            let array_name = self.scanner.expect_token("array name")?;
            let components = self.scanner.next_usize("component count")?;
            let tuples = self.scanner.next_usize("tuple count")?;
            arrays.push(self.read_array(array_name, components, tuples)?);
        }
        Ok(FieldData { name, arrays })
    }

    fn assemble(&self, kind: &str, g: Geometry) -> Result<DataSet> {
        let missing = |what: &str| Error::InvalidData(format!("{} dataset has no {}", kind, what));
        let dataset = match kind {
            "STRUCTURED_POINTS" => DataSet::StructuredPoints {
                dimensions: g.dimensions.ok_or_else(|| missing("DIMENSIONS"))?,
                origin: g.origin.unwrap_or([0.0; 3]),
                spacing: g.spacing.unwrap_or([1.0; 3]),
            },
            "STRUCTURED_GRID" => DataSet::StructuredGrid {
                dimensions: g.dimensions.ok_or_else(|| missing("DIMENSIONS"))?,
                points: g.points.ok_or_else(|| missing("POINTS"))?,
            },
            "RECTILINEAR_GRID" => DataSet::RectilinearGrid {
                dimensions: g.dimensions.ok_or_else(|| missing("DIMENSIONS"))?,
                x: g.x.ok_or_else(|| missing("X_COORDINATES"))?,
                y: g.y.ok_or_else(|| missing("Y_COORDINATES"))?,
                z: g.z.ok_or_else(|| missing("Z_COORDINATES"))?,
            },
            "POLYDATA" => DataSet::PolyData {
                points: g.points.unwrap_or_else(|| Points::new(ScalarType::Float, Vec::new())),
                vertices: g.vertices.unwrap_or_default(),
                lines: g.lines.unwrap_or_default(),
                polygons: g.polygons.unwrap_or_default(),
                strips: g.strips.unwrap_or_default(),
            },
            "UNSTRUCTURED_GRID" => {
                let cells = g.cells.unwrap_or_default();
                let cell_types = g.cell_types.unwrap_or_default();
                if cell_types.len() != cells.len() {
                    return Err(Error::InvalidData(format!(
                        "{} cells but {} cell types",
                        cells.len(),
                        cell_types.len()
                    )));
                }
                DataSet::UnstructuredGrid {
                    points: g.points.unwrap_or_else(|| Points::new(ScalarType::Float, Vec::new())),
                    cells,
                    cell_types,
                }
            }
            "FIELD" => DataSet::Field,
            other => return Err(Error::Unsupported(format!("dataset type '{}'", other))),
        };
        Ok(dataset)
    }
}

/// Split a classic `n id0 id1 ...` cell list into `count` cells
fn cells_from_counts(count: usize, flat: &[f64]) -> std::result::Result<CellArray, String> {
    let mut cells = Vec::with_capacity(count.min(flat.len()));
    let mut pos = 0;
    for _ in 0..count {
        let n = to_index(
            *flat.get(pos).ok_or("cell list ends before its declared cell count")?,
            "cell size",
        )?;
        let start = pos + 1;
        let end = n
            .checked_add(start)
            .ok_or("cell point list runs past the declared size")?;
        let ids = flat
            .get(start..end)
            .ok_or("cell point list runs past the declared size")?;
        cells.push(point_ids(ids)?);
        pos = end;
    }
    Ok(CellArray::new(cells))
}

fn cells_from_offsets(offsets: &[f64], connectivity: &[f64]) -> std::result::Result<CellArray, String> {
    let mut cells = Vec::with_capacity(offsets.len().saturating_sub(1));
    for pair in offsets.windows(2) {
        let start = to_index(pair[0], "cell offset")?;
        let end = to_index(pair[1], "cell offset")?;
        let ids = connectivity
            .get(start..end)
            .ok_or_else(|| format!("cell offsets {}..{} outside connectivity of {}", start, end, connectivity.len()))?;
        cells.push(point_ids(ids)?);
    }
    Ok(CellArray::new(cells))
}

fn point_ids(values: &[f64]) -> std::result::Result<Vec<usize>, String> {
    values.iter().map(|&id| to_index(id, "point id")).collect()
}
