//! Cell types and connectivity
//!
//! Cell type ids follow the legacy file format numbering. Besides the type
//! table this module knows how to break any supported cell into surface
//! triangles and line segments, which is all the renderers need.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Cell types of the legacy mesh format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Empty,
    Vertex,
    PolyVertex,
    Line,
    PolyLine,
    Triangle,
    TriangleStrip,
    Polygon,
    Pixel,
    Quad,
    Tetra,
    Voxel,
    Hexahedron,
    Wedge,
    Pyramid,
    PentagonalPrism,
    HexagonalPrism,
    QuadraticEdge,
    QuadraticTriangle,
    QuadraticQuad,
    QuadraticTetra,
    QuadraticHexahedron,
    QuadraticWedge,
    QuadraticPyramid,
    BiquadraticQuad,
    TriquadraticHexahedron,
    ConvexPointSet,
    /// A type id this crate does not know; kept so it survives a rewrite
    Other(u32),
}

impl CellType {
    /// Map a file type id to a cell type
    pub fn from_id(id: u32) -> Self {
        match id {
            0 => CellType::Empty,
            1 => CellType::Vertex,
            2 => CellType::PolyVertex,
            3 => CellType::Line,
            4 => CellType::PolyLine,
            5 => CellType::Triangle,
            6 => CellType::TriangleStrip,
            7 => CellType::Polygon,
            8 => CellType::Pixel,
            9 => CellType::Quad,
            10 => CellType::Tetra,
            11 => CellType::Voxel,
            12 => CellType::Hexahedron,
            13 => CellType::Wedge,
            14 => CellType::Pyramid,
            15 => CellType::PentagonalPrism,
            16 => CellType::HexagonalPrism,
            21 => CellType::QuadraticEdge,
            22 => CellType::QuadraticTriangle,
            23 => CellType::QuadraticQuad,
            24 => CellType::QuadraticTetra,
            25 => CellType::QuadraticHexahedron,
            26 => CellType::QuadraticWedge,
            27 => CellType::QuadraticPyramid,
            28 => CellType::BiquadraticQuad,
            29 => CellType::TriquadraticHexahedron,
            41 => CellType::ConvexPointSet,
            other => CellType::Other(other),
        }
    }

    /// The file type id of this cell type
    pub fn id(&self) -> u32 {
        match self {
            CellType::Empty => 0,
            CellType::Vertex => 1,
            CellType::PolyVertex => 2,
            CellType::Line => 3,
            CellType::PolyLine => 4,
            CellType::Triangle => 5,
            CellType::TriangleStrip => 6,
            CellType::Polygon => 7,
            CellType::Pixel => 8,
            CellType::Quad => 9,
            CellType::Tetra => 10,
            CellType::Voxel => 11,
            CellType::Hexahedron => 12,
            CellType::Wedge => 13,
            CellType::Pyramid => 14,
            CellType::PentagonalPrism => 15,
            CellType::HexagonalPrism => 16,
            CellType::QuadraticEdge => 21,
            CellType::QuadraticTriangle => 22,
            CellType::QuadraticQuad => 23,
            CellType::QuadraticTetra => 24,
            CellType::QuadraticHexahedron => 25,
            CellType::QuadraticWedge => 26,
            CellType::QuadraticPyramid => 27,
            CellType::BiquadraticQuad => 28,
            CellType::TriquadraticHexahedron => 29,
            CellType::ConvexPointSet => 41,
            CellType::Other(id) => *id,
        }
    }

    /// Topological dimension, `None` for unknown types
    pub fn dimension(&self) -> Option<u8> {
        match self {
            CellType::Empty | CellType::Vertex | CellType::PolyVertex => Some(0),
            CellType::Line | CellType::PolyLine | CellType::QuadraticEdge => Some(1),
            CellType::Triangle
            | CellType::TriangleStrip
            | CellType::Polygon
            | CellType::Pixel
            | CellType::Quad
            | CellType::QuadraticTriangle
            | CellType::QuadraticQuad
            | CellType::BiquadraticQuad => Some(2),
            CellType::Tetra
            | CellType::Voxel
            | CellType::Hexahedron
            | CellType::Wedge
            | CellType::Pyramid
            | CellType::PentagonalPrism
            | CellType::HexagonalPrism
            | CellType::QuadraticTetra
            | CellType::QuadraticHexahedron
            | CellType::QuadraticWedge
            | CellType::QuadraticPyramid
            | CellType::TriquadraticHexahedron
            | CellType::ConvexPointSet => Some(3),
            CellType::Other(_) => None,
        }
    }

    /// Human readable name
    pub fn name(&self) -> String {
        match self {
            CellType::Other(id) => format!("unknown cell type {}", id),
            known => format!("{:?}", known),
        }
    }
}

/// A cell: its type and the indices of the points it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    pub point_ids: Vec<usize>,
}

// Local face tables for the 3D cells, indices into the cell's point list.
const TETRA_FACES: &[&[usize]] = &[&[0, 1, 3], &[1, 2, 3], &[2, 0, 3], &[0, 2, 1]];
const VOXEL_FACES: &[&[usize]] = &[
    &[0, 2, 6, 4],
    &[1, 5, 7, 3],
    &[0, 4, 5, 1],
    &[2, 3, 7, 6],
    &[0, 1, 3, 2],
    &[4, 6, 7, 5],
];
const HEXAHEDRON_FACES: &[&[usize]] = &[
    &[0, 4, 7, 3],
    &[1, 2, 6, 5],
    &[0, 1, 5, 4],
    &[3, 7, 6, 2],
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
];
const WEDGE_FACES: &[&[usize]] = &[
    &[0, 1, 2],
    &[3, 5, 4],
    &[0, 3, 4, 1],
    &[1, 4, 5, 2],
    &[2, 5, 3, 0],
];
const PYRAMID_FACES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[0, 1, 4],
    &[1, 2, 4],
    &[2, 3, 4],
    &[3, 0, 4],
];

impl Cell {
    /// Create a cell
    pub fn new(cell_type: CellType, point_ids: Vec<usize>) -> Self {
        Self { cell_type, point_ids }
    }

    /// Number of points the cell references
    pub fn len(&self) -> usize {
        self.point_ids.len()
    }

    /// Check if the cell references no points
    pub fn is_empty(&self) -> bool {
        self.point_ids.is_empty()
    }

    /// Check if this is a plain three-point triangle
    pub fn is_triangle(&self) -> bool {
        self.cell_type == CellType::Triangle && self.point_ids.len() == 3
    }

    /// Triangulate the boundary surface of the cell.
    ///
    /// Returned indices are mesh point ids. Cells of dimension 0 or 1 and
    /// cells with too few points yield nothing. Quadratic cells are drawn
    /// through their corner nodes.
    pub fn surface_triangles(&self) -> Vec<[usize; 3]> {
        let ids = &self.point_ids;
        let mut out = Vec::new();
        match self.cell_type {
            CellType::Triangle | CellType::QuadraticTriangle => {
                self.push_faces(&[&[0, 1, 2]], &mut out);
            }
            CellType::TriangleStrip => {
                for i in 0..ids.len().saturating_sub(2) {
                    if i % 2 == 0 {
                        out.push([ids[i], ids[i + 1], ids[i + 2]]);
                    } else {
                        out.push([ids[i + 1], ids[i], ids[i + 2]]);
                    }
                }
            }
            CellType::Polygon => fan(ids, &mut out),
            CellType::Pixel => self.push_faces(&[&[0, 1, 3, 2]], &mut out),
            CellType::Quad | CellType::QuadraticQuad | CellType::BiquadraticQuad => {
                self.push_faces(&[&[0, 1, 2, 3]], &mut out);
            }
            CellType::Tetra | CellType::QuadraticTetra => self.push_faces(TETRA_FACES, &mut out),
            CellType::Voxel => self.push_faces(VOXEL_FACES, &mut out),
            CellType::Hexahedron
            | CellType::QuadraticHexahedron
            | CellType::TriquadraticHexahedron => self.push_faces(HEXAHEDRON_FACES, &mut out),
            CellType::Wedge | CellType::QuadraticWedge => self.push_faces(WEDGE_FACES, &mut out),
            CellType::Pyramid | CellType::QuadraticPyramid => {
                self.push_faces(PYRAMID_FACES, &mut out)
            }
            CellType::PentagonalPrism => self.push_prism(5, &mut out),
            CellType::HexagonalPrism => self.push_prism(6, &mut out),
            _ => {}
        }
        out
    }

    /// Line segments of the cell for line-like cells
    pub fn line_segments(&self) -> Vec<[usize; 2]> {
        let ids = &self.point_ids;
        match self.cell_type {
            CellType::Line | CellType::PolyLine => {
                ids.windows(2).map(|w| [w[0], w[1]]).collect()
            }
            CellType::QuadraticEdge if ids.len() >= 2 => vec![[ids[0], ids[1]]],
            _ => Vec::new(),
        }
    }

    /// Boundary edges of the cell's surface polygons, without duplicates
    /// inside the cell
    pub fn outline_edges(&self) -> Vec<[usize; 2]> {
        let mut edges: Vec<[usize; 2]> = Vec::new();
        let mut seen: HashSet<[usize; 2]> = HashSet::new();
        let mut push = |a: usize, b: usize| {
            let key = if a < b { [a, b] } else { [b, a] };
            if seen.insert(key) {
                edges.push(key);
            }
        };
        match self.cell_type {
            CellType::Polygon => ring_edges(&self.point_ids, &mut push),
            CellType::TriangleStrip => {
                for tri in self.surface_triangles() {
                    ring_edges(&tri, &mut push);
                }
            }
            _ => {
                for face in self.faces() {
                    ring_edges(&face, &mut push);
                }
            }
        }
        edges
    }

    /// Polygonal faces of the cell as mesh point ids
    fn faces(&self) -> Vec<Vec<usize>> {
        let table: &[&[usize]] = match self.cell_type {
            CellType::Triangle | CellType::QuadraticTriangle => &[&[0, 1, 2]],
            CellType::Pixel => &[&[0, 1, 3, 2]],
            CellType::Quad | CellType::QuadraticQuad | CellType::BiquadraticQuad => &[&[0, 1, 2, 3]],
            CellType::Tetra | CellType::QuadraticTetra => TETRA_FACES,
            CellType::Voxel => VOXEL_FACES,
            CellType::Hexahedron
            | CellType::QuadraticHexahedron
            | CellType::TriquadraticHexahedron => HEXAHEDRON_FACES,
            CellType::Wedge | CellType::QuadraticWedge => WEDGE_FACES,
            CellType::Pyramid | CellType::QuadraticPyramid => PYRAMID_FACES,
            CellType::PentagonalPrism => return self.prism_faces(5),
            CellType::HexagonalPrism => return self.prism_faces(6),
            _ => return Vec::new(),
        };
        self.map_faces(table)
    }

    fn map_faces(&self, table: &[&[usize]]) -> Vec<Vec<usize>> {
        let needed = table
            .iter()
            .flat_map(|f| f.iter())
            .max()
            .map_or(0, |m| m + 1);
        if self.point_ids.len() < needed {
            return Vec::new();
        }
        table
            .iter()
            .map(|face| face.iter().map(|&i| self.point_ids[i]).collect())
            .collect()
    }

    fn prism_faces(&self, sides: usize) -> Vec<Vec<usize>> {
        if self.point_ids.len() < 2 * sides {
            return Vec::new();
        }
        let ids = &self.point_ids;
        let mut faces = Vec::with_capacity(sides + 2);
        faces.push((0..sides).rev().map(|i| ids[i]).collect());
        faces.push((sides..2 * sides).map(|i| ids[i]).collect());
        for i in 0..sides {
            let j = (i + 1) % sides;
            faces.push(vec![ids[i], ids[j], ids[j + sides], ids[i + sides]]);
        }
        faces
    }

    fn push_faces(&self, table: &[&[usize]], out: &mut Vec<[usize; 3]>) {
        for face in self.map_faces(table) {
            fan(&face, out);
        }
    }

    fn push_prism(&self, sides: usize, out: &mut Vec<[usize; 3]>) {
        for face in self.prism_faces(sides) {
            fan(&face, out);
        }
    }
}

/// Fan-triangulate a convex polygon
fn fan(polygon: &[usize], out: &mut Vec<[usize; 3]>) {
    if polygon.len() < 3 {
        return;
    }
    for i in 1..polygon.len() - 1 {
        out.push([polygon[0], polygon[i], polygon[i + 1]]);
    }
}

fn ring_edges<F: FnMut(usize, usize)>(ring: &[usize], push: &mut F) {
    if ring.len() < 2 {
        return;
    }
    for i in 0..ring.len() {
        push(ring[i], ring[(i + 1) % ring.len()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ids_round_trip() {
        for id in (0..=16).chain(21..=29).chain([41, 77]) {
            assert_eq!(CellType::from_id(id).id(), id);
        }
        assert_eq!(CellType::from_id(5), CellType::Triangle);
        assert_eq!(CellType::from_id(77), CellType::Other(77));
        assert_eq!(CellType::Other(77).dimension(), None);
        assert_eq!(CellType::Hexahedron.dimension(), Some(3));
    }

    #[test]
    fn test_triangle_and_quad() {
        let tri = Cell::new(CellType::Triangle, vec![4, 5, 6]);
        assert!(tri.is_triangle());
        assert_eq!(tri.surface_triangles(), vec![[4, 5, 6]]);

        let quad = Cell::new(CellType::Quad, vec![0, 1, 2, 3]);
        assert!(!quad.is_triangle());
        assert_eq!(quad.surface_triangles(), vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_pixel_uses_swapped_corners() {
        let pixel = Cell::new(CellType::Pixel, vec![10, 11, 12, 13]);
        assert_eq!(pixel.surface_triangles(), vec![[10, 11, 13], [10, 13, 12]]);
    }

    #[test]
    fn test_triangle_strip_keeps_orientation() {
        let strip = Cell::new(CellType::TriangleStrip, vec![0, 1, 2, 3, 4]);
        assert_eq!(
            strip.surface_triangles(),
            vec![[0, 1, 2], [2, 1, 3], [2, 3, 4]]
        );
    }

    #[test]
    fn test_volume_cells_produce_closed_surfaces() {
        let tet = Cell::new(CellType::Tetra, vec![0, 1, 2, 3]);
        assert_eq!(tet.surface_triangles().len(), 4);

        let hex = Cell::new(CellType::Hexahedron, (0..8).collect());
        assert_eq!(hex.surface_triangles().len(), 12);
        assert_eq!(hex.outline_edges().len(), 12);

        let wedge = Cell::new(CellType::Wedge, (0..6).collect());
        assert_eq!(wedge.surface_triangles().len(), 8);

        let pyramid = Cell::new(CellType::Pyramid, (0..5).collect());
        assert_eq!(pyramid.surface_triangles().len(), 6);

        let prism = Cell::new(CellType::HexagonalPrism, (0..12).collect());
        assert_eq!(prism.surface_triangles().len(), 4 + 4 + 12);
    }

    #[test]
    fn test_short_cells_are_skipped() {
        let broken = Cell::new(CellType::Hexahedron, vec![0, 1, 2]);
        assert!(broken.surface_triangles().is_empty());

        let vertex = Cell::new(CellType::Vertex, vec![0]);
        assert!(vertex.surface_triangles().is_empty());
        assert!(vertex.line_segments().is_empty());
    }

    #[test]
    fn test_large_polygon_outline() {
        let n = 20_000;
        let polygon = Cell::new(CellType::Polygon, (0..n).collect());
        let edges = polygon.outline_edges();
        assert_eq!(edges.len(), n);
        assert_eq!(edges[0], [0, 1]);
        assert_eq!(edges[n - 1], [0, n - 1]);

        let strip = Cell::new(CellType::TriangleStrip, (0..n).collect());
        assert_eq!(strip.outline_edges().len(), 2 * n - 3);
    }

    #[test]
    fn test_poly_line_segments() {
        let line = Cell::new(CellType::PolyLine, vec![3, 4, 5]);
        assert_eq!(line.line_segments(), vec![[3, 4], [4, 5]]);
    }
}
