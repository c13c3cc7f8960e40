//! Renderable geometry extracted from a dataset
//!
//! Every cell is turned into flat-shaded triangles (surfaces and volume
//! boundaries) or line segments (line cells). Vertices are not shared
//! between faces so each face can carry its own normal and color.

use bytemuck::{Pod, Zeroable};
use tracing::{debug, warn};
use vtkcrate_core::{to_point3f, Aabb, Point3f, Vector3f};
use vtkcrate_io::legacy::{Association, VtkFile};

use crate::lookup_table::LookupTable;

/// Vertex of a shaded triangle
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl SceneVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Vertex of an unlit line
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// How faces are colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMode {
    /// Every face uses the style's face color
    Solid,
    /// Faces are colored from the active scalars through a lookup table,
    /// falling back to the face color when there are none
    Scalars,
}

/// Appearance of a rendered dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStyle {
    pub background: [f32; 3],
    pub face_color: [f32; 3],
    pub edge_color: [f32; 3],
    pub color_mode: ColorMode,
    pub show_edges: bool,
    pub lighting: bool,
    pub title: String,
}

impl ViewStyle {
    /// Dark background, scalar coloring
    pub fn interactive() -> Self {
        Self {
            background: [20.0 / 255.0; 3],
            face_color: [1.0, 1.0, 1.0],
            edge_color: [0.0, 0.0, 0.0],
            color_mode: ColorMode::Scalars,
            show_edges: false,
            lighting: true,
            title: "vtkcrate".to_string(),
        }
    }

    /// White background, blue faces with black edges
    pub fn plot() -> Self {
        Self {
            background: [1.0, 1.0, 1.0],
            face_color: [0.0, 0.0, 1.0],
            edge_color: [0.0, 0.0, 0.0],
            color_mode: ColorMode::Solid,
            show_edges: true,
            lighting: false,
            title: "vtkcrate plot".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Triangles and lines ready for upload
#[derive(Debug, Clone, Default)]
pub struct SceneMesh {
    pub triangles: Vec<SceneVertex>,
    /// Line cells, drawn in their own colors
    pub lines: Vec<LineVertex>,
    /// Cell outlines, drawn only when edges are shown
    pub edges: Vec<LineVertex>,
    pub bounds: Option<Aabb>,
}

impl SceneMesh {
    /// Extract renderable geometry from a dataset
    pub fn from_vtk(file: &VtkFile, style: &ViewStyle) -> Self {
        let table = file.points();
        let points: Vec<Point3f> = table.iter().map(|p| to_point3f(&p)).collect();
        let colors = VertexColors::new(file, style);

        let mut scene = SceneMesh {
            bounds: table.bounds(),
            ..Default::default()
        };
        let mut skipped = 0usize;
        let in_range = |ids: &[usize]| ids.iter().all(|&i| i < points.len());

        for (cell_id, cell) in file.cells().iter().enumerate() {
            for tri in cell.surface_triangles() {
                if !in_range(&tri) {
                    skipped += 1;
                    continue;
                }
                let [a, b, c] = tri.map(|i| points[i]);
                let normal = face_normal(&a, &b, &c);
                for &i in &tri {
                    let p = points[i];
                    scene.triangles.push(SceneVertex {
                        position: [p.x, p.y, p.z],
                        normal,
                        color: colors.color(cell_id, i),
                    });
                }
            }

            for segment in cell.line_segments() {
                if !in_range(&segment) {
                    skipped += 1;
                    continue;
                }
                for &i in &segment {
                    let p = points[i];
                    scene.lines.push(LineVertex {
                        position: [p.x, p.y, p.z],
                        color: colors.color(cell_id, i),
                    });
                }
            }

            for edge in cell.outline_edges() {
                if !in_range(&edge) {
                    continue;
                }
                for &i in &edge {
                    let p = points[i];
                    scene.edges.push(LineVertex {
                        position: [p.x, p.y, p.z],
                        color: style.edge_color,
                    });
                }
            }
        }

        if skipped > 0 {
            warn!("skipped {} primitives referencing missing points", skipped);
        }
        debug!(
            "scene has {} triangles, {} line segments and {} edges",
            scene.triangle_count(),
            scene.lines.len() / 2,
            scene.edges.len() / 2
        );
        scene
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.lines.is_empty()
    }
}

/// Source of per-vertex colors for one dataset
enum VertexColors<'a> {
    Solid([f32; 3]),
    PointScalars(&'a [f64], usize, LookupTable),
    CellScalars(&'a [f64], usize, LookupTable),
}

impl<'a> VertexColors<'a> {
    fn new(file: &'a VtkFile, style: &ViewStyle) -> Self {
        if style.color_mode == ColorMode::Solid {
            return VertexColors::Solid(style.face_color);
        }
        match file.active_scalars() {
            Some(field) if field.array.num_components > 0 => {
                let lut = LookupTable::rainbow().with_range(file.scalar_range());
                let stride = field.array.num_components;
                match field.association {
                    Association::Point => VertexColors::PointScalars(&field.array.values, stride, lut),
                    Association::Cell => VertexColors::CellScalars(&field.array.values, stride, lut),
                }
            }
            _ => VertexColors::Solid(style.face_color),
        }
    }

    fn color(&self, cell_id: usize, point_id: usize) -> [f32; 3] {
        match self {
            VertexColors::Solid(color) => *color,
            VertexColors::PointScalars(values, stride, lut) => lut.map(scalar(values, *stride, point_id)),
            VertexColors::CellScalars(values, stride, lut) => lut.map(scalar(values, *stride, cell_id)),
        }
    }
}

fn scalar(values: &[f64], stride: usize, tuple: usize) -> f64 {
    values.get(tuple * stride).copied().unwrap_or(f64::NAN)
}

fn face_normal(a: &Point3f, b: &Point3f, c: &Point3f) -> [f32; 3] {
    let n: Vector3f = (b - a).cross(&(c - a));
    let len = n.norm();
    if len > f32::EPSILON {
        let n = n / len;
        [n.x, n.y, n.z]
    } else {
        [0.0, 0.0, 1.0]
    }
}
