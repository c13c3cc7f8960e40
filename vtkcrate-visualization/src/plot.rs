//! Static triangle plots rendered to images
//!
//! Every triangle is filled with one color and outlined with another, seen
//! through an orthographic camera at a fixed elevation and azimuth. The three
//! axes share one scale covering every plotted coordinate, so the data sits
//! inside a cube and is never stretched. Triangles are drawn back to front.
//!
//! The same figure can be shown in a window: [`TrianglePlot::viewer`] puts
//! the normalized triangles and the axis box in a scene and starts the
//! camera from the plot's elevation and azimuth.

use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vtkcrate_core::{Aabb, Error, Point3d, PointTable, Result, Vector3d};
use vtkcrate_io::VtkFile;

use crate::camera::Camera;
use crate::interactive_viewer::InteractiveViewer;
use crate::scene::{LineVertex, SceneMesh, SceneVertex, ViewStyle};

/// Appearance and camera of a plot
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    /// Camera elevation above the xy plane, in degrees
    pub elevation: f64,
    /// Camera azimuth around the z axis, in degrees
    pub azimuth: f64,
    pub face_color: [u8; 3],
    pub edge_color: [u8; 3],
    pub axis_color: [u8; 3],
    pub background: [u8; 3],
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            elevation: 30.0,
            azimuth: -60.0,
            face_color: [0, 0, 255],
            edge_color: [0, 0, 0],
            axis_color: [200, 200, 200],
            background: [255, 255, 255],
        }
    }
}

/// Triangles ready to be plotted
#[derive(Debug, Clone)]
pub struct TrianglePlot {
    points: PointTable,
    triangles: Vec<[usize; 3]>,
}

impl TrianglePlot {
    /// Collect the triangles of a dataset.
    ///
    /// Fails with [`Error::InvalidData`] when a cell is not a three-point
    /// triangle.
    pub fn from_vtk(file: &VtkFile) -> Result<Self> {
        let mut triangles = Vec::with_capacity(file.number_of_cells());
        for (i, cell) in file.cells().iter().enumerate() {
            if !cell.is_triangle() {
                return Err(Error::InvalidData(format!(
                    "cell {} is a {} with {} points, only triangles can be plotted",
                    i,
                    cell.cell_type.name(),
                    cell.len()
                )));
            }
            triangles.push([cell.point_ids[0], cell.point_ids[1], cell.point_ids[2]]);
        }
        Self::new(file.points(), triangles)
    }

    /// Plot triangles indexing into a point table
    pub fn new(points: PointTable, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if let Some(bad) = triangles.iter().flatten().find(|&&i| i >= points.len()) {
            return Err(Error::InvalidData(format!(
                "triangle references point {} but there are {} points",
                bad,
                points.len()
            )));
        }
        Ok(Self { points, triangles })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Common range of all three axes: the extremes over every coordinate
    /// of every triangle vertex, or `(0, 1)` without triangles
    pub fn axis_range(&self) -> (f64, f64) {
        let vertices = self.triangles.iter().flatten().map(|&i| self.points.point(i));
        match Aabb::from_points(vertices) {
            Some(bounds) => bounds.cube_range(),
            None => (0.0, 1.0),
        }
    }

    /// Draw the plot
    pub fn render(&self, options: &PlotOptions) -> RgbaImage {
        let mut canvas = Canvas::new(options);
        let projection = Projection::new(self.axis_range(), options);

        for [a, b] in CUBE_EDGES {
            let p = projection.project_unit(&Point3d::from(CUBE_CORNERS[a]));
            let q = projection.project_unit(&Point3d::from(CUBE_CORNERS[b]));
            canvas.line(p, q, options.axis_color);
        }

        let mut projected: Vec<([(f64, f64); 3], f64)> = self
            .triangles
            .iter()
            .map(|tri| {
                let corners = tri.map(|i| projection.project(&self.points.point(i)));
                let depth = corners.iter().map(|c| c.2).sum::<f64>() / 3.0;
                (corners.map(|c| (c.0, c.1)), depth)
            })
            .collect();
        projected.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (corners, _) in &projected {
            canvas.fill_triangle(corners, options.face_color);
            for k in 0..3 {
                canvas.line(corners[k], corners[(k + 1) % 3], options.edge_color);
            }
        }

        debug!("rendered {} triangles", projected.len());
        canvas.image
    }

    /// The plot as a viewer scene, in the unit cube the saved image projects.
    ///
    /// Faces, triangle edges and the axis box keep the option colors.
    pub fn scene(&self, options: &PlotOptions) -> SceneMesh {
        let projection = Projection::new(self.axis_range(), options);
        let face_color = unit_color(options.face_color);
        let edge_color = unit_color(options.edge_color);
        let axis_color = unit_color(options.axis_color);
        let position = |p: Point3d| [p.x as f32, p.y as f32, p.z as f32];

        let mut scene = SceneMesh {
            bounds: Some(Aabb::new(Point3d::origin(), Point3d::new(1.0, 1.0, 1.0))),
            ..Default::default()
        };
        for tri in &self.triangles {
            let corners = tri.map(|i| projection.unit(&self.points.point(i)));
            for corner in corners {
                scene.triangles.push(SceneVertex {
                    position: position(corner),
                    normal: [0.0, 0.0, 1.0],
                    color: face_color,
                });
            }
            for k in 0..3 {
                for corner in [corners[k], corners[(k + 1) % 3]] {
                    scene.edges.push(LineVertex {
                        position: position(corner),
                        color: edge_color,
                    });
                }
            }
        }
        for edge in CUBE_EDGES {
            for corner in edge {
                scene.lines.push(LineVertex {
                    position: position(Point3d::from(CUBE_CORNERS[corner])),
                    color: axis_color,
                });
            }
        }
        scene
    }

    /// Camera looking at the unit cube from the plot's elevation and azimuth
    pub fn camera(&self, options: &PlotOptions) -> Camera {
        let mut camera = Camera::default();
        camera.set_aspect(options.width, options.height);
        camera.fit_from(
            &Aabb::new(Point3d::origin(), Point3d::new(1.0, 1.0, 1.0)),
            options.elevation,
            options.azimuth,
        );
        camera
    }

    /// Window showing the plot
    pub fn viewer(&self, options: &PlotOptions, title: impl Into<String>) -> InteractiveViewer {
        let mut style = ViewStyle::plot().with_title(title);
        style.background = unit_color(options.background);
        style.face_color = unit_color(options.face_color);
        style.edge_color = unit_color(options.edge_color);
        InteractiveViewer::with_camera(self.scene(options), style, self.camera(options))
            .with_window_size(options.width, options.height)
    }

    /// Render and save as an image; the format follows the path's extension
    pub fn save<P: AsRef<Path>>(&self, path: P, options: &PlotOptions) -> Result<()> {
        let path = path.as_ref();
        self.render(options)
            .save(path)
            .map_err(|e| Error::Visualization(format!("Failed to save {}: {}", path.display(), e)))?;
        info!("saved plot to {}", path.display());
        Ok(())
    }
}

/// Where a saved plot of `input` goes: next to it, named after the part of
/// the file name before its first dot, with a `.png` extension
pub fn plot_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    let stem = if stem.is_empty() { "plot" } else { stem };
    input.with_file_name(format!("{}.png", stem))
}

const CUBE_CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

const CUBE_EDGES: [[usize; 2]; 12] = [
    [0, 1], [1, 2], [2, 3], [3, 0],
    [4, 5], [5, 6], [6, 7], [7, 4],
    [0, 4], [1, 5], [2, 6], [3, 7],
];

/// Orthographic projection of the plot cube onto the image
struct Projection {
    lo: f64,
    span: f64,
    right: Vector3d,
    up: Vector3d,
    toward_eye: Vector3d,
    scale: f64,
    center: (f64, f64),
}

impl Projection {
    fn new(range: (f64, f64), options: &PlotOptions) -> Self {
        let (lo, hi) = range;
        let span = if hi - lo > f64::EPSILON { hi - lo } else { 1.0 };
        let az = options.azimuth.to_radians();
        let el = options.elevation.to_radians();

        let toward_eye = Vector3d::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin());
        let right = Vector3d::new(-az.sin(), az.cos(), 0.0);
        let up = toward_eye.cross(&right);

        // the unit cube projects inside a circle of radius sqrt(3)/2
        let size = options.width.min(options.height) as f64;
        Self {
            lo,
            span,
            right,
            up,
            toward_eye,
            scale: 0.9 * size / 3f64.sqrt(),
            center: (options.width as f64 / 2.0, options.height as f64 / 2.0),
        }
    }

    /// Position of a data point inside the unit cube
    fn unit(&self, p: &Point3d) -> Point3d {
        Point3d::new(
            (p.x - self.lo) / self.span,
            (p.y - self.lo) / self.span,
            (p.z - self.lo) / self.span,
        )
    }

    /// Pixel position and depth of a data point; larger depth is nearer
    fn project(&self, p: &Point3d) -> (f64, f64, f64) {
        self.project_unit3(&self.unit(p))
    }

    /// Pixel position of a point of the unit cube
    fn project_unit(&self, p: &Point3d) -> (f64, f64) {
        let (x, y, _) = self.project_unit3(p);
        (x, y)
    }

    fn project_unit3(&self, p: &Point3d) -> (f64, f64, f64) {
        let v = p - Point3d::new(0.5, 0.5, 0.5);
        let x = self.center.0 + v.dot(&self.right) * self.scale;
        let y = self.center.1 - v.dot(&self.up) * self.scale;
        (x, y, v.dot(&self.toward_eye))
    }
}

struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    fn new(options: &PlotOptions) -> Self {
        let [r, g, b] = options.background;
        Self {
            image: RgbaImage::from_pixel(options.width, options.height, Rgba([r, g, b, 255])),
        }
    }

    fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            let [r, g, b] = color;
            self.image.put_pixel(x as u32, y as u32, Rgba([r, g, b, 255]));
        }
    }

    /// Fill every pixel whose center lies inside the triangle
    fn fill_triangle(&mut self, t: &[(f64, f64); 3], color: [u8; 3]) {
        let area = edge(t[0], t[1], t[2]);
        if area.abs() < f64::EPSILON {
            return;
        }
        let min_x = t.iter().map(|p| p.0).fold(f64::INFINITY, f64::min).floor().max(0.0) as i64;
        let max_x = t.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max).ceil() as i64;
        let min_y = t.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).floor().max(0.0) as i64;
        let max_y = t.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max).ceil() as i64;
        let max_x = max_x.min(self.image.width() as i64 - 1);
        let max_y = max_y.min(self.image.height() as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                let w0 = edge(t[1], t[2], p) * area.signum();
                let w1 = edge(t[2], t[0], p) * area.signum();
                let w2 = edge(t[0], t[1], p) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: [u8; 3]) {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = from.0 + dx * t;
            let y = from.1 + dy * t;
            self.put(x.floor() as i64, y.floor() as i64, color);
        }
    }
}

fn unit_color([r, g, b]: [u8; 3]) -> [f32; 3] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
}

/// Twice the signed area of the triangle (a, b, p)
fn edge(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}
