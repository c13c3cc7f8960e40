//! The N x 3 coordinate table exchanged with callers
//!
//! Row `i` of a [`PointTable`] is point `i` of the mesh it was read from.
//! Tables are produced fresh by every parse and consumed by every write;
//! they carry no reference back to the mesh.

use crate::{Aabb, Error, Point3d, Result, Vector3d};
use ndarray::{Array2, ArrayView2, Axis};

/// An ordered table of 3D point coordinates, one point per row
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    data: Array2<f64>,
}

impl PointTable {
    /// Wrap an existing array, which must have exactly 3 columns
    pub fn new(data: Array2<f64>) -> Result<Self> {
        if data.ncols() != 3 {
            return Err(Error::InvalidArgument(format!(
                "point table must have 3 columns, got {}",
                data.ncols()
            )));
        }
        Ok(Self { data })
    }

    /// Create a table of `n` points at the origin
    pub fn zeros(n: usize) -> Self {
        Self { data: Array2::zeros((n, 3)) }
    }

    /// Create a table from a list of points
    pub fn from_points(points: &[Point3d]) -> Self {
        let mut table = Self::zeros(points.len());
        for (i, p) in points.iter().enumerate() {
            table.set_point(i, p);
        }
        table
    }

    /// Create a table from interleaved `x y z` coordinates
    pub fn from_flat(coords: &[f64]) -> Result<Self> {
        if coords.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "coordinate count {} is not a multiple of 3",
                coords.len()
            )));
        }
        let data = Array2::from_shape_vec((coords.len() / 3, 3), coords.to_vec())
            .map_err(|e| Error::InvalidData(e.to_string()))?;
        Ok(Self { data })
    }

    /// Number of points (rows)
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Get point `i`
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn point(&self, i: usize) -> Point3d {
        let row = self.data.row(i);
        Point3d::new(row[0], row[1], row[2])
    }

    /// Overwrite point `i`
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn set_point(&mut self, i: usize, point: &Point3d) {
        let mut row = self.data.row_mut(i);
        row[0] = point.x;
        row[1] = point.y;
        row[2] = point.z;
    }

    /// Iterate over the points in row order
    pub fn iter(&self) -> impl Iterator<Item = Point3d> + '_ {
        self.data
            .axis_iter(Axis(0))
            .map(|row| Point3d::new(row[0], row[1], row[2]))
    }

    /// Translate every row by `offset`
    pub fn translate(&mut self, offset: &Vector3d) {
        for mut row in self.data.axis_iter_mut(Axis(0)) {
            row[0] += offset.x;
            row[1] += offset.y;
            row[2] += offset.z;
        }
    }

    /// Replace every point with `f(point)`
    pub fn map_points<F>(&mut self, mut f: F)
    where
        F: FnMut(Point3d) -> Point3d,
    {
        for mut row in self.data.axis_iter_mut(Axis(0)) {
            let p = f(Point3d::new(row[0], row[1], row[2]));
            row[0] = p.x;
            row[1] = p.y;
            row[2] = p.z;
        }
    }

    /// Borrow the underlying array
    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Consume the table and return the underlying array
    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Interleaved `x y z` coordinates in row order
    pub fn to_flat(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// Axis-aligned bounding box, `None` for an empty table
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.iter())
    }

    /// Compare two tables element-wise within `epsilon`
    pub fn approx_eq(&self, other: &PointTable, epsilon: f64) -> bool {
        self.data.shape() == other.data.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl From<PointTable> for Array2<f64> {
    fn from(table: PointTable) -> Self {
        table.data
    }
}

impl TryFrom<Array2<f64>> for PointTable {
    type Error = Error;

    fn try_from(data: Array2<f64>) -> Result<Self> {
        Self::new(data)
    }
}
