//! Axis-aligned bounding boxes

use crate::{Point3d, PointTable, Vector3d};
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3d,
    pub max: Point3d,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` if there are no points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3d>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::new(first, first);
        for p in iter {
            aabb.expand(&p);
        }
        Some(aabb)
    }

    /// Grow the box to include `point`
    pub fn expand(&mut self, point: &Point3d) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Center of the box
    pub fn center(&self) -> Point3d {
        Point3d::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Edge lengths along each axis
    pub fn extent(&self) -> Vector3d {
        self.max - self.min
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f64 {
        self.extent().norm()
    }

    /// The range spanned by all coordinates of all axes taken together.
    ///
    /// Used to scale the three plot axes identically: the result is
    /// `(min(min.x, min.y, min.z), max(max.x, max.y, max.z))`.
    pub fn cube_range(&self) -> (f64, f64) {
        let lo = self.min.x.min(self.min.y).min(self.min.z);
        let hi = self.max.x.max(self.max.y).max(self.max.z);
        (lo, hi)
    }
}

/// Trait for objects with a spatial extent
pub trait Drawable {
    /// Get the bounding box of the object, if it has any points
    fn bounding_box(&self) -> Option<Aabb>;

    /// Get the center point of the object
    fn center(&self) -> Point3d {
        self.bounding_box()
            .map(|b| b.center())
            .unwrap_or_else(Point3d::origin)
    }
}

impl Drawable for PointTable {
    fn bounding_box(&self) -> Option<Aabb> {
        self.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points(vec![
            Point3d::new(1.0, -2.0, 0.0),
            Point3d::new(-1.0, 4.0, 3.0),
            Point3d::new(0.0, 0.0, -5.0),
        ])
        .unwrap();

        assert_eq!(aabb.min, Point3d::new(-1.0, -2.0, -5.0));
        assert_eq!(aabb.max, Point3d::new(1.0, 4.0, 3.0));
        assert_eq!(aabb.center(), Point3d::new(0.0, 1.0, -1.0));
        assert!(Aabb::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_cube_range_flattens_axes() {
        let aabb = Aabb::new(Point3d::new(0.0, -3.0, 1.0), Point3d::new(2.0, 1.0, 7.0));
        assert_eq!(aabb.cube_range(), (-3.0, 7.0));
    }

    #[test]
    fn test_drawable_center_of_empty_table() {
        let table = PointTable::zeros(0);
        assert_eq!(table.center(), Point3d::origin());

        let table = PointTable::from_flat(&[0.0, 0.0, 0.0, 3.0, 4.0, 0.0]).unwrap();
        assert_relative_eq!(table.bounding_box().unwrap().diagonal(), 5.0);
    }
}
