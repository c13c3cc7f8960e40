//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A mesh point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A 3D point with single precision coordinates, used for rendering
pub type Point3f = Point3<f32>;

/// A 3D vector with single precision components, used for rendering
pub type Vector3f = Vector3<f32>;

/// Narrow a double precision point to single precision for the GPU
pub fn to_point3f(point: &Point3d) -> Point3f {
    Point3f::new(point.x as f32, point.y as f32, point.z as f32)
}
