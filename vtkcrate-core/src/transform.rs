//! Affine transformations of point tables

use crate::{Point3d, PointTable, Vector3d};
use nalgebra::{Matrix4, Rotation3, Unit};
use serde::{Deserialize, Serialize};

/// A 3D affine transformation that can be applied to point tables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub matrix: Matrix4<f64>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3d) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Create a non-uniform scaling transformation about the origin
    pub fn scaling(scale: Vector3d) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Create a uniform scaling transformation about the origin
    pub fn uniform_scaling(scale: f64) -> Self {
        Self {
            matrix: Matrix4::new_scaling(scale),
        }
    }

    /// Create a rotation of `angle` radians about `axis`
    ///
    /// Returns the identity for a zero-length axis.
    pub fn rotation(axis: Vector3d, angle: f64) -> Self {
        match Unit::try_new(axis, f64::EPSILON) {
            Some(axis) => Self {
                matrix: Rotation3::from_axis_angle(&axis, angle).to_homogeneous(),
            },
            None => Self::identity(),
        }
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3d) -> Point3d {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3d::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Compose this transformation with another; `other` is applied first
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Get the inverse transformation
    pub fn inverse(self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Check if this is approximately the identity transformation
    pub fn is_identity(&self, epsilon: f64) -> bool {
        (self.matrix - Matrix4::identity()).norm() < epsilon
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<Matrix4<f64>> for Transform3D {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }
}

/// Trait for objects that can be transformed in place
pub trait Transformable {
    /// Apply a transformation to the object
    fn transform(&mut self, transform: &Transform3D);
}

impl Transformable for PointTable {
    fn transform(&mut self, transform: &Transform3D) {
        self.map_points(|p| transform.transform_point(&p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translation_then_scaling() {
        let t = Transform3D::uniform_scaling(2.0) * Transform3D::translation(Vector3d::new(1.0, 0.0, 0.0));
        let p = t.transform_point(&Point3d::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3d::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_rotation_about_z() {
        let t = Transform3D::rotation(Vector3d::z(), std::f64::consts::FRAC_PI_2);
        let p = t.transform_point(&Point3d::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3d::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        assert!(Transform3D::rotation(Vector3d::zeros(), 1.0).is_identity(1e-12));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Transform3D::scaling(Vector3d::new(2.0, 4.0, 0.5))
            * Transform3D::translation(Vector3d::new(-1.0, 3.0, 2.0));
        let identity = t * t.inverse().unwrap();
        assert!(identity.is_identity(1e-9));
    }

    #[test]
    fn test_transform_point_table() {
        let mut table = PointTable::from_flat(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
        table.transform(&Transform3D::translation(Vector3d::new(1.0, 0.0, 0.0)));
        assert_eq!(table.to_flat(), vec![1.0, 0.0, 0.0, 2.0, 1.0, 1.0]);
    }
}
