//! Camera utilities for 3D visualization

use nalgebra::{Matrix4, Perspective3, Point3, Rotation3, Unit, Vector3};
use vtkcrate_core::{to_point3f, Aabb};

/// Closest the camera may get to its target, relative to the fitted distance
const MIN_ZOOM: f32 = 0.01;

/// An orbiting perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    home: (Point3<f32>, Point3<f32>, Vector3<f32>),
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
            home: (position, target, up),
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Combined projection and view matrix
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Place the camera so the whole box is visible and make that the reset view.
    ///
    /// The camera looks down the -z axis at the box center, with y up.
    pub fn fit(&mut self, bounds: &Aabb) {
        let center = to_point3f(&bounds.center());
        let radius = (bounds.diagonal() as f32 / 2.0).max(1e-3);
        let distance = radius / (self.fov / 2.0).sin();

        self.target = center;
        self.position = center + Vector3::new(0.0, 0.0, distance);
        self.up = Vector3::y();
        self.near = ((distance - radius) * 0.5).max(distance * 1e-3);
        self.far = distance + radius * 2.0;
        self.home = (self.position, self.target, self.up);
    }

    /// Fit the box, then look at it from `elevation` degrees above the xy
    /// plane and `azimuth` degrees around the z axis. The screen's right
    /// vector stays horizontal and the result becomes the reset view.
    pub fn fit_from(&mut self, bounds: &Aabb, elevation: f64, azimuth: f64) {
        self.fit(bounds);
        let distance = (self.position - self.target).norm();
        let el = elevation.to_radians() as f32;
        let az = azimuth.to_radians() as f32;

        let toward_eye = Vector3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin());
        let right = Vector3::new(-az.sin(), az.cos(), 0.0);
        self.position = self.target + toward_eye * distance;
        self.up = toward_eye.cross(&right);
        self.home = (self.position, self.target, self.up);
    }

    /// Return to the view set by the last `fit` or construction
    pub fn reset(&mut self) {
        let (position, target, up) = self.home;
        self.position = position;
        self.target = target;
        self.up = up;
    }

    /// Move the camera forward
    pub fn move_forward(&mut self, distance: f32) {
        let direction = (self.target - self.position).normalize();
        self.position += direction * distance;
        self.target += direction * distance;
    }

    /// Rotate the camera around the target by angles in radians
    pub fn orbit(&mut self, horizontal: f32, vertical: f32) {
        let offset = self.position - self.target;
        let yaw = Rotation3::from_axis_angle(&Unit::new_normalize(self.up), -horizontal);
        let offset = yaw * offset;

        let right = offset.cross(&self.up);
        let offset = match Unit::try_new(right, f32::EPSILON) {
            Some(axis) => {
                let pitch = Rotation3::from_axis_angle(&axis, vertical);
                self.up = pitch * self.up;
                pitch * offset
            }
            None => offset,
        };
        self.position = self.target + offset;
    }

    /// Shift camera and target in the view plane; deltas are fractions of the view height
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = self.target - self.position;
        let distance = forward.norm();
        let Some(right) = forward.cross(&self.up).try_normalize(f32::EPSILON) else {
            return;
        };
        let up = right.cross(&forward).normalize();
        let scale = distance * (self.fov / 2.0).tan() * 2.0;
        let shift = (-right * dx + up * dy) * scale;
        self.position += shift;
        self.target += shift;
    }

    /// Move toward the target by a fraction of the current distance; negative moves away
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let distance = offset.norm();
        let (home_position, home_target, _) = self.home;
        let min_distance = (home_position - home_target).norm() * MIN_ZOOM;
        let new_distance = (distance * (1.0 - amount)).max(min_distance);
        if distance > 0.0 {
            self.position = self.target + offset * (new_distance / distance);
        }
        self.far = self.far.max(new_distance * 4.0);
        self.near = self.near.min(new_distance * 0.5).max(1e-4);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            0.1,
            100.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vtkcrate_core::Point3d;

    fn unit_box() -> Aabb {
        Aabb::new(Point3d::new(-1.0, -1.0, -1.0), Point3d::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_fit_centers_on_box() {
        let mut camera = Camera::default();
        camera.fit(&unit_box());
        assert_eq!(camera.target, Point3::origin());
        assert!(camera.position.z > 3.0f32.sqrt());
        assert!(camera.near < camera.position.z - 3.0f32.sqrt());
        assert!(camera.far > camera.position.z + 3.0f32.sqrt());
    }

    #[test]
    fn test_fit_from_elevation_and_azimuth() {
        let mut camera = Camera::default();
        camera.fit(&unit_box());
        let distance = (camera.position - camera.target).norm();

        camera.fit_from(&unit_box(), 90.0, 0.0);
        assert_relative_eq!((camera.position - camera.target).norm(), distance, epsilon = 1e-4);
        assert_relative_eq!(camera.position.z, distance, epsilon = 1e-4);
        assert_relative_eq!(camera.up.norm(), 1.0, epsilon = 1e-5);

        camera.fit_from(&unit_box(), 0.0, 90.0);
        assert_relative_eq!(camera.position.y, distance, epsilon = 1e-4);
        assert_relative_eq!(camera.up.z, 1.0, epsilon = 1e-5);

        camera.orbit(0.5, 0.2);
        camera.reset();
        assert_relative_eq!(camera.position.y, distance, epsilon = 1e-4);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::default();
        let before = (camera.position - camera.target).norm();
        camera.orbit(0.7, -0.3);
        assert_relative_eq!((camera.position - camera.target).norm(), before, epsilon = 1e-4);
        assert!(camera.position.x.abs() > 0.1);
    }

    #[test]
    fn test_zoom_and_reset() {
        let mut camera = Camera::default();
        camera.fit(&unit_box());
        let home = camera.position;

        camera.zoom(0.5);
        assert!((camera.position - camera.target).norm() < (home - camera.target).norm());
        camera.zoom(10.0);
        assert!((camera.position - camera.target).norm() > 0.0);

        camera.pan(0.1, 0.1);
        assert_ne!(camera.target, Point3::origin());

        camera.reset();
        assert_eq!(camera.position, home);
        assert_eq!(camera.target, Point3::origin());
    }
}
