//! Interactive 3D viewer
//!
//! Opens a window showing one dataset and blocks until it is closed.
//!
//! Controls: left drag orbits, right or middle drag pans, the wheel zooms,
//! `r` resets the camera, `w` toggles cell edges, `q` or Escape closes the
//! window.

use std::sync::Arc;
use tracing::{debug, error, info};
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use vtkcrate_core::{Error, Result};
use vtkcrate_io::VtkFile;

use crate::camera::Camera;
use crate::renderer::MeshRenderer;
use crate::scene::{SceneMesh, ViewStyle};

/// Radians of orbit per pixel of mouse movement
const ORBIT_SPEED: f32 = 0.01;

/// Camera control modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    Idle,
    Orbit,
    Pan,
}

/// Window showing one scene
pub struct InteractiveViewer {
    scene: SceneMesh,
    style: ViewStyle,
    camera: Camera,
    camera_mode: CameraMode,
    last_mouse_pos: Option<PhysicalPosition<f64>>,
    window_size: (u32, u32),
}

impl InteractiveViewer {
    /// Create a viewer for an extracted scene
    pub fn new(scene: SceneMesh, style: ViewStyle) -> Self {
        let mut camera = Camera::default();
        if let Some(bounds) = &scene.bounds {
            camera.fit(bounds);
        }
        Self::with_camera(scene, style, camera)
    }

    /// Create a viewer that starts from an already placed camera
    pub fn with_camera(scene: SceneMesh, style: ViewStyle, camera: Camera) -> Self {
        Self {
            scene,
            style,
            camera,
            camera_mode: CameraMode::Idle,
            last_mouse_pos: None,
            window_size: (1024, 768),
        }
    }

    /// Initial window size in logical pixels
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    /// Create a viewer for a dataset
    pub fn from_vtk(file: &VtkFile, style: ViewStyle) -> Self {
        let scene = SceneMesh::from_vtk(file, &style);
        Self::new(scene, style)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Run the viewer until the window is closed
    pub fn run(mut self) -> Result<()> {
        info!("opening viewer '{}'", self.style.title);

        let event_loop = EventLoop::new()
            .map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(self.style.title.clone())
                .with_inner_size(LogicalSize::new(self.window_size.0, self.window_size.1))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let mut renderer = pollster::block_on(MeshRenderer::new(window.clone(), &self.style))?;
        renderer.upload(&self.scene);

        let size = window.inner_size();
        self.camera.set_aspect(size.width, size.height);
        self.window_size = (size.width, size.height);

        let mut failure: Option<Error> = None;

        event_loop
            .run(|event, target| {
                target.set_control_flow(ControlFlow::Wait);

                let Event::WindowEvent { event, .. } = event else {
                    return;
                };
                match event {
                    WindowEvent::CloseRequested => target.exit(),
                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        self.camera.set_aspect(new_size.width, new_size.height);
                        self.window_size = (new_size.width, new_size.height);
                        window.request_redraw();
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        self.camera_mode = match (state, button) {
                            (ElementState::Pressed, MouseButton::Left) => CameraMode::Orbit,
                            (ElementState::Pressed, MouseButton::Right | MouseButton::Middle) => {
                                CameraMode::Pan
                            }
                            _ => CameraMode::Idle,
                        };
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if let Some(last_pos) = self.last_mouse_pos {
                            let dx = (position.x - last_pos.x) as f32;
                            let dy = (position.y - last_pos.y) as f32;
                            if self.handle_drag(dx, dy) {
                                window.request_redraw();
                            }
                        }
                        self.last_mouse_pos = Some(position);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                        };
                        self.camera.zoom(scroll * 0.1);
                        window.request_redraw();
                    }
                    WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                        match &event.logical_key {
                            Key::Named(NamedKey::Escape) => target.exit(),
                            Key::Character(c) => match c.as_str() {
                                "q" | "Q" => target.exit(),
                                "r" | "R" => {
                                    self.camera.reset();
                                    debug!("camera reset");
                                    window.request_redraw();
                                }
                                "w" | "W" => {
                                    renderer.show_edges = !renderer.show_edges;
                                    debug!("edges {}", if renderer.show_edges { "on" } else { "off" });
                                    window.request_redraw();
                                }
                                _ => {}
                            },
                            _ => {}
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        renderer.update_camera(&self.camera);
                        if let Err(e) = renderer.render() {
                            error!("render error: {}", e);
                            failure = Some(e);
                            target.exit();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))?;

        info!("viewer closed");
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Apply a mouse drag in pixels; returns whether the view changed
    fn handle_drag(&mut self, dx: f32, dy: f32) -> bool {
        match self.camera_mode {
            CameraMode::Idle => false,
            CameraMode::Orbit => {
                self.camera.orbit(dx * ORBIT_SPEED, dy * ORBIT_SPEED);
                true
            }
            CameraMode::Pan => {
                let height = self.window_size.1.max(1) as f32;
                self.camera.pan(dx / height, dy / height);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtkcrate_core::Point3d;

    fn triangle_scene() -> SceneMesh {
        SceneMesh {
            bounds: Some(vtkcrate_core::Aabb::new(
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(2.0, 2.0, 0.0),
            )),
            ..Default::default()
        }
    }

    #[test]
    fn test_camera_fitted_to_scene() {
        let viewer = InteractiveViewer::new(triangle_scene(), ViewStyle::interactive());
        assert_eq!(viewer.camera().target, nalgebra::Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_placed_camera_is_kept() {
        let mut camera = Camera::default();
        camera.fit_from(
            &vtkcrate_core::Aabb::new(Point3d::origin(), Point3d::new(1.0, 1.0, 1.0)),
            30.0,
            -60.0,
        );
        let viewer = InteractiveViewer::with_camera(triangle_scene(), ViewStyle::plot(), camera.clone())
            .with_window_size(640, 480);
        assert_eq!(viewer.camera().position, camera.position);
        assert_eq!(viewer.camera().up, camera.up);
        assert_eq!(viewer.window_size, (640, 480));
    }

    #[test]
    fn test_drag_depends_on_mode() {
        let mut viewer = InteractiveViewer::new(triangle_scene(), ViewStyle::interactive());
        let start = viewer.camera().position;
        assert!(!viewer.handle_drag(10.0, 0.0));
        assert_eq!(viewer.camera().position, start);

        viewer.camera_mode = CameraMode::Orbit;
        assert!(viewer.handle_drag(10.0, 0.0));
        assert_ne!(viewer.camera().position, start);
    }
}
