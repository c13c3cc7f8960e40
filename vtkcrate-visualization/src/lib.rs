//! Visualization for legacy VTK meshes
//!
//! This crate draws datasets read by `vtkcrate-io`:
//! - Static triangle plots, shown in a window or saved as PNG
//! - An interactive wgpu viewer colored by scalar range
//! - Camera controls and lookup tables
//!
//! [`MeshVisualization`] adds `plot` and `show` to
//! [`VtkHandler`](vtkcrate_io::VtkHandler).

pub mod camera;
pub mod interactive_viewer;
pub mod lookup_table;
pub mod mesh_visualization;
pub mod plot;
pub mod renderer;
pub mod scene;
pub mod shaders;

pub use camera::*;
pub use interactive_viewer::*;
pub use lookup_table::*;
pub use mesh_visualization::*;
pub use plot::*;
pub use renderer::*;
pub use scene::*;
