//! Plotting and viewing for handled mesh files

use std::path::{Path, PathBuf};
use tracing::info;
use vtkcrate_core::Result;
use vtkcrate_io::{read_vtk, VtkHandler};

use crate::interactive_viewer::InteractiveViewer;
use crate::plot::{plot_output_path, PlotOptions, TrianglePlot};
use crate::scene::ViewStyle;

/// Visual output for a file handler.
///
/// Both operations display `path` when given, otherwise the file the handler
/// last parsed.
pub trait MeshVisualization {
    /// Draw the triangles of the file with blue faces and black edges.
    ///
    /// With `save_fig` the plot goes to a `.png` next to the file (see
    /// [`plot_output_path`]) and its path is returned; otherwise a window
    /// shows it until closed and `None` is returned. Every cell must be a
    /// triangle.
    fn plot(&self, path: Option<&Path>, save_fig: bool) -> Result<Option<PathBuf>>;

    /// Open an interactive window on the file, colored by its scalar range
    /// against a dark background. Blocks until the window is closed.
    fn show(&self, path: Option<&Path>) -> Result<()>;
}

impl MeshVisualization for VtkHandler {
    fn plot(&self, path: Option<&Path>, save_fig: bool) -> Result<Option<PathBuf>> {
        let input = self.resolve_input(path)?;
        plot_file(&input, save_fig)
    }

    fn show(&self, path: Option<&Path>) -> Result<()> {
        let input = self.resolve_input(path)?;
        show_file(&input)
    }
}

/// Plot a `.vtk` file, saving it or opening a window
pub fn plot_file(input: &Path, save_fig: bool) -> Result<Option<PathBuf>> {
    let file = read_vtk(input)?;
    let plot = TrianglePlot::from_vtk(&file)?;

    if save_fig {
        let output = plot_output_path(input);
        plot.save(&output, &PlotOptions::default())?;
        Ok(Some(output))
    } else {
        info!("plotting {} triangles from {}", plot.triangle_count(), input.display());
        plot.viewer(&PlotOptions::default(), title_for(input)).run()?;
        Ok(None)
    }
}

/// Show a `.vtk` file in the interactive viewer
pub fn show_file(input: &Path) -> Result<()> {
    let file = read_vtk(input)?;
    info!(
        "showing {} points and {} cells from {}, scalar range {:?}",
        file.number_of_points(),
        file.number_of_cells(),
        input.display(),
        file.scalar_range()
    );
    let style = ViewStyle::interactive().with_title(title_for(input));
    InteractiveViewer::from_vtk(&file, style).run()
}

fn title_for(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vtkcrate".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use vtkcrate_core::Error;

    const TRIANGLE: &str = "# vtk DataFile Version 3.0
triangle
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 3 float
0 0 0 1 0 0 0 1 0
CELLS 1 4
3 0 1 2
CELL_TYPES 1
5
";

    #[test]
    fn test_plot_saves_png_next_to_infile() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("wing.vtk");
        fs::write(&input, TRIANGLE).unwrap();

        let mut handler = VtkHandler::new();
        handler.parse(&input).unwrap();
        let saved = handler.plot(None, true).unwrap().unwrap();

        assert_eq!(saved, dir.path().join("wing.png"));
        let image = image::open(&saved).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (640, 480));
    }

    #[test]
    fn test_plot_explicit_path() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("other.vtk");
        fs::write(&input, TRIANGLE).unwrap();

        let handler = VtkHandler::new();
        let saved = handler.plot(Some(&input), true).unwrap().unwrap();
        assert!(saved.exists());
    }

    #[test]
    fn test_plot_and_show_need_an_input() {
        let handler = VtkHandler::new();
        assert!(matches!(handler.plot(None, true), Err(Error::MissingInput(_))));
        assert!(matches!(handler.show(None), Err(Error::MissingInput(_))));
    }

    #[test]
    fn test_show_checks_extension_before_opening_window() {
        let handler = VtkHandler::new();
        let result = handler.show(Some(Path::new("mesh.stl")));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
