use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use vtkcrate_core::{Drawable, Transform3D, Transformable, Vector3d};
use vtkcrate_io::legacy::{Encoding, Version};
use vtkcrate_io::{FileHandler, VtkHandler, WriteOptions};
use vtkcrate_visualization::MeshVisualization;

/// Output encoding for rewritten files
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum OutputEncoding {
    /// Same encoding as the input file
    Keep,
    Ascii,
    Binary,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn vector(self) -> Vector3d {
        match self {
            Axis::X => Vector3d::x(),
            Axis::Y => Vector3d::y(),
            Axis::Z => Vector3d::z(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "vtkcrate", version, about = "Inspect, edit and display legacy VTK meshes")]
struct Cli {
    /// Encoding of written files
    #[arg(long, global = true, value_enum, default_value_t = OutputEncoding::Keep, env = "VTKCRATE_ENCODING")]
    encoding: OutputEncoding,

    /// Write files as version 5.1 with OFFSETS/CONNECTIVITY cell arrays
    #[arg(long, global = true, default_value_t = false)]
    offsets: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a file
    Info {
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the point table, one `x y z` row per point
    Points { file: PathBuf },
    /// Move every point by an offset
    Translate {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        dx: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        dy: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        dz: f64,
    },
    /// Scale and then rotate every point about the origin
    Transform {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        #[arg(long, value_enum, default_value_t = Axis::Z)]
        axis: Axis,
        /// Rotation about `--axis`, in degrees
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        degrees: f64,
    },
    /// Plot the triangles of a file
    Plot {
        file: PathBuf,
        /// Save `<name>.png` next to the file instead of opening a window
        #[arg(long, default_value_t = false)]
        save: bool,
    },
    /// Open the interactive viewer
    Show { file: PathBuf },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut handler = VtkHandler::with_write_options(write_options(cli.encoding, cli.offsets));

    match cli.command {
        Command::Info { file, json } => info_command(&handler, &file, json),
        Command::Points { file } => {
            let points = handler.parse(&file)?;
            for p in points.iter() {
                println!("{} {} {}", p.x, p.y, p.z);
            }
            Ok(())
        }
        Command::Translate { input, output, dx, dy, dz } => {
            let mut points = handler.parse(&input)?;
            points.translate(&Vector3d::new(dx, dy, dz));
            write_points(&mut handler, &points, &output)
        }
        Command::Transform { input, output, scale, axis, degrees } => {
            if scale == 0.0 {
                bail!("scale must be non-zero");
            }
            let transform = Transform3D::rotation(axis.vector(), degrees.to_radians())
                * Transform3D::uniform_scaling(scale);
            let mut points = handler.parse(&input)?;
            points.transform(&transform);
            write_points(&mut handler, &points, &output)
        }
        Command::Plot { file, save } => {
            handler.parse(&file)?;
            if let Some(saved) = handler.plot(None, save)? {
                println!("{}", saved.display());
            }
            Ok(())
        }
        Command::Show { file } => {
            handler.parse(&file)?;
            handler.show(None)?;
            Ok(())
        }
    }
}

fn write_options(encoding: OutputEncoding, offsets: bool) -> WriteOptions {
    let options = match encoding {
        OutputEncoding::Keep => WriteOptions::default(),
        OutputEncoding::Ascii => WriteOptions::ascii(),
        OutputEncoding::Binary => WriteOptions::binary(),
    };
    if offsets {
        options.with_version(Version::OFFSETS)
    } else {
        options
    }
}

fn write_points(handler: &mut VtkHandler, points: &vtkcrate_core::PointTable, output: &Path) -> Result<()> {
    handler
        .write(points, output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        "{} -> {}",
        handler.infile().map(|p| p.display().to_string()).unwrap_or_default(),
        output.display()
    );
    Ok(())
}

fn info_command(handler: &VtkHandler, file: &Path, as_json: bool) -> Result<()> {
    let data = handler
        .read_dataset(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let points = data.points();
    let bounds = points.bounding_box();
    let encoding = match data.encoding {
        Encoding::Ascii => "ASCII",
        Encoding::Binary => "BINARY",
    };

    if as_json {
        let summary = json!({
            "file": file.display().to_string(),
            "title": data.title,
            "version": data.version.to_string(),
            "encoding": encoding,
            "dataset": data.dataset.keyword(),
            "points": data.number_of_points(),
            "cells": data.number_of_cells(),
            "attributes": data.attribute_names(),
            "scalar_range": [data.scalar_range().0, data.scalar_range().1],
            "bounds": bounds.map(|b| json!({
                "min": [b.min.x, b.min.y, b.min.z],
                "max": [b.max.x, b.max.y, b.max.z],
            })),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("file:       {}", file.display());
    println!("title:      {}", data.title);
    println!("version:    {}", data.version);
    println!("encoding:   {}", encoding);
    println!("dataset:    {}", data.dataset.keyword());
    println!("points:     {}", data.number_of_points());
    println!("cells:      {}", data.number_of_cells());
    let (lo, hi) = data.scalar_range();
    println!("scalars:    [{}, {}]", lo, hi);
    if let Some(b) = bounds {
        println!(
            "bounds:     ({}, {}, {}) - ({}, {}, {})",
            b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
        );
    }
    for name in data.attribute_names() {
        println!("attribute:  {}", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_options_from_flags() {
        assert_eq!(write_options(OutputEncoding::Keep, false), WriteOptions::default());
        assert_eq!(
            write_options(OutputEncoding::Binary, true),
            WriteOptions::binary().with_version(Version::OFFSETS)
        );
    }

    #[test]
    fn test_parse_translate() {
        let cli = Cli::try_parse_from([
            "vtkcrate", "translate", "in.vtk", "out.vtk", "--dx", "-1.5", "--encoding", "ascii",
        ])
        .unwrap();
        assert_eq!(cli.encoding, OutputEncoding::Ascii);
        match cli.command {
            Command::Translate { dx, dy, .. } => {
                assert_eq!(dx, -1.5);
                assert_eq!(dy, 0.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_plot_save() {
        let cli = Cli::try_parse_from(["vtkcrate", "plot", "mesh.vtk", "--save"]).unwrap();
        assert!(matches!(cli.command, Command::Plot { save: true, .. }));
    }
}
