//! Tests for reading and writing point tables through `VtkHandler`
//!
//! These cover the parse/write round trip, preservation of everything but
//! the coordinates, and the error paths of the handler.

use crate::legacy::{read_vtk, Attribute, DataSet, Encoding, Version};
use crate::{FileHandler, VtkHandler, WriteOptions};
use approx::assert_relative_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vtkcrate_core::{Error, Point3d, PointTable, Transform3D, Transformable, Vector3d};

const TWO_TRIANGLES: &str = "# vtk DataFile Version 3.0
square made of two triangles
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 4 float
0 0 0
1 0 0
1 1 0
0 1 0
CELLS 2 8
3 0 1 2
3 0 2 3
CELL_TYPES 2
5
5
POINT_DATA 4
SCALARS temperature float 1
LOOKUP_TABLE default
10 20 30 40
VECTORS velocity double
1 0 0 0 1 0 0 0 1 1 1 1
CELL_DATA 2
SCALARS material int 1
LOOKUP_TABLE default
1 2
";

const IMAGE: &str = "# vtk DataFile Version 2.0
small image
ASCII
DATASET STRUCTURED_POINTS
DIMENSIONS 2 2 1
SPACING 1 2 1
ORIGIN 0 0 0
POINT_DATA 4
SCALARS intensity float
LOOKUP_TABLE default
0 1 2 3
";

/// Write `contents` into `name` inside `dir`
fn fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn assert_tables_close(a: &PointTable, b: &PointTable) {
    assert_eq!(a.len(), b.len());
    for (p, q) in a.iter().zip(b.iter()) {
        assert_relative_eq!(p, q, epsilon = 1e-6);
    }
}

#[test]
fn test_parse_returns_one_row_per_point() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "square.vtk", TWO_TRIANGLES);

    let mut handler = VtkHandler::new();
    let points = handler.parse(&input).unwrap();

    assert_eq!(points.as_array().shape(), &[4, 3]);
    assert_eq!(points.point(0), Point3d::new(0.0, 0.0, 0.0));
    assert_eq!(points.point(2), Point3d::new(1.0, 1.0, 0.0));
    assert_eq!(handler.infile(), Some(input.as_path()));
}

#[test]
fn test_unmodified_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "square.vtk", TWO_TRIANGLES);
    let output = dir.path().join("copy.vtk");

    let mut handler = VtkHandler::new();
    let points = handler.parse(&input).unwrap();
    handler.write(&points, &output).unwrap();
    assert_eq!(handler.outfile(), Some(output.as_path()));

    let reparsed = VtkHandler::new().parse(&output).unwrap();
    assert_tables_close(&points, &reparsed);
}

#[test]
fn test_translate_scenario_keeps_cells_and_fields() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "square.vtk", TWO_TRIANGLES);
    let output = dir.path().join("moved.vtk");

    let mut handler = VtkHandler::new();
    let original = handler.parse(&input).unwrap();
    let mut moved = original.clone();
    moved.translate(&Vector3d::new(1.0, 0.0, 0.0));
    handler.write(&moved, &output).unwrap();

    let reparsed = VtkHandler::new().parse(&output).unwrap();
    for (p, q) in original.iter().zip(reparsed.iter()) {
        assert_relative_eq!(q, p + Vector3d::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    let source = read_vtk(&input).unwrap();
    let written = read_vtk(&output).unwrap();
    assert_eq!(written.cells(), source.cells());
    assert_eq!(written.number_of_cells(), 2);
    assert_eq!(written.point_data, source.point_data);
    assert_eq!(written.cell_data, source.cell_data);
    assert_eq!(written.title, source.title);
}

#[test]
fn test_binary_and_offsets_output() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "square.vtk", TWO_TRIANGLES);
    let output = dir.path().join("binary.vtk");

    let mut handler =
        VtkHandler::with_write_options(WriteOptions::binary().with_version(Version::OFFSETS));
    let points = handler.parse(&input).unwrap();
    handler.write(&points, &output).unwrap();

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"# vtk DataFile Version 5.1\n"));

    let written = read_vtk(&output).unwrap();
    assert_eq!(written.encoding, Encoding::Binary);
    assert_eq!(written.cells(), read_vtk(&input).unwrap().cells());
    assert_tables_close(&written.points(), &points);
}

#[test]
fn test_rotation_written_back() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "square.vtk", TWO_TRIANGLES);
    let output = dir.path().join("rotated.vtk");

    let mut handler = VtkHandler::new();
    let mut points = handler.parse(&input).unwrap();
    points.transform(&Transform3D::rotation(Vector3d::z(), std::f64::consts::FRAC_PI_2));
    handler.write(&points, &output).unwrap();

    let reparsed = VtkHandler::new().parse(&output).unwrap();
    assert_relative_eq!(reparsed.point(1), Point3d::new(0.0, 1.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_row_count_mismatch_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "square.vtk", TWO_TRIANGLES);
    let output = dir.path().join("short.vtk");

    let mut handler = VtkHandler::new();
    handler.parse(&input).unwrap();
    let err = handler.write(&PointTable::zeros(3), &output).unwrap_err();

    assert!(matches!(err, Error::PointCountMismatch { expected: 4, actual: 3 }));
    assert!(!output.exists());
}

#[test]
fn test_write_checks_extension_before_input() {
    let mut handler = VtkHandler::new();
    let err = handler.write(&PointTable::zeros(4), "out.stl").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_write_without_parse_is_a_precondition_error() {
    let dir = TempDir::new().unwrap();
    let mut handler = VtkHandler::new();
    for name in ["a.vtk", "b.vtk"] {
        let err = handler.write(&PointTable::zeros(4), dir.path().join(name)).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }
}

#[test]
fn test_parse_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let mut handler = VtkHandler::new();
    let err = handler.parse(dir.path().join("missing.vtk")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_image_points_are_written_as_structured_grid() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "image.vtk", IMAGE);
    let output = dir.path().join("warped.vtk");

    let mut handler = VtkHandler::new();
    let mut points = handler.parse(&input).unwrap();
    assert_eq!(points.point(3), Point3d::new(1.0, 2.0, 0.0));

    points.set_point(3, &Point3d::new(1.5, 2.5, 0.5));
    handler.write(&points, &output).unwrap();

    let written = read_vtk(&output).unwrap();
    assert!(matches!(written.dataset, DataSet::StructuredGrid { dimensions: [2, 2, 1], .. }));
    assert_eq!(written.points().point(3), Point3d::new(1.5, 2.5, 0.5));
    assert_eq!(written.number_of_cells(), 1);
    match &written.point_data.as_ref().unwrap().attributes[0] {
        Attribute::Scalars { array, .. } => assert_eq!(array.values, vec![0.0, 1.0, 2.0, 3.0]),
        other => panic!("unexpected attribute {:?}", other),
    }
}

#[test]
fn test_source_dataset_follows_parse() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "square.vtk", TWO_TRIANGLES);

    let mut handler = VtkHandler::new();
    assert!(handler.source_dataset().is_err());
    handler.parse(&input).unwrap();
    let dataset = handler.source_dataset().unwrap();
    assert_eq!(dataset.scalar_range(), (1.0, 40.0));
    assert_eq!(handler.resolve_input(None).unwrap(), input);
    assert!(handler.read_dataset(Path::new("square.obj")).is_err());
}
