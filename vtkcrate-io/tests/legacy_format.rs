//! Integration tests for the legacy format reader and writer

use std::fs;
use tempfile::TempDir;
use vtkcrate_core::{CellType, Point3d};
use vtkcrate_io::legacy::{
    read_vtk, read_vtk_from_bytes, write_vtk_to_bytes, Attribute, Encoding, Version,
};
use vtkcrate_io::{read_points, DataSetReader, DataSetWriter, LegacyReader, LegacyWriter, WriteOptions};

const MIXED_POLYDATA: &str = "# vtk DataFile Version 3.0
mixed poly data
ASCII
DATASET POLYDATA
FIELD FieldData 1
TIME 1 1 double
2.5
POINTS 6 float
0 0 0 1 0 0 2 0 0
0 1 0 1 1 0 2 1 0
VERTICES 1 2
1 5
LINES 1 3
2 0 2
TRIANGLE_STRIPS 1 5
4 0 3 1 4
POINT_DATA 6
NORMALS normals float
0 0 1 0 0 1 0 0 1 0 0 1 0 0 1 0 0 1
TEXTURE_COORDINATES uv 2 float
0 0 0.5 0 1 0 0 1 0.5 1 1 1
LOOKUP_TABLE my_table 2
0 0 0 1
1 1 1 1
CELL_DATA 3
COLOR_SCALARS colors 3
1 0 0
0 1 0
0 0 1
GLOBAL_IDS ids int
7 8 9
";

const RECTILINEAR: &str = "# vtk DataFile Version 3.0
rectilinear
ASCII
DATASET RECTILINEAR_GRID
DIMENSIONS 3 2 1
X_COORDINATES 3 float
0 1 3
Y_COORDINATES 2 float
0 2
Z_COORDINATES 1 float
5
CELL_DATA 2
TENSORS stress double
1 0 0 0 1 0 0 0 1
2 0 0 0 2 0 0 0 2
";

#[test]
fn mixed_poly_data_reads_every_section() {
    let file = read_vtk_from_bytes(MIXED_POLYDATA.as_bytes()).unwrap();

    assert_eq!(file.number_of_points(), 6);
    let types: Vec<CellType> = file.cells().iter().map(|c| c.cell_type).collect();
    assert_eq!(types, vec![CellType::Vertex, CellType::Line, CellType::TriangleStrip]);

    let field = file.field_data.as_ref().unwrap();
    assert_eq!(field.arrays[0].name, "TIME");
    assert_eq!(field.arrays[0].values, vec![2.5]);

    let names = file.attribute_names();
    assert_eq!(
        names,
        vec![
            "point:NORMALS:normals",
            "point:TEXTURE_COORDINATES:uv",
            "point:LOOKUP_TABLE:my_table",
            "cell:COLOR_SCALARS:colors",
            "cell:GLOBAL_IDS:ids",
        ]
    );
    // colour scalars are not scalars for range purposes
    assert_eq!(file.scalar_range(), (0.0, 1.0));
}

#[test]
fn mixed_poly_data_survives_binary_rewrite() {
    let file = read_vtk_from_bytes(MIXED_POLYDATA.as_bytes()).unwrap();

    for options in [WriteOptions::binary(), WriteOptions::binary().with_version(Version::OFFSETS)] {
        let bytes = write_vtk_to_bytes(&file, &options).unwrap();
        let back = read_vtk_from_bytes(&bytes).unwrap();
        assert_eq!(back.encoding, Encoding::Binary);
        assert_eq!(back.dataset, file.dataset);
        assert_eq!(back.field_data, file.field_data);
        assert_eq!(back.point_data, file.point_data);
        assert_eq!(back.cell_data, file.cell_data);
    }
}

#[test]
fn rectilinear_grid_generates_points() {
    let file = read_vtk_from_bytes(RECTILINEAR.as_bytes()).unwrap();
    let points = file.points();

    assert_eq!(points.len(), 6);
    assert_eq!(points.point(2), Point3d::new(3.0, 0.0, 5.0));
    assert_eq!(points.point(4), Point3d::new(1.0, 2.0, 5.0));
    assert_eq!(file.number_of_cells(), 2);
    assert!(file.cells().iter().all(|c| c.cell_type == CellType::Pixel));

    match &file.cell_data.as_ref().unwrap().attributes[0] {
        Attribute::Tensors(array) => assert_eq!(array.len(), 2),
        other => panic!("unexpected attribute {:?}", other),
    }
}

#[test]
fn version_line_selects_output_layout() {
    let file = read_vtk_from_bytes(RECTILINEAR.as_bytes()).unwrap();
    let mut poly = read_vtk_from_bytes(MIXED_POLYDATA.as_bytes()).unwrap();
    poly.version = Version::new(5, 1);

    let text = String::from_utf8(write_vtk_to_bytes(&poly, &WriteOptions::default()).unwrap()).unwrap();
    assert!(text.contains("LINES 2 2\nOFFSETS vtktypeint64\n0 2\nCONNECTIVITY vtktypeint64\n0 2\n"));

    let text = String::from_utf8(write_vtk_to_bytes(&file, &WriteOptions::default()).unwrap()).unwrap();
    assert!(text.starts_with("# vtk DataFile Version 3.0\n"));
    assert!(!text.contains("OFFSETS"));
}

#[test]
fn reader_and_writer_traits_use_disk() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rect.vtk");
    let output = dir.path().join("rect_copy.vtk");
    fs::write(&input, RECTILINEAR).unwrap();

    let file = LegacyReader::read_dataset(&input).unwrap();
    LegacyWriter::write_dataset(&file, &output).unwrap();

    assert_eq!(read_vtk(&output).unwrap().dataset, file.dataset);
    assert_eq!(read_points(&output).unwrap().len(), 6);
}

#[test]
fn unsupported_dataset_kind() {
    let text = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET HYPER_TREE_GRID\n";
    assert!(read_vtk_from_bytes(text.as_bytes()).is_err());
}
