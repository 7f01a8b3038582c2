//! Table reader integration tests.
//!
//! Tests verify:
//! - Images decode from fetched rows with default and custom column names
//! - A constant channel type overrides the per-row column
//! - Geometry is decoded when present and empty when absent

use bytes::Bytes;
use ndarray::arr2;

use imagetable_codec::{
    cas_column_name, Column, ElementFormat, FetchedRows, ImageColumns, ImageTableReader,
    TableError,
};

use super::test_utils::{
    fixture_bytes, packed_resolution, row_bytes, single_row, with_identity_geometry, FIXTURE_5X5,
};

#[test]
fn test_fetch_known_fixture() {
    let rows = single_row(fixture_bytes(), &[5, 5], "8U");
    let decoded = ImageTableReader::new().fetch_image_array(&rows, 0, 1).unwrap();

    assert_eq!(
        decoded.into_array::<u8>().unwrap(),
        arr2(&FIXTURE_5X5).into_dyn()
    );
}

#[test]
fn test_fetch_const_ctype() {
    // The channel type column is wrong on purpose; the constant wins.
    let rows = single_row(fixture_bytes(), &[5, 5], "32F");
    let decoded = ImageTableReader::new()
        .fetch_image_array_const_ctype(&rows, "8U", 0, 1)
        .unwrap();

    assert_eq!(decoded.dtype(), ElementFormat::UInt8);
    assert_eq!(decoded.view::<u8>().unwrap()[[2, 3]], 150);
}

#[test]
fn test_custom_columns() {
    let columns = ImageColumns {
        image: cas_column_name("pixels"),
        ..ImageColumns::default()
    };
    let rows = FetchedRows::new()
        .with_column(
            "_pixels_",
            Column::Binary(vec![Bytes::from(row_bytes(&[1.5f64, 2.5]))]),
        )
        .with_column("_dimension_", Column::Integer(vec![1]))
        .with_column("_resolution_", Column::Binary(vec![packed_resolution(&[2])]))
        .with_column("_channelType_", Column::Text(vec!["64F".to_string()]));

    let decoded = ImageTableReader::new()
        .with_columns(columns)
        .fetch_image_array(&rows, 0, 1)
        .unwrap();
    assert_eq!(decoded.view::<f64>().unwrap()[[1]], 2.5);
}

#[test]
fn test_fetch_all() {
    let rows = FetchedRows::new()
        .with_column(
            "_image_",
            Column::Binary(vec![Bytes::from(vec![1u8; 4]), Bytes::from(vec![2u8; 6])]),
        )
        .with_column("_dimension_", Column::Integer(vec![2, 2]))
        .with_column(
            "_resolution_",
            Column::Binary(vec![packed_resolution(&[2, 2]), packed_resolution(&[2, 3])]),
        )
        .with_column(
            "_channelType_",
            Column::Text(vec!["8U".to_string(), "8U".to_string()]),
        );

    let decoded = ImageTableReader::new().fetch_all(&rows, 1).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].shape(), &[2, 2]);
    assert_eq!(decoded[1].shape(), &[2, 3]);
    assert_eq!(decoded[1].view::<u8>().unwrap()[[1, 2]], 2);
}

#[test]
fn test_geometry_present() {
    let rows = with_identity_geometry(
        single_row(fixture_bytes(), &[5, 5], "8U"),
        &[10.0, 20.0],
        &[0.5, 2.0],
    );

    let record = ImageTableReader::new().fetch_geometry_info(&rows, 0).unwrap();
    assert_eq!(record.position, vec![10.0, 20.0]);
    assert_eq!(record.orientation, vec![1.0, 0.0, 0.0, 1.0]);
    assert_eq!(record.spacing, vec![0.5, 2.0]);
}

#[test]
fn test_geometry_absent() {
    let rows = single_row(fixture_bytes(), &[5, 5], "8U");
    let record = ImageTableReader::new().fetch_geometry_info(&rows, 0).unwrap();
    assert!(record.is_empty());

    // One geometry column on its own is still treated as absent.
    let rows = rows.with_column("_spacing_", Column::Binary(vec![Bytes::new()]));
    let record = ImageTableReader::new().fetch_geometry_info(&rows, 0).unwrap();
    assert!(record.is_empty());
}

#[test]
fn test_missing_image_column() {
    let rows = FetchedRows::new().with_column("_channelType_", Column::Text(vec!["8U".into()]));
    assert_eq!(
        ImageTableReader::new().fetch_image_array(&rows, 0, 1),
        Err(TableError::MissingColumn("_image_".to_string()))
    );
}
