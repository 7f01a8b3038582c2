//! Geometry integration tests.

use imagetable_codec::{CodecError, GeometryBuffers, GeometryDecoder, GeometryRecord};

use super::test_utils::f64_bytes;

#[test]
fn test_decode_volume_geometry() {
    let position = f64_bytes(&[-120.0, -85.5, 30.0]);
    let orientation = f64_bytes(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    let spacing = f64_bytes(&[0.5, 0.5, 2.5]);

    let record = GeometryDecoder::new()
        .decode(&position, &orientation, &spacing, 3)
        .unwrap();

    assert_eq!(record.position, vec![-120.0, -85.5, 30.0]);
    assert_eq!(record.spacing, vec![0.5, 0.5, 2.5]);
    assert_eq!(record.orientation_matrix().unwrap().diag().sum(), 3.0);

    let world = record.index_to_world(&[10.0, 0.0, 4.0]).unwrap();
    assert_eq!(world, vec![-115.0, -85.5, 40.0]);
}

#[test]
fn test_absent_geometry_is_empty() {
    let record = GeometryDecoder::new().decode_optional(None, 2).unwrap();
    assert!(record.is_empty());
    assert_eq!(record, GeometryRecord::empty());
}

#[test]
fn test_present_geometry_through_optional() {
    let position = f64_bytes(&[1.0, 2.0]);
    let orientation = f64_bytes(&[1.0, 0.0, 0.0, 1.0]);
    let spacing = f64_bytes(&[0.5, 0.5]);

    let buffers = GeometryBuffers {
        position: &position,
        orientation: &orientation,
        spacing: &spacing,
    };
    let record = GeometryDecoder::new()
        .decode_optional(Some(buffers), 2)
        .unwrap();

    assert_eq!(record.dimension(), 2);
    assert!(!record.is_empty());
}

#[test]
fn test_short_spacing() {
    let position = f64_bytes(&[0.0, 0.0, 0.0]);
    let orientation = f64_bytes(&[0.0; 9]);
    let spacing = f64_bytes(&[1.0, 1.0]);

    assert_eq!(
        GeometryDecoder::new().decode(&position, &orientation, &spacing, 3),
        Err(CodecError::BufferUnderrun {
            required: 24,
            actual: 16
        })
    );
}
