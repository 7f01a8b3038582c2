//! Row decoding integration tests.
//!
//! Tests verify:
//! - Planar rows decode to the exact values and shape
//! - Packed colour rows reverse every pixel's channels
//! - Empty and unknown tags follow the legacy/strict rules
//! - Short buffers fail with BufferUnderrun

use ndarray::{arr2, Array3};

use imagetable_codec::{CodecError, ElementFormat, PixelLayout, RowDecoder};

use super::test_utils::{fixture_bytes, row_bytes, FIXTURE_5X5};

// =============================================================================
// Planar Rows
// =============================================================================

#[test]
fn test_int32_matrix() {
    let buffer = row_bytes(&[0i32, 1, 2, 3]);
    let decoded = RowDecoder::new().decode(&buffer, 2, &[2, 2], "32S", 1).unwrap();

    assert_eq!(decoded.dtype(), ElementFormat::Int32);
    assert_eq!(
        decoded.into_array::<i32>().unwrap(),
        arr2(&[[0, 1], [2, 3]]).into_dyn()
    );
}

#[test]
fn test_known_fixture() {
    let decoded = RowDecoder::new()
        .decode(&fixture_bytes(), 2, &[5, 5], "8U", 1)
        .unwrap();

    assert_eq!(decoded.shape(), &[5, 5]);
    assert_eq!(
        decoded.into_array::<u8>().unwrap(),
        arr2(&FIXTURE_5X5).into_dyn()
    );
}

#[test]
fn test_volume_shape() {
    let values: Vec<i16> = (0..24).collect();
    let decoded = RowDecoder::new()
        .decode(&row_bytes(&values), 3, &[2, 3, 4], "16S", 1)
        .unwrap();

    let view = decoded.view::<i16>().unwrap();
    assert_eq!(view.shape(), &[2, 3, 4]);
    assert_eq!(view[[1, 2, 3]], 23);
    assert_eq!(view[[1, 0, 0]], 12);
}

#[test]
fn test_trailing_bytes_ignored() {
    let mut buffer = row_bytes(&[7.5f64, 8.5]);
    buffer.extend_from_slice(&[0xAA; 5]);

    let decoded = RowDecoder::new().decode(&buffer, 1, &[2], "64F", 1).unwrap();
    assert_eq!(decoded.view::<f64>().unwrap().as_slice().unwrap(), &[7.5, 8.5]);
}

// =============================================================================
// Packed Colour Rows
// =============================================================================

#[test]
fn test_three_channel_reversal() {
    let raw: Vec<u8> = (1..=12).collect();
    let decoded = RowDecoder::new().decode(&raw, 2, &[2, 2], "8U", 3).unwrap();

    let array = decoded.into_array::<u8>().unwrap();
    assert_eq!(array.shape(), &[2, 2, 3]);

    let source = Array3::from_shape_vec((2, 2, 3), raw).unwrap();
    for row in 0..2 {
        for col in 0..2 {
            for channel in 0..3 {
                assert_eq!(
                    array[[row, col, channel]],
                    source[[row, col, 2 - channel]]
                );
            }
        }
    }
}

#[test]
fn test_empty_tag_is_legacy() {
    let decoder = RowDecoder::new();
    assert_eq!(decoder.layout("", 1).unwrap(), PixelLayout::LegacyPackedBgr);

    let decoded = decoder.decode(&[10, 20, 30], 2, &[1, 1], "", 1).unwrap();
    assert_eq!(decoded.view::<u8>().unwrap().as_slice().unwrap(), &[30, 20, 10]);
}

#[test]
fn test_unknown_tag() {
    let strict = RowDecoder::new();
    assert_eq!(
        strict.decode(&[0; 3], 2, &[1, 1], "12Q", 1),
        Err(CodecError::UnsupportedFormatTag("12Q".to_string()))
    );

    let lenient = RowDecoder::new().legacy_fallback(true);
    let decoded = lenient.decode(&[1, 2, 3], 2, &[1, 1], "12Q", 1).unwrap();
    assert_eq!(decoded.shape(), &[1, 1, 3]);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_buffer_underrun() {
    let decoder = RowDecoder::new();

    let result = decoder.decode(&[0u8; 15], 2, &[2, 2], "32S", 1);
    assert_eq!(
        result,
        Err(CodecError::BufferUnderrun {
            required: 16,
            actual: 15
        })
    );

    let result = decoder.decode(&[0u8; 11], 2, &[2, 2], "8U", 3);
    assert!(matches!(result, Err(CodecError::BufferUnderrun { .. })));
}

#[test]
fn test_dimension_mismatch() {
    let result = RowDecoder::new().decode(&[0u8; 8], 3, &[2, 4], "8U", 1);
    assert_eq!(
        result,
        Err(CodecError::DimensionMismatch {
            dimension: 3,
            resolution: 2
        })
    );
}
