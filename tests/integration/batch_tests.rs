//! Batch decoding integration tests.
//!
//! Tests verify:
//! - Packed, axis-reversed resolutions unpack into row-major shapes
//! - Rows are selected by index across parallel columns
//! - Parallel decoding keeps row order

use bytes::Bytes;
use ndarray::arr2;

use imagetable_codec::{
    unpack_resolution, BatchArrayFetcher, ByteOrder, CodecError, ElementFormat, RowDecoder,
};

use super::test_utils::{fixture_bytes, packed_resolution, row_bytes, FIXTURE_5X5};

#[test]
fn test_unpack_square_resolution() {
    let packed = packed_resolution(&[5, 5]);
    assert_eq!(
        unpack_resolution(&packed, 2, ByteOrder::LittleEndian).unwrap(),
        vec![5, 5]
    );
}

#[test]
fn test_unpack_rectangular_resolution() {
    let mut packed = Vec::new();
    ByteOrder::LittleEndian.write_i64(640, &mut packed);
    ByteOrder::LittleEndian.write_i64(480, &mut packed);

    assert_eq!(
        unpack_resolution(&packed, 2, ByteOrder::LittleEndian).unwrap(),
        vec![480, 640]
    );
}

#[test]
fn test_fetch_known_fixture() {
    let binaries = vec![Bytes::from(fixture_bytes())];
    let resolutions = vec![packed_resolution(&[5, 5])];

    let decoded = BatchArrayFetcher::default()
        .get(&binaries, &[2], &resolutions, &["8U"], 0, 1)
        .unwrap();

    assert_eq!(
        decoded.into_array::<u8>().unwrap(),
        arr2(&FIXTURE_5X5).into_dyn()
    );
}

#[test]
fn test_fetch_mixed_rows() {
    let binaries = vec![
        Bytes::from(row_bytes(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0])),
        Bytes::from(row_bytes(&[-1i16, -2])),
    ];
    let dimensions = [2i64, 1];
    let resolutions = vec![packed_resolution(&[2, 3]), packed_resolution(&[2])];
    let formats = ["32F", "16S"];

    let fetcher = BatchArrayFetcher::default();

    let first = fetcher
        .get(&binaries, &dimensions, &resolutions, &formats, 0, 1)
        .unwrap();
    assert_eq!(first.dtype(), ElementFormat::Float32);
    assert_eq!(first.shape(), &[2, 3]);
    assert_eq!(first.view::<f32>().unwrap()[[1, 0]], 4.0);

    let second = fetcher
        .get(&binaries, &dimensions, &resolutions, &formats, 1, 1)
        .unwrap();
    assert_eq!(second.dtype(), ElementFormat::Int16);
    assert_eq!(second.view::<i16>().unwrap()[[1]], -2);
}

#[test]
fn test_fetch_big_endian() {
    let mut image = Vec::new();
    for value in [1u16, 258] {
        image.extend_from_slice(&value.to_be_bytes());
    }
    let mut resolution = Vec::new();
    ByteOrder::BigEndian.write_i64(2, &mut resolution);

    let fetcher = BatchArrayFetcher::new(RowDecoder::new().with_byte_order(ByteOrder::BigEndian));
    let decoded = fetcher
        .get(&[image], &[1], &[resolution], &["16U"], 0, 1)
        .unwrap();

    assert_eq!(decoded.view::<u16>().unwrap()[[1]], 258);
}

#[test]
fn test_index_out_of_range() {
    let binaries = vec![Bytes::from(fixture_bytes())];
    let resolutions = vec![packed_resolution(&[5, 5])];

    let result = BatchArrayFetcher::default().get(&binaries, &[2], &resolutions, &["8U"], 1, 1);
    assert_eq!(result, Err(CodecError::IndexOutOfRange { index: 1, len: 1 }));
}

#[test]
fn test_get_all_in_order() {
    let count = 64;
    let binaries: Vec<Bytes> = (0..count)
        .map(|i| Bytes::from(row_bytes(&[i as i32; 6])))
        .collect();
    let dimensions = vec![2i64; count];
    let resolutions = vec![packed_resolution(&[3, 2]); count];
    let formats = vec!["32S"; count];

    let decoded = BatchArrayFetcher::default()
        .get_all(&binaries, &dimensions, &resolutions, &formats, 1)
        .unwrap();

    assert_eq!(decoded.len(), count);
    for (i, array) in decoded.iter().enumerate() {
        assert_eq!(array.shape(), &[3, 2]);
        assert_eq!(array.view::<i32>().unwrap()[[2, 1]], i as i32);
    }
}
