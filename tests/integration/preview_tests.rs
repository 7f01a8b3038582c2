//! Preview integration tests.
//!
//! Tests verify:
//! - Decoded rows and wide images render to valid JPEG
//! - Volume slices render through the window
//! - Raw row sources keep signed volumes a wide image cannot carry
//! - The encoded JPEG decodes back to the expected dimensions

use std::io::Cursor;

use image::ImageReader;
use ndarray::{ArrayD, IxDyn};

use imagetable_codec::{
    encode_jpeg, slice_volume, to_preview_image, ByteOrder, CodecError, DecodedArray,
    ElementFormat, PreviewError, PreviewSource, RowDecoder, WideImageCodec, Window,
    DEFAULT_JPEG_QUALITY,
};

use super::test_utils::{fixture_bytes, is_valid_jpeg, row_bytes};

#[test]
fn test_fixture_preview() {
    let decoded = RowDecoder::new()
        .decode(&fixture_bytes(), 2, &[5, 5], "8U", 1)
        .unwrap();

    let image = to_preview_image(&decoded, &Window::default()).unwrap();
    assert_eq!(image.as_luma8().unwrap().get_pixel(3, 2).0, [150]);

    let jpeg = encode_jpeg(&image, DEFAULT_JPEG_QUALITY).unwrap();
    assert!(is_valid_jpeg(&jpeg));

    let reader = ImageReader::with_format(Cursor::new(jpeg.as_ref()), image::ImageFormat::Jpeg);
    let (width, height) = reader.into_dimensions().unwrap();
    assert_eq!((width, height), (5, 5));
}

#[test]
fn test_colour_preview_from_wide() {
    let raw: Vec<u8> = (0..4 * 6 * 3).map(|i| (i * 3) as u8).collect();
    let decoded = RowDecoder::new().decode(&raw, 2, &[4, 6], "8U", 3).unwrap();

    let codec = WideImageCodec::new();
    let wide = codec.decode(&codec.encode(&decoded).unwrap()).unwrap();

    let image = to_preview_image(&wide, &Window::default()).unwrap();
    let rgb = image.as_rgb8().unwrap();
    assert_eq!(rgb.dimensions(), (6, 4));
    assert_eq!(rgb.get_pixel(0, 0).0, [6, 3, 0]);

    assert!(is_valid_jpeg(&encode_jpeg(&image, 90).unwrap()));
}

#[test]
fn test_volume_slice_preview() {
    let values: Vec<i16> = (0..3 * 4 * 4).map(|i| i * 10 - 100).collect();
    let volume = RowDecoder::new()
        .decode(&row_bytes(&values), 3, &[3, 4, 4], "16S", 1)
        .unwrap();

    let slice = slice_volume(&volume, 0, 1).unwrap();
    assert_eq!(slice.shape(), &[4, 4]);

    let window = Window::new(-100.0, 400.0).unwrap();
    let image = to_preview_image(&slice, &window).unwrap();
    let gray = image.as_luma8().unwrap();
    // Slice 1 starts at value 16 * 10 - 100 = 60.
    assert_eq!(gray.get_pixel(0, 0).0, [window.map(60.0)]);

    assert!(is_valid_jpeg(&encode_jpeg(&image, 75).unwrap()));
}

#[test]
fn test_row_source_volume_preview() {
    let values: Vec<i16> = vec![-100, 0, 150, 400, 0, 100, 200, 300];
    let bytes = row_bytes(&values);

    // The same volume cannot travel as a wide image.
    let volume = RowDecoder::new()
        .decode(&bytes, 3, &[2, 2, 2], "16S", 1)
        .unwrap();
    assert_eq!(
        WideImageCodec::new().encode(&volume),
        Err(CodecError::UnsupportedDType {
            dtype: ElementFormat::Int16,
            channels: 2
        })
    );

    let source = PreviewSource::Row {
        format: "16S".to_string(),
        resolution: vec![2, 2, 2],
        channels: 1,
        legacy_fallback: false,
    };
    let decoded = source.decode(&bytes, ByteOrder::LittleEndian).unwrap();
    assert_eq!(decoded, volume);

    let slice = slice_volume(&decoded, 0, 1).unwrap();
    assert_eq!(slice.shape(), &[2, 2]);

    let image = to_preview_image(&slice, &Window::default()).unwrap();
    let gray = image.as_luma8().unwrap();
    assert_eq!(gray.get_pixel(0, 0).0, [51]);
    assert_eq!(gray.get_pixel(1, 0).0, [102]);
    assert_eq!(gray.get_pixel(1, 1).0, [204]);

    assert!(is_valid_jpeg(&encode_jpeg(&image, DEFAULT_JPEG_QUALITY).unwrap()));
}

#[test]
fn test_unrenderable_array() {
    let array = DecodedArray::from(ArrayD::<f32>::zeros(IxDyn(&[2, 2, 2, 2])));
    assert!(matches!(
        to_preview_image(&array, &Window::default()),
        Err(PreviewError::UnsupportedArray { .. })
    ));
}
