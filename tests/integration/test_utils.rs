//! Test utilities for integration tests.
//!
//! Fixture builders for raw row buffers, packed resolutions and fetched
//! table rows.

use bytes::Bytes;

use imagetable_codec::{pack_resolution, ByteOrder, Column, Element, FetchedRows};

// =============================================================================
// Known Fixture
// =============================================================================

/// The 5x5 single-channel test image, row-major.
pub const FIXTURE_5X5: [[u8; 5]; 5] = [
    [0, 0, 0, 0, 0],
    [0, 255, 0, 0, 0],
    [0, 255, 0, 150, 0],
    [0, 0, 0, 0, 50],
    [0, 0, 0, 0, 0],
];

/// Raw "8U" bytes of [`FIXTURE_5X5`].
pub fn fixture_bytes() -> Vec<u8> {
    FIXTURE_5X5.iter().flatten().copied().collect()
}

// =============================================================================
// Buffer Builders
// =============================================================================

/// Serialise values the way a planar row stores them.
pub fn row_bytes<T: Element>(values: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * T::SIZE);
    for &value in values {
        value.write(ByteOrder::LittleEndian, &mut out);
    }
    out
}

/// Packed little-endian float64 values, as stored in geometry columns.
pub fn f64_bytes(values: &[f64]) -> Bytes {
    Bytes::from(row_bytes(values))
}

/// Pack a row-major resolution for the resolution column.
pub fn packed_resolution(resolution: &[usize]) -> Bytes {
    Bytes::from(pack_resolution(resolution, ByteOrder::LittleEndian).unwrap())
}

/// A single-row fetch with the default image column names.
pub fn single_row(image: Vec<u8>, resolution: &[usize], format: &str) -> FetchedRows {
    FetchedRows::new()
        .with_column("_image_", Column::Binary(vec![Bytes::from(image)]))
        .with_column(
            "_dimension_",
            Column::Integer(vec![resolution.len() as i64]),
        )
        .with_column(
            "_resolution_",
            Column::Binary(vec![packed_resolution(resolution)]),
        )
        .with_column("_channelType_", Column::Text(vec![format.to_string()]))
}

/// Add identity geometry columns for a `dim`-axis image.
pub fn with_identity_geometry(rows: FetchedRows, position: &[f64], spacing: &[f64]) -> FetchedRows {
    let dim = position.len();
    let mut orientation = vec![0.0; dim * dim];
    for i in 0..dim {
        orientation[i * dim + i] = 1.0;
    }

    rows.with_column("_position_", Column::Binary(vec![f64_bytes(position)]))
        .with_column(
            "_orientation_",
            Column::Binary(vec![f64_bytes(&orientation)]),
        )
        .with_column("_spacing_", Column::Binary(vec![f64_bytes(spacing)]))
}

/// Check for the JPEG start-of-image marker.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}
