//! Typed value arrays packed into raw bytes.
//!
//! Pixel payloads, packed resolutions and geometry columns are all flat
//! runs of fixed-width numbers. Readers check the buffer length before
//! decoding and fail with `BufferUnderrun` on a short buffer.

use crate::error::CodecError;

use super::byte_order::ByteOrder;
use super::element::Element;

/// Number of cells in an array with the given per-axis extents.
///
/// Returns `InvalidShape` if the product overflows `usize`.
pub fn cell_count(shape: &[usize]) -> Result<usize, CodecError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .ok_or_else(|| CodecError::InvalidShape {
            shape: shape.iter().map(|&v| v as i64).collect(),
            message: "element count overflows".to_string(),
        })
}

/// Bytes needed to hold `count` values of `width` bytes each.
pub fn byte_len(count: usize, width: usize) -> Result<usize, CodecError> {
    count
        .checked_mul(width)
        .ok_or_else(|| CodecError::InvalidShape {
            shape: vec![count as i64],
            message: "byte length overflows".to_string(),
        })
}

/// Parse `count` values of type `T` from the start of `bytes`.
///
/// Trailing bytes past the requested values are ignored.
///
/// # Errors
/// `BufferUnderrun` if `bytes` holds fewer than `count * T::SIZE` bytes.
pub fn parse_array<T: Element>(
    bytes: &[u8],
    count: usize,
    byte_order: ByteOrder,
) -> Result<Vec<T>, CodecError> {
    let required = byte_len(count, T::SIZE)?;
    CodecError::check_len(required, bytes.len())?;

    Ok(bytes[..required]
        .chunks_exact(T::SIZE)
        .map(|chunk| T::read(byte_order, chunk))
        .collect())
}

/// Parse an array of i64 values from raw bytes.
pub fn parse_i64_array(
    bytes: &[u8],
    count: usize,
    byte_order: ByteOrder,
) -> Result<Vec<i64>, CodecError> {
    let required = byte_len(count, 8)?;
    CodecError::check_len(required, bytes.len())?;

    Ok(bytes[..required]
        .chunks_exact(8)
        .map(|chunk| byte_order.read_i64(chunk))
        .collect())
}

/// Parse an array of f64 values from raw bytes.
pub fn parse_f64_array(
    bytes: &[u8],
    count: usize,
    byte_order: ByteOrder,
) -> Result<Vec<f64>, CodecError> {
    parse_array::<f64>(bytes, count, byte_order)
}

/// Append every value yielded by `values` to `out`.
pub fn write_array<'a, T, I>(values: I, byte_order: ByteOrder, out: &mut Vec<u8>)
where
    T: Element,
    I: IntoIterator<Item = &'a T>,
{
    for &value in values {
        value.write(byte_order, out);
    }
}

// =============================================================================
// Tests
// =============================================================================
