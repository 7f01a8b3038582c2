//! Decoding a single image row into a typed array.
//!
//! A row is a raw byte buffer plus the metadata stored next to it in the
//! image table: the number of axes, the per-axis resolution, the format tag
//! and the channel count the caller expects. [`RowDecoder`] resolves a
//! [`PixelLayout`] from the tag and channel count and unpacks the buffer
//! accordingly.
//!
//! # Packed colour rows
//!
//! `"8U"` rows with three channels, and rows with an empty tag, store each
//! pixel as three bytes in the reverse of the output channel order. The
//! decoder reads `rows * cols * 3` bytes, shapes them `(rows, cols, 3)` and
//! reverses every pixel's channels.

use ndarray::{ArrayD, IxDyn};

use crate::array::DecodedArray;
use crate::error::CodecError;
use crate::format::{
    byte_len, cell_count, parse_array, ByteOrder, Element, ElementFormat, PixelLayout,
};

/// Stateless decoder for single image rows.
///
/// # Example
///
/// ```
/// use imagetable_codec::RowDecoder;
///
/// let buffer: Vec<u8> = [0i32, 1, 2, 3].iter().flat_map(|v| v.to_le_bytes()).collect();
/// let array = RowDecoder::new().decode(&buffer, 2, &[2, 2], "32S", 1).unwrap();
///
/// assert_eq!(array.shape(), &[2, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RowDecoder {
    byte_order: ByteOrder,
    legacy_fallback: bool,
}

impl RowDecoder {
    /// Create a strict, little-endian decoder.
    pub const fn new() -> Self {
        Self {
            byte_order: ByteOrder::LittleEndian,
            legacy_fallback: false,
        }
    }

    /// Use a different byte order for multi-byte samples.
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Read rows with unknown format tags as legacy packed colour instead of
    /// failing.
    pub const fn legacy_fallback(mut self, enabled: bool) -> Self {
        self.legacy_fallback = enabled;
        self
    }

    /// Byte order used by this decoder.
    #[inline]
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Layout this decoder would pick for a tag and channel count.
    pub fn layout(
        &self,
        format_tag: &str,
        channel_count: usize,
    ) -> Result<PixelLayout, CodecError> {
        PixelLayout::resolve(format_tag, channel_count, self.legacy_fallback)
    }

    /// Decode one row.
    ///
    /// # Arguments
    /// * `buffer` - Raw row bytes; anything past the required prefix is ignored
    /// * `dimension` - Number of axes declared for the row
    /// * `resolution` - Per-axis extents, row-major
    /// * `format_tag` - Channel type tag (`"8U"`, `"32F"`, ... or empty)
    /// * `channel_count` - Channels the caller expects (1 or 3)
    ///
    /// # Errors
    /// - `UnsupportedFormatTag` for an unknown tag without legacy fallback
    /// - `DimensionMismatch` if the resolution does not fit the layout
    /// - `BufferUnderrun` if `buffer` is too short
    pub fn decode(
        &self,
        buffer: &[u8],
        dimension: usize,
        resolution: &[usize],
        format_tag: &str,
        channel_count: usize,
    ) -> Result<DecodedArray, CodecError> {
        let layout = self.layout(format_tag, channel_count)?;
        self.decode_layout(buffer, dimension, resolution, layout)
    }

    /// Decode one row with an already resolved layout.
    pub fn decode_layout(
        &self,
        buffer: &[u8],
        dimension: usize,
        resolution: &[usize],
        layout: PixelLayout,
    ) -> Result<DecodedArray, CodecError> {
        match layout {
            PixelLayout::Planar(format) => {
                if resolution.len() != dimension {
                    return Err(CodecError::DimensionMismatch {
                        dimension,
                        resolution: resolution.len(),
                    });
                }
                self.decode_planar(buffer, resolution, format)
            }
            PixelLayout::InterleavedBgr | PixelLayout::LegacyPackedBgr => {
                decode_packed_bgr(buffer, resolution)
            }
        }
    }

    fn decode_planar(
        &self,
        buffer: &[u8],
        resolution: &[usize],
        format: ElementFormat,
    ) -> Result<DecodedArray, CodecError> {
        match format {
            ElementFormat::Int8 => self.decode_typed::<i8>(buffer, resolution),
            ElementFormat::UInt8 => self.decode_typed::<u8>(buffer, resolution),
            ElementFormat::Int16 => self.decode_typed::<i16>(buffer, resolution),
            ElementFormat::UInt16 => self.decode_typed::<u16>(buffer, resolution),
            ElementFormat::Int32 => self.decode_typed::<i32>(buffer, resolution),
            ElementFormat::UInt64 => self.decode_typed::<u64>(buffer, resolution),
            ElementFormat::Float32 => self.decode_typed::<f32>(buffer, resolution),
            ElementFormat::Float64 => self.decode_typed::<f64>(buffer, resolution),
        }
    }

    fn decode_typed<T: Element>(
        &self,
        buffer: &[u8],
        resolution: &[usize],
    ) -> Result<DecodedArray, CodecError> {
        let values = parse_array::<T>(buffer, cell_count(resolution)?, self.byte_order)?;
        let array = shape_array(resolution, values)?;
        Ok(DecodedArray::from(array))
    }
}

/// Decode `(rows, cols, 3)` bytes with every pixel's channels reversed.
fn decode_packed_bgr(buffer: &[u8], resolution: &[usize]) -> Result<DecodedArray, CodecError> {
    let (rows, cols) = match *resolution {
        [rows, cols, ..] => (rows, cols),
        _ => {
            return Err(CodecError::DimensionMismatch {
                dimension: 2,
                resolution: resolution.len(),
            })
        }
    };

    let shape = [rows, cols, 3];
    let required = byte_len(cell_count(&shape)?, 1)?;
    CodecError::check_len(required, buffer.len())?;

    let mut data = buffer[..required].to_vec();
    for pixel in data.chunks_exact_mut(3) {
        pixel.reverse();
    }

    Ok(DecodedArray::from(shape_array(&shape, data)?))
}

fn shape_array<T>(shape: &[usize], values: Vec<T>) -> Result<ArrayD<T>, CodecError> {
    ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|e| CodecError::InvalidShape {
        shape: shape.iter().map(|&v| v as i64).collect(),
        message: e.to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
