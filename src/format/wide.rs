//! Wide image encoding.
//!
//! A wide image is a self-describing buffer: a fixed 32-byte header of four
//! int64 values followed by the raw row-major pixel payload.
//!
//! ```text
//! Bytes  0-7:  Sentinel (-1)
//! Bytes  8-15: Width  = number of columns = array axis 1
//! Bytes 16-23: Height = number of rows    = array axis 0
//! Bytes 24-31: Dtype code (see WideDType)
//! Bytes 32-:   Payload, height * width * channels * element width bytes
//! ```
//!
//! The decoded array always has shape `(height, width, channels)`. All
//! numbers, header and payload alike, use the codec's byte order, which
//! defaults to little-endian.

use bytes::Bytes;
use ndarray::{ArrayD, IxDyn};
use serde::Serialize;

use crate::array::DecodedArray;
use crate::error::CodecError;

use super::byte_order::ByteOrder;
use super::element::{Element, ElementFormat};
use super::values::{byte_len, cell_count, parse_array};

// =============================================================================
// Constants
// =============================================================================

/// Size of the wide image header in bytes.
pub const WIDE_HEADER_SIZE: usize = 32;

/// Value written in the first header field.
pub const WIDE_SENTINEL: i64 = -1;

// =============================================================================
// WideDType
// =============================================================================

/// Element type and channel count pairs a wide image can carry.
///
/// The discriminants are the codes stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(i64)]
pub enum WideDType {
    /// uint8, 1 channel
    U8C1 = 0,
    /// uint8, 3 channels
    U8C3 = 16,
    /// float32, 1 channel
    F32C1 = 5,
    /// float32, 3 channels
    F32C3 = 21,
    /// float64, 1 channel
    F64C1 = 6,
    /// float64, 3 channels
    F64C3 = 22,
}

impl WideDType {
    /// Header code for this type.
    #[inline]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Parse a header code, returning `None` for unknown codes.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(WideDType::U8C1),
            16 => Some(WideDType::U8C3),
            5 => Some(WideDType::F32C1),
            21 => Some(WideDType::F32C3),
            6 => Some(WideDType::F64C1),
            22 => Some(WideDType::F64C3),
            _ => None,
        }
    }

    /// Type for an element format and channel count, if one exists.
    pub fn from_parts(format: ElementFormat, channels: usize) -> Option<Self> {
        match (format, channels) {
            (ElementFormat::UInt8, 1) => Some(WideDType::U8C1),
            (ElementFormat::UInt8, 3) => Some(WideDType::U8C3),
            (ElementFormat::Float32, 1) => Some(WideDType::F32C1),
            (ElementFormat::Float32, 3) => Some(WideDType::F32C3),
            (ElementFormat::Float64, 1) => Some(WideDType::F64C1),
            (ElementFormat::Float64, 3) => Some(WideDType::F64C3),
            _ => None,
        }
    }

    /// Element format of the payload.
    pub const fn element_format(self) -> ElementFormat {
        match self {
            WideDType::U8C1 | WideDType::U8C3 => ElementFormat::UInt8,
            WideDType::F32C1 | WideDType::F32C3 => ElementFormat::Float32,
            WideDType::F64C1 | WideDType::F64C3 => ElementFormat::Float64,
        }
    }

    /// Channels per pixel.
    pub const fn channels(self) -> usize {
        match self {
            WideDType::U8C1 | WideDType::F32C1 | WideDType::F64C1 => 1,
            WideDType::U8C3 | WideDType::F32C3 | WideDType::F64C3 => 3,
        }
    }
}

// =============================================================================
// WideHeader
// =============================================================================

/// Parsed wide image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WideHeader {
    /// First header field, -1 for buffers written by this crate
    pub sentinel: i64,
    /// Number of columns (array axis 1)
    pub width: usize,
    /// Number of rows (array axis 0)
    pub height: usize,
    /// Payload element type and channel count
    pub dtype: WideDType,
}

impl WideHeader {
    /// Parse the header from the start of a buffer.
    ///
    /// # Errors
    /// - `BufferUnderrun` if the buffer is shorter than 32 bytes
    /// - `InvalidShape` if width or height is negative
    /// - `UnknownDTypeCode` if the dtype code is not one of the six known codes
    pub fn parse(bytes: &[u8], byte_order: ByteOrder) -> Result<Self, CodecError> {
        CodecError::check_len(WIDE_HEADER_SIZE, bytes.len())?;

        let sentinel = byte_order.read_i64(&bytes[0..8]);
        let raw_width = byte_order.read_i64(&bytes[8..16]);
        let raw_height = byte_order.read_i64(&bytes[16..24]);
        let code = byte_order.read_i64(&bytes[24..32]);

        let (width, height) = match (usize::try_from(raw_width), usize::try_from(raw_height)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => {
                return Err(CodecError::InvalidShape {
                    shape: vec![raw_height, raw_width],
                    message: "wide image extents must be non-negative".to_string(),
                })
            }
        };

        let dtype = WideDType::from_code(code).ok_or(CodecError::UnknownDTypeCode(code))?;

        Ok(WideHeader {
            sentinel,
            width,
            height,
            dtype,
        })
    }

    /// Array shape described by this header: `(height, width, channels)`.
    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, self.dtype.channels()]
    }

    /// Number of payload bytes following the header.
    pub fn payload_len(&self) -> Result<usize, CodecError> {
        let cells = cell_count(&self.shape())?;
        byte_len(cells, self.dtype.element_format().size_in_bytes())
    }

    /// Append the 32 header bytes to `out`.
    pub fn write(&self, byte_order: ByteOrder, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let to_i64 = |value: usize| {
            i64::try_from(value).map_err(|_| CodecError::InvalidShape {
                shape: vec![self.height as i64, self.width as i64],
                message: "extent does not fit in int64".to_string(),
            })
        };

        byte_order.write_i64(self.sentinel, out);
        byte_order.write_i64(to_i64(self.width)?, out);
        byte_order.write_i64(to_i64(self.height)?, out);
        byte_order.write_i64(self.dtype.code(), out);
        Ok(())
    }
}

// =============================================================================
// WideImageCodec
// =============================================================================

/// Encoder and decoder for wide image buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WideImageCodec {
    byte_order: ByteOrder,
}

impl WideImageCodec {
    /// Create a codec using little-endian numbers.
    pub const fn new() -> Self {
        Self {
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// Use a different byte order for header and payload.
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Byte order used by this codec.
    #[inline]
    pub const fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Encode a `(rows, cols, channels)` array into a wide image.
    ///
    /// # Errors
    /// - `InvalidShape` if the array is not 3-D
    /// - `UnsupportedDType` if the dtype/channel pair has no wide code
    pub fn encode(&self, array: &DecodedArray) -> Result<Bytes, CodecError> {
        let (height, width, channels) = match *array.shape() {
            [height, width, channels] => (height, width, channels),
            _ => {
                return Err(CodecError::InvalidShape {
                    shape: array.shape().iter().map(|&v| v as i64).collect(),
                    message: "wide images need a (rows, cols, channels) array".to_string(),
                })
            }
        };

        let dtype = WideDType::from_parts(array.dtype(), channels).ok_or(
            CodecError::UnsupportedDType {
                dtype: array.dtype(),
                channels,
            },
        )?;

        let header = WideHeader {
            sentinel: WIDE_SENTINEL,
            width,
            height,
            dtype,
        };

        let mut out = Vec::with_capacity(WIDE_HEADER_SIZE + header.payload_len()?);
        header.write(self.byte_order, &mut out)?;
        out.extend_from_slice(&array.to_bytes(self.byte_order));

        Ok(Bytes::from(out))
    }

    /// Read only the header of a wide image.
    pub fn header(&self, buffer: &[u8]) -> Result<WideHeader, CodecError> {
        WideHeader::parse(buffer, self.byte_order)
    }

    /// Decode a wide image into a `(height, width, channels)` array.
    ///
    /// # Errors
    /// - Any header error from [`WideHeader::parse`]
    /// - `BufferUnderrun` if the payload is shorter than the header declares
    /// - `PayloadLengthMismatch` if it is longer
    pub fn decode(&self, buffer: &[u8]) -> Result<DecodedArray, CodecError> {
        let header = self.header(buffer)?;
        let expected = header.payload_len()?;
        let payload = &buffer[WIDE_HEADER_SIZE..];

        if payload.len() < expected {
            return Err(CodecError::BufferUnderrun {
                required: WIDE_HEADER_SIZE + expected,
                actual: buffer.len(),
            });
        }
        if payload.len() > expected {
            return Err(CodecError::PayloadLengthMismatch {
                expected,
                actual: payload.len(),
            });
        }

        let shape = header.shape();
        match header.dtype {
            WideDType::U8C1 | WideDType::U8C3 => self.decode_payload::<u8>(payload, &shape),
            WideDType::F32C1 | WideDType::F32C3 => self.decode_payload::<f32>(payload, &shape),
            WideDType::F64C1 | WideDType::F64C3 => self.decode_payload::<f64>(payload, &shape),
        }
    }

    fn decode_payload<T: Element>(
        &self,
        payload: &[u8],
        shape: &[usize],
    ) -> Result<DecodedArray, CodecError> {
        let values = parse_array::<T>(payload, cell_count(shape)?, self.byte_order)?;
        let array = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|e| {
            CodecError::InvalidShape {
                shape: shape.iter().map(|&v| v as i64).collect(),
                message: e.to_string(),
            }
        })?;
        Ok(DecodedArray::from(array))
    }
}

// =============================================================================
// Tests
// =============================================================================
