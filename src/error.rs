use thiserror::Error;

use crate::format::ElementFormat;

/// Errors raised while decoding or encoding image buffers.
///
/// Every variant is deterministic for a given input: retrying the same call
/// always fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Buffer is shorter than the format/resolution/channel count demands
    #[error("Buffer underrun: need {required} bytes, got {actual}")]
    BufferUnderrun { required: usize, actual: usize },

    /// Format tag is not in the element format registry
    #[error("Unsupported format tag: {0:?}")]
    UnsupportedFormatTag(String),

    /// Array element type / channel count has no wide image code
    #[error("Unsupported dtype for wide image: {dtype} with {channels} channel(s)")]
    UnsupportedDType {
        dtype: ElementFormat,
        channels: usize,
    },

    /// Wide image header carries an unknown dtype code
    #[error("Unknown wide image dtype code: {0}")]
    UnknownDTypeCode(i64),

    /// Row index is outside one of the input sequences
    #[error("Index {index} out of range for {len} row(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Resolution does not have the axis count the layout requires
    #[error("Dimension mismatch: expected {dimension} axes, resolution has {resolution}")]
    DimensionMismatch { dimension: usize, resolution: usize },

    /// Negative dimension or axis extent in packed metadata
    #[error("Invalid resolution value: {0}")]
    InvalidResolution(i64),

    /// Array shape cannot be represented by the target layout
    #[error("Invalid shape {shape:?}: {message}")]
    InvalidShape { shape: Vec<i64>, message: String },

    /// Wide image payload is longer than its header declares
    #[error("Payload length mismatch: header declares {expected} bytes, got {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },
}

impl CodecError {
    /// Check that `actual` bytes cover `required`.
    #[inline]
    pub(crate) fn check_len(required: usize, actual: usize) -> Result<(), CodecError> {
        if actual < required {
            Err(CodecError::BufferUnderrun { required, actual })
        } else {
            Ok(())
        }
    }
}

/// Errors raised while reading image rows out of a fetched table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// Column is not present in the fetched rows
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Column holds a different value type than the reader expects
    #[error("Column {column} is not a {expected} column")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    /// Decoding the selected row failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Errors that can occur when rendering a preview image
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreviewError {
    /// Array shape or dtype cannot be rendered as a 2-D image
    #[error("Cannot preview array of dtype {dtype} with shape {shape:?}")]
    UnsupportedArray {
        dtype: ElementFormat,
        shape: Vec<usize>,
    },

    /// Slice request lies outside the volume
    #[error("Slice {index} on axis {axis} out of range for shape {shape:?}")]
    SliceOutOfRange {
        axis: usize,
        index: usize,
        shape: Vec<usize>,
    },

    /// Window bounds are empty or not finite
    #[error("Invalid window: [{min}, {max}]")]
    InvalidWindow { min: f64, max: f64 },

    /// Encoding the preview failed
    #[error("Failed to encode preview: {message}")]
    Encode { message: String },
}
