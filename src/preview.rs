//! Rendering decoded arrays as 8-bit preview images.
//!
//! Medical volumes hold signed or floating-point intensities that have no
//! direct display mapping. A [`Window`] picks the intensity range that maps
//! onto `0..=255`; values outside it saturate. Plain uint8 images skip the
//! window and are shown as stored.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, RgbImage};
use ndarray::ArrayViewD;

use crate::array::DecodedArray;
use crate::decode::RowDecoder;
use crate::error::{CodecError, PreviewError};
use crate::format::{ByteOrder, WideImageCodec};

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Default lower window bound.
pub const DEFAULT_WINDOW_MIN: f64 = -100.0;

/// Default upper window bound.
pub const DEFAULT_WINDOW_MAX: f64 = 400.0;

// =============================================================================
// Window
// =============================================================================

/// Linear intensity window mapped onto `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    min: f64,
    max: f64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            min: DEFAULT_WINDOW_MIN,
            max: DEFAULT_WINDOW_MAX,
        }
    }
}

impl Window {
    /// Create a window over `[min, max]`.
    ///
    /// # Errors
    /// `InvalidWindow` unless both bounds are finite and `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self, PreviewError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(PreviewError::InvalidWindow { min, max });
        }
        Ok(Self { min, max })
    }

    /// Intensity mapped to black.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Intensity mapped to white.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Map an intensity to a display level.
    #[inline]
    pub fn map(&self, value: f64) -> u8 {
        if value.is_nan() {
            return 0;
        }
        let scaled = (value - self.min) / (self.max - self.min) * 255.0;
        scaled.round().clamp(0.0, 255.0) as u8
    }
}

// =============================================================================
// Sources
// =============================================================================

/// Encoding of the buffer a preview is rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewSource {
    /// A wide image, always `(h, w, c)` in uint8, float32 or float64.
    #[default]
    Wide,

    /// A raw table row, described by the same fields as its table columns.
    Row {
        format: String,
        resolution: Vec<usize>,
        channels: usize,
        legacy_fallback: bool,
    },
}

impl PreviewSource {
    /// Decode `bytes` into the array to render.
    ///
    /// Raw rows keep every element format the row decoder knows, so signed
    /// volumes reach [`slice_volume`] and the window unchanged.
    pub fn decode(
        &self,
        bytes: &[u8],
        byte_order: ByteOrder,
    ) -> Result<DecodedArray, CodecError> {
        match self {
            Self::Wide => WideImageCodec::new()
                .with_byte_order(byte_order)
                .decode(bytes),
            Self::Row {
                format,
                resolution,
                channels,
                legacy_fallback,
            } => RowDecoder::new()
                .with_byte_order(byte_order)
                .legacy_fallback(*legacy_fallback)
                .decode(bytes, resolution.len(), resolution, format, *channels),
        }
    }
}

// =============================================================================
// Slicing
// =============================================================================

/// Extract the 2-D slice at `index` along `axis` of a 3-D volume.
///
/// # Errors
/// - `UnsupportedArray` if the array is not 3-D
/// - `SliceOutOfRange` if `axis` or `index` is out of bounds
pub fn slice_volume(
    array: &DecodedArray,
    axis: usize,
    index: usize,
) -> Result<DecodedArray, PreviewError> {
    let shape = array.shape();
    if shape.len() != 3 {
        return Err(unsupported(array));
    }
    if axis >= 3 || index >= shape[axis] {
        return Err(PreviewError::SliceOutOfRange {
            axis,
            index,
            shape: shape.to_vec(),
        });
    }
    Ok(array.index_axis(axis, index))
}

// =============================================================================
// Rendering
// =============================================================================

/// Render a 2-D image, or a 3-D image with 1 or 3 channels, for display.
///
/// uint8 arrays are copied as stored. Every other dtype goes through
/// `window`. Three-channel arrays are taken to be in RGB order, which is
/// what the row decoder produces for packed colour rows.
pub fn to_preview_image(
    array: &DecodedArray,
    window: &Window,
) -> Result<DynamicImage, PreviewError> {
    let (height, width, channels) = match *array.shape() {
        [h, w] => (h, w, 1),
        [h, w, c] if c == 1 || c == 3 => (h, w, c),
        _ => return Err(unsupported(array)),
    };
    let (Ok(width_px), Ok(height_px)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(unsupported(array));
    };

    let levels = match array.view::<u8>() {
        Some(view) => row_major(view),
        None => array.to_f64().iter().map(|&v| window.map(v)).collect(),
    };

    let image = match channels {
        1 => GrayImage::from_raw(width_px, height_px, levels).map(DynamicImage::ImageLuma8),
        _ => RgbImage::from_raw(width_px, height_px, levels).map(DynamicImage::ImageRgb8),
    };
    image.ok_or_else(|| unsupported(array))
}

/// Encode a preview image as JPEG.
///
/// `quality` is clamped to `1..=100`.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Bytes, PreviewError> {
    let mut output = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut output, clamp_quality(quality));

    image
        .write_with_encoder(encoder)
        .map_err(|e| PreviewError::Encode {
            message: e.to_string(),
        })?;

    Ok(Bytes::from(output.into_inner()))
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

fn row_major(view: ArrayViewD<'_, u8>) -> Vec<u8> {
    view.iter().copied().collect()
}

fn unsupported(array: &DecodedArray) -> PreviewError {
    PreviewError::UnsupportedArray {
        dtype: array.dtype(),
        shape: array.shape().to_vec(),
    }
}

// =============================================================================
// Tests
// =============================================================================
