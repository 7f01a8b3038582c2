//! Decoding rows out of index-aligned column sequences.
//!
//! A fetched image table arrives as parallel columns: payload bytes, axis
//! count, packed resolution and format tag. [`BatchArrayFetcher`] picks one
//! index across the four columns, unpacks the resolution and hands the row
//! to a [`RowDecoder`].
//!
//! # Packed resolution
//!
//! The resolution column holds `dimension` int64 values stored fastest axis
//! first, the reverse of row-major order. For a 2-D image that is
//! `(width, height)`, which unpacks to the array shape `(height, width)`.

use rayon::prelude::*;

use crate::array::DecodedArray;
use crate::error::CodecError;
use crate::format::{parse_i64_array, ByteOrder};

use super::row::RowDecoder;

/// Unpack a packed, axis-reversed resolution into row-major extents.
///
/// # Errors
/// - `BufferUnderrun` if `packed` holds fewer than `dimension` int64 values
/// - `InvalidResolution` if an extent is negative
pub fn unpack_resolution(
    packed: &[u8],
    dimension: usize,
    byte_order: ByteOrder,
) -> Result<Vec<usize>, CodecError> {
    parse_i64_array(packed, dimension, byte_order)?
        .into_iter()
        .rev()
        .map(|extent| usize::try_from(extent).map_err(|_| CodecError::InvalidResolution(extent)))
        .collect()
}

/// Pack row-major extents the way the resolution column stores them.
pub fn pack_resolution(resolution: &[usize], byte_order: ByteOrder) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(resolution.len() * 8);
    for &extent in resolution.iter().rev() {
        let value = i64::try_from(extent).map_err(|_| CodecError::InvalidShape {
            shape: resolution.iter().map(|&v| v as i64).collect(),
            message: "extent does not fit in int64".to_string(),
        })?;
        byte_order.write_i64(value, &mut out);
    }
    Ok(out)
}

/// Decodes rows selected by index from parallel column sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchArrayFetcher {
    decoder: RowDecoder,
}

impl BatchArrayFetcher {
    /// Create a fetcher around a row decoder.
    pub const fn new(decoder: RowDecoder) -> Self {
        Self { decoder }
    }

    /// The row decoder used for every row.
    #[inline]
    pub const fn decoder(&self) -> &RowDecoder {
        &self.decoder
    }

    /// Decode the row at `index`.
    ///
    /// # Errors
    /// - `IndexOutOfRange` if `index` is past the end of any sequence
    /// - `InvalidResolution` for a negative dimension or extent
    /// - Any [`RowDecoder::decode`] error
    pub fn get<B, R, F>(
        &self,
        binaries: &[B],
        dimensions: &[i64],
        resolutions: &[R],
        formats: &[F],
        index: usize,
        channel_count: usize,
    ) -> Result<DecodedArray, CodecError>
    where
        B: AsRef<[u8]>,
        R: AsRef<[u8]>,
        F: AsRef<str>,
    {
        let format_tag = row(formats, index)?.as_ref();
        self.get_with_format(
            binaries,
            dimensions,
            resolutions,
            format_tag,
            index,
            channel_count,
        )
    }

    /// Decode the row at `index`, using `format_tag` instead of a per-row
    /// format column.
    pub fn get_with_format<B, R>(
        &self,
        binaries: &[B],
        dimensions: &[i64],
        resolutions: &[R],
        format_tag: &str,
        index: usize,
        channel_count: usize,
    ) -> Result<DecodedArray, CodecError>
    where
        B: AsRef<[u8]>,
        R: AsRef<[u8]>,
    {
        let raw_dimension = *row(dimensions, index)?;
        let dimension = usize::try_from(raw_dimension)
            .map_err(|_| CodecError::InvalidResolution(raw_dimension))?;
        let packed = row(resolutions, index)?.as_ref();
        let binary = row(binaries, index)?.as_ref();

        let resolution = unpack_resolution(packed, dimension, self.decoder.byte_order())?;
        self.decoder
            .decode(binary, dimension, &resolution, format_tag, channel_count)
    }

    /// Decode every row, in parallel, preserving row order.
    ///
    /// The row count is the length of `binaries`; a shorter metadata
    /// sequence fails with `IndexOutOfRange` for its first missing row.
    pub fn get_all<B, R, F>(
        &self,
        binaries: &[B],
        dimensions: &[i64],
        resolutions: &[R],
        formats: &[F],
        channel_count: usize,
    ) -> Result<Vec<DecodedArray>, CodecError>
    where
        B: AsRef<[u8]> + Sync,
        R: AsRef<[u8]> + Sync,
        F: AsRef<str> + Sync,
    {
        (0..binaries.len())
            .into_par_iter()
            .map(|index| {
                self.get(
                    binaries,
                    dimensions,
                    resolutions,
                    formats,
                    index,
                    channel_count,
                )
            })
            .collect()
    }
}

fn row<T>(values: &[T], index: usize) -> Result<&T, CodecError> {
    values.get(index).ok_or(CodecError::IndexOutOfRange {
        index,
        len: values.len(),
    })
}

// =============================================================================
// Tests
// =============================================================================
