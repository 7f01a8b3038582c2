//! Pixel layouts an image row can be stored in.
//!
//! A row's format tag and channel count together select one of three
//! layouts. The selection order matters: `"8U"` with three channels is
//! interleaved colour, any other registered tag is a planar array of that
//! element type, and an empty tag is the legacy packed colour layout.

use std::fmt;

use crate::error::CodecError;

use super::element::{ElementFormat, ElementFormatRegistry};

/// How the bytes of an image row map onto an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// One value per cell, shaped by the full resolution
    Planar(ElementFormat),

    /// `"8U"` row with 3 channels: bytes stored per pixel in reverse
    /// channel order, decoded to `(rows, cols, 3)`
    InterleavedBgr,

    /// Row with an empty format tag: same byte layout as
    /// [`PixelLayout::InterleavedBgr`], regardless of the channel count
    LegacyPackedBgr,
}

impl PixelLayout {
    /// Select the layout for a row.
    ///
    /// With `legacy_fallback` disabled, an unknown non-empty tag is an
    /// `UnsupportedFormatTag` error. With it enabled, unknown tags are read
    /// as [`PixelLayout::LegacyPackedBgr`].
    pub fn resolve(
        format_tag: &str,
        channel_count: usize,
        legacy_fallback: bool,
    ) -> Result<Self, CodecError> {
        match ElementFormatRegistry::lookup(format_tag) {
            Some(ElementFormat::UInt8) if channel_count == 3 => Ok(PixelLayout::InterleavedBgr),
            Some(format) => Ok(PixelLayout::Planar(format)),
            None if format_tag.trim().is_empty() || legacy_fallback => {
                Ok(PixelLayout::LegacyPackedBgr)
            }
            None => Err(CodecError::UnsupportedFormatTag(format_tag.to_string())),
        }
    }

    /// Element format of the decoded array.
    #[inline]
    pub const fn element_format(self) -> ElementFormat {
        match self {
            PixelLayout::Planar(format) => format,
            PixelLayout::InterleavedBgr | PixelLayout::LegacyPackedBgr => ElementFormat::UInt8,
        }
    }

    /// Whether the layout carries three interleaved channels.
    #[inline]
    pub const fn is_packed_color(self) -> bool {
        !matches!(self, PixelLayout::Planar(_))
    }
}

impl fmt::Display for PixelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelLayout::Planar(format) => write!(f, "planar {}", format),
            PixelLayout::InterleavedBgr => f.write_str("interleaved bgr"),
            PixelLayout::LegacyPackedBgr => f.write_str("legacy packed bgr"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
