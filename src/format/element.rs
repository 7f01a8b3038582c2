//! Element formats and the format tag registry.
//!
//! This module defines the vocabulary for image row decoding:
//! - The closed set of numeric element types a row can carry
//! - The short tags (`"8U"`, `"32F"`, ...) image tables use to name them
//! - The [`Element`] trait that ties each Rust scalar to its format

use std::fmt;

use ndarray::{ArrayD, ArrayViewD};
use serde::Serialize;

use super::byte_order::ByteOrder;
use crate::array::DecodedArray;

// =============================================================================
// ElementFormat
// =============================================================================

/// Numeric type of a single sample in an image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementFormat {
    /// Signed 8-bit integer (1 byte)
    Int8,
    /// Unsigned 8-bit integer (1 byte)
    UInt8,
    /// Signed 16-bit integer (2 bytes)
    Int16,
    /// Unsigned 16-bit integer (2 bytes)
    UInt16,
    /// Signed 32-bit integer (4 bytes)
    Int32,
    /// Unsigned 64-bit integer (8 bytes)
    UInt64,
    /// IEEE 754 single precision (4 bytes)
    Float32,
    /// IEEE 754 double precision (8 bytes)
    Float64,
}

impl ElementFormat {
    /// Size of a single value of this format in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            ElementFormat::Int8 | ElementFormat::UInt8 => 1,
            ElementFormat::Int16 | ElementFormat::UInt16 => 2,
            ElementFormat::Int32 | ElementFormat::Float32 => 4,
            ElementFormat::UInt64 | ElementFormat::Float64 => 8,
        }
    }

    /// Whether values of this format can be negative.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            ElementFormat::Int8
                | ElementFormat::Int16
                | ElementFormat::Int32
                | ElementFormat::Float32
                | ElementFormat::Float64
        )
    }

    /// Whether this is a floating point format.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, ElementFormat::Float32 | ElementFormat::Float64)
    }

    /// The image table tag naming this format.
    pub const fn tag(self) -> &'static str {
        match self {
            ElementFormat::Int8 => "8S",
            ElementFormat::UInt8 => "8U",
            ElementFormat::Int16 => "16S",
            ElementFormat::UInt16 => "16U",
            ElementFormat::Int32 => "32S",
            ElementFormat::UInt64 => "64U",
            ElementFormat::Float32 => "32F",
            ElementFormat::Float64 => "64F",
        }
    }

    /// Lowercase Rust-style type name (`"uint8"`, `"float32"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            ElementFormat::Int8 => "int8",
            ElementFormat::UInt8 => "uint8",
            ElementFormat::Int16 => "int16",
            ElementFormat::UInt16 => "uint16",
            ElementFormat::Int32 => "int32",
            ElementFormat::UInt64 => "uint64",
            ElementFormat::Float32 => "float32",
            ElementFormat::Float64 => "float64",
        }
    }
}

impl fmt::Display for ElementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ElementFormatRegistry
// =============================================================================

/// One row of the format tag table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatEntry {
    /// Tag as stored in the channel type column
    pub tag: &'static str,
    /// Element format the tag resolves to
    pub format: ElementFormat,
}

static REGISTRY: [FormatEntry; 8] = [
    FormatEntry {
        tag: "32S",
        format: ElementFormat::Int32,
    },
    FormatEntry {
        tag: "32F",
        format: ElementFormat::Float32,
    },
    FormatEntry {
        tag: "64F",
        format: ElementFormat::Float64,
    },
    FormatEntry {
        tag: "64U",
        format: ElementFormat::UInt64,
    },
    FormatEntry {
        tag: "16S",
        format: ElementFormat::Int16,
    },
    FormatEntry {
        tag: "16U",
        format: ElementFormat::UInt16,
    },
    FormatEntry {
        tag: "8S",
        format: ElementFormat::Int8,
    },
    FormatEntry {
        tag: "8U",
        format: ElementFormat::UInt8,
    },
];

/// Read-only lookup from format tag to [`ElementFormat`].
///
/// Tags are matched exactly after trimming surrounding whitespace, since
/// fixed-width character columns come back blank padded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementFormatRegistry;

impl ElementFormatRegistry {
    /// Resolve a tag, returning `None` for empty or unknown tags.
    pub fn lookup(tag: &str) -> Option<ElementFormat> {
        let tag = tag.trim();
        REGISTRY
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.format)
    }

    /// All registered entries.
    pub fn entries() -> &'static [FormatEntry] {
        &REGISTRY
    }
}

// =============================================================================
// Element
// =============================================================================

/// A Rust scalar type that can appear in a [`DecodedArray`].
pub trait Element: Copy + Send + Sync + 'static {
    /// Format this scalar corresponds to.
    const FORMAT: ElementFormat;

    /// Width of one value in bytes.
    const SIZE: usize;

    /// Read one value from the first [`Self::SIZE`] bytes of `bytes`.
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than [`Self::SIZE`].
    fn read(order: ByteOrder, bytes: &[u8]) -> Self;

    /// Append this value to `out`.
    fn write(self, order: ByteOrder, out: &mut Vec<u8>);

    /// Lossy widening used for display windowing.
    fn to_f64(self) -> f64;

    /// Wrap a typed array into the matching [`DecodedArray`] variant.
    fn wrap(array: ArrayD<Self>) -> DecodedArray;

    /// Take the typed array back out, or return the input unchanged on a
    /// dtype mismatch.
    fn from_decoded(array: DecodedArray) -> Result<ArrayD<Self>, DecodedArray>;

    /// Borrow the typed array if the dtype matches.
    fn view(array: &DecodedArray) -> Option<ArrayViewD<'_, Self>>;
}

macro_rules! impl_element {
    ($ty:ty, $format:ident) => {
        impl Element for $ty {
            const FORMAT: ElementFormat = ElementFormat::$format;
            const SIZE: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn read(order: ByteOrder, bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..Self::SIZE]);
                match order {
                    ByteOrder::LittleEndian => <$ty>::from_le_bytes(raw),
                    ByteOrder::BigEndian => <$ty>::from_be_bytes(raw),
                }
            }

            #[inline]
            fn write(self, order: ByteOrder, out: &mut Vec<u8>) {
                match order {
                    ByteOrder::LittleEndian => out.extend_from_slice(&self.to_le_bytes()),
                    ByteOrder::BigEndian => out.extend_from_slice(&self.to_be_bytes()),
                }
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn wrap(array: ArrayD<Self>) -> DecodedArray {
                DecodedArray::$format(array)
            }

            fn from_decoded(array: DecodedArray) -> Result<ArrayD<Self>, DecodedArray> {
                match array {
                    DecodedArray::$format(inner) => Ok(inner),
                    other => Err(other),
                }
            }

            fn view(array: &DecodedArray) -> Option<ArrayViewD<'_, Self>> {
                match array {
                    DecodedArray::$format(inner) => Some(inner.view()),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(i8, Int8);
impl_element!(u8, UInt8);
impl_element!(i16, Int16);
impl_element!(u16, UInt16);
impl_element!(i32, Int32);
impl_element!(u64, UInt64);
impl_element!(f32, Float32);
impl_element!(f64, Float64);

// =============================================================================
// Tests
// =============================================================================
