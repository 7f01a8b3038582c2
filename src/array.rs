//! Typed arrays produced by the decoders.
//!
//! [`DecodedArray`] is an enum over `ndarray::ArrayD<T>` for every
//! [`ElementFormat`]. Callers either match on it directly or pull the
//! concrete array out with [`DecodedArray::into_array`].

use ndarray::{ArrayD, ArrayViewD, Axis};

use crate::format::{ByteOrder, Element, ElementFormat};

/// A freshly decoded, caller-owned image or volume.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedArray {
    /// Signed 8-bit samples (`8S`)
    Int8(ArrayD<i8>),
    /// Unsigned 8-bit samples (`8U`), also every packed BGR row
    UInt8(ArrayD<u8>),
    /// Signed 16-bit samples (`16S`), typical of CT volumes
    Int16(ArrayD<i16>),
    /// Unsigned 16-bit samples (`16U`)
    UInt16(ArrayD<u16>),
    /// Signed 32-bit samples (`32S`)
    Int32(ArrayD<i32>),
    /// Unsigned 64-bit samples (`64U`)
    UInt64(ArrayD<u64>),
    /// Single precision samples (`32F`)
    Float32(ArrayD<f32>),
    /// Double precision samples (`64F`)
    Float64(ArrayD<f64>),
}

/// Evaluate `$body` with `$a` bound to the inner array of any variant.
macro_rules! with_array {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            DecodedArray::Int8($a) => $body,
            DecodedArray::UInt8($a) => $body,
            DecodedArray::Int16($a) => $body,
            DecodedArray::UInt16($a) => $body,
            DecodedArray::Int32($a) => $body,
            DecodedArray::UInt64($a) => $body,
            DecodedArray::Float32($a) => $body,
            DecodedArray::Float64($a) => $body,
        }
    };
}

/// Like `with_array!`, re-wrapping the result in the same variant.
macro_rules! map_array {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            DecodedArray::Int8($a) => DecodedArray::Int8($body),
            DecodedArray::UInt8($a) => DecodedArray::UInt8($body),
            DecodedArray::Int16($a) => DecodedArray::Int16($body),
            DecodedArray::UInt16($a) => DecodedArray::UInt16($body),
            DecodedArray::Int32($a) => DecodedArray::Int32($body),
            DecodedArray::UInt64($a) => DecodedArray::UInt64($body),
            DecodedArray::Float32($a) => DecodedArray::Float32($body),
            DecodedArray::Float64($a) => DecodedArray::Float64($body),
        }
    };
}

impl DecodedArray {
    /// Element format of the array.
    pub fn dtype(&self) -> ElementFormat {
        match self {
            DecodedArray::Int8(_) => ElementFormat::Int8,
            DecodedArray::UInt8(_) => ElementFormat::UInt8,
            DecodedArray::Int16(_) => ElementFormat::Int16,
            DecodedArray::UInt16(_) => ElementFormat::UInt16,
            DecodedArray::Int32(_) => ElementFormat::Int32,
            DecodedArray::UInt64(_) => ElementFormat::UInt64,
            DecodedArray::Float32(_) => ElementFormat::Float32,
            DecodedArray::Float64(_) => ElementFormat::Float64,
        }
    }

    /// Per-axis extents.
    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    /// Whether any axis has zero extent.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extent of the trailing channel axis of a 3-D image, 1 otherwise.
    pub fn channel_count(&self) -> usize {
        match self.shape() {
            [_, _, channels] => *channels,
            _ => 1,
        }
    }

    /// Move the typed array out, or get `self` back if `T` does not match.
    pub fn into_array<T: Element>(self) -> Result<ArrayD<T>, DecodedArray> {
        T::from_decoded(self)
    }

    /// Borrow the typed array if `T` matches.
    pub fn view<T: Element>(&self) -> Option<ArrayViewD<'_, T>> {
        T::view(self)
    }

    /// Serialise all cells in row-major order.
    pub fn to_bytes(&self, byte_order: ByteOrder) -> Vec<u8> {
        with_array!(self, a => {
            let mut out = Vec::with_capacity(a.len() * self.dtype().size_in_bytes());
            for &value in a.iter() {
                value.write(byte_order, &mut out);
            }
            out
        })
    }

    /// Widen every cell to f64.
    pub fn to_f64(&self) -> ArrayD<f64> {
        with_array!(self, a => a.mapv(Element::to_f64))
    }

    /// Append a single-channel axis to a 2-D image; other shapes pass
    /// through unchanged.
    pub fn with_channel_axis(self) -> DecodedArray {
        if self.ndim() != 2 {
            return self;
        }
        map_array!(self, a => a.insert_axis(Axis(2)))
    }

    /// Sub-array at `index` along `axis`, with that axis removed.
    ///
    /// # Panics
    /// Panics if `axis` or `index` is out of bounds.
    pub fn index_axis(&self, axis: usize, index: usize) -> DecodedArray {
        map_array!(self, a => a.index_axis(Axis(axis), index).to_owned())
    }
}

impl<T: Element> From<ArrayD<T>> for DecodedArray {
    fn from(array: ArrayD<T>) -> Self {
        T::wrap(array)
    }
}

// =============================================================================
// Tests
// =============================================================================
