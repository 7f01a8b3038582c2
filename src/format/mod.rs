//! Binary formats for image table data.
//!
//! This module holds the low-level vocabulary shared by every decoder:
//!
//! - **Byte order**: all packed numbers are read with an explicit
//!   [`ByteOrder`], little-endian unless configured otherwise.
//!
//! - **Element formats**: the eight numeric sample types and the short tags
//!   (`"8U"`, `"32F"`, ...) that name them, resolved through the static
//!   [`ElementFormatRegistry`].
//!
//! - **Pixel layouts**: how a row's tag and channel count map its bytes onto
//!   an array ([`PixelLayout`]).
//!
//! - **Wide images**: the self-describing 32-byte-header format used to ship
//!   arrays back to the analytics engine ([`WideImageCodec`]).

mod byte_order;
mod element;
mod layout;
mod values;
mod wide;

pub use byte_order::ByteOrder;
pub use element::{Element, ElementFormat, ElementFormatRegistry, FormatEntry};
pub use layout::PixelLayout;
pub use values::{
    byte_len, cell_count, parse_array, parse_f64_array, parse_i64_array, write_array,
};
pub use wide::{WideDType, WideHeader, WideImageCodec, WIDE_HEADER_SIZE, WIDE_SENTINEL};
