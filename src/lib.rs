//! # imagetable-codec
//!
//! Binary codec for rows of an image table: typed pixel and voxel arrays
//! rebuilt from raw byte buffers, and the self-describing "wide image"
//! format used to send arrays back.
//!
//! An image table stores each image as a row of parallel columns: the raw
//! payload, the number of axes, a packed per-axis resolution and a short
//! element format tag such as `"8U"` or `"32F"`. Medical volumes carry three
//! more columns with their patient-space geometry.
//!
//! ## Architecture
//!
//! - [`mod@format`] - byte order, element formats, pixel layouts and the
//!   wide image codec
//! - [`decode`] - single-row and batch decoders
//! - [`array`] - the typed [`DecodedArray`] the decoders produce
//! - [`geometry`] - position, orientation and spacing columns
//! - [`table`] - reading images out of fetched table rows
//! - [`preview`] - windowed 8-bit previews and JPEG output
//! - [`config`] - CLI configuration for the `imgcodec` binary
//!
//! ## Example
//!
//! ```rust
//! use imagetable_codec::{RowDecoder, WideImageCodec};
//!
//! let array = RowDecoder::new()
//!     .decode(&[0, 1, 2, 3], 2, &[2, 2], "8U", 1)
//!     .unwrap()
//!     .with_channel_axis();
//!
//! let codec = WideImageCodec::new();
//! let wide = codec.encode(&array).unwrap();
//! assert_eq!(codec.decode(&wide).unwrap(), array);
//! ```

pub mod array;
pub mod config;
pub mod decode;
pub mod error;
pub mod format;
pub mod geometry;
pub mod preview;
pub mod table;

// Re-export commonly used types
pub use array::DecodedArray;
pub use config::{ByteOrderArg, Cli, Command, DecodeRowConfig, InspectConfig, PreviewConfig};
pub use decode::{pack_resolution, unpack_resolution, BatchArrayFetcher, RowDecoder};
pub use error::{CodecError, PreviewError, TableError};
pub use format::{
    ByteOrder, Element, ElementFormat, ElementFormatRegistry, FormatEntry, PixelLayout, WideDType,
    WideHeader, WideImageCodec, WIDE_HEADER_SIZE, WIDE_SENTINEL,
};
pub use geometry::{GeometryBuffers, GeometryDecoder, GeometryRecord};
pub use preview::{
    clamp_quality, encode_jpeg, slice_volume, to_preview_image, PreviewSource, Window,
    DEFAULT_JPEG_QUALITY, DEFAULT_WINDOW_MAX, DEFAULT_WINDOW_MIN, MAX_JPEG_QUALITY,
    MIN_JPEG_QUALITY,
};
pub use table::{cas_column_name, Column, FetchedRows, ImageColumns, ImageTableReader};
