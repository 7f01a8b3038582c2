//! Row and batch decoders.
//!
//! - [`RowDecoder`] turns one raw buffer plus its shape and format metadata
//!   into a [`DecodedArray`](crate::DecodedArray).
//! - [`BatchArrayFetcher`] selects a row from index-aligned column sequences,
//!   unpacks its resolution and delegates to the row decoder.

mod batch;
mod row;

pub use batch::{pack_resolution, unpack_resolution, BatchArrayFetcher};
pub use row::RowDecoder;
