//! Patient-space geometry of biomedical images.
//!
//! Volumes loaded from medical formats carry three extra columns, each a
//! packed run of float64 values:
//!
//! - `_position_`: world coordinate of the first voxel, `dim` values
//! - `_orientation_`: direction cosines, `dim * dim` values, row-major
//! - `_spacing_`: voxel size along each axis, `dim` values
//!
//! Tables loaded from natural images have none of these columns; the
//! decoder then yields an empty [`GeometryRecord`] instead of failing.

use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::error::CodecError;
use crate::format::{parse_f64_array, ByteOrder};

/// Position, orientation and spacing of one image.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeometryRecord {
    pub position: Vec<f64>,
    pub orientation: Vec<f64>,
    pub spacing: Vec<f64>,
}

impl GeometryRecord {
    /// Record for a table without geometry columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the record carries no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.position.is_empty() && self.orientation.is_empty() && self.spacing.is_empty()
    }

    /// Number of spatial axes.
    pub fn dimension(&self) -> usize {
        self.position.len()
    }

    /// Orientation as a `dim x dim` matrix, `None` for an empty record.
    pub fn orientation_matrix(&self) -> Option<Array2<f64>> {
        let dim = self.dimension();
        if dim == 0 {
            return None;
        }
        Array2::from_shape_vec((dim, dim), self.orientation.clone()).ok()
    }

    /// World coordinate of a (possibly fractional) voxel index.
    ///
    /// Computes `position + orientation * diag(spacing) * index`. Returns
    /// `None` if the record is empty or `index` has the wrong length.
    pub fn index_to_world(&self, index: &[f64]) -> Option<Vec<f64>> {
        let orientation = self.orientation_matrix()?;
        if index.len() != self.dimension() || self.spacing.len() != self.dimension() {
            return None;
        }

        let scaled = Array1::from(index.to_vec()) * &Array1::from(self.spacing.clone());
        let world = orientation.dot(&scaled) + &Array1::from(self.position.clone());
        Some(world.to_vec())
    }
}

/// Borrowed geometry column values for one row.
#[derive(Debug, Clone, Copy)]
pub struct GeometryBuffers<'a> {
    pub position: &'a [u8],
    pub orientation: &'a [u8],
    pub spacing: &'a [u8],
}

/// Stateless decoder for geometry columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryDecoder {
    byte_order: ByteOrder,
}

impl GeometryDecoder {
    /// Create a little-endian geometry decoder.
    pub const fn new() -> Self {
        Self {
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// Use a different byte order.
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Decode the three geometry buffers of a `dim`-axis image.
    ///
    /// # Errors
    /// `BufferUnderrun` if any buffer is shorter than its value count needs.
    pub fn decode(
        &self,
        position: &[u8],
        orientation: &[u8],
        spacing: &[u8],
        dim: usize,
    ) -> Result<GeometryRecord, CodecError> {
        let cosines = dim.checked_mul(dim).ok_or_else(|| CodecError::InvalidShape {
            shape: vec![dim as i64, dim as i64],
            message: "orientation size overflows".to_string(),
        })?;

        Ok(GeometryRecord {
            position: parse_f64_array(position, dim, self.byte_order)?,
            orientation: parse_f64_array(orientation, cosines, self.byte_order)?,
            spacing: parse_f64_array(spacing, dim, self.byte_order)?,
        })
    }

    /// Decode geometry if the source has geometry columns, or return an
    /// empty record if it does not.
    pub fn decode_optional(
        &self,
        buffers: Option<GeometryBuffers<'_>>,
        dim: usize,
    ) -> Result<GeometryRecord, CodecError> {
        match buffers {
            Some(buffers) => self.decode(
                buffers.position,
                buffers.orientation,
                buffers.spacing,
                dim,
            ),
            None => Ok(GeometryRecord::empty()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
