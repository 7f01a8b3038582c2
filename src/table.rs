//! Reading images out of fetched image table rows.
//!
//! The analytics engine returns a fetch as a set of named columns. Image
//! tables use a fixed naming convention (`_image_`, `_dimension_`, ...),
//! which [`ImageColumns`] captures and lets callers override.
//! [`ImageTableReader`] ties the columns to the batch and geometry decoders.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::array::DecodedArray;
use crate::decode::BatchArrayFetcher;
use crate::error::{CodecError, TableError};
use crate::geometry::{GeometryDecoder, GeometryRecord};

/// Convert a variable name into the engine's reserved column form.
///
/// Braces become underscores and the result is wrapped in underscores, so
/// `"id"` becomes `"_id_"` and `"{x}"` becomes `"__x__"`.
pub fn cas_column_name(name: &str) -> String {
    format!("_{}_", name.replace(['{', '}'], "_"))
}

// =============================================================================
// ImageColumns
// =============================================================================

/// Column names used when reading an image table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageColumns {
    pub image: String,
    pub dimension: String,
    pub resolution: String,
    pub channel_type: String,
    pub position: String,
    pub orientation: String,
    pub spacing: String,
}

impl Default for ImageColumns {
    fn default() -> Self {
        Self {
            image: "_image_".to_string(),
            dimension: "_dimension_".to_string(),
            resolution: "_resolution_".to_string(),
            channel_type: "_channelType_".to_string(),
            position: "_position_".to_string(),
            orientation: "_orientation_".to_string(),
            spacing: "_spacing_".to_string(),
        }
    }
}

// =============================================================================
// FetchedRows
// =============================================================================

/// Values of one fetched column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Binary(Vec<Bytes>),
    Integer(Vec<i64>),
    Text(Vec<String>),
}

impl Column {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            Column::Binary(values) => values.len(),
            Column::Integer(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }

    /// Whether the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory result of fetching rows from an image table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedRows {
    columns: HashMap<String, Column>,
}

impl FetchedRows {
    /// Create an empty fetch result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, replacing any column with the same name.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.insert(name, column);
        self
    }

    /// Add a column, replacing any column with the same name.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        self.columns.insert(name.into(), column);
    }

    /// Whether a column is present.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Number of rows, taken as the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.values().map(Column::len).max().unwrap_or(0)
    }

    fn require(&self, name: &str) -> Result<&Column, TableError> {
        self.column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Borrow a binary column.
    pub fn binary(&self, name: &str) -> Result<&[Bytes], TableError> {
        match self.require(name)? {
            Column::Binary(values) => Ok(values),
            _ => Err(column_type(name, "binary")),
        }
    }

    /// Borrow an integer column.
    pub fn integers(&self, name: &str) -> Result<&[i64], TableError> {
        match self.require(name)? {
            Column::Integer(values) => Ok(values),
            _ => Err(column_type(name, "integer")),
        }
    }

    /// Borrow a text column.
    pub fn texts(&self, name: &str) -> Result<&[String], TableError> {
        match self.require(name)? {
            Column::Text(values) => Ok(values),
            _ => Err(column_type(name, "text")),
        }
    }
}

fn column_type(name: &str, expected: &'static str) -> TableError {
    TableError::ColumnType {
        column: name.to_string(),
        expected,
    }
}

// =============================================================================
// ImageTableReader
// =============================================================================

/// Decodes images and geometry from [`FetchedRows`].
#[derive(Debug, Clone, Default)]
pub struct ImageTableReader {
    columns: ImageColumns,
    fetcher: BatchArrayFetcher,
    geometry: GeometryDecoder,
}

impl ImageTableReader {
    /// Create a reader with the default column names and decoders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom column names.
    pub fn with_columns(mut self, columns: ImageColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Use a custom batch fetcher.
    pub fn with_fetcher(mut self, fetcher: BatchArrayFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Use a custom geometry decoder.
    pub fn with_geometry_decoder(mut self, geometry: GeometryDecoder) -> Self {
        self.geometry = geometry;
        self
    }

    /// Column names in use.
    pub fn columns(&self) -> &ImageColumns {
        &self.columns
    }

    /// Decode the image in row `n`.
    pub fn fetch_image_array(
        &self,
        rows: &FetchedRows,
        n: usize,
        channel_count: usize,
    ) -> Result<DecodedArray, TableError> {
        let formats = rows.texts(&self.columns.channel_type)?;
        debug!(
            row = n,
            format = formats.get(n).map(String::as_str).unwrap_or(""),
            channel_count,
            "Decoding image row"
        );

        Ok(self.fetcher.get(
            rows.binary(&self.columns.image)?,
            rows.integers(&self.columns.dimension)?,
            rows.binary(&self.columns.resolution)?,
            formats,
            n,
            channel_count,
        )?)
    }

    /// Decode the image in row `n` with a fixed channel type, ignoring the
    /// channel type column.
    pub fn fetch_image_array_const_ctype(
        &self,
        rows: &FetchedRows,
        ctype: &str,
        n: usize,
        channel_count: usize,
    ) -> Result<DecodedArray, TableError> {
        debug!(
            row = n,
            format = ctype,
            channel_count,
            "Decoding image row with constant channel type"
        );

        Ok(self.fetcher.get_with_format(
            rows.binary(&self.columns.image)?,
            rows.integers(&self.columns.dimension)?,
            rows.binary(&self.columns.resolution)?,
            ctype,
            n,
            channel_count,
        )?)
    }

    /// Decode every image in the fetch, in row order.
    pub fn fetch_all(
        &self,
        rows: &FetchedRows,
        channel_count: usize,
    ) -> Result<Vec<DecodedArray>, TableError> {
        let binaries = rows.binary(&self.columns.image)?;
        debug!(rows = binaries.len(), channel_count, "Decoding all image rows");

        Ok(self.fetcher.get_all(
            binaries,
            rows.integers(&self.columns.dimension)?,
            rows.binary(&self.columns.resolution)?,
            rows.texts(&self.columns.channel_type)?,
            channel_count,
        )?)
    }

    /// Decode the geometry of row `n`.
    ///
    /// Returns an empty record if any of the position, orientation or
    /// spacing columns is missing from the fetch.
    pub fn fetch_geometry_info(
        &self,
        rows: &FetchedRows,
        n: usize,
    ) -> Result<GeometryRecord, TableError> {
        let columns = &self.columns;
        if ![&columns.position, &columns.orientation, &columns.spacing]
            .iter()
            .all(|name| rows.has_column(name))
        {
            debug!(row = n, "No geometry columns in fetch");
            return Ok(GeometryRecord::empty());
        }

        let dimensions = rows.integers(&columns.dimension)?;
        let raw_dimension = *dimensions.get(n).ok_or(CodecError::IndexOutOfRange {
            index: n,
            len: dimensions.len(),
        })?;
        let dim = usize::try_from(raw_dimension)
            .map_err(|_| CodecError::InvalidResolution(raw_dimension))?;

        let position = select(rows.binary(&columns.position)?, n)?;
        let orientation = select(rows.binary(&columns.orientation)?, n)?;
        let spacing = select(rows.binary(&columns.spacing)?, n)?;

        Ok(self.geometry.decode(position, orientation, spacing, dim)?)
    }
}

fn select(values: &[Bytes], index: usize) -> Result<&[u8], CodecError> {
    values
        .get(index)
        .map(|value| value.as_ref())
        .ok_or(CodecError::IndexOutOfRange {
            index,
            len: values.len(),
        })
}

// =============================================================================
// Tests
// =============================================================================
