//! Command-line configuration for the `imgcodec` tool.
//!
//! Every option can also be set through an environment variable with the
//! `IMGCODEC_` prefix:
//!
//! - `IMGCODEC_VERBOSE` - Enable debug logging
//! - `IMGCODEC_BYTE_ORDER` - Byte order of packed numbers (default: little)
//! - `IMGCODEC_FORMAT` - Format tag of raw rows (default: empty, legacy BGR)
//! - `IMGCODEC_CHANNELS` - Channel count of raw rows (default: 1)
//! - `IMGCODEC_LEGACY_FALLBACK` - Decode unknown tags as packed BGR
//! - `IMGCODEC_JPEG_QUALITY` - Preview JPEG quality (default: 80)
//! - `IMGCODEC_WINDOW_MIN` / `IMGCODEC_WINDOW_MAX` - Preview window (default: -100..400)
//!
//! # Example
//!
//! ```bash
//! imgcodec inspect volume.wide
//! imgcodec decode-row row.bin --format 16S --resolution 512,512 --output row.wide
//! imgcodec preview row.wide --output row.jpg --window-min -1000 --window-max 1000
//! imgcodec preview ct.bin --format 16S --resolution 64,512,512 --slice 32 --output ct.jpg
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::format::ByteOrder;
use crate::preview::{
    PreviewSource, DEFAULT_JPEG_QUALITY, DEFAULT_WINDOW_MAX, DEFAULT_WINDOW_MIN,
    MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// imgcodec - Decode and encode image table rows.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgcodec")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false, env = "IMGCODEC_VERBOSE")]
    pub verbose: bool,
}

impl Cli {
    /// Split into the verbosity flag and the selected subcommand.
    pub fn into_parts(self) -> (bool, Command) {
        (self.verbose, self.command)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the header of a wide image file as JSON.
    Inspect(InspectConfig),

    /// Decode a raw row buffer and optionally re-encode it as a wide image.
    DecodeRow(DecodeRowConfig),

    /// Render a wide image or a raw row buffer as a JPEG preview.
    Preview(PreviewConfig),
}

/// Byte order of packed numbers on disk.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrderArg {
    #[default]
    Little,
    Big,
    Native,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Little => ByteOrder::LittleEndian,
            ByteOrderArg::Big => ByteOrder::BigEndian,
            ByteOrderArg::Native => ByteOrder::native(),
        }
    }
}

// =============================================================================
// Inspect
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    /// Wide image file to inspect.
    pub input: PathBuf,

    /// Byte order of the header fields.
    #[arg(long, value_enum, default_value_t = ByteOrderArg::Little, env = "IMGCODEC_BYTE_ORDER")]
    pub byte_order: ByteOrderArg,
}

impl InspectConfig {
    /// Check that an input path was given.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.as_os_str().is_empty() {
            return Err("Input path is required".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Decode Row
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct DecodeRowConfig {
    /// Raw row buffer to decode.
    pub input: PathBuf,

    /// Element format tag of the row (8U, 16S, 32F, ...).
    ///
    /// An empty tag selects the legacy packed BGR layout.
    #[arg(long, default_value = "", env = "IMGCODEC_FORMAT")]
    pub format: String,

    /// Row-major extents, comma-separated (for example `height,width`).
    #[arg(long, value_delimiter = ',', required = true)]
    pub resolution: Vec<usize>,

    /// Number of interleaved channels.
    #[arg(long, default_value_t = 1, env = "IMGCODEC_CHANNELS")]
    pub channels: usize,

    /// Decode unknown format tags as legacy packed BGR instead of failing.
    #[arg(long, default_value_t = false, env = "IMGCODEC_LEGACY_FALLBACK")]
    pub legacy_fallback: bool,

    /// Write the decoded array to this path as a wide image.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Byte order of the row buffer and of the output.
    #[arg(long, value_enum, default_value_t = ByteOrderArg::Little, env = "IMGCODEC_BYTE_ORDER")]
    pub byte_order: ByteOrderArg,
}

impl DecodeRowConfig {
    /// Check the resolution and channel count before any bytes are read.
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution.is_empty() {
            return Err("Resolution must list at least one extent".to_string());
        }

        if self.channels == 0 {
            return Err("channels must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Number of axes described by the resolution.
    pub fn dimension(&self) -> usize {
        self.resolution.len()
    }
}

// =============================================================================
// Preview
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct PreviewConfig {
    /// Wide image file, or raw row buffer when `--resolution` is set.
    pub input: PathBuf,

    /// Element format tag of a raw row input.
    #[arg(long, default_value = "", env = "IMGCODEC_FORMAT")]
    pub format: String,

    /// Row-major extents of a raw row input, comma-separated.
    ///
    /// Without it the input is read as a wide image.
    #[arg(long, value_delimiter = ',')]
    pub resolution: Vec<usize>,

    /// Number of interleaved channels of a raw row input.
    #[arg(long, default_value_t = 1, env = "IMGCODEC_CHANNELS")]
    pub channels: usize,

    /// Decode unknown format tags of a raw row as legacy packed BGR.
    #[arg(long, default_value_t = false, env = "IMGCODEC_LEGACY_FALLBACK")]
    pub legacy_fallback: bool,

    /// Output JPEG path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "IMGCODEC_JPEG_QUALITY")]
    pub quality: u8,

    /// Intensity mapped to black for non-uint8 images.
    #[arg(
        long,
        default_value_t = DEFAULT_WINDOW_MIN,
        allow_negative_numbers = true,
        env = "IMGCODEC_WINDOW_MIN"
    )]
    pub window_min: f64,

    /// Intensity mapped to white for non-uint8 images.
    #[arg(
        long,
        default_value_t = DEFAULT_WINDOW_MAX,
        allow_negative_numbers = true,
        env = "IMGCODEC_WINDOW_MAX"
    )]
    pub window_max: f64,

    /// Render only this slice of a 3-axis raw row volume.
    #[arg(long)]
    pub slice: Option<usize>,

    /// Volume axis to slice along when `--slice` is set.
    #[arg(long, default_value_t = 0)]
    pub slice_axis: usize,

    /// Byte order of the header and payload.
    #[arg(long, value_enum, default_value_t = ByteOrderArg::Little, env = "IMGCODEC_BYTE_ORDER")]
    pub byte_order: ByteOrderArg,
}

impl PreviewConfig {
    /// Check quality, window and slice options before any bytes are read.
    pub fn validate(&self) -> Result<(), String> {
        if self.quality < MIN_JPEG_QUALITY || self.quality > MAX_JPEG_QUALITY {
            return Err("quality must be between 1 and 100".to_string());
        }

        if !self.window_min.is_finite() || !self.window_max.is_finite() {
            return Err("window bounds must be finite".to_string());
        }

        if self.window_min >= self.window_max {
            return Err(format!(
                "window_min ({}) must be less than window_max ({})",
                self.window_min, self.window_max
            ));
        }

        if self.is_raw_row() && self.channels == 0 {
            return Err("channels must be greater than 0".to_string());
        }

        if self.slice.is_some() {
            if self.resolution.len() != 3 {
                return Err("--slice needs a 3-axis --resolution".to_string());
            }
            if self.slice_axis > 2 {
                return Err("slice_axis must be 0, 1 or 2".to_string());
            }
        }

        Ok(())
    }

    /// Whether the input is a raw row rather than a wide image.
    pub fn is_raw_row(&self) -> bool {
        !self.resolution.is_empty()
    }

    /// Encoding of the input buffer.
    pub fn source(&self) -> PreviewSource {
        if !self.is_raw_row() {
            return PreviewSource::Wide;
        }
        PreviewSource::Row {
            format: self.format.clone(),
            resolution: self.resolution.clone(),
            channels: self.channels,
            legacy_fallback: self.legacy_fallback,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
