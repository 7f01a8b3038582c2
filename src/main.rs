//! imgcodec - command-line front end for the image table codec.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imagetable_codec::{
    config::{Cli, Command, DecodeRowConfig, InspectConfig, PreviewConfig},
    preview::{encode_jpeg, slice_volume, to_preview_image, Window},
    ByteOrder, RowDecoder, WideImageCodec,
};

fn main() -> ExitCode {
    let (verbose, command) = Cli::parse().into_parts();
    init_logging(verbose);

    match command {
        Command::Inspect(config) => run_inspect(config),
        Command::DecodeRow(config) => run_decode_row(config),
        Command::Preview(config) => run_preview(config),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "imagetable_codec=debug,imgcodec=debug"
    } else {
        "imagetable_codec=info,imgcodec=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_input(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => {
            debug!(path = %path.display(), bytes = bytes.len(), "Read input");
            Some(bytes)
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> bool {
    match fs::write(path, bytes) {
        Ok(()) => {
            info!("Wrote {} bytes to {}", bytes.len(), path.display());
            true
        }
        Err(e) => {
            error!("Failed to write {}: {}", path.display(), e);
            false
        }
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

fn run_inspect(config: InspectConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let Some(bytes) = read_input(&config.input) else {
        return ExitCode::FAILURE;
    };

    let codec = WideImageCodec::new().with_byte_order(config.byte_order.into());
    let header = match codec.header(&bytes) {
        Ok(header) => header,
        Err(e) => {
            error!("Invalid wide image {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let payload_len = match header.payload_len() {
        Ok(len) => len,
        Err(e) => {
            error!("Invalid wide image {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let json = serde_json::json!({
        "path": config.input.display().to_string(),
        "header": header,
        "dtype_code": header.dtype.code(),
        "element_format": header.dtype.element_format(),
        "shape": header.shape(),
        "payload_bytes": payload_len,
        "file_bytes": bytes.len(),
    });

    match serde_json::to_string_pretty(&json) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize header: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Decode Row Command
// =============================================================================

fn run_decode_row(config: DecodeRowConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let Some(bytes) = read_input(&config.input) else {
        return ExitCode::FAILURE;
    };

    let byte_order: ByteOrder = config.byte_order.into();
    let decoder = RowDecoder::new()
        .with_byte_order(byte_order)
        .legacy_fallback(config.legacy_fallback);

    let array = match decoder.decode(
        &bytes,
        config.dimension(),
        &config.resolution,
        &config.format,
        config.channels,
    ) {
        Ok(array) => array,
        Err(e) => {
            error!("Failed to decode {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Decoded {} as {} array with shape {:?}",
        config.input.display(),
        array.dtype(),
        array.shape()
    );

    let Some(ref output) = config.output else {
        return ExitCode::SUCCESS;
    };

    let encoded = match WideImageCodec::new()
        .with_byte_order(byte_order)
        .encode(&array.with_channel_axis())
    {
        Ok(encoded) => encoded,
        Err(e) => {
            error!("Failed to encode wide image: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if write_output(output, &encoded) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// =============================================================================
// Preview Command
// =============================================================================

fn run_preview(config: PreviewConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let Some(bytes) = read_input(&config.input) else {
        return ExitCode::FAILURE;
    };

    let source = config.source();
    let mut array = match source.decode(&bytes, config.byte_order.into()) {
        Ok(array) => array,
        Err(e) => {
            error!("Failed to decode {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };
    debug!(
        ?source,
        dtype = %array.dtype(),
        shape = ?array.shape(),
        "Decoded preview input"
    );

    if let Some(index) = config.slice {
        array = match slice_volume(&array, config.slice_axis, index) {
            Ok(slice) => slice,
            Err(e) => {
                error!("Failed to slice {}: {}", config.input.display(), e);
                return ExitCode::FAILURE;
            }
        };
    }

    let jpeg = Window::new(config.window_min, config.window_max)
        .and_then(|window| to_preview_image(&array, &window))
        .and_then(|image| encode_jpeg(&image, config.quality));

    match jpeg {
        Ok(jpeg) if write_output(&config.output, &jpeg) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("Failed to render preview: {}", e);
            ExitCode::FAILURE
        }
    }
}
