//! Error types.

use resvg::usvg;
use thiserror::Error;

/// Why an [`EditorState`](crate::EditorState) cannot be rendered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("canvas size must be positive")]
    NonPositiveCanvas,

    #[error("scale must be positive, got {scale}")]
    NonPositiveScale { scale: f64 },
}

/// Foreign vector text that could not be normalized.
///
/// Never escapes the normalizer: the input is passed through instead.
#[derive(Debug, Error)]
pub enum MalformedMarkup {
    #[error("not an XML document: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("no <svg> element found")]
    MissingRoot,
}

/// Failure to turn an uploaded file into a foreground.
#[derive(Debug, Error)]
pub enum ForegroundError {
    #[error("unsupported bitmap format (expected PNG or JPEG)")]
    UnsupportedBitmap,

    #[error("vector upload is not valid UTF-8")]
    InvalidText(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure while parsing [`ExportOptions`](crate::ExportOptions).
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid matte color {0:?}")]
    InvalidMatte(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failure of a single export or copy attempt.
///
/// None of these touch the editor state; the caller may simply retry.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The platform refused clipboard access.
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    /// The composed markup could not be decoded as an image.
    #[error("failed to decode SVG for rasterization: {0}")]
    RasterDecode(#[from] usvg::Error),

    #[error("blob {0} is no longer available")]
    BlobUnavailable(String),

    #[error("cannot allocate a {size}x{size} raster surface")]
    Surface { size: u32 },

    #[error("failed to encode {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
