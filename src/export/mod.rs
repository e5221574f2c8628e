//! Export of compositions as files or clipboard text.
//!
//! Every operation composes fresh markup from the state it is given and
//! never writes back into it. A failed export leaves nothing behind: the
//! temporary SVG blob used by the raster path is scoped to the call.
//!
//! # Example
//!
//! ```
//! use bright_icons_renderer::{
//!     EditorState, Exporter, MemoryBlobStore, MemoryClipboard, MemoryDownloads, RasterFormat,
//! };
//!
//! let blobs = MemoryBlobStore::new();
//! let clipboard = MemoryClipboard::new();
//! let downloads = MemoryDownloads::new();
//! let exporter = Exporter::new(&blobs, &clipboard, &downloads);
//!
//! let state = EditorState::new();
//! exporter.export_svg(&state).unwrap();
//! let png = futures::executor::block_on(exporter.export_raster(&state, RasterFormat::Png)).unwrap();
//! assert_eq!(png.file_name, "icon.png");
//! ```

pub mod platform;
pub mod raster;

use log::{debug, warn};
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, OptionsError};
use crate::markup::build_markup;
use crate::state::EditorState;

use self::platform::{BlobHandle, BlobStore, Clipboard, Downloads};

/// MIME type of exported SVG files.
pub const SVG_MIME: &str = "image/svg+xml";

/// MIME type of the temporary blob fed to the raster decoder.
const SVG_BLOB_MIME: &str = "image/svg+xml;charset=utf-8";

// ============================================================================
// Formats
// ============================================================================

/// A bitmap output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Any downloadable output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    Png,
    Jpeg,
}

impl ExportFormat {
    /// The raster format, or `None` for SVG.
    pub fn raster(self) -> Option<RasterFormat> {
        match self {
            Self::Svg => None,
            Self::Png => Some(RasterFormat::Png),
            Self::Jpeg => Some(RasterFormat::Jpeg),
        }
    }
}

// ============================================================================
// ExportOptions
// ============================================================================

/// Tunables of the export pipeline.
///
/// # JSON Format
///
/// ```json
/// { "supersample": 2, "jpegQuality": 95, "fileStem": "icon", "jpegMatte": "#000000" }
/// ```
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Raster side length as a multiple of the canvas size.
    pub supersample: u32,

    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,

    /// File name without extension.
    pub file_stem: String,

    /// Color that transparent areas become in JPEG output.
    pub jpeg_matte: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            supersample: 2,
            jpeg_quality: 95,
            file_stem: "icon".to_string(),
            jpeg_matte: "#000000".to_string(),
        }
    }
}

impl ExportOptions {
    /// The parsed JPEG matte color.
    pub fn matte(&self) -> Result<image::Rgb<u8>, OptionsError> {
        let color: Srgb<u8> = self
            .jpeg_matte
            .parse()
            .map_err(|_| OptionsError::InvalidMatte(self.jpeg_matte.clone()))?;
        Ok(image::Rgb([color.red, color.green, color.blue]))
    }

    /// Side length in pixels of raster output for `state`.
    pub fn pixel_size(&self, state: &EditorState) -> u32 {
        state.canvas_size.saturating_mul(self.supersample.max(1))
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.file_stem)
    }

    /// Serializes the options to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes and checks options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.matte()?;
        Ok(options)
    }
}

// ============================================================================
// Artifact
// ============================================================================

/// A finished file, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

// ============================================================================
// Exporter
// ============================================================================

/// Runs exports against a set of platform services.
pub struct Exporter<'p> {
    blobs: &'p dyn BlobStore,
    clipboard: &'p dyn Clipboard,
    downloads: &'p dyn Downloads,
    options: ExportOptions,
}

impl<'p> Exporter<'p> {
    /// Creates an exporter with default [`ExportOptions`].
    pub fn new(
        blobs: &'p dyn BlobStore,
        clipboard: &'p dyn Clipboard,
        downloads: &'p dyn Downloads,
    ) -> Self {
        Self {
            blobs,
            clipboard,
            downloads,
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Downloads the composition as an SVG file.
    pub fn export_svg(&self, state: &EditorState) -> Result<Artifact, ExportError> {
        let artifact = Artifact {
            file_name: self.options.file_name("svg"),
            mime: SVG_MIME,
            bytes: build_markup(state).into_bytes(),
        };
        self.deliver(artifact)
    }

    /// Puts the composition's SVG text on the clipboard.
    ///
    /// A refusal is returned as [`ExportError::ClipboardUnavailable`] so the
    /// caller does not report a copy that never happened.
    pub fn copy_svg(&self, state: &EditorState) -> Result<(), ExportError> {
        let markup = build_markup(state);
        self.clipboard.write_text(&markup).map_err(|reason| {
            warn!("clipboard write refused: {reason}");
            ExportError::ClipboardUnavailable(reason)
        })
    }

    /// Downloads the composition as a PNG or JPEG at the supersampled size.
    pub async fn export_raster(
        &self,
        state: &EditorState,
        format: RasterFormat,
    ) -> Result<Artifact, ExportError> {
        let pixel_size = self.options.pixel_size(state);
        let markup = build_markup(state);

        let decoded = {
            let blob = BlobHandle::create(self.blobs, markup.into_bytes(), SVG_BLOB_MIME);
            raster::decode_stage(&blob).await
        };
        let tree = decoded.inspect_err(|err| warn!("raster export failed: {err}"))?;

        debug!("encoding {format:?} at {pixel_size}px");
        let bytes = raster::encode_stage(&tree, pixel_size, format, &self.options)?;
        self.deliver(Artifact {
            file_name: self.options.file_name(format.extension()),
            mime: format.mime(),
            bytes,
        })
    }

    /// Downloads the composition in any format.
    pub async fn export(
        &self,
        state: &EditorState,
        format: ExportFormat,
    ) -> Result<Artifact, ExportError> {
        match format.raster() {
            Some(raster) => self.export_raster(state, raster).await,
            None => self.export_svg(state),
        }
    }

    fn deliver(&self, artifact: Artifact) -> Result<Artifact, ExportError> {
        self.downloads.deliver(&artifact)?;
        debug!(
            "delivered {} ({} bytes)",
            artifact.file_name,
            artifact.bytes.len()
        );
        Ok(artifact)
    }
}

// ============================================================================
// Tests
// ============================================================================
