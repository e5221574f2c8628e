//! bright-icons-renderer: App icon composition and export
//!
//! This crate turns an [`EditorState`] (a background shape, an optional
//! pattern, an optional vector or bitmap foreground and its placement) into a
//! self-contained SVG document, and exports that document as SVG, PNG or
//! JPEG.
//!
//! # Example
//!
//! ```
//! use bright_icons_renderer::{
//!     build_markup, vector_foreground, BackgroundPattern, BackgroundShape, EditorState,
//! };
//!
//! let state = EditorState::new()
//!     .with_background_shape(BackgroundShape::Hexagon)
//!     .with_background_pattern(BackgroundPattern::Dots)
//!     .with_foreground(vector_foreground(
//!         r#"<svg width="24" height="24"><circle cx="12" cy="12" r="8"/></svg>"#,
//!     ))
//!     .with_tint("#ffffff")
//!     .with_scale(1.25);
//!
//! let markup = build_markup(&state);
//! assert!(markup.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
//! ```
//!
//! # Serializable State
//!
//! The editor state round-trips through camelCase JSON, so a frontend can
//! hand it over as-is:
//!
//! ```
//! use bright_icons_renderer::EditorState;
//!
//! let state = EditorState::from_json(r#"{"backgroundShape": "circle", "scale": 2}"#).unwrap();
//! let json = state.to_json().unwrap();
//! assert!(json.contains("\"backgroundShape\":\"circle\""));
//! ```
//!
//! Exporting goes through [`Exporter`], which talks to the host only via the
//! [`BlobStore`], [`Clipboard`] and [`Downloads`] traits.

pub mod error;
pub mod export;
pub mod geometry;
pub mod markup;
mod normalize;
pub mod state;
mod upload;

pub use error::{ExportError, ForegroundError, MalformedMarkup, OptionsError, StateError};
pub use export::platform::{
    BlobHandle, BlobStore, BlobUrl, Clipboard, DirectoryDownloads, Downloads, MemoryBlobStore,
    MemoryClipboard, MemoryDownloads,
};
pub use export::{Artifact, ExportFormat, ExportOptions, Exporter, RasterFormat};
pub use geometry::Point;
pub use markup::{Composition, build_markup};
pub use normalize::{normalize_foreign_markup, try_normalize};
pub use state::{
    BackgroundPattern, BackgroundShape, EditorState, Foreground, ForegroundKind, MAX_SCALE,
    MIN_SCALE,
};
pub use upload::{bitmap_foreground, data_uri, foreground_from_path, foreground_from_upload, vector_foreground};
