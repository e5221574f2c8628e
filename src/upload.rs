//! Turning user-supplied files into foregrounds.
//!
//! SVG text goes through [`normalize_foreign_markup`]; PNG and JPEG bytes
//! are wrapped in a base64 data URI so the composer can reference them from
//! an `<image>` element.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

use crate::error::ForegroundError;
use crate::normalize::normalize_foreign_markup;
use crate::state::Foreground;

/// Builds a vector foreground from pasted or uploaded SVG text.
pub fn vector_foreground(text: &str) -> Foreground {
    Foreground::vector(normalize_foreign_markup(text))
}

/// Builds a bitmap foreground from PNG or JPEG bytes.
///
/// The format is sniffed from the bytes, not taken from a file name.
pub fn bitmap_foreground(bytes: &[u8]) -> Result<Foreground, ForegroundError> {
    let mime = match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        _ => return Err(ForegroundError::UnsupportedBitmap),
    };
    Ok(Foreground::bitmap(data_uri(mime, bytes)))
}

/// Builds a foreground from an uploaded file's name and contents.
///
/// Files named `*.svg` are treated as vector text, everything else as a
/// bitmap.
pub fn foreground_from_upload(file_name: &str, bytes: Vec<u8>) -> Result<Foreground, ForegroundError> {
    if is_svg_name(file_name) {
        let text = String::from_utf8(bytes)?;
        Ok(vector_foreground(&text))
    } else {
        bitmap_foreground(&bytes)
    }
}

/// Reads a foreground from a file on disk.
pub fn foreground_from_path(path: impl AsRef<Path>) -> Result<Foreground, ForegroundError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    foreground_from_upload(&name, bytes)
}

fn is_svg_name(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Encodes bytes as a base64 `data:` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
