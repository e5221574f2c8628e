//! Rasterization of composed markup.
//!
//! Raster export runs in two stages:
//!
//! 1. [`decode_stage`] reads the SVG blob and parses it into a render tree.
//!    This is where malformed markup fails.
//! 2. [`encode_stage`] renders the tree into a square pixmap and encodes it
//!    as PNG or JPEG.
//!
//! [`rasterize_markup`] runs both back to back without a blob.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use log::debug;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::platform::BlobHandle;
use super::{ExportOptions, RasterFormat};
use crate::error::ExportError;

// ============================================================================
// Stages
// ============================================================================

/// Parses `bytes` as an SVG document.
pub fn decode(bytes: &[u8]) -> Result<Tree, ExportError> {
    let tree = Tree::from_data(bytes, &Options::default())?;
    Ok(tree)
}

/// Decodes the SVG held by `blob`.
///
/// This is the pipeline's only suspension point. The caller keeps `blob`
/// alive until the returned future resolves and drops it afterwards,
/// whatever the outcome.
pub async fn decode_stage(blob: &BlobHandle<'_>) -> Result<Tree, ExportError> {
    let bytes = blob
        .read()
        .ok_or_else(|| ExportError::BlobUnavailable(blob.url().to_string()))?;
    decode(&bytes)
}

/// Renders `tree` into a `pixel_size` square and encodes it.
///
/// The document is stretched to fill the square, like drawing an image
/// into a canvas of that size.
pub fn encode_stage(
    tree: &Tree,
    pixel_size: u32,
    format: RasterFormat,
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let image = render_tree(tree, pixel_size)?;
    match format {
        RasterFormat::Png => encode_png(&image),
        RasterFormat::Jpeg => {
            let matte = options.matte()?;
            encode_jpeg(&flatten(&image, matte), options.jpeg_quality)
        }
    }
}

/// Decodes and encodes `markup` in one go.
pub fn rasterize_markup(
    markup: &str,
    pixel_size: u32,
    format: RasterFormat,
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let tree = decode(markup.as_bytes())?;
    encode_stage(&tree, pixel_size, format, options)
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders a tree into an RGBA image of `pixel_size` x `pixel_size`.
pub fn render_tree(tree: &Tree, pixel_size: u32) -> Result<RgbaImage, ExportError> {
    let mut pixmap = Pixmap::new(pixel_size, pixel_size).ok_or(ExportError::Surface { size: pixel_size })?;

    let svg_size = tree.size();
    let sx = pixel_size as f32 / svg_size.width();
    let sy = pixel_size as f32 / svg_size.height();
    debug!(
        "rendering {}x{} document at {pixel_size}px",
        svg_size.width(),
        svg_size.height()
    );
    resvg::render(tree, Transform::from_scale(sx, sy), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let mut img = RgbaImage::new(width, pixmap.height());

    // tiny_skia stores premultiplied alpha
    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

/// Composites `image` over an opaque `matte`, dropping the alpha channel.
pub fn flatten(image: &RgbaImage, matte: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let src = image.get_pixel(x, y);
        let alpha = src[3] as f32 / 255.0;
        let blend = |s: u8, d: u8| -> u8 {
            (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8
        };
        Rgb([
            blend(src[0], matte[0]),
            blend(src[1], matte[1]),
            blend(src[2], matte[2]),
        ])
    })
}

// ============================================================================
// Encoding
// ============================================================================

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|source| ExportError::Encode {
            format: "PNG",
            source,
        })?;
    Ok(buf)
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|source| ExportError::Encode {
            format: "JPEG",
            source,
        })?;
    Ok(buf)
}

// ============================================================================
// Tests
// ============================================================================
