//! Foreground placement.
//!
//! Vector and bitmap foregrounds share the translate/rotate prefix but are
//! sized differently: a vector fragment is scaled and shifted by a fixed
//! anchor, a bitmap is drawn as an `<image>` already sized and centered.

use crate::geometry::format_number;
use crate::markup::filter::filter_attribute;
use crate::state::{EditorState, Foreground, ForegroundKind};

/// Anchor shift applied to vector foregrounds, relative to the canvas side.
///
/// Tuned for a roughly 24-unit icon so its visual center lands on the
/// transform origin. Not derived from the fragment's bounding box.
pub const VECTOR_ANCHOR_RATIO: f64 = 0.3;

/// Side of a bitmap foreground at scale 1, relative to the canvas side.
pub const BITMAP_SIZE_RATIO: f64 = 0.6;

/// The `translate(..) rotate(..)` prefix shared by both kinds.
fn origin_transform(state: &EditorState) -> String {
    let origin = state.center().offset_by(state.offset);
    format!(
        "translate({}, {}) rotate({})",
        format_number(origin.x),
        format_number(origin.y),
        state.rotation_degrees
    )
}

/// The full transform of a vector foreground group.
pub fn vector_transform(state: &EditorState) -> String {
    let anchor = format_number(state.canvas_size as f64 * VECTOR_ANCHOR_RATIO);
    format!(
        "{} scale({}) translate(-{anchor}, -{anchor})",
        origin_transform(state),
        format_number(state.scale)
    )
}

/// Side length of a bitmap foreground in canvas units.
pub fn bitmap_extent(state: &EditorState) -> f64 {
    state.canvas_size as f64 * BITMAP_SIZE_RATIO * state.scale
}

fn bitmap_element(state: &EditorState, href: &str) -> String {
    let extent = bitmap_extent(state);
    let corner = format_number(-extent / 2.0);
    let extent = format_number(extent);
    format!(
        "<image href=\"{href}\" x=\"{corner}\" y=\"{corner}\" width=\"{extent}\" height=\"{extent}\" />"
    )
}

/// The foreground group for `foreground` placed according to `state`.
pub fn foreground_fragment(state: &EditorState, foreground: &Foreground) -> String {
    let filter = filter_attribute(state.foreground_tint.as_deref());
    match foreground.kind {
        ForegroundKind::Vector => format!(
            "<g transform=\"{}\"{filter}>{}</g>",
            vector_transform(state),
            foreground.content
        ),
        ForegroundKind::Bitmap => format!(
            "<g transform=\"{}\"{filter}>{}</g>",
            origin_transform(state),
            bitmap_element(state, &foreground.content)
        ),
    }
}
