//! SVG composition.
//!
//! [`build_markup`] turns an [`EditorState`] into one self-contained SVG
//! document. It owns no state: the same input always yields the same bytes,
//! so it is rerun from scratch on every edit rather than patched.
//!
//! # Document Layout
//!
//! ```text
//! <svg xmlns=… viewBox="0 0 S S" width="S" height="S">
//!   <defs> clip path · pattern tile? · recolor filter? </defs>
//!   background fill
//!   pattern overlay?      (clipped to the background silhouette)
//!   foreground group?     (translate · rotate · scale …)
//! </svg>
//! ```

pub mod filter;
pub mod foreground;
pub mod pattern;
pub mod shape;

pub use filter::recolor_filter_fragment;
pub use foreground::{foreground_fragment, vector_transform};
pub use pattern::pattern_fragment;
pub use shape::{Outline, background_fragment, clip_path_fragment};

use std::fmt;

use crate::state::EditorState;

/// The SVG namespace declared on the document root.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// Composition
// ============================================================================

/// The four parts of a composed document, before they are joined.
///
/// Useful for inspecting one section without scanning the whole text.
/// [`Display`](fmt::Display) renders the complete document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub canvas_size: u32,
    /// Contents of the `<defs>` block.
    pub defs: String,
    pub background: String,
    /// Present only when a pattern is selected.
    pub pattern_overlay: Option<String>,
    /// Present only when there is a foreground.
    pub foreground: Option<String>,
}

impl Composition {
    /// Derives every part of the document from `state`.
    pub fn from_state(state: &EditorState) -> Self {
        let size = state.canvas_size;
        let shape = state.background_shape;
        let tint = state.foreground_tint.as_deref();

        let mut defs = clip_path_fragment(shape, size);
        defs.push_str(&pattern_fragment(state.background_pattern));
        if let Some(filter) = recolor_filter_fragment(tint) {
            defs.push_str(&filter);
        }

        let background = background_fragment(shape, size, &state.background_color);

        let pattern_overlay = (!state.background_pattern.is_none()).then(|| {
            format!(
                "<rect width=\"{size}\" height=\"{size}\" fill=\"url(#{})\" clip-path=\"url(#{})\" />",
                pattern::PATTERN_ID,
                shape::CLIP_ID
            )
        });

        let foreground = state
            .foreground
            .as_ref()
            .map(|fg| foreground_fragment(state, fg));

        Self {
            canvas_size: size,
            defs,
            background,
            pattern_overlay,
            foreground,
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.canvas_size;
        writeln!(
            f,
            "<svg xmlns=\"{SVG_NAMESPACE}\" viewBox=\"0 0 {size} {size}\" width=\"{size}\" height=\"{size}\">"
        )?;
        writeln!(f, "  <defs>{}</defs>", self.defs)?;
        writeln!(f, "  {}", self.background)?;
        writeln!(f, "  {}", self.pattern_overlay.as_deref().unwrap_or(""))?;
        writeln!(f, "  {}", self.foreground.as_deref().unwrap_or(""))?;
        write!(f, "</svg>")
    }
}

/// Composes the SVG document for `state`.
pub fn build_markup(state: &EditorState) -> String {
    Composition::from_state(state).to_string()
}

// ============================================================================
// Tests
// ============================================================================
