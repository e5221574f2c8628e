//! The editor state: one immutable snapshot of an icon composition.
//!
//! The control surface never mutates a shared state. Every edit produces a
//! fresh [`EditorState`] from the previous one with the changed fields
//! overwritten, which is what the `with_*` helpers here do.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "backgroundColor": "#238636",
//!   "backgroundShape": "rounded",
//!   "backgroundPattern": "dots",
//!   "foreground": { "content": "<svg>...</svg>", "kind": "vector" },
//!   "foregroundTint": "#ffffff",
//!   "offset": { "x": 0.0, "y": 0.0 },
//!   "scale": 1.0,
//!   "rotationDegrees": 0,
//!   "canvasSize": 256,
//!   "gridSnap": null
//! }
//! ```
//!
//! Every field is optional on input and falls back to [`EditorState::default`].

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::geometry::Point;

/// Smallest scale offered to the user.
pub const MIN_SCALE: f64 = 0.1;

/// Largest scale offered to the user.
pub const MAX_SCALE: f64 = 3.0;

/// Default canvas side length.
pub const DEFAULT_CANVAS_SIZE: u32 = 256;

/// Default background color.
pub const DEFAULT_BACKGROUND: &str = "#238636";

// ============================================================================
// BackgroundShape
// ============================================================================

/// The silhouette of the icon background.
///
/// Name lookup is total: anything unrecognized is a rounded rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum BackgroundShape {
    #[default]
    RoundedRectangle,
    Circle,
    Square,
    Hexagon,
    Diamond,
    Star,
}

impl BackgroundShape {
    /// Every shape, in the order the editor lists them.
    pub const ALL: [BackgroundShape; 6] = [
        Self::RoundedRectangle,
        Self::Circle,
        Self::Square,
        Self::Hexagon,
        Self::Diamond,
        Self::Star,
    ];

    /// Looks a shape up by its wire name, falling back to the default.
    pub fn from_name(name: &str) -> Self {
        match name {
            "circle" => Self::Circle,
            "square" => Self::Square,
            "hexagon" => Self::Hexagon,
            "diamond" => Self::Diamond,
            "star" => Self::Star,
            _ => Self::RoundedRectangle,
        }
    }

    /// The wire name of this shape.
    pub fn name(self) -> &'static str {
        match self {
            Self::RoundedRectangle => "rounded",
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Hexagon => "hexagon",
            Self::Diamond => "diamond",
            Self::Star => "star",
        }
    }
}

impl From<String> for BackgroundShape {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<BackgroundShape> for &'static str {
    fn from(shape: BackgroundShape) -> Self {
        shape.name()
    }
}

// ============================================================================
// BackgroundPattern
// ============================================================================

/// A low-contrast texture tiled over the background.
///
/// Name lookup is total: anything unrecognized is no pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum BackgroundPattern {
    #[default]
    None,
    Dots,
    Grid,
    DiagonalLines,
    Crosshatch,
}

impl BackgroundPattern {
    /// Every pattern, in the order the editor lists them.
    pub const ALL: [BackgroundPattern; 5] = [
        Self::None,
        Self::Dots,
        Self::Grid,
        Self::DiagonalLines,
        Self::Crosshatch,
    ];

    /// Looks a pattern up by its wire name, falling back to no pattern.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dots" => Self::Dots,
            "grid" => Self::Grid,
            "diagonal" | "diagonal-lines" => Self::DiagonalLines,
            "crosshatch" => Self::Crosshatch,
            _ => Self::None,
        }
    }

    /// The wire name of this pattern.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dots => "dots",
            Self::Grid => "grid",
            Self::DiagonalLines => "diagonal",
            Self::Crosshatch => "crosshatch",
        }
    }

    /// Returns true for [`BackgroundPattern::None`].
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

impl From<String> for BackgroundPattern {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<BackgroundPattern> for &'static str {
    fn from(pattern: BackgroundPattern) -> Self {
        pattern.name()
    }
}

// ============================================================================
// Foreground
// ============================================================================

/// How the foreground content is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForegroundKind {
    /// Inline SVG fragment, embedded as-is.
    Vector,
    /// Data URI of a PNG or JPEG image.
    Bitmap,
}

/// The glyph drawn over the background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foreground {
    pub content: String,
    pub kind: ForegroundKind,
}

impl Foreground {
    /// A vector foreground from an SVG fragment.
    pub fn vector(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: ForegroundKind::Vector,
        }
    }

    /// A bitmap foreground from a data URI.
    pub fn bitmap(data_uri: impl Into<String>) -> Self {
        Self {
            content: data_uri.into(),
            kind: ForegroundKind::Bitmap,
        }
    }

    pub fn is_vector(&self) -> bool {
        self.kind == ForegroundKind::Vector
    }
}

// ============================================================================
// EditorState
// ============================================================================

/// A complete, immutable description of one icon composition.
///
/// This is the only input of [`build_markup`](crate::build_markup). Colors
/// are not validated; whatever string is stored reaches the renderer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorState {
    pub background_color: String,
    pub background_shape: BackgroundShape,
    pub background_pattern: BackgroundPattern,
    pub foreground: Option<Foreground>,
    /// Flat color for the foreground. `None` keeps its own colors.
    pub foreground_tint: Option<String>,
    /// Translation of the foreground center from the canvas center.
    pub offset: Point,
    pub scale: f64,
    /// Clockwise rotation. Kept in `0..360` by the editor, not enforced here.
    pub rotation_degrees: i32,
    pub canvas_size: u32,
    /// Step that drag deltas are rounded to, if snapping is on.
    pub grid_snap: Option<f64>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND.to_string(),
            background_shape: BackgroundShape::default(),
            background_pattern: BackgroundPattern::default(),
            foreground: None,
            foreground_tint: None,
            offset: Point::zero(),
            scale: 1.0,
            rotation_degrees: 0,
            canvas_size: DEFAULT_CANVAS_SIZE,
            grid_snap: None,
        }
    }
}

impl EditorState {
    /// The state a fresh editor session starts with.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the invariants the composer relies on.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.canvas_size == 0 {
            return Err(StateError::NonPositiveCanvas);
        }
        if !(self.scale > 0.0) {
            return Err(StateError::NonPositiveScale { scale: self.scale });
        }
        Ok(())
    }

    /// Half the canvas side, the default foreground origin.
    pub fn center(&self) -> Point {
        let half = self.canvas_size as f64 / 2.0;
        Point::new(half, half)
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_background_shape(mut self, shape: BackgroundShape) -> Self {
        self.background_shape = shape;
        self
    }

    pub fn with_background_pattern(mut self, pattern: BackgroundPattern) -> Self {
        self.background_pattern = pattern;
        self
    }

    /// Installs a new foreground and re-centers it.
    pub fn with_foreground(mut self, foreground: Foreground) -> Self {
        self.foreground = Some(foreground);
        self.offset = Point::zero();
        self
    }

    pub fn without_foreground(mut self) -> Self {
        self.foreground = None;
        self
    }

    /// Recolors the whole foreground with one flat color.
    pub fn with_tint(mut self, tint: impl Into<String>) -> Self {
        self.foreground_tint = Some(tint.into());
        self
    }

    /// Restores the foreground's own colors.
    pub fn without_tint(mut self) -> Self {
        self.foreground_tint = None;
        self
    }

    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the scale, clamped to [`MIN_SCALE`]..=[`MAX_SCALE`].
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self
    }

    /// Sets the rotation, normalized to the 0-360 range.
    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation_degrees = degrees.rem_euclid(360);
        self
    }

    pub fn with_canvas_size(mut self, size: u32) -> Self {
        self.canvas_size = size;
        self
    }

    /// Enables snapping with the given step, or disables it with `None`.
    pub fn with_grid_snap(mut self, step: Option<f64>) -> Self {
        self.grid_snap = step.filter(|s| *s > 0.0);
        self
    }

    /// Moves the foreground by a drag delta in canvas units.
    ///
    /// With snapping on, each component is rounded to the nearest multiple
    /// of the step first. A delta that snaps to nothing returns the state
    /// unchanged.
    pub fn dragged(self, dx: f64, dy: f64) -> Self {
        let (dx, dy) = match self.grid_snap {
            Some(step) => (snap(dx, step), snap(dy, step)),
            None => (dx, dy),
        };
        if dx == 0.0 && dy == 0.0 {
            return self;
        }
        let offset = self.offset.offset_by(Point::new(dx, dy));
        self.with_offset(offset)
    }

    /// Puts the foreground back at the center, unscaled and unrotated.
    pub fn reset_transform(mut self) -> Self {
        self.offset = Point::zero();
        self.scale = 1.0;
        self.rotation_degrees = 0;
        self
    }

    /// Serializes the state to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the state to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a state from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Rounds `value` to the nearest multiple of `step`, halves toward +inf.
fn snap(value: f64, step: f64) -> f64 {
    (value / step + 0.5).floor() * step
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state() {
        let state = EditorState::new();
        assert_eq!(state.background_color, "#238636");
        assert_eq!(state.background_shape, BackgroundShape::RoundedRectangle);
        assert!(state.background_pattern.is_none());
        assert!(state.foreground.is_none());
        assert_eq!(state.canvas_size, 256);
        assert_eq!(state.scale, 1.0);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn unknown_names_fall_back() {
        assert_eq!(
            BackgroundShape::from_name("blob"),
            BackgroundShape::RoundedRectangle
        );
        assert_eq!(BackgroundPattern::from_name("zigzag"), BackgroundPattern::None);
        assert_eq!(
            BackgroundPattern::from_name("diagonal-lines"),
            BackgroundPattern::DiagonalLines
        );
    }

    #[test]
    fn names_round_trip() {
        for shape in BackgroundShape::ALL {
            assert_eq!(BackgroundShape::from_name(shape.name()), shape);
        }
        for pattern in BackgroundPattern::ALL {
            assert_eq!(BackgroundPattern::from_name(pattern.name()), pattern);
        }
    }

    #[test]
    fn validate_rejects_degenerate_states() {
        let state = EditorState::new().with_canvas_size(0);
        assert_eq!(state.validate(), Err(StateError::NonPositiveCanvas));

        let mut state = EditorState::new();
        state.scale = 0.0;
        assert!(matches!(
            state.validate(),
            Err(StateError::NonPositiveScale { .. })
        ));
    }

    #[test]
    fn edits_produce_fresh_values() {
        let before = EditorState::new();
        let after = before.clone().with_background_shape(BackgroundShape::Star);
        assert_eq!(before.background_shape, BackgroundShape::RoundedRectangle);
        assert_eq!(after.background_shape, BackgroundShape::Star);
        assert_eq!(after.background_color, before.background_color);
    }

    #[test]
    fn scale_and_rotation_are_normalized() {
        let state = EditorState::new().with_scale(10.0).with_rotation(450);
        assert_eq!(state.scale, MAX_SCALE);
        assert_eq!(state.rotation_degrees, 90);

        let state = EditorState::new().with_scale(0.0).with_rotation(-90);
        assert_eq!(state.scale, MIN_SCALE);
        assert_eq!(state.rotation_degrees, 270);
    }

    #[test]
    fn new_foreground_is_recentered() {
        let state = EditorState::new()
            .with_offset(Point::new(30.0, 40.0))
            .with_foreground(Foreground::vector("<svg/>"));
        assert_eq!(state.offset, Point::zero());
        assert!(state.foreground.as_ref().unwrap().is_vector());
    }

    #[test]
    fn drag_without_snap() {
        let state = EditorState::new().dragged(3.5, -2.0).dragged(1.0, 1.0);
        assert_eq!(state.offset, Point::new(4.5, -1.0));
    }

    #[test]
    fn drag_with_snap() {
        let state = EditorState::new().with_grid_snap(Some(16.0));
        let moved = state.clone().dragged(9.0, -7.0);
        assert_eq!(moved.offset, Point::new(16.0, 0.0));

        // Half a step rounds up, like the editor's rounding.
        let moved = state.clone().dragged(8.0, -8.0);
        assert_eq!(moved.offset, Point::new(16.0, 0.0));

        let unchanged = state.clone().dragged(2.0, 3.0);
        assert_eq!(unchanged, state);
    }

    #[test]
    fn reset_transform_keeps_appearance() {
        let state = EditorState::new()
            .with_background_color("#ff0000")
            .with_offset(Point::new(5.0, 5.0))
            .with_scale(2.0)
            .with_rotation(45)
            .reset_transform();
        assert_eq!(state.offset, Point::zero());
        assert_eq!(state.scale, 1.0);
        assert_eq!(state.rotation_degrees, 0);
        assert_eq!(state.background_color, "#ff0000");
    }

    #[test]
    fn json_roundtrip() {
        let state = EditorState::new()
            .with_background_shape(BackgroundShape::Hexagon)
            .with_background_pattern(BackgroundPattern::DiagonalLines)
            .with_foreground(Foreground::vector("<svg></svg>"))
            .with_tint("#ffffff");

        let json = state.to_json().unwrap();
        assert!(json.contains("\"backgroundShape\":\"hexagon\""));
        assert!(json.contains("\"backgroundPattern\":\"diagonal\""));
        assert!(json.contains("\"kind\":\"vector\""));

        let restored = EditorState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let state =
            EditorState::from_json(r#"{"backgroundShape":"octagon","scale":2}"#).unwrap();
        assert_eq!(state.background_shape, BackgroundShape::RoundedRectangle);
        assert_eq!(state.scale, 2.0);
        assert_eq!(state.canvas_size, 256);

        let empty = EditorState::from_json("{}").unwrap();
        assert_eq!(empty, EditorState::default());
    }
}
