//! Background fill and clip outline builders.
//!
//! Both fragments come from the same [`Outline`], so the pattern overlay
//! clipped to the silhouette can never bleed past the visible background.

use crate::geometry::{Point, TOP, format_number, format_points, regular_polygon_vertices, star_vertices};
use crate::state::BackgroundShape;

/// Identifier of the clip region, referenced by the pattern overlay.
pub const CLIP_ID: &str = "bg-clip";

/// Corner radius of the rounded rectangle, relative to the canvas side.
pub const CORNER_RADIUS_RATIO: f64 = 0.2;

/// Inner radius of the star, relative to its outer radius.
pub const STAR_INNER_RATIO: f64 = 0.4;

/// The geometric outline of a background shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Rect {
        size: f64,
        corner_radius: Option<f64>,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Polygon(Vec<Point>),
}

impl Outline {
    /// Renders the outline as a single SVG element, optionally filled.
    pub fn to_element(&self, fill: Option<&str>) -> String {
        let fill = fill
            .map(|color| format!(" fill=\"{}\"", color))
            .unwrap_or_default();
        match self {
            Self::Rect {
                size,
                corner_radius,
            } => {
                let size = format_number(*size);
                let rx = corner_radius
                    .map(|r| format!(" rx=\"{}\"", format_number(r)))
                    .unwrap_or_default();
                format!("<rect width=\"{size}\" height=\"{size}\"{rx}{fill} />")
            }
            Self::Circle { center, radius } => format!(
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{fill} />",
                format_number(center.x),
                format_number(center.y),
                format_number(*radius),
            ),
            Self::Polygon(points) => {
                format!("<polygon points=\"{}\"{fill} />", format_points(points))
            }
        }
    }
}

impl BackgroundShape {
    /// The outline of this shape covering a `canvas_size` square.
    pub fn outline(self, canvas_size: u32) -> Outline {
        let size = canvas_size as f64;
        let half = size / 2.0;
        let center = Point::new(half, half);
        match self {
            Self::RoundedRectangle => Outline::Rect {
                size,
                corner_radius: Some(size * CORNER_RADIUS_RATIO),
            },
            Self::Square => Outline::Rect {
                size,
                corner_radius: None,
            },
            Self::Circle => Outline::Circle {
                center,
                radius: half,
            },
            Self::Hexagon => Outline::Polygon(regular_polygon_vertices(center, half, 6, TOP)),
            Self::Diamond => Outline::Polygon(vec![
                Point::new(half, 0.0),
                Point::new(size, half),
                Point::new(half, size),
                Point::new(0.0, half),
            ]),
            Self::Star => Outline::Polygon(star_vertices(center, half, half * STAR_INNER_RATIO, 5)),
        }
    }
}

/// The filled background element.
pub fn background_fragment(shape: BackgroundShape, canvas_size: u32, color: &str) -> String {
    shape.outline(canvas_size).to_element(Some(color))
}

/// The reusable clip region matching the background silhouette.
pub fn clip_path_fragment(shape: BackgroundShape, canvas_size: u32) -> String {
    format!(
        "<clipPath id=\"{CLIP_ID}\">{}</clipPath>",
        shape.outline(canvas_size).to_element(None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn clip_matches_background(
        #[values(
            BackgroundShape::RoundedRectangle,
            BackgroundShape::Circle,
            BackgroundShape::Square,
            BackgroundShape::Hexagon,
            BackgroundShape::Diamond,
            BackgroundShape::Star
        )]
        shape: BackgroundShape,
        #[values(64, 256, 1000)] size: u32,
    ) {
        let background = background_fragment(shape, size, "#123456");
        let clip = clip_path_fragment(shape, size);

        let unfilled = background.replace(" fill=\"#123456\"", "");
        let expected = format!("<clipPath id=\"bg-clip\">{unfilled}</clipPath>");
        assert_eq!(clip, expected);
    }

    #[test]
    fn rounded_rectangle_corner_radius() {
        let bg = background_fragment(BackgroundShape::RoundedRectangle, 256, "#238636");
        assert_eq!(
            bg,
            "<rect width=\"256\" height=\"256\" rx=\"51.2\" fill=\"#238636\" />"
        );
    }

    #[test]
    fn square_has_no_corner_radius() {
        let bg = background_fragment(BackgroundShape::Square, 100, "red");
        assert_eq!(bg, "<rect width=\"100\" height=\"100\" fill=\"red\" />");
    }

    #[test]
    fn circle_fills_canvas() {
        let clip = clip_path_fragment(BackgroundShape::Circle, 256);
        assert_eq!(
            clip,
            "<clipPath id=\"bg-clip\"><circle cx=\"128\" cy=\"128\" r=\"128\" /></clipPath>"
        );
    }

    #[test]
    fn diamond_touches_edge_midpoints() {
        let bg = background_fragment(BackgroundShape::Diamond, 256, "blue");
        assert_eq!(
            bg,
            "<polygon points=\"128,0 256,128 128,256 0,128\" fill=\"blue\" />"
        );
    }

    #[test]
    fn polygon_vertex_counts() {
        match BackgroundShape::Hexagon.outline(256) {
            Outline::Polygon(points) => assert_eq!(points.len(), 6),
            other => panic!("unexpected outline {other:?}"),
        }
        match BackgroundShape::Star.outline(256) {
            Outline::Polygon(points) => {
                assert_eq!(points.len(), 10);
                assert_eq!(format_number(points[0].x), "128");
                assert_eq!(format_number(points[0].y), "0");
            }
            other => panic!("unexpected outline {other:?}"),
        }
    }

    #[test]
    fn invalid_color_passes_through() {
        let bg = background_fragment(BackgroundShape::Square, 10, "not-a-color");
        assert!(bg.contains("fill=\"not-a-color\""));
    }
}
