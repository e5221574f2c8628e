//! Geometry helpers for shape outlines.
//!
//! Every coordinate that ends up in markup is produced here and printed
//! through [`format_number`], so identical inputs always yield identical
//! text.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Start angle that puts the first vertex of a ring at the top.
pub const TOP: f64 = -FRAC_PI_2;

/// A point (or displacement) in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin, also used as "no offset".
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Returns this point translated by `other`.
    pub fn offset_by(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// Angle of vertex `index` on a ring of `count` evenly spaced vertices.
fn ring_angle(index: usize, count: usize, start_angle: f64) -> f64 {
    (TAU / count as f64) * index as f64 + start_angle
}

fn on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Returns `count` vertices evenly spaced on a circle.
///
/// Vertex `i` sits at `(TAU / count) * i + start_angle`, so passing [`TOP`]
/// makes the shape point upward. The order is fixed: clockwise in screen
/// space, starting with the first vertex.
pub fn regular_polygon_vertices(
    center: Point,
    radius: f64,
    count: usize,
    start_angle: f64,
) -> Vec<Point> {
    (0..count)
        .map(|i| on_circle(center, radius, ring_angle(i, count, start_angle)))
        .collect()
}

/// Returns the `2 * points` vertices of a star, alternating between the
/// outer and inner radius, first vertex at the top.
pub fn star_vertices(center: Point, outer: f64, inner: f64, points: usize) -> Vec<Point> {
    let count = points * 2;
    (0..count)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            on_circle(center, radius, ring_angle(i, count, TOP))
        })
        .collect()
}

/// Formats a number the way it appears in markup.
///
/// Uses the shortest representation that round-trips, drops the fraction of
/// whole numbers and never prints a negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Formats a vertex list as an SVG `points` attribute value.
pub fn format_points(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", format_number(p.x), format_number(p.y));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn distance(a: Point, b: Point) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn hexagon_starts_at_top() {
        let center = Point::new(128.0, 128.0);
        let verts = regular_polygon_vertices(center, 128.0, 6, TOP);
        assert_eq!(verts.len(), 6);
        assert!((verts[0].x - 128.0).abs() < EPS);
        assert!(verts[0].y.abs() < EPS);
        for v in &verts {
            assert!((distance(*v, center) - 128.0).abs() < EPS);
        }
    }

    #[test]
    fn hexagon_is_clockwise() {
        let verts = regular_polygon_vertices(Point::new(0.0, 0.0), 1.0, 6, TOP);
        // Second vertex is to the right of the top one in screen space.
        assert!(verts[1].x > verts[0].x);
        assert!(verts[1].y > verts[0].y);
    }

    #[test]
    fn star_alternates_radii() {
        let center = Point::new(128.0, 128.0);
        let verts = star_vertices(center, 128.0, 51.2, 5);
        assert_eq!(verts.len(), 10);
        for (i, v) in verts.iter().enumerate() {
            let expected = if i % 2 == 0 { 128.0 } else { 51.2 };
            assert!((distance(*v, center) - expected).abs() < EPS);
        }
    }

    #[test]
    fn vertices_are_deterministic() {
        let a = star_vertices(Point::new(50.0, 50.0), 50.0, 20.0, 5);
        let b = star_vertices(Point::new(50.0, 50.0), 50.0, 20.0, 5);
        assert_eq!(format_points(&a), format_points(&b));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(128.0), "128");
        assert_eq!(format_number(51.2), "51.2");
        assert_eq!(format_number(256.0 * 0.3), "76.8");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-76.8), "-76.8");
    }

    #[test]
    fn points_formatting() {
        let pts = [Point::new(128.0, 0.0), Point::new(256.0, 128.0)];
        assert_eq!(format_points(&pts), "128,0 256,128");
        assert_eq!(format_points(&[]), "");
    }
}
