//! Repeating background textures.

use crate::state::BackgroundPattern;

/// Identifier of the pattern tile, referenced by the overlay rectangle.
pub const PATTERN_ID: &str = "bp";

/// Side length of one pattern tile.
pub const TILE: u32 = 16;

/// The tileable `<pattern>` definition, or an empty string for no pattern.
///
/// Every tile is white at 8-12% opacity so it only shades the base color.
pub fn pattern_fragment(pattern: BackgroundPattern) -> String {
    let s = TILE;
    let half = s / 2;
    let body = match pattern {
        BackgroundPattern::None => return String::new(),
        BackgroundPattern::Dots => format!(
            "<circle cx=\"{half}\" cy=\"{half}\" r=\"1.5\" fill=\"white\" opacity=\"0.12\"/>"
        ),
        BackgroundPattern::Grid => format!(
            "<path d=\"M {s} 0 L 0 0 0 {s}\" fill=\"none\" stroke=\"white\" stroke-width=\"0.5\" opacity=\"0.1\"/>"
        ),
        BackgroundPattern::DiagonalLines => format!(
            "<path d=\"M 0 {s} L {s} 0\" stroke=\"white\" stroke-width=\"0.5\" opacity=\"0.1\"/>"
        ),
        BackgroundPattern::Crosshatch => format!(
            "<path d=\"M 0 {s} L {s} 0 M 0 0 L {s} {s}\" stroke=\"white\" stroke-width=\"0.5\" opacity=\"0.08\"/>"
        ),
    };
    format!(
        "<pattern id=\"{PATTERN_ID}\" patternUnits=\"userSpaceOnUse\" width=\"{s}\" height=\"{s}\">{body}</pattern>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_empty() {
        assert_eq!(pattern_fragment(BackgroundPattern::None), "");
    }

    #[test]
    fn every_pattern_has_a_tile() {
        for pattern in BackgroundPattern::ALL {
            let fragment = pattern_fragment(pattern);
            if pattern.is_none() {
                continue;
            }
            assert!(fragment.starts_with("<pattern id=\"bp\" patternUnits=\"userSpaceOnUse\" width=\"16\" height=\"16\">"));
            assert!(fragment.ends_with("</pattern>"));
        }
    }

    #[test]
    fn tiles_stay_faint() {
        for pattern in BackgroundPattern::ALL {
            let fragment = pattern_fragment(pattern);
            let Some(start) = fragment.find("opacity=\"") else {
                continue;
            };
            let rest = &fragment[start + 9..];
            let end = rest.find('"').unwrap();
            let opacity: f64 = rest[..end].parse().unwrap();
            assert!((0.08..=0.12).contains(&opacity), "{pattern:?}: {opacity}");
        }
    }

    #[test]
    fn dots_tile() {
        assert_eq!(
            pattern_fragment(BackgroundPattern::Dots),
            "<pattern id=\"bp\" patternUnits=\"userSpaceOnUse\" width=\"16\" height=\"16\"><circle cx=\"8\" cy=\"8\" r=\"1.5\" fill=\"white\" opacity=\"0.12\"/></pattern>"
        );
    }

    #[test]
    fn crosshatch_has_two_strokes() {
        let fragment = pattern_fragment(BackgroundPattern::Crosshatch);
        assert_eq!(fragment.matches(" M ").count(), 1);
        assert!(fragment.contains("M 0 16 L 16 0 M 0 0 L 16 16"));
    }
}
