//! Foreground recolor filter.

/// Identifier of the recolor filter.
pub const FILTER_ID: &str = "ic";

/// A filter that paints the tint through the foreground's alpha mask.
///
/// Returns `None` when no tint is set: the foreground keeps its colors and
/// no filter is emitted at all.
pub fn recolor_filter_fragment(tint: Option<&str>) -> Option<String> {
    tint.map(|color| {
        format!(
            "<filter id=\"{FILTER_ID}\"><feFlood flood-color=\"{color}\" result=\"c\"/><feComposite in=\"c\" in2=\"SourceAlpha\" operator=\"in\"/></filter>"
        )
    })
}

/// The attribute that applies the filter to a group, or nothing.
pub fn filter_attribute(tint: Option<&str>) -> &'static str {
    if tint.is_some() {
        " filter=\"url(#ic)\""
    } else {
        ""
    }
}
