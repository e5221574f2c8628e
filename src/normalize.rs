//! Foreign SVG normalization.
//!
//! Pasted or uploaded SVG can carry any size, any attributes and any
//! prologue. [`normalize_foreign_markup`] reduces it to
//! `<svg viewBox=… width="100%" height="100%">…</svg>` so it fills whatever
//! box the composer's transform gives it.
//!
//! Input that cannot be understood is returned untouched rather than
//! rejected; the composer embeds it as-is.

use std::fmt::Write;

use log::debug;
use roxmltree::{Document, Node, NodeType, ParsingOptions};

use crate::error::MalformedMarkup;
use crate::geometry::format_number;

/// Width and height assumed when the source declares neither a view box nor
/// a usable size.
pub const DEFAULT_EXTENT: f64 = 24.0;

/// Normalizes pasted or uploaded SVG text.
///
/// Returns the input unchanged when it is not XML or contains no `<svg>`
/// element. Normalizing an already normalized fragment is a no-op.
pub fn normalize_foreign_markup(text: &str) -> String {
    match try_normalize(text) {
        Ok(normalized) => normalized,
        Err(err) => {
            debug!("passing foreign markup through unchanged: {err}");
            text.to_string()
        }
    }
}

/// Normalizes `text`, reporting why it could not be.
///
/// The root's content is copied from the source as written, unless the
/// document has a DTD. Entity references would then dangle once the DTD is
/// gone, so the content is rebuilt from the parsed tree with every entity
/// expanded.
pub fn try_normalize(text: &str) -> Result<String, MalformedMarkup> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;
    let root = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "svg")
        .ok_or(MalformedMarkup::MissingRoot)?;

    let view_box = match root.attribute("viewBox") {
        Some(view_box) => view_box.to_string(),
        None => {
            let width = root.attribute("width").and_then(leading_number);
            let height = root.attribute("height").and_then(leading_number);
            format!(
                "0 0 {} {}",
                format_number(width.unwrap_or(DEFAULT_EXTENT)),
                format_number(height.unwrap_or(DEFAULT_EXTENT))
            )
        }
    };

    let mut out = String::new();
    let _ = write!(
        out,
        "<svg viewBox=\"{}\" width=\"100%\" height=\"100%\"",
        escape_attribute(&view_box)
    );
    for ns in root.namespaces() {
        if let Some(prefix) = ns.name().filter(|p| *p != "xml") {
            let _ = write!(out, " xmlns:{prefix}=\"{}\"", escape_attribute(ns.uri()));
        }
    }
    out.push('>');
    if has_doctype(text, &doc) {
        write_children(root, &mut out);
    } else {
        out.push_str(inner_source(text, root));
    }
    out.push_str("</svg>");
    Ok(out)
}

fn has_doctype(text: &str, doc: &Document<'_>) -> bool {
    text[..doc.root_element().range().start].contains("<!DOCTYPE")
}

/// The source text between the element's start and end tags.
fn inner_source<'a>(text: &'a str, node: Node<'_, '_>) -> &'a str {
    let element = &text[node.range()];
    let Some(open_end) = start_tag_end(element) else {
        return "";
    };
    if element[..open_end].ends_with("/>") {
        return "";
    }
    match element.rfind("</") {
        Some(close_start) if close_start >= open_end => &element[open_end..close_start],
        _ => "",
    }
}

/// Byte offset just past the `>` that closes the start tag.
fn start_tag_end(element: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in element.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

// ============================================================================
// Tree serialization
// ============================================================================

fn write_children(node: Node<'_, '_>, out: &mut String) {
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => write_element(child, out),
            NodeType::Text => out.push_str(&escape_text(child.text().unwrap_or_default())),
            NodeType::Comment => {
                let _ = write!(out, "<!--{}-->", child.text().unwrap_or_default());
            }
            NodeType::PI => {
                if let Some(pi) = child.pi() {
                    let _ = match pi.value {
                        Some(value) => write!(out, "<?{} {value}?>", pi.target),
                        None => write!(out, "<?{}?>", pi.target),
                    };
                }
            }
            NodeType::Root => {}
        }
    }
}

fn write_element(node: Node<'_, '_>, out: &mut String) {
    let tag = node.tag_name();
    let name = qualified_name(node, tag.namespace(), tag.name());
    let _ = write!(out, "<{name}");

    // Only declarations the parent does not already provide.
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    for ns in node.namespaces() {
        if ns.name() == Some("xml") || inherited.contains(&(ns.name(), ns.uri())) {
            continue;
        }
        let uri = escape_attribute(ns.uri());
        let _ = match ns.name() {
            Some(prefix) => write!(out, " xmlns:{prefix}=\"{uri}\""),
            None => write!(out, " xmlns=\"{uri}\""),
        };
    }

    for attr in node.attributes() {
        let attr_name = qualified_name(node, attr.namespace(), attr.name());
        let _ = write!(out, " {attr_name}=\"{}\"", escape_attribute(attr.value()));
    }

    if node.has_children() {
        out.push('>');
        write_children(node, out);
        let _ = write!(out, "</{name}>");
    } else {
        out.push_str("/>");
    }
}

fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses the longest numeric prefix of a length like `"48px"` or `"1e2"`.
fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    value
        .char_indices()
        .rev()
        .map(|(i, c)| i + c.len_utf8())
        .find_map(|end| value[..end].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\r', "&#13;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LUCIDE_STAR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" class="lucide"><polygon points="12 2 15 9 22 9 17 14 18 21 12 17 6 21 7 14 2 9 9 9"/></svg>"#;

    const ENTITY_SQUARE: &str = r##"<!DOCTYPE svg [<!ENTITY c "#ff0000">]><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 4 4"><rect width="4" height="4" fill="&c;"/></svg>"##;

    #[test]
    fn keeps_view_box_and_drops_other_attributes() {
        let normalized = normalize_foreign_markup(LUCIDE_STAR);
        assert_eq!(
            normalized,
            r#"<svg viewBox="0 0 24 24" width="100%" height="100%"><polygon points="12 2 15 9 22 9 17 14 18 21 12 17 6 21 7 14 2 9 9 9"/></svg>"#
        );
    }

    #[test]
    fn synthesizes_view_box_from_size() {
        let normalized =
            normalize_foreign_markup(r#"<svg width="48px" height="32"><rect width="48" height="32"/></svg>"#);
        assert!(normalized.starts_with(r#"<svg viewBox="0 0 48 32" width="100%" height="100%">"#));
    }

    #[test]
    fn synthesized_view_box_defaults_to_24() {
        let normalized = normalize_foreign_markup("<svg><circle r=\"3\"/></svg>");
        assert_eq!(
            normalized,
            r#"<svg viewBox="0 0 24 24" width="100%" height="100%"><circle r="3"/></svg>"#
        );

        let normalized = normalize_foreign_markup(r#"<svg width="auto"><g/></svg>"#);
        assert!(normalized.starts_with(r#"<svg viewBox="0 0 24 24""#));
    }

    #[test]
    fn handles_prologue_and_doctype() {
        let text = "<?xml version=\"1.0\"?>\n<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n<svg viewBox=\"0 0 10 10\"><path d=\"M0 0\"/></svg>";
        assert_eq!(
            normalize_foreign_markup(text),
            r#"<svg viewBox="0 0 10 10" width="100%" height="100%"><path d="M0 0"/></svg>"#
        );
    }

    #[test]
    fn expands_internal_entities() {
        assert_eq!(
            normalize_foreign_markup(ENTITY_SQUARE),
            r##"<svg viewBox="0 0 4 4" width="100%" height="100%"><rect width="4" height="4" fill="#ff0000"/></svg>"##
        );
    }

    #[test]
    fn rebuilt_content_keeps_text_comments_and_prefixes() {
        let text = r##"<!DOCTYPE svg [<!ENTITY label "Hi">]><svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="8" height="8"><!-- c --><text xml:space="preserve">&label; &lt; 3</text><use xlink:href="#t"/><g xmlns:e="urn:extra" e:k="v"/></svg>"##;
        let normalized = normalize_foreign_markup(text);
        assert_eq!(
            normalized,
            r##"<svg viewBox="0 0 8 8" width="100%" height="100%" xmlns:xlink="http://www.w3.org/1999/xlink"><!-- c --><text xml:space="preserve">Hi &lt; 3</text><use xlink:href="#t"/><g xmlns:e="urn:extra" e:k="v"/></svg>"##
        );
        assert!(Document::parse(&normalized).is_ok());
    }

    #[test]
    fn control_characters_in_view_box_are_escaped() {
        let normalized = normalize_foreign_markup("<svg viewBox=\"0 0&#10;24 24\"><rect/></svg>");
        assert!(normalized.starts_with("<svg viewBox=\"0 0&#10;24 24\""));
    }

    #[test]
    fn synthesizes_view_box_from_exponent_size() {
        let normalized = normalize_foreign_markup(r#"<svg width="1e2" height="1.5.5"><g/></svg>"#);
        assert!(normalized.starts_with(r#"<svg viewBox="0 0 100 1.5""#));
    }

    #[test]
    fn finds_nested_svg() {
        let text = r#"<div><svg viewBox="0 0 8 8"><rect width="8" height="8"/></svg></div>"#;
        assert_eq!(
            normalize_foreign_markup(text),
            r#"<svg viewBox="0 0 8 8" width="100%" height="100%"><rect width="8" height="8"/></svg>"#
        );
    }

    #[test]
    fn keeps_prefixed_namespaces() {
        let text = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 4 4"><use xlink:href="#a"/></svg>"##;
        let normalized = normalize_foreign_markup(text);
        assert!(normalized.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(Document::parse(&normalized).is_ok());
    }

    #[test]
    fn self_closing_root_has_no_content() {
        assert_eq!(
            normalize_foreign_markup(r#"<svg width="10" height="10"/>"#),
            r#"<svg viewBox="0 0 10 10" width="100%" height="100%"></svg>"#
        );
    }

    #[test]
    fn malformed_input_passes_through() {
        for text in ["not svg at all", "<svg><path></svg>", "<div><p>hi</p></div>", ""] {
            assert_eq!(normalize_foreign_markup(text), text);
        }
        assert!(matches!(
            try_normalize("<div/>"),
            Err(MalformedMarkup::MissingRoot)
        ));
        assert!(matches!(try_normalize("<svg>"), Err(MalformedMarkup::Parse(_))));
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            LUCIDE_STAR,
            "<svg width=\"12.5\" height=\"7\"><g><path d=\"M1 1\"/></g><!-- note --></svg>",
            "<svg viewBox=\"0 0\n24 24\">text &amp; more</svg>",
            r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#x"/></svg>"##,
            "<svg viewBox=\"0 0&#10;24 24\"><rect/></svg>",
            "<svg viewBox=\"0&#9;0&#13;24 24\"><rect/></svg>",
            ENTITY_SQUARE,
            "garbage <<",
        ];
        for input in inputs {
            let once = normalize_foreign_markup(input);
            let twice = normalize_foreign_markup(&once);
            assert_eq!(once, twice, "input: {input}");
        }
    }

    #[test]
    fn leading_number_parsing() {
        assert_eq!(leading_number("24"), Some(24.0));
        assert_eq!(leading_number(" 48px "), Some(48.0));
        assert_eq!(leading_number("1.5em"), Some(1.5));
        assert_eq!(leading_number("1e2"), Some(100.0));
        assert_eq!(leading_number("1.2.3"), Some(1.2));
        assert_eq!(leading_number("-3.5e-1pt"), Some(-0.35));
        assert_eq!(leading_number("px"), None);
        assert_eq!(leading_number("inf"), None);
        assert_eq!(leading_number(""), None);
    }
}
