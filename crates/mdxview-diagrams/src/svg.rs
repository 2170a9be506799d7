//! SVG post-processing before embedding.

use std::sync::LazyLock;

use regex::Regex;

static XML_PROLOG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<\?xml[^>]*\?>").unwrap());

/// Strip the XML prolog (`<?xml version="1.0" ...?>`) from an SVG document.
///
/// The SVG is injected into an HTML page, and a second XML declaration in the
/// middle of a document is rejected by the webview. Only the first prolog is
/// removed and the result is trimmed.
#[must_use]
pub fn strip_xml_prolog(svg: &str) -> String {
    XML_PROLOG_RE.replace(svg, "").trim().to_owned()
}
