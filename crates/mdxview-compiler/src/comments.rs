//! HTML comment escaping.
//!
//! MDX has no HTML comments; `<!--` is a syntax error. Comments are turned
//! into JavaScript comment expressions, which render nothing.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static HTML_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Wrap every HTML comment in `text` in a `{/* ... */}` expression.
///
/// A `*/` inside the comment would end the JavaScript comment early, so it
/// is broken up.
pub(crate) fn escape_html_comments(text: &str) -> String {
    HTML_COMMENT_RE
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{{/* {} */}}", caps[0].replace("*/", "* /"))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_single_comment() {
        assert_eq!(
            escape_html_comments("a <!-- note --> b"),
            "a {/* <!-- note --> */} b"
        );
    }

    #[test]
    fn test_multiline_comment() {
        assert_eq!(
            escape_html_comments("<!--\nTODO\n-->\n"),
            "{/* <!--\nTODO\n--> */}\n"
        );
    }

    #[test]
    fn test_comments_matched_lazily() {
        assert_eq!(
            escape_html_comments("<!-- a --> text <!-- b -->"),
            "{/* <!-- a --> */} text {/* <!-- b --> */}"
        );
    }

    #[test]
    fn test_comment_closer_broken_up() {
        assert_eq!(
            escape_html_comments("<!-- a */ b -->"),
            "{/* <!-- a * / b --> */}"
        );
    }

    #[test]
    fn test_no_comment_unchanged() {
        assert_eq!(escape_html_comments("# Title"), "# Title");
    }
}
