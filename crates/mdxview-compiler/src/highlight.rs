//! Syntax highlighting of fenced code blocks.
//!
//! Each fence is replaced by a single-line JSX element carrying the
//! highlighted HTML, so MDX passes it through untouched:
//!
//! ```text
//! <pre><code className="hljs language-rust" dangerouslySetInnerHTML={{__html: "..."}} /></pre>
//! ```
//!
//! Tokens get highlight.js class names (`hljs-keyword`, `hljs-string`, ...)
//! so any highlight.js theme styles the preview. Unlabeled fences,
//! `txt`/`text` fences and languages without a known syntax are emitted as
//! escaped plain text.

use std::sync::LazyLock;

use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::fence::Fence;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Scope prefixes and their highlight.js classes.
///
/// Checked in order against each scope, innermost scope first, so more
/// specific prefixes come before the general ones.
const SCOPE_CLASSES: &[(&str, &str)] = &[
    ("comment", "hljs-comment"),
    ("string.regexp", "hljs-regexp"),
    ("string", "hljs-string"),
    ("constant.numeric", "hljs-number"),
    ("constant.character.escape", "hljs-char escape_"),
    ("constant.language", "hljs-literal"),
    ("constant", "hljs-symbol"),
    ("keyword.operator", "hljs-operator"),
    ("keyword", "hljs-keyword"),
    ("storage", "hljs-keyword"),
    ("entity.name.function", "hljs-title function_"),
    ("entity.name.tag", "hljs-name"),
    ("entity.name.section", "hljs-section"),
    ("entity.name", "hljs-title class_"),
    ("entity.other.attribute-name", "hljs-attr"),
    ("entity.other.inherited-class", "hljs-title class_"),
    ("support.function", "hljs-built_in"),
    ("support", "hljs-type"),
    ("variable.parameter", "hljs-params"),
    ("variable.language", "hljs-variable language_"),
    ("variable", "hljs-variable"),
    ("meta.preprocessor", "hljs-meta"),
    ("meta.annotation", "hljs-meta"),
    ("markup.heading", "hljs-section"),
    ("markup.bold", "hljs-strong"),
    ("markup.italic", "hljs-emphasis"),
    ("markup.quote", "hljs-quote"),
    ("markup.underline.link", "hljs-link"),
    ("markup.inserted", "hljs-addition"),
    ("markup.deleted", "hljs-deletion"),
];

/// Languages always rendered as plain text.
const PLAIN_TEXT_LANGUAGES: &[&str] = &["txt", "text"];

/// Build the JSX element replacing `fence`.
pub(crate) fn highlight_fence(fence: &Fence<'_>) -> String {
    let language = class_language(fence.language());
    let class_name = match language {
        Some(lang) => format!("hljs language-{lang}"),
        None => String::from("hljs"),
    };

    let html = highlight_code(language, &fence.code());
    format!(
        "<pre><code className=\"{class_name}\" dangerouslySetInnerHTML={{{{__html: {}}}}} /></pre>",
        js_string_literal(&html)
    )
}

/// Language name usable in a class attribute, if any.
fn class_language(lang: &str) -> Option<&str> {
    let valid = !lang.is_empty()
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'));
    valid.then_some(lang)
}

fn find_syntax(language: Option<&str>) -> &'static SyntaxReference {
    let ss = &*SYNTAX_SET;
    language
        .filter(|lang| !PLAIN_TEXT_LANGUAGES.contains(&lang.to_ascii_lowercase().as_str()))
        .and_then(|lang| ss.find_syntax_by_token(lang))
        .unwrap_or_else(|| ss.find_syntax_plain_text())
}

/// Highlight `code` into class-annotated HTML spans.
///
/// Spans are flat: each run of tokens sharing a class gets one span.
fn highlight_code(language: Option<&str>, code: &str) -> String {
    let mut state = ParseState::new(find_syntax(language));
    let mut stack = ScopeStack::new();
    let mut writer = SpanWriter::default();

    for line in LinesWithEndings::from(code) {
        let ops = match state.parse_line(line, &SYNTAX_SET) {
            Ok(ops) => ops,
            Err(e) => {
                tracing::debug!(language = ?language, error = %e, "Highlighting failed, using plain text");
                return escape_html(code);
            }
        };

        let mut pos = 0;
        for (index, op) in ops {
            writer.push(token_class(&stack), &line[pos..index]);
            pos = index;
            if let Err(e) = stack.apply(&op) {
                tracing::debug!(language = ?language, error = ?e, "Highlighting failed, using plain text");
                return escape_html(code);
            }
        }
        writer.push(token_class(&stack), &line[pos..]);
    }

    writer.finish()
}

/// highlight.js class for a token inside `stack`, if any.
fn token_class(stack: &ScopeStack) -> Option<&'static str> {
    stack.as_slice().iter().rev().find_map(|scope| {
        let name = scope.build_string();
        SCOPE_CLASSES.iter().find_map(|&(prefix, class)| {
            let matches = name
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'));
            matches.then_some(class)
        })
    })
}

/// Accumulates escaped text, merging adjacent tokens of the same class.
#[derive(Default)]
struct SpanWriter {
    html: String,
    open: Option<&'static str>,
}

impl SpanWriter {
    fn push(&mut self, class: Option<&'static str>, text: &str) {
        if text.is_empty() {
            return;
        }
        if class != self.open {
            if self.open.is_some() {
                self.html.push_str("</span>");
            }
            if let Some(class) = class {
                self.html.push_str("<span class=\"");
                self.html.push_str(class);
                self.html.push_str("\">");
            }
            self.open = class;
        }
        self.html.push_str(&escape_html(text));
    }

    fn finish(mut self) -> String {
        if self.open.is_some() {
            self.html.push_str("</span>");
        }
        self.html
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// JSON string literal safe inside an MDX expression.
///
/// Braces are written as unicode escapes: MDX finds the end of an
/// expression by brace matching, without looking inside string literals.
fn js_string_literal(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| String::from("\"\""))
        .replace('{', "\\u007b")
        .replace('}', "\\u007d")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fence<'a>(info: &'a str, body: &'a str) -> Fence<'a> {
        Fence {
            raw: "",
            indent: "",
            info,
            body,
        }
    }

    #[test]
    fn test_known_language_gets_class_and_spans() {
        let jsx = highlight_fence(&fence("rust", "fn main() {}"));

        assert!(jsx.starts_with("<pre><code className=\"hljs language-rust\""), "{jsx}");
        assert!(jsx.ends_with("}} /></pre>"), "{jsx}");
        assert!(jsx.contains("hljs-"), "{jsx}");
        assert!(!jsx.contains('\n'));
    }

    #[test]
    fn test_scopes_map_to_highlightjs_classes() {
        let html = highlight_code(Some("rust"), "let s = \"hi\"; // note");

        assert!(html.contains("<span class=\"hljs-keyword\">let</span>"), "{html}");
        assert!(
            html.contains("<span class=\"hljs-string\">&quot;hi&quot;</span>"),
            "{html}"
        );
        assert!(html.contains("<span class=\"hljs-comment\">// note</span>"), "{html}");
        assert!(!html.contains("hljs-source"), "{html}");
    }

    #[test]
    fn test_indented_fence_body_is_dedented() {
        let jsx = highlight_fence(&Fence {
            raw: "",
            indent: "  ",
            info: "text",
            body: "  a\n  b",
        });
        assert!(jsx.contains(r#"__html: "a\nb""#), "{jsx}");
    }

    #[test]
    fn test_unlabeled_fence_is_plain() {
        let jsx = highlight_fence(&fence("", "a < b"));

        assert!(jsx.starts_with("<pre><code className=\"hljs\" "), "{jsx}");
        assert!(jsx.contains("a &lt; b"), "{jsx}");
    }

    #[test]
    fn test_text_fence_is_plain_but_labeled() {
        let jsx = highlight_fence(&fence("text", "fn main() {}"));

        assert!(jsx.contains("className=\"hljs language-text\""), "{jsx}");
        assert!(!jsx.contains("<span"), "{jsx}");
    }

    #[test]
    fn test_unknown_language_does_not_fail() {
        let jsx = highlight_fence(&fence("no-such-language", "x = 1"));
        assert!(jsx.contains("language-no-such-language"), "{jsx}");
        assert!(jsx.contains("x = 1"), "{jsx}");
    }

    #[test]
    fn test_invalid_language_token_dropped() {
        let jsx = highlight_fence(&fence("js\"onload", "x"));
        assert!(jsx.starts_with("<pre><code className=\"hljs\" "), "{jsx}");
    }

    #[test]
    fn test_string_literal_has_no_braces() {
        assert_eq!(
            js_string_literal("{a}\n\"b\""),
            r#""\u007ba\u007d\n\"b\"""#
        );
    }
}
