//! Cleanup of raw compiler output.
//!
//! Every rule is pattern-match-with-fallback: text that does not match is
//! left alone, so sanitizing never fails and is idempotent.

use std::sync::LazyLock;

use regex::Regex;

use crate::artifact::{RawArtifact, SanitizedArtifact};

/// JSX pragma comments (`/*@jsxRuntime automatic*/`, `/** @jsx h */`).
static PRAGMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*\*?\s*@jsx[A-Za-z]*\b[^*]*\*/[ \t]*\n?").unwrap());

static STRICT_MODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']use strict["'];?[ \t]*\n?"#).unwrap());

/// Module-export return at the very end of the artifact.
static EXPORT_RETURN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"return\s*\{\s*(?:frontmatter\s*,\s*)?default\s*:\s*MDXContent\s*,?\s*\}\s*;?\s*$",
    )
    .unwrap()
});

static RETURN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\breturn\b").unwrap());

/// Fallback so the evaluated body always returns something renderable.
const FALLBACK_RETURN: &str = "return <></>;";

/// Strip pragmas, the strict-mode directive and the module-export return.
///
/// Code without any `return` gets a fallback one returning an empty
/// fragment.
#[must_use]
pub fn sanitize(raw: RawArtifact) -> SanitizedArtifact {
    let code = raw.into_inner();
    let code = PRAGMA_RE.replace_all(&code, "");
    let code = STRICT_MODE_RE.replace(&code, "");
    let code = EXPORT_RETURN_RE.replace(&code, "");
    let code = code.trim();

    if RETURN_RE.is_match(code) {
        SanitizedArtifact::new(code)
    } else if code.is_empty() {
        SanitizedArtifact::new(FALLBACK_RETURN)
    } else {
        SanitizedArtifact::new(format!("{code}\n{FALLBACK_RETURN}"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(code: &str) -> String {
        sanitize(RawArtifact::new(code)).into_inner()
    }

    #[test]
    fn test_removes_pragmas() {
        let code = "/*@jsxRuntime automatic*/\n/*@jsxImportSource react*/\nfunction MDXContent() {\n  return <p/>;\n}";
        assert_eq!(run(code), "function MDXContent() {\n  return <p/>;\n}");
    }

    #[test]
    fn test_removes_doc_style_pragma() {
        assert_eq!(run("/** @jsx h */\nreturn 1;"), "return 1;");
    }

    #[test]
    fn test_keeps_other_comments() {
        assert_eq!(run("/* note */\nreturn 1;"), "/* note */\nreturn 1;");
    }

    #[test]
    fn test_removes_strict_mode_once() {
        let code = "\"use strict\";\nconst a = 'use strict';\nreturn a;";
        assert_eq!(run(code), "const a = 'use strict';\nreturn a;");
    }

    #[test]
    fn test_removes_export_return_and_appends_fallback() {
        let code = "\"use strict\";\nfunction MDXContent() {}\nreturn {frontmatter, default: MDXContent};\n";
        assert_eq!(run(code), "function MDXContent() {}\nreturn <></>;");
    }

    #[test]
    fn test_export_return_variants() {
        assert_eq!(
            run("const x = 1;\nreturn {\n  default: MDXContent\n};"),
            "const x = 1;\nreturn <></>;"
        );
        assert_eq!(
            run("const x = 1;\nreturn { frontmatter, default: MDXContent, }"),
            "const x = 1;\nreturn <></>;"
        );
    }

    #[test]
    fn test_other_return_kept() {
        let code = "function MDXContent() {\n  return <div/>;\n}";
        assert_eq!(run(code), code);
    }

    #[test]
    fn test_export_return_only_removed_at_end() {
        let code = "return {default: MDXContent};\nconst later = 1;";
        assert_eq!(run(code), code);
    }

    #[test]
    fn test_empty_artifact_gets_fallback() {
        assert_eq!(run(""), "return <></>;");
    }

    #[test]
    fn test_idempotent() {
        let code = "/*@jsxRuntime automatic*/\n\"use strict\";\nfunction MDXContent() {}\nreturn {frontmatter, default: MDXContent};";
        let once = run(code);
        assert_eq!(run(&once), once);
    }
}
