//! MDX source compilation.
//!
//! [`MdxCompiler`] turns a document into a function body that returns
//! `{frontmatter, default: MDXContent}`:
//! 1. Read YAML front matter
//! 2. Prepare the markup: escape HTML comments, highlight code fences
//! 3. Compile with `mdxjs` (GFM, front matter, JSX kept)
//! 4. Lower the module to a function body: exports become plain
//!    declarations, framework imports stay for the transformer to drop

use swc_core::common::comments::Comments;
use swc_core::ecma::ast::{
    ClassDecl, ClassExpr, Decl, DefaultDecl, FnDecl, FnExpr, Module, ModuleDecl, ModuleItem, Stmt,
};

use crate::artifact::RawArtifact;
use crate::comments::escape_html_comments;
use crate::error::CompileError;
use crate::fence::{Segment, segments};
use crate::frontmatter;
use crate::highlight::highlight_fence;
use crate::js;

/// MDX compiler with preview-specific preprocessing.
///
/// # Example
///
/// ```ignore
/// use mdxview_compiler::MdxCompiler;
///
/// let raw = MdxCompiler::new().filepath("guide.mdx").compile("# Hello")?;
/// ```
#[derive(Debug, Clone)]
pub struct MdxCompiler {
    filepath: Option<String>,
    highlight: bool,
}

impl Default for MdxCompiler {
    fn default() -> Self {
        Self {
            filepath: None,
            highlight: true,
        }
    }
}

impl MdxCompiler {
    /// Create a compiler with highlighting enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the document, used in compiler messages.
    #[must_use]
    pub fn filepath(mut self, filepath: impl Into<String>) -> Self {
        self.filepath = Some(filepath.into());
        self
    }

    /// Enable or disable syntax highlighting of code fences.
    #[must_use]
    pub fn highlight(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Compile `text` into a raw function-body artifact.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] when front matter is not valid YAML, the
    /// MDX is malformed, or the document uses module syntax that has no
    /// function-body equivalent (imports, re-exports).
    pub fn compile(&self, text: &str) -> Result<RawArtifact, CompileError> {
        let front_matter = match frontmatter::locate(text) {
            Some(fm) => frontmatter::parse(fm.yaml)?,
            None => serde_json::Value::Object(serde_json::Map::new()),
        };

        let prepared = self.prepare(text);

        let options = mdxjs::Options {
            parse: mdxjs::MdxParseOptions {
                constructs: mdxjs::MdxConstructs {
                    frontmatter: true,
                    ..mdxjs::MdxConstructs::gfm()
                },
                ..mdxjs::MdxParseOptions::gfm()
            },
            jsx: true,
            filepath: self.filepath.clone(),
            ..Default::default()
        };
        let module_code =
            mdxjs::compile(&prepared, &options).map_err(|e| CompileError::Mdx(e.to_string()))?;

        let body = js::with_globals(|| -> Result<String, CompileError> {
            let parsed = js::parse_module(&module_code).map_err(CompileError::Parse)?;
            let module = lower_to_function_body(parsed.module)?;
            js::emit_module(&parsed.cm, &module, Some(&parsed.comments as &dyn Comments))
                .map_err(CompileError::Emit)
        })?;

        // Serializing a `Value` cannot fail.
        let front_matter = serde_json::to_string(&front_matter).unwrap_or_else(|_| "{}".into());

        tracing::debug!(
            filepath = ?self.filepath,
            highlight = self.highlight,
            "Compiled MDX document"
        );

        Ok(RawArtifact::new(format!(
            "\"use strict\";\nconst frontmatter = {front_matter};\n{}\nreturn {{frontmatter, default: MDXContent}};\n",
            body.trim_end()
        )))
    }

    /// Rewrite markup MDX cannot take as-is, leaving front matter alone.
    fn prepare(&self, text: &str) -> String {
        let body_start = frontmatter::locate(text).map_or(0, |fm| fm.body_start);
        let mut result = String::with_capacity(text.len());
        result.push_str(&text[..body_start]);

        for segment in segments(&text[body_start..]) {
            match segment {
                Segment::Text(t) => result.push_str(&escape_html_comments(t)),
                // MDX has no indented code, so a fence at any depth is a fence.
                // The indent keeps the element inside its list item.
                Segment::Fence(fence) if self.highlight => {
                    result.push('\n');
                    result.push_str(fence.indent);
                    result.push_str(&highlight_fence(&fence));
                    result.push('\n');
                }
                Segment::Fence(fence) => result.push_str(fence.raw),
            }
        }
        result
    }
}

/// Turn module-level syntax into function-body statements.
fn lower_to_function_body(module: Module) -> Result<Module, CompileError> {
    let mut body = Vec::with_capacity(module.body.len());

    for item in module.body {
        let decl = match item {
            ModuleItem::Stmt(_) => {
                body.push(item);
                continue;
            }
            ModuleItem::ModuleDecl(decl) => decl,
        };

        match decl {
            ModuleDecl::Import(import) if js::is_framework_import(&import) => {
                body.push(ModuleItem::ModuleDecl(ModuleDecl::Import(import)));
            }
            ModuleDecl::Import(import) => {
                return Err(CompileError::UnsupportedModuleSyntax(format!(
                    "import from `{}`",
                    import.src.value
                )));
            }
            ModuleDecl::ExportDecl(export) => body.push(ModuleItem::Stmt(Stmt::Decl(export.decl))),
            ModuleDecl::ExportDefaultDecl(export) => {
                body.push(ModuleItem::Stmt(Stmt::Decl(default_decl(export.decl)?)));
            }
            // `export {a, b}` only re-exposes bindings that are already declared.
            ModuleDecl::ExportNamed(named) if named.src.is_none() => {}
            ModuleDecl::ExportNamed(named) => {
                return Err(CompileError::UnsupportedModuleSyntax(format!(
                    "re-export from `{}`",
                    named.src.map_or_else(String::new, |src| src.value.to_string())
                )));
            }
            ModuleDecl::ExportAll(all) => {
                return Err(CompileError::UnsupportedModuleSyntax(format!(
                    "re-export from `{}`",
                    all.src.value
                )));
            }
            // `export default MDXContent` names a declared function.
            ModuleDecl::ExportDefaultExpr(export) if export.expr.is_ident() => {}
            _ => {
                return Err(CompileError::UnsupportedModuleSyntax(String::from(
                    "export of an expression",
                )));
            }
        }
    }

    Ok(Module { body, ..module })
}

fn default_decl(decl: DefaultDecl) -> Result<Decl, CompileError> {
    match decl {
        DefaultDecl::Fn(FnExpr {
            ident: Some(ident),
            function,
        }) => Ok(Decl::Fn(FnDecl {
            ident,
            declare: false,
            function,
        })),
        DefaultDecl::Class(ClassExpr {
            ident: Some(ident),
            class,
        }) => Ok(Decl::Class(ClassDecl {
            ident,
            declare: false,
            class,
        })),
        _ => Err(CompileError::UnsupportedModuleSyntax(String::from(
            "anonymous default export",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compile_returns_module_shape() {
        let raw = MdxCompiler::new().compile("# Hello").unwrap();
        let code = raw.as_str();

        assert!(code.starts_with("\"use strict\";\n"), "{code}");
        assert!(code.contains("function MDXContent("), "{code}");
        assert!(!code.contains("export "), "{code}");
        assert!(
            code.trim_end()
                .ends_with("return {frontmatter, default: MDXContent};"),
            "{code}"
        );
    }

    #[test]
    fn test_compile_keeps_jsx() {
        let raw = MdxCompiler::new().compile("<Foo bar={1} />").unwrap();
        assert!(raw.as_str().contains("<Foo bar={1}"), "{raw}");
    }

    #[test]
    fn test_compile_front_matter() {
        let raw = MdxCompiler::new()
            .compile("---\ntitle: Guide\n---\n\n# Body\n")
            .unwrap();
        assert!(
            raw.as_str()
                .contains(r#"const frontmatter = {"title":"Guide"};"#),
            "{raw}"
        );
    }

    #[test]
    fn test_compile_without_front_matter_has_empty_object() {
        let raw = MdxCompiler::new().compile("text").unwrap();
        assert!(raw.as_str().contains("const frontmatter = {};"), "{raw}");
    }

    #[test]
    fn test_compile_html_comment() {
        let result = MdxCompiler::new().compile("before\n\n<!-- hidden -->\n\nafter\n");
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn test_compile_syntax_error() {
        let err = MdxCompiler::new().compile("a {b\n").unwrap_err();
        assert!(matches!(err, CompileError::Mdx(_)), "{err:?}");
    }

    #[test]
    fn test_compile_invalid_front_matter() {
        let err = MdxCompiler::new()
            .compile("---\ntitle: [oops\n---\n")
            .unwrap_err();
        assert!(matches!(err, CompileError::FrontMatter(_)), "{err:?}");
    }

    #[test]
    fn test_compile_rejects_foreign_import() {
        let err = MdxCompiler::new()
            .compile("import {Chart} from './chart.js'\n\n<Chart />\n")
            .unwrap_err();
        assert_eq!(
            err,
            CompileError::UnsupportedModuleSyntax("import from `./chart.js`".to_owned())
        );
    }

    #[test]
    fn test_compile_export_becomes_declaration() {
        let raw = MdxCompiler::new()
            .compile("export const answer = 42\n\n{answer}\n")
            .unwrap();
        assert!(raw.as_str().contains("const answer = 42"), "{raw}");
        assert!(!raw.as_str().contains("export const"), "{raw}");
    }

    #[test]
    fn test_prepare_highlights_fences() {
        let prepared = MdxCompiler::new().prepare("# Code\n\n```rust\nfn main() {}\n```\n");

        assert!(prepared.starts_with("# Code\n\n\n<pre><code className=\"hljs language-rust\""));
        assert!(!prepared.contains("```"));
    }

    #[test]
    fn test_prepare_fence_in_list_item() {
        let prepared = MdxCompiler::new().prepare("- item\n\n  ```js\n  const a = 1;\n  ```\n\n- next\n");

        assert!(
            prepared.starts_with("- item\n\n\n  <pre><code className=\"hljs language-js\""),
            "{prepared}"
        );
        assert!(prepared.ends_with("</pre>\n\n\n- next\n"), "{prepared}");
        assert!(!prepared.contains("  const"), "{prepared}");
    }

    #[test]
    fn test_prepare_deeply_indented_fence() {
        let prepared =
            MdxCompiler::new().prepare("1. item\n\n    ```sh\n    ls\n    ```\n");

        assert!(
            prepared.starts_with("1. item\n\n\n    <pre><code className=\"hljs language-sh\""),
            "{prepared}"
        );
        assert!(!prepared.contains("```"), "{prepared}");
    }

    #[test]
    fn test_prepare_without_highlight_keeps_fences() {
        let text = "```rust\nfn main() {}\n```\n";
        assert_eq!(MdxCompiler::new().highlight(false).prepare(text), text);
    }

    #[test]
    fn test_prepare_leaves_comments_in_fences() {
        let text = "<!-- a -->\n\n```html\n<!-- b -->\n```\n";
        let prepared = MdxCompiler::new().highlight(false).prepare(text);

        assert_eq!(prepared, "{/* <!-- a --> */}\n\n```html\n<!-- b -->\n```\n");
    }

    #[test]
    fn test_prepare_skips_front_matter() {
        let text = "---\nnote: <!-- x -->\n---\n<!-- y -->\n";
        let prepared = MdxCompiler::new().prepare(text);

        assert_eq!(prepared, "---\nnote: <!-- x -->\n---\n{/* <!-- y --> */}\n");
    }

    #[test]
    fn test_compile_highlighted_fence() {
        let raw = MdxCompiler::new()
            .compile("```js\nconst a = {b: 1};\n```\n")
            .unwrap();
        assert!(raw.as_str().contains("dangerouslySetInnerHTML"), "{raw}");
    }
}
