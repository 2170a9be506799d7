//! JavaScript parsing and emission on top of swc.

use swc_core::common::comments::{Comments, SingleThreadedComments};
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, GLOBALS, Globals, SourceMap, Spanned};
use swc_core::ecma::ast::{EsVersion, ImportDecl, Module};
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::codegen::{Config, Emitter};
use swc_core::ecma::parser::error::Error as ParseError;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, StringInput, Syntax};

/// Module name of the rendering framework the host provides as a global.
pub(crate) const FRAMEWORK_MODULE: &str = "react";

/// A parsed function body together with its source map and comments.
pub(crate) struct ParsedModule {
    pub cm: Lrc<SourceMap>,
    pub comments: SingleThreadedComments,
    pub module: Module,
}

/// Whether `import` pulls in the rendering framework.
pub(crate) fn is_framework_import(import: &ImportDecl) -> bool {
    &*import.src.value == FRAMEWORK_MODULE
}

/// Run `f` with fresh swc globals (hygiene marks, span interning).
pub(crate) fn with_globals<T>(f: impl FnOnce() -> T) -> T {
    GLOBALS.set(&Globals::new(), f)
}

/// Parse `code` as a JSX-enabled module that may `return` at top level.
///
/// Errors are reported as `line:column: message`.
pub(crate) fn parse_module(code: &str) -> Result<ParsedModule, String> {
    let cm: Lrc<SourceMap> = Lrc::default();
    let fm = cm.new_source_file(FileName::Anon.into(), code.to_owned());
    let comments = SingleThreadedComments::default();

    let syntax = Syntax::Es(EsSyntax {
        jsx: true,
        allow_return_outside_function: true,
        ..Default::default()
    });
    let lexer = Lexer::new(
        syntax,
        EsVersion::latest(),
        StringInput::from(&*fm),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser
        .parse_module()
        .map_err(|e| describe_error(&cm, &e))?;
    if let Some(e) = parser.take_errors().first() {
        return Err(describe_error(&cm, e));
    }

    Ok(ParsedModule {
        cm,
        comments,
        module,
    })
}

fn describe_error(cm: &SourceMap, error: &ParseError) -> String {
    let loc = cm.lookup_char_pos(error.span().lo);
    format!(
        "{}:{}: {}",
        loc.line,
        loc.col_display + 1,
        error.kind().msg()
    )
}

/// Print `module` back to source, optionally with its comments.
pub(crate) fn emit_module(
    cm: &Lrc<SourceMap>,
    module: &Module,
    comments: Option<&dyn Comments>,
) -> Result<String, String> {
    let mut buf = Vec::new();
    {
        let mut emitter = Emitter {
            cfg: Config::default().with_target(EsVersion::latest()),
            cm: Lrc::clone(cm),
            comments,
            wr: JsWriter::new(Lrc::clone(cm), "\n", &mut buf, None),
        };
        emitter.emit_module(module).map_err(|e| e.to_string())?;
    }
    String::from_utf8(buf).map_err(|e| e.to_string())
}
