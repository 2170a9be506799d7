//! JSX lowering.
//!
//! Parses the sanitized artifact, drops imports of the rendering framework
//! (the host provides it as a global) and rewrites JSX into classic
//! `React.createElement` calls.

use swc_core::common::Mark;
use swc_core::common::sync::Lrc;
use swc_core::ecma::ast::{ModuleDecl, ModuleItem};
use swc_core::ecma::transforms::base::resolver;
use swc_core::ecma::transforms::react::{Options as JsxOptions, Runtime, react};
use swc_core::ecma::visit::{VisitMut, VisitMutWith};

use crate::artifact::{SanitizedArtifact, TransformedCode};
use crate::error::TransformError;
use crate::js;

/// Removes top-level `import ... from "react"` declarations.
///
/// Works on the syntax tree, so look-alike text in strings or comments is
/// never touched.
struct StripFrameworkImports;

impl VisitMut for StripFrameworkImports {
    fn visit_mut_module_items(&mut self, items: &mut Vec<ModuleItem>) {
        items.retain(|item| {
            !matches!(
                item,
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) if js::is_framework_import(import)
            )
        });
    }
}

/// Lower JSX in `artifact` to plain JavaScript.
///
/// # Errors
///
/// Returns [`TransformError`] with the offending code when the artifact
/// cannot be parsed or printed.
pub fn transform(artifact: SanitizedArtifact) -> Result<TransformedCode, TransformError> {
    let code = artifact.into_inner();

    let result = js::with_globals(|| {
        let js::ParsedModule {
            cm,
            comments,
            mut module,
        } = js::parse_module(&code)?;

        module.visit_mut_with(&mut StripFrameworkImports);

        let unresolved_mark = Mark::new();
        let top_level_mark = Mark::new();
        let options = JsxOptions {
            runtime: Some(Runtime::Classic),
            ..Default::default()
        };
        module.visit_mut_with(&mut resolver(unresolved_mark, top_level_mark, false));
        module.visit_mut_with(&mut react(
            Lrc::clone(&cm),
            Some(comments),
            options,
            top_level_mark,
            unresolved_mark,
        ));

        js::emit_module(&cm, &module, None)
    });

    match result {
        Ok(output) => Ok(TransformedCode::new(output)),
        Err(message) => {
            tracing::debug!(error = %message, "JSX transform failed");
            Err(TransformError { message, code })
        }
    }
}
