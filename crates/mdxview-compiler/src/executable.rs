//! Full compilation chain from MDX text to executable code.

use crate::artifact::ExecutableCode;
use crate::compile::MdxCompiler;
use crate::error::PipelineError;
use crate::finalize::finalize;
use crate::sanitize::sanitize;
use crate::transform::transform;

/// Compile, sanitize, transform and finalize `text`.
///
/// # Errors
///
/// Returns the first stage error as a [`PipelineError`].
pub fn build_executable(compiler: &MdxCompiler, text: &str) -> Result<ExecutableCode, PipelineError> {
    let raw = compiler.compile(text)?;
    let sanitized = sanitize(raw);
    let transformed = transform(sanitized)?;
    Ok(finalize(transformed)?)
}

/// Like [`build_executable`], reporting failures as executable code.
///
/// The returned error is the failure the report was built from.
#[must_use]
pub fn build_executable_or_report(
    compiler: &MdxCompiler,
    text: &str,
) -> (ExecutableCode, Option<PipelineError>) {
    match build_executable(compiler, text) {
        Ok(code) => (code, None),
        Err(e) => {
            tracing::error!(error = %e, "MDX compilation failed");
            (ExecutableCode::error_report(&e.to_string()), Some(e))
        }
    }
}
