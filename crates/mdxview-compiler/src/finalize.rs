//! Final assembly of the executable function body.

use std::sync::LazyLock;

use regex::Regex;

use crate::artifact::{ExecutableCode, TransformedCode};
use crate::error::AssemblyError;

static ENTRY_POINT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bMDXContent\b").unwrap());

/// Invocation the host's evaluated function body ends with.
const ENTRY_POINT_CALL: &str = "return MDXContent({ components: {} });";

/// Append the entry-point invocation to `code`.
///
/// # Errors
///
/// Returns [`AssemblyError`] when the code is empty or never mentions
/// `MDXContent`.
pub fn finalize(code: TransformedCode) -> Result<ExecutableCode, AssemblyError> {
    let code = code.into_inner();
    let code = code.trim_end();

    if code.trim().is_empty() {
        return Err(AssemblyError::EmptyCode);
    }
    if !ENTRY_POINT_RE.is_match(code) {
        return Err(AssemblyError::MissingEntryPoint);
    }

    Ok(ExecutableCode::new(format!("{code}\n{ENTRY_POINT_CALL}\n")))
}
