//! CLI command implementations.

pub(crate) mod compile;
pub(crate) mod diagrams;
pub(crate) mod render;

use std::io::Write;
use std::path::Path;

use mdxview_diagrams::DiagramError;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use compile::CompileArgs;
pub(crate) use diagrams::DiagramsArgs;
pub(crate) use render::RenderArgs;

/// Read the document to process.
fn read_document(path: &Path) -> Result<String, CliError> {
    Ok(std::fs::read_to_string(path)?)
}

/// Write command output to `path`, or to stdout when `None`.
fn write_result(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Print one warning line per failed diagram.
fn report_diagram_errors(output: &Output, errors: &[DiagramError]) {
    for error in errors {
        output.warning(&format!("Warning: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_write_result_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_result(Some(&path), "{\"type\":\"update\"}").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"type\":\"update\"}"
        );
    }

    #[test]
    fn test_read_missing_document() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_document(&dir.path().join("missing.mdx")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)), "{err:?}");
    }
}
