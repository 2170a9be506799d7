//! Error types for the compilation stages.

/// Error compiling MDX source into a function-body artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("invalid front matter: {0}")]
    FrontMatter(String),
    #[error("{0}")]
    Mdx(String),
    #[error("failed to parse compiled module: {0}")]
    Parse(String),
    #[error("unsupported module syntax: {0}")]
    UnsupportedModuleSyntax(String),
    #[error("failed to emit compiled code: {0}")]
    Emit(String),
}

/// Error lowering JSX in a sanitized artifact.
///
/// Carries the code that failed so callers can show it alongside the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransformError {
    pub message: String,
    pub code: String,
}

/// Error assembling the final executable code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("transformed code is empty")]
    EmptyCode,
    #[error("transformed code does not define MDXContent")]
    MissingEntryPoint,
}

/// Any error from the compile, transform or assembly stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}
