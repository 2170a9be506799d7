//! MDX compilation for the mdxview preview.
//!
//! This crate turns an MDX document into a JavaScript function body the
//! preview host evaluates directly. Each stage has its own artifact type:
//! - [`MdxCompiler::compile`]: MDX text to [`RawArtifact`]
//! - [`sanitize`]: [`RawArtifact`] to [`SanitizedArtifact`]
//! - [`transform`]: [`SanitizedArtifact`] to [`TransformedCode`]
//! - [`finalize`]: [`TransformedCode`] to [`ExecutableCode`]
//!
//! [`build_executable`] chains all four.
//!
//! # Example
//!
//! ```ignore
//! use mdxview_compiler::{MdxCompiler, build_executable};
//!
//! let code = build_executable(&MdxCompiler::new(), "# Hello\n\n<Note />")?;
//! assert!(code.as_str().ends_with("return MDXContent({ components: {} });\n"));
//! ```

mod artifact;
mod comments;
mod compile;
mod error;
mod executable;
mod fence;
mod finalize;
mod frontmatter;
mod highlight;
mod js;
mod sanitize;
mod transform;

pub use artifact::{ExecutableCode, RawArtifact, SanitizedArtifact, TransformedCode};
pub use compile::MdxCompiler;
pub use error::{AssemblyError, CompileError, PipelineError, TransformError};
pub use executable::{build_executable, build_executable_or_report};
pub use finalize::finalize;
pub use sanitize::sanitize;
pub use transform::transform;
