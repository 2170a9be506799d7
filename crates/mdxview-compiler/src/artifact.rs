//! Typed intermediate artifacts.
//!
//! Each stage consumes the previous stage's type, so stages cannot be run
//! out of order.

use std::fmt;

/// Function-body JavaScript as produced by the MDX compiler.
///
/// May still contain JSX, pragma comments, a strict-mode directive and a
/// trailing module-export return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArtifact(String);

/// Artifact with compiler noise removed and a guaranteed top-level return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedArtifact(String);

/// Plain JavaScript: JSX lowered to framework calls, framework imports gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedCode(String);

/// Self-contained function body the host evaluates to render the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableCode(String);

macro_rules! artifact_impls {
    ($($name:ident),+) => {$(
        impl $name {
            /// Wrap already-produced code.
            #[must_use]
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    )+};
}

artifact_impls!(RawArtifact, SanitizedArtifact, TransformedCode, ExecutableCode);

impl ExecutableCode {
    /// Code that reports `message` on the host console instead of rendering.
    ///
    /// The message is embedded as a JSON string literal, so quotes and line
    /// breaks cannot escape it.
    #[must_use]
    pub fn error_report(message: &str) -> Self {
        let literal = serde_json::to_string(&format!("MDX Error: {message}"))
            .unwrap_or_else(|_| String::from("\"MDX Error\""));
        Self(format!("console.error({literal});"))
    }
}
