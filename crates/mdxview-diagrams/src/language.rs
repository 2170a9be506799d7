//! Diagram dialects recognized in MDX documents.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static PLANTUML_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```plantuml\r?\n(.*?)\r?\n```").unwrap());

static MERMAID_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\r?\n(.*?)\r?\n```").unwrap());

/// Supported diagram dialects.
///
/// Dialects are processed in [`Dialect::ALL`] order: `PlantUML` first, then
/// Mermaid over the already substituted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    PlantUml,
    Mermaid,
}

impl Dialect {
    /// All dialects in processing order.
    pub const ALL: [Self; 2] = [Self::PlantUml, Self::Mermaid];

    /// Label used on the opening fence (` ```plantuml `).
    #[must_use]
    pub fn fence_label(self) -> &'static str {
        match self {
            Self::PlantUml => "plantuml",
            Self::Mermaid => "mermaid",
        }
    }

    /// Kroki endpoint name for this dialect.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::PlantUml => "plantuml",
            Self::Mermaid => "mermaid",
        }
    }

    /// Prefix of the element ids assigned to rendered diagrams.
    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        self.fence_label()
    }

    /// Human-readable name shown in inline error messages.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::PlantUml => "PlantUML",
            Self::Mermaid => "Mermaid",
        }
    }

    /// Pattern matching one complete fence of this dialect.
    ///
    /// Capture group 1 is the diagram source between the fence lines.
    pub(crate) fn fence_pattern(self) -> &'static Regex {
        match self {
            Self::PlantUml => &PLANTUML_FENCE,
            Self::Mermaid => &MERMAID_FENCE,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fence_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(Dialect::PlantUml.endpoint(), "plantuml");
        assert_eq!(Dialect::Mermaid.endpoint(), "mermaid");
    }

    #[test]
    fn test_processing_order() {
        assert_eq!(Dialect::ALL, [Dialect::PlantUml, Dialect::Mermaid]);
    }

    #[test]
    fn test_display_uses_fence_label() {
        assert_eq!(Dialect::PlantUml.to_string(), "plantuml");
        assert_eq!(Dialect::Mermaid.display_name(), "Mermaid");
    }

    #[test]
    fn test_fence_pattern_captures_body() {
        let caps = Dialect::Mermaid
            .fence_pattern()
            .captures("```mermaid\ngraph TD\n  A --> B\n```")
            .unwrap();
        assert_eq!(&caps[1], "graph TD\n  A --> B");
    }

    #[test]
    fn test_fence_pattern_tolerates_crlf() {
        let caps = Dialect::PlantUml
            .fence_pattern()
            .captures("```plantuml\r\n@startuml\r\nA -> B\r\n@enduml\r\n```")
            .unwrap();
        assert_eq!(&caps[1], "@startuml\r\nA -> B\r\n@enduml");
    }
}
