//! Messages sent to the preview host.

use mdxview_diagrams::RenderedDiagram;
use serde::Serialize;

/// Message the host consumes to refresh the preview.
///
/// Serializes as `{"type": "update", "code": ..., "diagrams": [...]}`.
/// `diagrams` is omitted when compilation failed and `code` is an error
/// report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostMessage {
    Update {
        /// Function body the host evaluates with `new Function(code)()`.
        code: String,
        /// SVGs to inject into the elements with matching ids.
        #[serde(skip_serializing_if = "Option::is_none")]
        diagrams: Option<Vec<RenderedDiagram>>,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_update_with_diagrams() {
        let message = HostMessage::Update {
            code: "return 1;".to_owned(),
            diagrams: Some(vec![RenderedDiagram {
                id: "plantuml-0".to_owned(),
                svg: "<svg/>".to_owned(),
            }]),
        };

        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"type":"update","code":"return 1;","diagrams":[{"id":"plantuml-0","svg":"<svg/>"}]}"#
        );
    }

    #[test]
    fn test_update_without_diagrams_omits_key() {
        let message = HostMessage::Update {
            code: "console.error(\"x\");".to_owned(),
            diagrams: None,
        };

        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"type":"update","code":"console.error(\"x\");"}"#
        );
    }
}
