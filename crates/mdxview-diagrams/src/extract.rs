//! Diagram fence extraction.

use std::ops::Range;

use crate::language::Dialect;

/// A diagram fence found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Dialect of the fence.
    pub dialect: Dialect,
    /// Diagram source between the fence lines.
    pub source_code: String,
    /// Complete matched fence, including the fence lines.
    pub original_matched_text: String,
    /// Zero-based position among the blocks of the same dialect.
    pub sequence_index: usize,
    /// Byte range of `original_matched_text` in the scanned text.
    pub span: Range<usize>,
}

impl DiagramBlock {
    /// Element id for this block (`plantuml-0`, `mermaid-3`, ...).
    #[must_use]
    pub fn diagram_id(&self) -> String {
        format!("{}-{}", self.dialect.id_prefix(), self.sequence_index)
    }
}

/// Extract all fences of `dialect` from `text`, in source order.
///
/// Matches never overlap: scanning resumes after the end of each match.
#[must_use]
pub fn extract(text: &str, dialect: Dialect) -> Vec<DiagramBlock> {
    dialect
        .fence_pattern()
        .captures_iter(text)
        .enumerate()
        .map(|(sequence_index, caps)| {
            let whole = caps.get(0).expect("group 0 is always present");
            let body = caps.get(1).map_or("", |m| m.as_str());
            DiagramBlock {
                dialect,
                source_code: body.to_owned(),
                original_matched_text: whole.as_str().to_owned(),
                sequence_index,
                span: whole.range(),
            }
        })
        .collect()
}
