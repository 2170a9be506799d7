//! Diagram substitution pipeline.
//!
//! [`DiagramPipeline`] processes one dialect at a time:
//! 1. Extract all fences of the dialect
//! 2. Render every fence concurrently on the rayon thread pool
//! 3. Splice a placeholder (or an inline error) into each fence's byte span
//!
//! Substitution is positional, so byte-identical fences are each replaced
//! exactly once.

use std::ops::Range;

use rayon::prelude::*;
use serde::Serialize;

use crate::extract::extract;
use crate::kroki::{DiagramError, DiagramErrorKind, DiagramRenderer, KrokiRenderer};
use crate::language::Dialect;

/// A successfully rendered diagram.
///
/// The host injects `svg` into the element whose id is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDiagram {
    pub id: String,
    pub svg: String,
}

/// Result of running one or more dialect passes over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionResult {
    /// Document text with diagram fences replaced.
    pub processed_text: String,
    /// Rendered diagrams in extraction order.
    pub diagrams: Vec<RenderedDiagram>,
    /// Diagrams that failed to render, in extraction order.
    pub errors: Vec<DiagramError>,
}

impl SubstitutionResult {
    fn unchanged(text: &str) -> Self {
        Self {
            processed_text: text.to_owned(),
            diagrams: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Extracts, renders and substitutes diagram fences.
///
/// # Example
///
/// ```ignore
/// use mdxview_diagrams::{DiagramPipeline, Dialect, KrokiRenderer};
///
/// let pipeline = DiagramPipeline::new(KrokiRenderer::new("https://kroki.io"));
/// let result = pipeline.process("```plantuml\nA -> B\n```", Dialect::PlantUml);
/// assert_eq!(result.processed_text, r#"<div id="plantuml-0"></div>"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagramPipeline<R = KrokiRenderer> {
    renderer: R,
}

impl<R: DiagramRenderer> DiagramPipeline<R> {
    /// Create a pipeline rendering through `renderer`.
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Renderer used by this pipeline.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run every dialect pass in [`Dialect::ALL`] order.
    ///
    /// Each pass reads the text produced by the previous one. Diagrams and
    /// errors are concatenated in pass order.
    #[must_use]
    pub fn process_all(&self, text: &str) -> SubstitutionResult {
        Dialect::ALL.into_iter().fold(
            SubstitutionResult::unchanged(text),
            |mut acc, dialect| {
                let pass = self.process(&acc.processed_text, dialect);
                acc.processed_text = pass.processed_text;
                acc.diagrams.extend(pass.diagrams);
                acc.errors.extend(pass.errors);
                acc
            },
        )
    }

    /// Run a single dialect pass over `text`.
    ///
    /// Returns the text unchanged, without rendering anything, when the
    /// document has no fence of this dialect.
    #[must_use]
    pub fn process(&self, text: &str, dialect: Dialect) -> SubstitutionResult {
        let blocks = extract(text, dialect);
        if blocks.is_empty() {
            return SubstitutionResult::unchanged(text);
        }

        let outcomes: Vec<Result<String, DiagramErrorKind>> = blocks
            .par_iter()
            .map(|block| self.renderer.render(dialect, &block.source_code))
            .collect();

        let block_count = blocks.len();
        let mut replacements = Replacements::with_capacity(block_count);
        let mut diagrams = Vec::with_capacity(block_count);
        let mut errors = Vec::new();

        for (block, outcome) in blocks.into_iter().zip(outcomes) {
            let id = block.diagram_id();
            let span = block.span;
            match outcome {
                Ok(svg) => {
                    replacements.add(span, placeholder(&id));
                    diagrams.push(RenderedDiagram { id, svg });
                }
                Err(kind) => {
                    tracing::warn!(id = %id, error = %kind, "Diagram rendering failed");
                    replacements.add(span, error_fragment(dialect, &kind));
                    errors.push(DiagramError { id, kind });
                }
            }
        }

        tracing::debug!(
            dialect = %dialect,
            blocks = block_count,
            rendered = diagrams.len(),
            failed = errors.len(),
            "Diagram pass completed"
        );

        SubstitutionResult {
            processed_text: replacements.apply(text),
            diagrams,
            errors,
        }
    }
}

/// Element the host fills with the rendered SVG.
fn placeholder(id: &str) -> String {
    format!(r#"<div id="{id}"></div>"#)
}

/// Inline error shown where the diagram would have appeared.
fn error_fragment(dialect: Dialect, kind: &DiagramErrorKind) -> String {
    format!(
        "<p>{} Error: {}</p>",
        dialect.display_name(),
        escape_mdx_text(&kind.to_string())
    )
}

/// Escape text so MDX reads it as literal characters.
///
/// Besides the HTML specials this covers braces (MDX expressions) and folds
/// newlines, which would otherwise end the surrounding JSX block.
fn escape_mdx_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '{' => result.push_str("&#123;"),
            '}' => result.push_str("&#125;"),
            '\r' => {}
            '\n' => result.push(' '),
            _ => result.push(c),
        }
    }
    result
}

/// Collects span replacements for single-pass application.
///
/// Spans must be added in ascending, non-overlapping order, which is the
/// order [`extract`] yields them in.
struct Replacements {
    spans: Vec<(Range<usize>, String)>,
}

impl Replacements {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
        }
    }

    fn add(&mut self, span: Range<usize>, content: String) {
        debug_assert!(
            self.spans.last().is_none_or(|(prev, _)| prev.end <= span.start),
            "replacement spans must be ordered and disjoint"
        );
        self.spans.push((span, content));
    }

    /// Copy `text`, splicing each replacement into its span.
    fn apply(self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;

        for (span, content) in self.spans {
            result.push_str(&text[cursor..span.start]);
            result.push_str(&content);
            cursor = span.end;
        }

        result.push_str(&text[cursor..]);
        result
    }
}
