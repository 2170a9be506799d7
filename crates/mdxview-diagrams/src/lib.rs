//! Fenced diagram rendering via Kroki for mdxview.
//!
//! This crate turns diagram fences embedded in an MDX document into
//! placeholders plus a list of rendered SVG documents:
//! - [`extract`] finds ```` ```plantuml ```` / ```` ```mermaid ```` fences in source order
//! - [`KrokiRenderer`] renders one diagram source over HTTP
//! - [`DiagramPipeline`] renders all fences of a dialect in parallel and
//!   splices placeholders (or inline error text) back into the document
//!
//! # Architecture
//!
//! - [`language`]: the supported [`Dialect`]s and their fence patterns
//! - [`extract`]: [`DiagramBlock`] extraction with recorded byte spans
//! - [`kroki`]: the [`DiagramRenderer`] seam and its HTTP implementation
//! - [`pipeline`]: fan-out rendering and positional substitution
//!
//! # Example
//!
//! ```ignore
//! use mdxview_diagrams::{DiagramPipeline, KrokiRenderer};
//!
//! let pipeline = DiagramPipeline::new(KrokiRenderer::new("https://kroki.io"));
//! let result = pipeline.process_all("```mermaid\ngraph TD\n  A --> B\n```\n");
//!
//! assert_eq!(result.diagrams[0].id, "mermaid-0");
//! ```

mod consts;
mod extract;
mod kroki;
mod language;
mod pipeline;
mod svg;

pub use consts::DEFAULT_SERVER_URL;
pub use extract::{DiagramBlock, extract};
pub use kroki::{DiagramError, DiagramErrorKind, DiagramRenderer, KrokiRenderer, create_agent};
pub use language::Dialect;
pub use pipeline::{DiagramPipeline, RenderedDiagram, SubstitutionResult};
pub use svg::strip_xml_prolog;
