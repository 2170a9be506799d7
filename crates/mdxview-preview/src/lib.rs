//! Live preview rendering for MDX documents.
//!
//! Combines diagram rendering (`mdxview-diagrams`) and MDX compilation
//! (`mdxview-compiler`) into one call that never fails:
//! - [`PreviewRenderer::render`] produces a [`PreviewOutput`]
//! - [`PreviewOutput::into_message`] builds the [`HostMessage`] for the host
//!
//! # Example
//!
//! ```ignore
//! use mdxview_config::Config;
//! use mdxview_preview::{PreviewConfig, PreviewRenderer};
//!
//! let config = Config::load(None, None)?;
//! let renderer = PreviewRenderer::new(PreviewConfig::from_config(&config));
//! let message = renderer.render("# Hello").into_message();
//! ```

mod message;
mod renderer;

pub use message::HostMessage;
pub use renderer::{PreviewConfig, PreviewOutput, PreviewRenderer};
