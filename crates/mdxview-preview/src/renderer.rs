//! Preview rendering.
//!
//! Provides [`PreviewRenderer`], which turns an MDX document into the code
//! and diagrams the host needs to show a live preview.

use std::time::Duration;

use mdxview_compiler::{
    ExecutableCode, MdxCompiler, PipelineError, build_executable, build_executable_or_report,
};
use mdxview_config::Config;
use mdxview_diagrams::{
    DEFAULT_SERVER_URL, DiagramError, DiagramPipeline, DiagramRenderer, KrokiRenderer,
    RenderedDiagram, SubstitutionResult,
};

use crate::message::HostMessage;

/// Configuration for [`PreviewRenderer`].
#[derive(Clone, Debug)]
pub struct PreviewConfig {
    /// Kroki-compatible server base URL.
    pub server_url: String,
    /// Transport timeout for diagram requests. No timeout when `None`.
    pub timeout: Option<Duration>,
    /// Whether diagram fences are rendered.
    ///
    /// If `false`, diagram fences are left for the compiler and show up as
    /// ordinary code blocks.
    pub diagrams_enabled: bool,
    /// Whether fenced code blocks are syntax highlighted.
    pub highlight: bool,
    /// Document path, used in compiler messages.
    pub filepath: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            timeout: None,
            diagrams_enabled: true,
            highlight: true,
            filepath: None,
        }
    }
}

impl PreviewConfig {
    /// Build a preview configuration from loaded application config.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            server_url: config.diagrams.server_url.clone(),
            timeout: config.diagrams.timeout(),
            diagrams_enabled: config.diagrams.enabled,
            highlight: config.compiler.highlight,
            filepath: None,
        }
    }

    /// Set the document path.
    #[must_use]
    pub fn with_filepath(mut self, filepath: impl Into<String>) -> Self {
        self.filepath = Some(filepath.into());
        self
    }
}

/// Everything one render produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewOutput {
    /// Executable code; an error report when `failure` is set.
    pub code: ExecutableCode,
    /// Rendered diagrams in id order (all `PlantUML`, then all Mermaid).
    pub diagrams: Vec<RenderedDiagram>,
    /// Diagrams that failed and were replaced by inline error text.
    pub diagram_errors: Vec<DiagramError>,
    /// Fatal compilation failure, if any.
    pub failure: Option<PipelineError>,
}

impl PreviewOutput {
    /// Whether compilation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Build the host message.
    ///
    /// Diagrams are only sent along with successfully compiled code.
    #[must_use]
    pub fn into_message(self) -> HostMessage {
        let diagrams = self.failure.is_none().then_some(self.diagrams);
        HostMessage::Update {
            code: self.code.into_inner(),
            diagrams,
        }
    }
}

/// MDX preview renderer.
///
/// Runs the diagram passes (if enabled) and then the compilation chain.
/// Nothing is cached between calls.
///
/// # Example
///
/// ```ignore
/// use mdxview_preview::{PreviewConfig, PreviewRenderer};
///
/// let renderer = PreviewRenderer::new(PreviewConfig::default());
/// let message = renderer.render("# Hello\n\n```mermaid\ngraph TD\n  A --> B\n```\n").into_message();
/// ```
pub struct PreviewRenderer<R = KrokiRenderer> {
    pipeline: Option<DiagramPipeline<R>>,
    compiler: MdxCompiler,
}

impl PreviewRenderer<KrokiRenderer> {
    /// Create a renderer sending diagrams to the configured Kroki server.
    #[must_use]
    pub fn new(config: PreviewConfig) -> Self {
        let mut kroki = KrokiRenderer::new(&config.server_url);
        if let Some(timeout) = config.timeout {
            kroki = kroki.timeout(timeout);
        }
        Self::with_renderer(kroki, config)
    }
}

impl<R: DiagramRenderer> PreviewRenderer<R> {
    /// Create a renderer using a custom diagram renderer.
    ///
    /// `config.server_url` and `config.timeout` are ignored.
    pub fn with_renderer(renderer: R, config: PreviewConfig) -> Self {
        let mut compiler = MdxCompiler::new().highlight(config.highlight);
        if let Some(filepath) = config.filepath {
            compiler = compiler.filepath(filepath);
        }
        Self {
            pipeline: config
                .diagrams_enabled
                .then(|| DiagramPipeline::new(renderer)),
            compiler,
        }
    }

    /// Render `text` into a preview.
    ///
    /// Never fails: diagram failures become inline error text and a fatal
    /// compilation error becomes error-report code.
    #[must_use]
    pub fn render(&self, text: &str) -> PreviewOutput {
        let substituted = self.render_diagrams(text);
        let (code, failure) =
            build_executable_or_report(&self.compiler, &substituted.processed_text);

        PreviewOutput {
            code,
            diagrams: substituted.diagrams,
            diagram_errors: substituted.errors,
            failure,
        }
    }

    /// Run only the diagram passes.
    ///
    /// Returns `text` unchanged when diagram rendering is disabled.
    #[must_use]
    pub fn render_diagrams(&self, text: &str) -> SubstitutionResult {
        match &self.pipeline {
            Some(pipeline) => pipeline.process_all(text),
            None => SubstitutionResult {
                processed_text: text.to_owned(),
                ..SubstitutionResult::default()
            },
        }
    }

    /// Run only the compilation chain on `text`.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error.
    pub fn compile(&self, text: &str) -> Result<ExecutableCode, PipelineError> {
        build_executable(&self.compiler, text)
    }
}
