//! `mdxview render` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdxview_config::{CliSettings, Config};
use mdxview_preview::{PreviewConfig, PreviewRenderer};

use super::{read_document, report_diagram_errors, write_result};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// MDX document to render.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover mdxview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long, env = "MDXVIEW_SERVER_URL")]
    server_url: Option<String>,

    /// Timeout for diagram requests in seconds (overrides config).
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Leave diagram fences unrendered.
    #[arg(long)]
    no_diagrams: bool,

    /// Disable syntax highlighting of code blocks.
    #[arg(long)]
    no_highlight: bool,

    /// Write the message to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// A compilation failure is not an error here: the message then carries
    /// error-report code.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or files cannot be read or
    /// written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let text = read_document(&self.file)?;

        let preview_config =
            PreviewConfig::from_config(&config).with_filepath(self.file.display().to_string());
        let renderer = PreviewRenderer::new(preview_config);
        let result = renderer.render(&text);

        report_diagram_errors(&output, &result.diagram_errors);
        if let Some(failure) = &result.failure {
            output.warning(&format!("Warning: compilation failed: {failure}"));
        }
        tracing::info!(
            file = %self.file.display(),
            diagrams = result.diagrams.len(),
            "Rendered preview"
        );

        let json = serde_json::to_string(&result.into_message())?;
        write_result(self.output.as_deref(), &json)
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            server_url: self.server_url.clone(),
            timeout_secs: self.timeout_secs,
            diagrams_enabled: self.no_diagrams.then_some(false),
            highlight: self.no_highlight.then_some(false),
        }
    }
}
