//! `mdxview diagrams` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdxview_config::{CliSettings, Config};
use mdxview_preview::{PreviewConfig, PreviewRenderer};

use super::{read_document, report_diagram_errors, write_result};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the diagrams command.
#[derive(Args)]
pub(crate) struct DiagramsArgs {
    /// MDX document to process.
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

    /// Write the document to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl DiagramsArgs {
    /// Execute the diagrams command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or files cannot be read or
    /// written. Diagram failures are only reported as warnings.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let settings = CliSettings {
            server_url: self.server_url,
            timeout_secs: self.timeout_secs,
            diagrams_enabled: Some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        let text = read_document(&self.file)?;

        let renderer = PreviewRenderer::new(PreviewConfig::from_config(&config));
        let result = renderer.render_diagrams(&text);

        report_diagram_errors(&output, &result.errors);
        output.info(&format!(
            "{} diagram(s) rendered, {} failed",
            result.diagrams.len(),
            result.errors.len()
        ));

        write_result(self.output.as_deref(), &result.processed_text)
    }
}
