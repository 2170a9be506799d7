//! `mdxview compile` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdxview_config::{CliSettings, Config};
use mdxview_preview::{PreviewConfig, PreviewRenderer};

use super::{read_document, write_result};
use crate::error::CliError;

/// Arguments for the compile command.
#[derive(Args)]
pub(crate) struct CompileArgs {
    /// MDX document to compile.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover mdxview.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable syntax highlighting of code blocks.
    #[arg(long)]
    no_highlight: bool,

    /// Write the code to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CompileArgs {
    /// Execute the compile command.
    ///
    /// Diagram fences are not rendered.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, files cannot be read or
    /// written, or compilation fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let settings = CliSettings {
            diagrams_enabled: Some(false),
            highlight: self.no_highlight.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        let text = read_document(&self.file)?;

        let preview_config =
            PreviewConfig::from_config(&config).with_filepath(self.file.display().to_string());
        let code = PreviewRenderer::new(preview_config).compile(&text)?;

        tracing::info!(file = %self.file.display(), "Compiled document");
        write_result(self.output.as_deref(), code.as_str())
    }
}
