//! mdxview CLI - MDX live preview.
//!
//! Provides commands for:
//! - `render`: Render a document into the host update message
//! - `compile`: Compile a document into executable code only
//! - `diagrams`: Substitute rendered diagrams into a document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CompileArgs, DiagramsArgs, RenderArgs};
use output::Output;

/// mdxview - MDX live preview.
#[derive(Parser)]
#[command(name = "mdxview", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document into the JSON message sent to the preview host.
    Render(RenderArgs),
    /// Compile a document into executable code, without diagrams.
    Compile(CompileArgs),
    /// Render diagrams and print the document with placeholders.
    Diagrams(DiagramsArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Render(args) => args.verbose,
            Self::Compile(args) => args.verbose,
            Self::Diagrams(args) => args.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Compile(args) => args.execute(),
        Commands::Diagrams(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
