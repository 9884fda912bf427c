//! RW code tabs CLI.
//!
//! Provides commands for:
//! - `render`: Build the code groups of a Markdown file as JSON or HTML
//! - `install`: Print package manager commands for a package list

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{InstallArgs, RenderArgs};
use error::CliError;
use output::Output;

/// RW code tabs - code block grouping and rendering.
#[derive(Parser)]
#[command(name = "rw-codetabs", version, about)]
struct Cli {
    /// Enable verbose output (build progress and configuration logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the code groups of a Markdown file.
    Render(RenderArgs),
    /// Print install commands for every package manager.
    Install(InstallArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command) {
        output.error(&err);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Render(args) => {
            let rt = tokio::runtime::Builder::new_current_thread().build()?;
            rt.block_on(args.execute())
        }
        Commands::Install(args) => args.execute(),
    }
}
