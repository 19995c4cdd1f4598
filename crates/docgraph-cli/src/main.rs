//! Docgraph CLI - Command-line interface for the docgraph documentation model

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod build;
mod query;

#[derive(Parser)]
#[command(name = "docgraph")]
#[command(version = docgraph_core::VERSION)]
#[command(about = "Build and query API documentation databases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a module's documentation database and export its index
    Build {
        /// Project description file (JSON)
        project: PathBuf,

        /// Where to write the index; stdout when omitted
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Fail on warnings instead of just printing them
        #[arg(long)]
        strict: bool,
    },

    /// Look up an entity in an exported index
    Query {
        /// The index file to search
        index: PathBuf,

        /// Qualified name or function signature, e.g. `QWidget::show()`
        target: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            project,
            out,
            strict,
        } => build::run(&project, out.as_deref(), strict),
        Commands::Query { index, target } => query::run(&index, &target),
    }
}
