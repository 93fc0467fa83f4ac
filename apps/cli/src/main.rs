//! cratemaker CLI: RO-Crate metadata for project templates and notebooks.
//!
//! Extracts project metadata from a template config, writes a project-level
//! `ro-crate-metadata.json`, and embeds per-notebook crates in Jupyter
//! notebooks.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
