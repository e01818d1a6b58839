//! basin-recipes: converts a recipes database into a basin manifest.
//!
//! Reads the recipe and chef databases plus the image trees under a data
//! directory and writes one JSON manifest describing the content graph.

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
