//! SiteForge CLI: AI-assisted website generation.
//!
//! Turns a structured business profile into a themed, multi-page
//! website bundle ready for rendering.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
