mod dataset;
mod error;
mod evaluate;
mod generate;
mod render;
mod uci_engine;

#[cfg(test)]
mod fake_engine;

use crate::dataset::{generate_dataset, GenerateCommand};
use crate::render::{render, RenderCommand};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};
use std::error::Error;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generates a folder of engine-evaluated position images
    Generate(GenerateCommand),
    /// Renders a single position to a PNG
    Render(RenderCommand),
}

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::init(LevelFilter::Info, Config::default())?;

    let args = Cli::parse();

    match args.command {
        Commands::Generate(cmd) => generate_dataset(&cmd)?,
        Commands::Render(cmd) => render(cmd)?,
    }

    Ok(())
}
