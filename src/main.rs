mod app;
mod command;
mod config;
mod error;
mod game;
mod minefield;
mod reveal;
mod tiles;
mod ui;

use std::{fs::File, path::Path, sync::Mutex};

use clap::Parser;
use color_eyre::{Result, eyre::Context};
use tracing::Level;

use crate::{app::App, config::Args};

fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    if let Some(path) = &args.log_file {
        init_logging(path, args.verbose)?;
    }
    let config = args.config().context("invalid board")?;

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

/// The terminal belongs to the game, so logs only ever go to a file.
fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .init();
    Ok(())
}
