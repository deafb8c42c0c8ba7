//! Mandanda shop CLI

use std::{io, process};

use crate::config::Config;

mod commands;
mod config;
mod observability;

fn main() {
    // Load configuration from .env and CLI arguments
    let config = Config::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init_subscriber(&config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    let mut stdout = io::stdout().lock();

    if let Err(error) = commands::run(config.command, &config.storage.data_dir, &mut stdout) {
        eprintln!("{error}");
        process::exit(1);
    }
}
