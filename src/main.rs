//! Stemmix CLI
//!
//! Command-line interface for the stemmix engine.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

use stemmix::cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Stemmix v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => {
            handle_command(cmd)?;
            Ok(())
        }
        None => {
            println!("Stemmix v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> stemmix::Result<()> {
    match cmd {
        Commands::Analyze { inputs } => stemmix::cli::commands::analyze(&inputs),
        Commands::Mix {
            inputs,
            out,
            flat_out,
            genre,
        } => stemmix::cli::commands::mix(&inputs, &out, flat_out.as_deref(), genre.as_deref()),
        Commands::Master {
            inputs,
            out,
            genre,
            punch,
            compression,
            loudness,
        } => stemmix::cli::commands::master(
            &inputs,
            &out,
            genre.as_deref(),
            punch,
            compression,
            loudness,
        ),
    }
}
