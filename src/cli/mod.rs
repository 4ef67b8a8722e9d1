//! CLI Module
//!
//! Command-line interface for the stemmix engine.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stemmix - multi-stem mixing and mastering engine
#[derive(Parser, Debug)]
#[command(name = "stemmix")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze stems and print per-track measurements as JSON
    #[command(name = "analyze")]
    Analyze {
        /// Stem WAV files, in track order
        inputs: Vec<PathBuf>,
    },

    /// Render the processed mix (and optionally the flat reference)
    #[command(name = "mix")]
    Mix {
        /// Stem WAV files, in track order
        inputs: Vec<PathBuf>,

        /// Output path for the processed mix
        #[arg(short, long, default_value = "mix.wav")]
        out: PathBuf,

        /// Also write the unprocessed reference mix here
        #[arg(long)]
        flat_out: Option<PathBuf>,

        /// Genre preset to apply before mixing
        #[arg(short, long)]
        genre: Option<String>,
    },

    /// Render, then master the mix
    #[command(name = "master")]
    Master {
        /// Stem WAV files, in track order
        inputs: Vec<PathBuf>,

        /// Output path for the mastered mix
        #[arg(short, long, default_value = "master.wav")]
        out: PathBuf,

        /// Genre preset to apply before mixing
        #[arg(short, long)]
        genre: Option<String>,

        /// Transient emphasis, 0 (soft) to 2 (hard)
        #[arg(long, default_value_t = 1.0)]
        punch: f32,

        /// Bus compression depth, 0 (light) to 2 (heavy)
        #[arg(long, default_value_t = 1.0)]
        compression: f32,

        /// Loudness target, 0 (quiet) to 2 (loud)
        #[arg(long, default_value_t = 1.0)]
        loudness: f32,
    },
}
