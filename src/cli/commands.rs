//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::{Path, PathBuf};

use log::info;

use crate::engine::StemFile;
use crate::error::{MixError, Result};
use crate::master::MasterOptions;
use crate::model::Genre;
use crate::session::Session;

/// Load stem files in track order and build a session
fn load_session(inputs: &[PathBuf]) -> Result<Session> {
    if inputs.is_empty() {
        return Err(MixError::NothingToMix);
    }
    let files = inputs
        .iter()
        .map(|p| StemFile::from_path(p))
        .collect::<Result<Vec<_>>>()?;

    let mut session = Session::new();
    session.load_stems(&files)?;
    Ok(session)
}

fn parse_genre(name: &str) -> Result<Genre> {
    Genre::parse(name).ok_or_else(|| MixError::InvalidParameter {
        param: "genre".to_string(),
        value: name.to_string(),
        expected: "one of rock, metal, hiphop, pop, edm, rnb, jazz, funk, country".to_string(),
    })
}

/// Analyze stems and print per-track measurements as JSON.
pub fn analyze(inputs: &[PathBuf]) -> Result<()> {
    info!("Analyzing {} stems", inputs.len());

    let mut session = load_session(inputs)?;
    let analyses = session.analyze_stems();

    println!("{}", serde_json::to_string_pretty(&analyses)?);
    Ok(())
}

/// Render the processed mix, optionally alongside the flat reference.
pub fn mix(
    inputs: &[PathBuf],
    out: &Path,
    flat_out: Option<&Path>,
    genre: Option<&str>,
) -> Result<()> {
    info!("Mixing {} stems", inputs.len());

    let mut session = load_session(inputs)?;
    if let Some(name) = genre {
        session.apply_genre_preset(parse_genre(name)?);
    }

    if let Some(flat_path) = flat_out {
        session.build_flat_mix()?;
        if let Some(bytes) = session.take_flat_wav() {
            std::fs::write(flat_path, bytes)?;
            println!("Flat mix written: {}", flat_path.display());
        }
    }

    // No competing renders in the CLI, so the token always holds
    let mix = session.build_processed_mix()?.ok_or(MixError::NothingToMix)?;
    if let Some(bytes) = session.take_processed_wav() {
        std::fs::write(out, bytes)?;
    }

    println!("Mix written: {}", out.display());
    println!(
        "  {:.2}s @ {} Hz, peak {:.3}",
        mix.duration_secs(),
        mix.sample_rate,
        mix.peak()
    );
    Ok(())
}

/// Render and master the mix.
pub fn master(
    inputs: &[PathBuf],
    out: &Path,
    genre: Option<&str>,
    punch: f32,
    compression: f32,
    loudness: f32,
) -> Result<()> {
    info!("Mastering {} stems", inputs.len());

    let mut session = load_session(inputs)?;
    if let Some(name) = genre {
        session.apply_genre_preset(parse_genre(name)?);
    }

    session.build_processed_mix()?.ok_or(MixError::NothingToMix)?;
    let options = MasterOptions {
        punch,
        compression,
        loudness,
    }
    .clamped();
    let mastered = session.master(options)?;

    if let Some(bytes) = session.take_mastered_wav() {
        std::fs::write(out, bytes)?;
    }

    println!("Mastered mix written: {}", out.display());
    println!(
        "  {:.2}s @ {} Hz, peak {:.3}",
        mastered.duration_secs(),
        mastered.sample_rate,
        mastered.peak()
    );
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
