//! Genre Presets
//!
//! Static balance and reverb-send tables keyed by role. Applying a preset
//! rewrites gain, pan, EQ, and reverb for every track from its inferred
//! role, so applying the same preset twice lands on the same state.

use serde::{Deserialize, Serialize};

use crate::dsp::{EqParams, ReverbParams};
use crate::engine::buffer::db_to_linear;
use crate::model::roles::{infer_role, Role};
use crate::model::track::Track;

/// Preset gains land slightly below the raw table value to leave headroom
const PRESET_GAIN_TRIM: f32 = 0.85;
/// Preset gain limits (tighter than the fader's own range)
const PRESET_GAIN_MIN: f32 = 0.01;
const PRESET_GAIN_MAX: f32 = 2.0;
/// High-shelf lift every preset applies
const PRESET_HIGH_DB: f32 = 0.75;

/// Supported genres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Rock,
    Metal,
    HipHop,
    Pop,
    Edm,
    Rnb,
    Jazz,
    Funk,
    Country,
}

impl Genre {
    pub const ALL: [Genre; 9] = [
        Genre::Rock,
        Genre::Metal,
        Genre::HipHop,
        Genre::Pop,
        Genre::Edm,
        Genre::Rnb,
        Genre::Jazz,
        Genre::Funk,
        Genre::Country,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Rock => "rock",
            Genre::Metal => "metal",
            Genre::HipHop => "hiphop",
            Genre::Pop => "pop",
            Genre::Edm => "edm",
            Genre::Rnb => "rnb",
            Genre::Jazz => "jazz",
            Genre::Funk => "funk",
            Genre::Country => "country",
        }
    }

    pub fn parse(s: &str) -> Option<Genre> {
        Genre::ALL.iter().copied().find(|g| g.name() == s)
    }
}

/// Balance entry: target level in dB and pan position
#[derive(Debug, Clone, Copy)]
pub struct Balance {
    pub db: f32,
    pub pan: f32,
}

const fn bal(db: f32, pan: f32) -> Balance {
    Balance { db, pan }
}

/// Role balance for a genre, in [`ROLE_ORDER`] order:
/// kick, snare, bass, leadVocal, backingVocal, guitar, overhead, tom, keys,
/// drums, other
fn balance_table(genre: Genre) -> [Balance; 11] {
    match genre {
        Genre::Rock => [
            bal(2.0, 0.0), bal(4.0, 0.0), bal(1.0, 0.0), bal(2.5, 0.0), bal(-1.0, 0.5),
            bal(0.0, -0.55), bal(-6.0, 0.75), bal(-2.0, 0.35), bal(-2.0, 0.0), bal(-1.0, 0.0),
            bal(-1.0, 0.0),
        ],
        Genre::Metal => [
            bal(2.5, 0.0), bal(4.0, 0.0), bal(1.0, 0.0), bal(2.0, 0.0), bal(-1.5, 0.5),
            bal(0.5, -0.6), bal(-7.0, 0.8), bal(-1.0, 0.4), bal(-2.0, 0.0), bal(-1.0, 0.0),
            bal(-1.0, 0.0),
        ],
        Genre::HipHop => [
            bal(2.0, 0.0), bal(2.5, 0.0), bal(1.5, 0.0), bal(3.0, 0.0), bal(0.0, 0.45),
            bal(-2.0, 0.3), bal(-4.0, 0.5), bal(-2.0, 0.3), bal(-1.0, 0.0), bal(-1.0, 0.0),
            bal(-1.0, 0.0),
        ],
        Genre::Pop => [
            bal(1.0, 0.0), bal(2.0, 0.0), bal(0.5, 0.0), bal(3.5, 0.0), bal(0.0, 0.4),
            bal(-1.0, -0.4), bal(-5.0, 0.6), bal(-2.0, 0.25), bal(-1.0, 0.0), bal(-1.0, 0.0),
            bal(-1.0, 0.0),
        ],
        Genre::Edm => [
            bal(2.5, 0.0), bal(1.5, 0.0), bal(2.0, 0.0), bal(2.0, 0.0), bal(-1.0, 0.6),
            bal(-2.0, 0.4), bal(-4.0, 0.7), bal(-2.0, 0.3), bal(0.0, 0.5), bal(-1.0, 0.0),
            bal(-1.0, 0.3),
        ],
        Genre::Rnb => [
            bal(1.5, 0.0), bal(2.0, 0.0), bal(2.0, 0.0), bal(3.0, 0.0), bal(0.0, 0.5),
            bal(-2.0, 0.35), bal(-5.0, 0.5), bal(-2.0, 0.2), bal(-0.5, 0.0), bal(-1.0, 0.0),
            bal(-1.0, 0.0),
        ],
        Genre::Jazz => [
            bal(0.0, 0.0), bal(1.0, 0.0), bal(1.0, 0.0), bal(1.5, 0.0), bal(-1.0, 0.4),
            bal(0.0, -0.3), bal(-2.0, 0.7), bal(0.0, 0.3), bal(0.0, 0.0), bal(-0.5, 0.0),
            bal(-0.5, 0.0),
        ],
        Genre::Funk => [
            bal(2.0, 0.0), bal(2.5, 0.0), bal(2.0, 0.0), bal(2.0, 0.0), bal(-0.5, 0.45),
            bal(0.0, -0.4), bal(-4.0, 0.6), bal(-1.0, 0.35), bal(0.0, 0.2), bal(-1.0, 0.0),
            bal(-1.0, 0.0),
        ],
        Genre::Country => [
            bal(1.5, 0.0), bal(2.0, 0.0), bal(1.0, 0.0), bal(2.5, 0.0), bal(0.0, 0.4),
            bal(0.0, -0.5), bal(-5.0, 0.65), bal(-1.0, 0.3), bal(-1.0, 0.0), bal(-1.0, 0.0),
            bal(-1.0, 0.0),
        ],
    }
}

fn role_index(role: Role) -> usize {
    match role {
        Role::Kick => 0,
        Role::Snare => 1,
        Role::Bass => 2,
        Role::LeadVocal => 3,
        Role::BackingVocal => 4,
        Role::Guitar => 5,
        Role::Overhead => 6,
        Role::Tom => 7,
        Role::Keys => 8,
        Role::Drums => 9,
        Role::Other => 10,
    }
}

/// Reverb send for a role under a genre, if that genre gives the role one
fn reverb_send(genre: Genre, role: Role) -> Option<ReverbParams> {
    let send = |mix: f32, decay_secs: f32| Some(ReverbParams { mix, decay_secs });
    match (genre, role) {
        (Genre::Rock, Role::LeadVocal) => send(0.18, 0.32),
        (Genre::Rock, Role::BackingVocal) => send(0.2, 0.35),
        (Genre::Rock, Role::Snare) => send(0.08, 0.22),
        (Genre::Metal, Role::LeadVocal) => send(0.12, 0.25),
        (Genre::Metal, Role::Overhead) => send(0.08, 0.22),
        (Genre::HipHop, Role::LeadVocal) => send(0.1, 0.25),
        (Genre::Pop, Role::LeadVocal) => send(0.22, 0.4),
        (Genre::Pop, Role::BackingVocal) => send(0.25, 0.42),
        (Genre::Edm, Role::LeadVocal) => send(0.2, 0.4),
        (Genre::Edm, Role::Keys) => send(0.18, 0.38),
        (Genre::Edm, Role::Other) => send(0.15, 0.35),
        (Genre::Rnb, Role::LeadVocal) => send(0.22, 0.42),
        (Genre::Rnb, Role::BackingVocal) => send(0.2, 0.38),
        (Genre::Jazz, Role::LeadVocal) => send(0.18, 0.38),
        (Genre::Jazz, Role::Overhead) => send(0.15, 0.35),
        (Genre::Jazz, Role::Bass) => send(0.08, 0.28),
        (Genre::Funk, Role::LeadVocal) => send(0.12, 0.28),
        (Genre::Country, Role::LeadVocal) => send(0.2, 0.4),
        _ => None,
    }
}

/// Apply a genre preset to every track
///
/// Roles come from the track names (with positional fallback), gains land
/// at `db_to_linear(db) * 0.85` clamped to [0.01, 2], every track gets the
/// gentle high-shelf lift, and reverb turns on only for roles the genre's
/// send table names.
pub fn apply_preset(tracks: &mut [Track], genre: Genre) {
    let total = tracks.len();
    for (i, track) in tracks.iter_mut().enumerate() {
        let role = infer_role(&track.name, i, total);
        let table = balance_table(genre);
        let cfg = table[role_index(role)];

        track.set_gain(
            (db_to_linear(cfg.db) * PRESET_GAIN_TRIM).clamp(PRESET_GAIN_MIN, PRESET_GAIN_MAX),
        );
        track.set_pan(cfg.pan);
        track.eq_on = true;
        track.eq = EqParams {
            low_db: 0.0,
            mid_db: 0.0,
            high_db: PRESET_HIGH_DB,
        };

        match reverb_send(genre, role) {
            Some(params) => {
                track.reverb_on = true;
                track.reverb = params.clamped();
            }
            None => {
                track.reverb_on = false;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
