//! Stem Role Inference
//!
//! Classifies stems by filename so presets and change lists can address
//! "the kick" or "the vocals" without the user tagging anything. Small
//! sessions fall back to upload order for the first four slots.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What a stem contributes to the arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Kick,
    Snare,
    Bass,
    LeadVocal,
    BackingVocal,
    Guitar,
    Overhead,
    Tom,
    Keys,
    Drums,
    #[default]
    Other,
}

/// Stem count at or below which positional fallback applies
const POSITIONAL_FALLBACK_MAX: usize = 8;

static ROLE_PATTERNS: Lazy<Vec<(Regex, Role)>> = Lazy::new(|| {
    // Order matters: earlier patterns win, so "kickdrum" lands on kick
    // before the drums pattern can see it
    [
        (r"(?i)\bkick|kickdrum|bd\b", Role::Kick),
        (r"(?i)\bsnare|snr\b", Role::Snare),
        (r"(?i)\bbass\b", Role::Bass),
        (r"(?i)\bvocal|voc|lead\s*vox|singer|main\s*vocal\b", Role::LeadVocal),
        (r"(?i)\bbacking|bv|harmony|double|ad.?lib\b", Role::BackingVocal),
        (r"(?i)\bguitar|gtr|rhythm|solo\b", Role::Guitar),
        (
            r"(?i)\boverhead|oh\b|room|cymbals|ride|hats?|hi.?hat|click|clicking\b",
            Role::Overhead,
        ),
        (r"(?i)\btom|floor\b", Role::Tom),
        (r"(?i)\bkeys?|piano|rhodes|synth|pad|pluck|arp\b", Role::Keys),
        (r"(?i)\bdrums?|perc\b", Role::Drums),
    ]
    .into_iter()
    .map(|(pattern, role)| (Regex::new(pattern).expect("role pattern"), role))
    .collect()
});

/// Infer a stem's role from its filename
///
/// `index` and `total` drive the positional fallback: in sessions of up to
/// eight stems, unmatched names in the first four slots are assumed to be
/// kick, snare, bass, and lead vocal in upload order.
pub fn infer_role(name: &str, index: usize, total: usize) -> Role {
    for (pattern, role) in ROLE_PATTERNS.iter() {
        if pattern.is_match(name) {
            return *role;
        }
    }
    if total <= POSITIONAL_FALLBACK_MAX {
        match index {
            0 => return Role::Kick,
            1 => return Role::Snare,
            2 => return Role::Bass,
            3 => return Role::LeadVocal,
            _ => {}
        }
    }
    Role::Other
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Kick.wav", Role::Kick; "kick")]
    #[test_case("kickdrum_01.wav", Role::Kick; "kickdrum")]
    #[test_case("BD main.wav", Role::Kick; "bd abbreviation")]
    #[test_case("Snare Top.wav", Role::Snare; "snare")]
    #[test_case("bass DI.wav", Role::Bass; "bass")]
    #[test_case("Lead Vocal.wav", Role::LeadVocal; "lead vocal")]
    #[test_case("singer take3.wav", Role::LeadVocal; "singer")]
    #[test_case("backing stack.wav", Role::BackingVocal; "backing")]
    #[test_case("harmony L.wav", Role::BackingVocal; "harmony")]
    #[test_case("gtr rhythm.wav", Role::Guitar; "gtr")]
    #[test_case("Overhead pair.wav", Role::Overhead; "overhead")]
    #[test_case("hi-hat.wav", Role::Overhead; "hihat")]
    #[test_case("floor tom.wav", Role::Tom; "floor tom")]
    #[test_case("Rhodes.wav", Role::Keys; "rhodes")]
    #[test_case("synth pad.wav", Role::Keys; "synth")]
    #[test_case("perc loop.wav", Role::Drums; "perc")]
    fn test_name_patterns(name: &str, expected: Role) {
        assert_eq!(infer_role(name, 7, 20), expected);
    }

    #[test]
    fn test_positional_fallback_small_session() {
        assert_eq!(infer_role("01.wav", 0, 4), Role::Kick);
        assert_eq!(infer_role("02.wav", 1, 4), Role::Snare);
        assert_eq!(infer_role("03.wav", 2, 4), Role::Bass);
        assert_eq!(infer_role("04.wav", 3, 4), Role::LeadVocal);
    }

    #[test]
    fn test_no_fallback_for_large_sessions() {
        assert_eq!(infer_role("01.wav", 0, 9), Role::Other);
        assert_eq!(infer_role("untitled.wav", 2, 12), Role::Other);
    }

    #[test]
    fn test_name_wins_over_position() {
        assert_eq!(infer_role("snare.wav", 0, 4), Role::Snare);
    }

    #[test]
    fn test_later_slots_fall_through_to_other() {
        assert_eq!(infer_role("mystery.wav", 4, 6), Role::Other);
    }

    #[test]
    fn test_role_serializes_camel_case() {
        let json = serde_json::to_string(&Role::LeadVocal).unwrap();
        assert_eq!(json, "\"leadVocal\"");
        let json = serde_json::to_string(&Role::BackingVocal).unwrap();
        assert_eq!(json, "\"backingVocal\"");
    }
}
