//! Objective Catalog and Selection
//!
//! Objectives are predicates over an accepted submission (word, score)
//! with a fixed damage value: meet at least one qualifying submission
//! during the wave or the team takes the damage. The catalog is a static
//! pool partitioned by damage value into tiers 2–6; each tier holds
//! family sub-pools (length, damage, prefix, suffix, ...).
//!
//! Selection draws twice from the session RNG: once to pick a family
//! sub-pool, once to pick within it. Objectives in small families are
//! therefore proportionally more likely than exact uniformity would
//! give; that is intentional and part of the replayable draw sequence.

use std::fmt;

use serde::Serialize;

use crate::core::rng::GameRng;
use crate::core::tile::is_strict_vowel;

/// The predicate family of an objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ObjectiveKind {
    /// A word with at least this many letters.
    LengthAtLeast(usize),
    /// A single submission dealing at least this much damage.
    DamageAtLeast(u32),
    /// A word starting with the given (lowercase) prefix.
    Prefix(&'static str),
    /// A word ending with the given (lowercase) suffix.
    Suffix(&'static str),
    /// A word containing a doubled consonant ("ll", "ss", ...).
    DoubledConsonant,
}

/// A wave objective: a predicate plus the team damage dealt if no
/// accepted submission satisfies it before the wave closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Objective {
    kind: ObjectiveKind,
    damage: u32,
}

impl Objective {
    pub(crate) const fn new(kind: ObjectiveKind, damage: u32) -> Self {
        Self { kind, damage }
    }

    /// Team damage dealt when the objective goes unmet.
    pub fn damage(&self) -> u32 {
        self.damage
    }

    /// Human-readable description for display panels.
    pub fn description(&self) -> String {
        match self.kind {
            ObjectiveKind::LengthAtLeast(n) => {
                format!("spell a word of at least {n} letters")
            }
            ObjectiveKind::DamageAtLeast(d) => {
                format!("deal at least {d} damage with a single word")
            }
            ObjectiveKind::Prefix(p) => format!("spell a word starting with \"{p}\""),
            ObjectiveKind::Suffix(s) => format!("spell a word ending with \"{s}\""),
            ObjectiveKind::DoubledConsonant => {
                "spell a word containing a doubled consonant".to_string()
            }
        }
    }

    /// Whether an accepted submission satisfies this objective.
    ///
    /// `word` is the normalized (trimmed, lowercase) submission; `score`
    /// is the damage it dealt.
    pub fn is_satisfied_by(&self, word: &str, score: u32) -> bool {
        match self.kind {
            ObjectiveKind::LengthAtLeast(n) => word.chars().count() >= n,
            ObjectiveKind::DamageAtLeast(d) => score >= d,
            ObjectiveKind::Prefix(p) => word.starts_with(p),
            ObjectiveKind::Suffix(s) => word.ends_with(s),
            ObjectiveKind::DoubledConsonant => has_doubled_consonant(word),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} dmg)", self.description(), self.damage)
    }
}

/// Adjacent identical non-vowel letters. Y counts as a consonant here.
fn has_doubled_consonant(word: &str) -> bool {
    let letters: Vec<char> = word.chars().collect();
    letters
        .windows(2)
        .any(|pair| pair[0] == pair[1] && pair[0].is_ascii_alphabetic() && !is_strict_vowel(pair[0]))
}

// =============================================================================
// CATALOG
// =============================================================================

use ObjectiveKind::*;

const TIER_2: [&[Objective]; 4] = [
    &[Objective::new(LengthAtLeast(5), 2)],
    &[Objective::new(DamageAtLeast(8), 2)],
    &[
        Objective::new(Prefix("re"), 2),
        Objective::new(Prefix("un"), 2),
        Objective::new(Prefix("de"), 2),
    ],
    &[
        Objective::new(Suffix("ed"), 2),
        Objective::new(Suffix("er"), 2),
    ],
];

const TIER_3: [&[Objective]; 5] = [
    &[Objective::new(LengthAtLeast(6), 3)],
    &[Objective::new(DamageAtLeast(12), 3)],
    &[
        Objective::new(Prefix("st"), 3),
        Objective::new(Prefix("ch"), 3),
        Objective::new(Prefix("sh"), 3),
    ],
    &[
        Objective::new(Suffix("ing"), 3),
        Objective::new(Suffix("ly"), 3),
    ],
    &[Objective::new(DoubledConsonant, 3)],
];

const TIER_4: [&[Objective]; 4] = [
    &[Objective::new(LengthAtLeast(7), 4)],
    &[Objective::new(DamageAtLeast(16), 4)],
    &[
        Objective::new(Prefix("qu"), 4),
        Objective::new(Prefix("th"), 4),
    ],
    &[
        Objective::new(Suffix("est"), 4),
        Objective::new(Suffix("ous"), 4),
    ],
];

const TIER_5: [&[Objective]; 4] = [
    &[Objective::new(LengthAtLeast(8), 5)],
    &[Objective::new(DamageAtLeast(20), 5)],
    &[Objective::new(Prefix("ex"), 5)],
    &[
        Objective::new(Suffix("ion"), 5),
        Objective::new(Suffix("ive"), 5),
    ],
];

const TIER_6: [&[Objective]; 2] = [
    &[
        Objective::new(LengthAtLeast(9), 6),
        Objective::new(LengthAtLeast(10), 6),
    ],
    &[
        Objective::new(DamageAtLeast(25), 6),
        Objective::new(DamageAtLeast(30), 6),
    ],
];

/// Family sub-pools for a damage tier.
fn tier_pools(damage_tier: u32) -> &'static [&'static [Objective]] {
    match damage_tier {
        2 => &TIER_2,
        3 => &TIER_3,
        4 => &TIER_4,
        5 => &TIER_5,
        6 => &TIER_6,
        other => panic!("no objective pool for damage tier {other}"),
    }
}

/// Draw an objective for a damage tier.
///
/// Two RNG draws: family sub-pool, then element within it.
///
/// # Panics
///
/// Panics on a tier outside 2..=6 — tiers come from session
/// configuration, so an unknown tier is an internal consistency error.
pub fn select_objective(damage_tier: u32, rng: &mut GameRng) -> Objective {
    let pools = tier_pools(damage_tier);
    let pool = pools[rng.next_int(0, pools.len() as i32) as usize];
    pool[rng.next_int(0, pool.len() as i32) as usize]
}
