//! Siege State Machine
//!
//! The central session engine: owns phase transitions, the cumulative
//! tile pool and its derived inventory, message adjudication, objective
//! evaluation, the team/boss health ledgers, and the terminal outcome.
//!
//! Everything here is deterministic: the async layer decides *when* the
//! engine's methods are called, but given the same seed and the same
//! ordered sequence of calls, two sessions evolve identically.
//!
//! ## Phase sequence
//!
//! ```text
//! Start → Wave1 → Intermission1 → Wave2 → Intermission2
//!       → Wave3 → Intermission3 → End
//! ```
//!
//! Strictly forward-only. An early team defeat jumps forward to `End`;
//! no phase is ever revisited. Words are adjudicated only in the three
//! wave phases.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::inventory::TileInventory;
use crate::core::rng::GameRng;
use crate::core::tile::Tile;
use crate::game::lexicon::Lexicon;
use crate::game::objective::{select_objective, Objective};
use crate::game::player::PlayerLedger;
use crate::game::resolve::resolve_word;
use crate::game::score::score_tiles;

/// Number of waves in a siege.
pub const WAVE_COUNT: u8 = 3;

/// Participant identifier (platform snowflake).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session phase. Strictly forward-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SiegePhase {
    /// Session created, first wave not yet opened.
    Start,
    /// First submission window.
    Wave1,
    /// Pause after wave 1.
    Intermission1,
    /// Second submission window.
    Wave2,
    /// Pause after wave 2.
    Intermission2,
    /// Final submission window.
    Wave3,
    /// Pause after wave 3.
    Intermission3,
    /// Terminal. No further adjudication.
    End,
}

impl SiegePhase {
    /// The wave number (1–3) if this is a wave phase.
    pub fn wave_number(self) -> Option<u8> {
        match self {
            SiegePhase::Wave1 => Some(1),
            SiegePhase::Wave2 => Some(2),
            SiegePhase::Wave3 => Some(3),
            _ => None,
        }
    }

    /// Whether submissions are adjudicated in this phase.
    pub fn is_wave(self) -> bool {
        self.wave_number().is_some()
    }
}

/// Deterministic knobs for one siege.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiegeConfig {
    /// Team health at session start. Only ever decreases.
    pub team_health: i32,
    /// Boss health at session start. Only ever decreases.
    pub boss_health: i32,
    /// Guaranteed vowel tiles added to the pool each wave.
    pub wave_vowels: usize,
    /// Guaranteed consonant tiles added each wave.
    pub wave_consonants: usize,
    /// Fully random tiles added each wave (wildcards enter here).
    pub wave_randoms: usize,
    /// Objective damage tiers drawn per wave, indexed by wave - 1.
    pub objective_tiers: Vec<Vec<u32>>,
}

impl Default for SiegeConfig {
    fn default() -> Self {
        Self {
            team_health: 15,
            boss_health: 300,
            wave_vowels: 3,
            wave_consonants: 5,
            wave_randoms: 4,
            objective_tiers: vec![vec![2], vec![3, 4], vec![4, 5, 6]],
        }
    }
}

/// Result of adjudicating one submission.
///
/// Rejections are expected and frequent; they are plain values, never
/// errors, and never interrupt the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionVerdict {
    /// Word accepted: tiles consumed, damage attributed.
    Scored {
        /// Normalized form of the word.
        word: String,
        /// Damage dealt.
        score: u32,
        /// The concrete tiles that spelled it.
        tiles: Vec<Tile>,
    },
    /// The exact word was already played this session.
    AlreadyUsed,
    /// Not in the dictionary.
    NotAWord,
    /// The pool cannot spell it right now.
    TilesExhausted,
}

/// What a wave opening looks like, for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaveStart {
    /// Wave number (1–3).
    pub wave: u8,
    /// Tiles newly added to the pool this wave.
    pub new_tiles: Vec<Tile>,
    /// Total pool size after the additions.
    pub pool_size: usize,
    /// Objectives active this wave.
    pub objectives: Vec<Objective>,
}

/// Outcome of one objective at the wave boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObjectiveOutcome {
    /// The objective that was active.
    pub objective: Objective,
    /// Who defended it, if anyone.
    pub defended_by: Option<UserId>,
}

/// End-of-wave tally.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WaveReport {
    /// Wave number (1–3).
    pub wave: u8,
    /// Sum of all players' wave damage, applied to the boss.
    pub boss_damage: u32,
    /// Damage from unmet objectives, applied to the team.
    pub team_damage: u32,
    /// Per-objective results.
    pub objectives: Vec<ObjectiveOutcome>,
    /// Per-player damage this wave (before the wave reset).
    pub wave_scores: BTreeMap<UserId, u32>,
    /// Boss health after the tally (may be negative; clamp for display).
    pub boss_health: i32,
    /// Team health after the tally.
    pub team_health: i32,
    /// Whether the team was wiped out (session jumps to `End`).
    pub team_defeated: bool,
}

/// Terminal outcome of a siege.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiegeOutcome {
    /// Team health reached zero.
    Defeat,
    /// Boss health reached zero and the team survived.
    Victory,
    /// Neither threshold crossed; the boss escapes.
    Escape,
}

/// Final summary for display and logging.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionReport {
    /// Terminal outcome.
    pub outcome: SiegeOutcome,
    /// Final boss health (unclamped).
    pub boss_health: i32,
    /// Final team health (unclamped).
    pub team_health: i32,
    /// Per-wave tallies, in order.
    pub waves: Vec<WaveReport>,
    /// Final per-player ledgers.
    pub players: BTreeMap<UserId, PlayerLedger>,
}

/// One siege from admission to terminal outcome.
#[derive(Clone, Debug, Serialize)]
pub struct SiegeState {
    config: SiegeConfig,
    rng: GameRng,
    phase: SiegePhase,
    players: BTreeMap<UserId, PlayerLedger>,
    /// Cumulative tile pool; grows each wave, never shrinks.
    pool: Vec<Tile>,
    /// Tiles consumed by accepted words, in acceptance order.
    consumed: Vec<Tile>,
    /// Derived: tally of `pool` minus `consumed`.
    inventory: TileInventory,
    /// Objectives active for the current wave.
    objectives: Vec<Objective>,
    /// Every word accepted this session, normalized. Session-scoped.
    words_played: BTreeSet<String>,
    team_health: i32,
    boss_health: i32,
    reports: Vec<WaveReport>,
}

impl SiegeState {
    /// Create a siege for the given participants.
    ///
    /// The seed fixes the entire tile/objective sequence: replaying the
    /// same seed with the same calls rebuilds the identical session.
    pub fn new<I>(seed: i32, participants: I, config: SiegeConfig) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        let players = participants
            .into_iter()
            .map(|id| (id, PlayerLedger::new()))
            .collect();
        Self {
            team_health: config.team_health,
            boss_health: config.boss_health,
            config,
            rng: GameRng::new(seed),
            phase: SiegePhase::Start,
            players,
            pool: Vec::new(),
            consumed: Vec::new(),
            inventory: TileInventory::empty(),
            objectives: Vec::new(),
            words_played: BTreeSet::new(),
            reports: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SiegePhase {
        self.phase
    }

    /// Boss health, unclamped (negative once defeated).
    pub fn boss_health(&self) -> i32 {
        self.boss_health
    }

    /// Team health, unclamped.
    pub fn team_health(&self) -> i32 {
        self.team_health
    }

    /// Boss health clamped at zero, for display.
    pub fn boss_health_display(&self) -> u32 {
        self.boss_health.max(0) as u32
    }

    /// Team health clamped at zero, for display.
    pub fn team_health_display(&self) -> u32 {
        self.team_health.max(0) as u32
    }

    /// The participants and their ledgers.
    pub fn players(&self) -> &BTreeMap<UserId, PlayerLedger> {
        &self.players
    }

    /// Whether `user` is bound to this siege.
    pub fn has_player(&self, user: UserId) -> bool {
        self.players.contains_key(&user)
    }

    /// The current tile pool, in generation order.
    pub fn pool(&self) -> &[Tile] {
        &self.pool
    }

    /// The current spendable inventory (pool minus consumed tiles).
    pub fn inventory(&self) -> &TileInventory {
        &self.inventory
    }

    /// Objectives active for the current wave.
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Open the first wave. Valid only once, from `Start`.
    pub fn begin(&mut self) -> WaveStart {
        assert_eq!(self.phase, SiegePhase::Start, "begin() called twice");
        self.phase = SiegePhase::Wave1;
        self.setup_wave(1)
    }

    /// Open the next wave from an intermission.
    ///
    /// # Panics
    ///
    /// Panics unless the phase is `Intermission1` or `Intermission2`;
    /// after `Intermission3` use [`SiegeState::conclude`].
    pub fn next_wave(&mut self) -> WaveStart {
        let wave = match self.phase {
            SiegePhase::Intermission1 => 2,
            SiegePhase::Intermission2 => 3,
            other => panic!("next_wave() in phase {other:?}"),
        };
        self.phase = if wave == 2 {
            SiegePhase::Wave2
        } else {
            SiegePhase::Wave3
        };
        self.setup_wave(wave)
    }

    /// Adjudicate one inbound message.
    ///
    /// Returns `None` outside wave phases or for unbound senders (both
    /// are ignored, not rejected). Checks run in order: duplicate,
    /// dictionary, tile resolution; the first failure wins. On success
    /// the tiles are consumed from the canonical inventory and the
    /// damage is attributed to the sender.
    pub fn submit_word(
        &mut self,
        sender: UserId,
        text: &str,
        lexicon: &dyn Lexicon,
    ) -> Option<SubmissionVerdict> {
        if !self.phase.is_wave() || !self.players.contains_key(&sender) {
            return None;
        }

        let word = text.trim().to_lowercase();

        if self.words_played.contains(&word) {
            return Some(SubmissionVerdict::AlreadyUsed);
        }
        if !lexicon.is_word(&word) {
            return Some(SubmissionVerdict::NotAWord);
        }
        let tiles = match resolve_word(&word, &self.inventory) {
            Some(tiles) => tiles,
            None => return Some(SubmissionVerdict::TilesExhausted),
        };

        for &tile in &tiles {
            let consumed = self.inventory.decrement(tile);
            assert!(consumed, "resolved tile missing from inventory");
        }
        self.consumed.extend(&tiles);
        self.words_played.insert(word.clone());

        let score = score_tiles(&tiles);
        self.players
            .get_mut(&sender)
            .expect("sender checked above")
            .attribute_word(&word, score);

        Some(SubmissionVerdict::Scored { word, score, tiles })
    }

    /// Close the current wave and tally it.
    ///
    /// Boss damage is the sum of the players' wave damage. Each active
    /// objective is evaluated against every accepted submission of the
    /// wave (aggregate evaluation): the first satisfying player in scan
    /// order — ascending user id, then word — gets the credit, and every
    /// unmet objective deals its damage to the team. A wiped-out team
    /// ends the session immediately; otherwise wave-scoped ledger fields
    /// reset and the phase advances to the intermission.
    pub fn finish_wave(&mut self) -> WaveReport {
        let wave = self
            .phase
            .wave_number()
            .unwrap_or_else(|| panic!("finish_wave() in phase {:?}", self.phase));

        let boss_damage: u32 = self.players.values().map(|p| p.wave_damage).sum();
        let wave_scores: BTreeMap<UserId, u32> = self
            .players
            .iter()
            .map(|(&id, p)| (id, p.wave_damage))
            .collect();

        let mut objective_outcomes = Vec::with_capacity(self.objectives.len());
        let mut team_damage = 0u32;
        let objectives = std::mem::take(&mut self.objectives);
        for objective in objectives {
            let defender = self.players.iter().find_map(|(&id, ledger)| {
                ledger
                    .wave_words
                    .iter()
                    .any(|(word, &score)| objective.is_satisfied_by(word, score))
                    .then_some(id)
            });
            match defender {
                Some(id) => {
                    self.players
                        .get_mut(&id)
                        .expect("defender is a player")
                        .attribute_objective(&objective);
                }
                None => team_damage += objective.damage(),
            }
            objective_outcomes.push(ObjectiveOutcome {
                objective,
                defended_by: defender,
            });
        }

        self.boss_health -= boss_damage as i32;
        self.team_health -= team_damage as i32;

        let team_defeated = self.team_health <= 0;
        if team_defeated {
            // Remaining waves are skipped; forward jump only.
            self.phase = SiegePhase::End;
        } else {
            for ledger in self.players.values_mut() {
                ledger.reset_wave();
            }
            self.phase = match wave {
                1 => SiegePhase::Intermission1,
                2 => SiegePhase::Intermission2,
                _ => SiegePhase::Intermission3,
            };
        }

        let report = WaveReport {
            wave,
            boss_damage,
            team_damage,
            objectives: objective_outcomes,
            wave_scores,
            boss_health: self.boss_health,
            team_health: self.team_health,
            team_defeated,
        };
        self.reports.push(report.clone());
        report
    }

    /// Final transition after the last intermission.
    pub fn conclude(&mut self) {
        match self.phase {
            SiegePhase::Intermission3 => self.phase = SiegePhase::End,
            SiegePhase::End => {}
            other => panic!("conclude() in phase {other:?}"),
        }
    }

    /// Registry-initiated teardown: jump forward to `End` from any
    /// phase. Idempotent.
    pub fn abort(&mut self) {
        self.phase = SiegePhase::End;
    }

    /// Terminal outcome; `None` until the phase is `End`.
    ///
    /// Boss health is only consulted here — a boss driven below zero
    /// mid-session does not shorten it; only a team wipe does.
    pub fn outcome(&self) -> Option<SiegeOutcome> {
        if self.phase != SiegePhase::End {
            return None;
        }
        Some(if self.team_health <= 0 {
            SiegeOutcome::Defeat
        } else if self.boss_health <= 0 {
            SiegeOutcome::Victory
        } else {
            SiegeOutcome::Escape
        })
    }

    /// Full end-of-session summary.
    ///
    /// # Panics
    ///
    /// Panics before the session has ended.
    pub fn report(&self) -> SessionReport {
        SessionReport {
            outcome: self.outcome().expect("report() before session end"),
            boss_health: self.boss_health,
            team_health: self.team_health,
            waves: self.reports.clone(),
            players: self.players.clone(),
        }
    }

    /// Extend the pool for a wave and draw its objectives.
    fn setup_wave(&mut self, wave: u8) -> WaveStart {
        let mut new_tiles =
            Vec::with_capacity(self.config.wave_vowels + self.config.wave_consonants + self.config.wave_randoms);
        for _ in 0..self.config.wave_vowels {
            new_tiles.push(Tile::random_vowel(&mut self.rng));
        }
        for _ in 0..self.config.wave_consonants {
            new_tiles.push(Tile::random_consonant(&mut self.rng));
        }
        for _ in 0..self.config.wave_randoms {
            new_tiles.push(Tile::random(&mut self.rng));
        }
        self.pool.extend(&new_tiles);
        self.rebuild_inventory();

        let tiers = self
            .config
            .objective_tiers
            .get(wave as usize - 1)
            .cloned()
            .unwrap_or_default();
        self.objectives = tiers
            .iter()
            .map(|&tier| select_objective(tier, &mut self.rng))
            .collect();

        WaveStart {
            wave,
            new_tiles,
            pool_size: self.pool.len(),
            objectives: self.objectives.clone(),
        }
    }

    /// Inventory is always the pool tally minus the consumed tally.
    fn rebuild_inventory(&mut self) {
        let mut inventory = TileInventory::from_tiles(&self.pool);
        for &tile in &self.consumed {
            let present = inventory.decrement(tile);
            debug_assert!(present, "consumed tile was never in the pool");
        }
        self.inventory = inventory;
    }

    #[cfg(test)]
    pub(crate) fn grant_tiles(&mut self, tiles: &[Tile]) {
        self.pool.extend(tiles);
        self.rebuild_inventory();
    }

    #[cfg(test)]
    pub(crate) fn set_objectives(&mut self, objectives: Vec<Objective>) {
        self.objectives = objectives;
    }
}
