//! Player Ledger
//!
//! Per-participant accumulators for one session. Ledgers are owned by
//! the session state and mutated only by the engine: a word attribution
//! on every accepted submission, an objective attribution when the
//! player's word defended one, and a reset of the wave-scoped fields at
//! every wave boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::game::objective::Objective;

/// Score/word/objective record for one participant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLedger {
    /// Damage dealt during the current wave. Reset at wave boundaries.
    pub wave_damage: u32,
    /// Damage dealt across the whole session. Monotonic.
    pub total_damage: u32,
    /// Accepted words of the current wave, with their scores.
    pub wave_words: BTreeMap<String, u32>,
    /// Accepted words of the whole session, with their scores.
    pub all_words: BTreeMap<String, u32>,
    /// Objectives this player's words defended.
    pub objectives_completed: u32,
    /// Total team damage prevented by those objectives.
    pub total_defended: u32,
}

impl PlayerLedger {
    /// Fresh ledger with everything at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted word and its score.
    pub fn attribute_word(&mut self, word: &str, score: u32) {
        self.wave_damage += score;
        self.total_damage += score;
        self.wave_words.insert(word.to_string(), score);
        self.all_words.insert(word.to_string(), score);
    }

    /// Record a defended objective.
    pub fn attribute_objective(&mut self, objective: &Objective) {
        self.objectives_completed += 1;
        self.total_defended += objective.damage();
    }

    /// Zero the wave-scoped fields. Session totals persist.
    pub fn reset_wave(&mut self) {
        self.wave_damage = 0;
        self.wave_words.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::GameRng;
    use crate::game::objective::select_objective;

    #[test]
    fn word_attribution_accumulates_both_scopes() {
        let mut ledger = PlayerLedger::new();
        ledger.attribute_word("bat", 4);
        ledger.attribute_word("quiz", 16);

        assert_eq!(ledger.wave_damage, 20);
        assert_eq!(ledger.total_damage, 20);
        assert_eq!(ledger.wave_words.get("bat"), Some(&4));
        assert_eq!(ledger.all_words.get("quiz"), Some(&16));
    }

    #[test]
    fn reset_wave_keeps_session_totals() {
        let mut ledger = PlayerLedger::new();
        ledger.attribute_word("bat", 4);
        ledger.reset_wave();
        ledger.attribute_word("ox", 2);

        assert_eq!(ledger.wave_damage, 2);
        assert_eq!(ledger.total_damage, 6);
        assert!(!ledger.wave_words.contains_key("bat"));
        assert!(ledger.all_words.contains_key("bat"));
        assert!(ledger.all_words.contains_key("ox"));
    }

    #[test]
    fn objective_attribution() {
        let mut rng = GameRng::new(1);
        let objective = select_objective(4, &mut rng);

        let mut ledger = PlayerLedger::new();
        ledger.attribute_objective(&objective);
        ledger.attribute_objective(&objective);

        assert_eq!(ledger.objectives_completed, 2);
        assert_eq!(ledger.total_defended, 8);
    }

    #[test]
    fn repeated_word_overwrites_score() {
        // Session-level dedup normally prevents this; the ledger itself
        // just overwrites.
        let mut ledger = PlayerLedger::new();
        ledger.attribute_word("bat", 4);
        ledger.attribute_word("bat", 7);

        assert_eq!(ledger.wave_words.get("bat"), Some(&7));
        assert_eq!(ledger.total_damage, 11);
    }
}
