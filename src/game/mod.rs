//! Game Logic Module
//!
//! All siege simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `lexicon`: the word-membership oracle the engine consults
//! - `resolve`: word → tile assignment with wildcard substitution
//! - `score`: tile scoring with rarity tiers and length bonus
//! - `objective`: objective catalog and seeded selection
//! - `player`: per-participant ledger
//! - `session`: the siege state machine

pub mod lexicon;
pub mod objective;
pub mod player;
pub mod resolve;
pub mod score;
pub mod session;

// Re-export key types
pub use lexicon::{Lexicon, WordSet};
pub use objective::{select_objective, Objective};
pub use player::PlayerLedger;
pub use resolve::resolve_word;
pub use score::{score_tiles, tile_value};
pub use session::{
    SiegeConfig, SiegeOutcome, SiegePhase, SiegeState, SubmissionVerdict, UserId, WaveReport,
};
