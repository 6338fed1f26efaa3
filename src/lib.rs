//! # Word Siege
//!
//! Session and scoring engine for a chat-driven cooperative word game:
//! a group of participants face a multi-wave boss fight, spelling valid
//! dictionary words from a shared, partially-regenerating pool of letter
//! tiles to deal damage while defending timed objectives.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       WORD SIEGE                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── rng.rs        - Seeded xorshift32 PRNG                  │
//! │  ├── tile.rs       - Letter/wildcard tile kinds              │
//! │  └── inventory.rs  - Tile multiset                           │
//! │                                                              │
//! │  game/             - Game logic (deterministic)              │
//! │  ├── resolve.rs    - Word → tile assignment                  │
//! │  ├── score.rs      - Tile scoring                            │
//! │  ├── objective.rs  - Objective catalog and selection         │
//! │  ├── player.rs     - Per-player ledger                       │
//! │  └── session.rs    - Siege state machine                     │
//! │                                                              │
//! │  chat/             - Platform layer (non-deterministic)      │
//! │  ├── interface.rs  - Lexicon oracle, channels, markers       │
//! │  ├── runner.rs     - Async session run loop                  │
//! │  └── registry.rs   - Session admission and teardown          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No `HashMap` in game state (uses `BTreeMap`/`BTreeSet`)
//! - No system time dependencies
//! - All randomness from the seeded xorshift32 generator
//!
//! Given the same seed and the same sequence of submissions, a session
//! produces identical tile pools, objectives, scores, and outcome on any
//! platform. The `chat/` layer owns everything timing- and
//! delivery-related and only touches deterministic state through the
//! engine's own methods.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod chat;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::inventory::TileInventory;
pub use crate::core::rng::GameRng;
pub use crate::core::tile::Tile;
pub use chat::registry::{AdmissionError, GameManager, SessionTicket};
pub use chat::runner::SessionRules;
pub use game::lexicon::{Lexicon, WordSet};
pub use game::objective::Objective;
pub use game::player::PlayerLedger;
pub use game::session::{
    SiegeConfig, SiegeOutcome, SiegePhase, SiegeState, SubmissionVerdict, UserId,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
