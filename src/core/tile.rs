//! Tile Model
//!
//! The 29 tile kinds a siege pool is built from: the 26 letters plus
//! three wildcard categories. Tiles are immutable value types with no
//! identity beyond their kind.
//!
//! Y sits in both random-generation pools (it can stand in for a vowel or
//! consonant sound) but is classified as neither during resolution; the
//! resolver defers it to its own pass.

use serde::{Deserialize, Serialize};

use crate::core::rng::GameRng;

/// A single letter or wildcard tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[allow(missing_docs)] // the letter variants are self-describing
pub enum Tile {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    /// Stands in for any letter.
    Wild,
    /// Stands in for any vowel (A, E, I, O, U — and Y in its vowel role).
    WildVowel,
    /// Stands in for any consonant (and Y in its consonant role).
    WildConsonant,
}

/// Random-vowel pool: the five strict vowels plus Y.
const VOWEL_POOL: [Tile; 6] = [Tile::A, Tile::E, Tile::I, Tile::O, Tile::U, Tile::Y];

/// Random-consonant pool: the twenty strict consonants plus Y.
const CONSONANT_POOL: [Tile; 21] = [
    Tile::B, Tile::C, Tile::D, Tile::F, Tile::G, Tile::H, Tile::J, Tile::K,
    Tile::L, Tile::M, Tile::N, Tile::P, Tile::Q, Tile::R, Tile::S, Tile::T,
    Tile::V, Tile::W, Tile::X, Tile::Y, Tile::Z,
];

impl Tile {
    /// Number of distinct tile kinds.
    pub const COUNT: usize = 29;

    /// Every tile kind, in discriminant order.
    pub const ALL: [Tile; Tile::COUNT] = [
        Tile::A, Tile::B, Tile::C, Tile::D, Tile::E, Tile::F, Tile::G,
        Tile::H, Tile::I, Tile::J, Tile::K, Tile::L, Tile::M, Tile::N,
        Tile::O, Tile::P, Tile::Q, Tile::R, Tile::S, Tile::T, Tile::U,
        Tile::V, Tile::W, Tile::X, Tile::Y, Tile::Z,
        Tile::Wild, Tile::WildVowel, Tile::WildConsonant,
    ];

    /// Display symbol for this tile kind.
    ///
    /// The mapping is an exhaustive match: a tile kind without a symbol
    /// cannot compile, so the "missing display mapping" class of startup
    /// error is unrepresentable.
    pub fn symbol(self) -> &'static str {
        match self {
            Tile::A => "A",
            Tile::B => "B",
            Tile::C => "C",
            Tile::D => "D",
            Tile::E => "E",
            Tile::F => "F",
            Tile::G => "G",
            Tile::H => "H",
            Tile::I => "I",
            Tile::J => "J",
            Tile::K => "K",
            Tile::L => "L",
            Tile::M => "M",
            Tile::N => "N",
            Tile::O => "O",
            Tile::P => "P",
            Tile::Q => "Q",
            Tile::R => "R",
            Tile::S => "S",
            Tile::T => "T",
            Tile::U => "U",
            Tile::V => "V",
            Tile::W => "W",
            Tile::X => "X",
            Tile::Y => "Y",
            Tile::Z => "Z",
            Tile::Wild => "★",
            Tile::WildVowel => "★V",
            Tile::WildConsonant => "★C",
        }
    }

    /// The letter tile for `c` (case-insensitive), or `None` outside A–Z.
    pub fn from_letter(c: char) -> Option<Tile> {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            Some(Tile::ALL[(c as u8 - b'A') as usize])
        } else {
            None
        }
    }

    /// The letter this tile represents, or `None` for wildcards.
    pub fn letter(self) -> Option<char> {
        let index = self as u8;
        if index < 26 {
            Some((b'A' + index) as char)
        } else {
            None
        }
    }

    /// Whether this is one of the three wildcard kinds.
    pub fn is_wild(self) -> bool {
        matches!(self, Tile::Wild | Tile::WildVowel | Tile::WildConsonant)
    }

    /// Uniformly random tile kind among all kinds, wildcards included.
    ///
    /// Consumes exactly one RNG draw.
    pub fn random(rng: &mut GameRng) -> Tile {
        Tile::ALL[rng.next_int(0, Tile::COUNT as i32) as usize]
    }

    /// Uniform pick among {A, E, I, O, U, Y}. Consumes one RNG draw.
    pub fn random_vowel(rng: &mut GameRng) -> Tile {
        VOWEL_POOL[rng.next_int(0, VOWEL_POOL.len() as i32) as usize]
    }

    /// Uniform pick among the twenty consonants plus Y. Consumes one RNG
    /// draw.
    pub fn random_consonant(rng: &mut GameRng) -> Tile {
        CONSONANT_POOL[rng.next_int(0, CONSONANT_POOL.len() as i32) as usize]
    }
}

/// Strict vowel test for resolution: A, E, I, O, U only. Y is neither a
/// strict vowel nor a strict consonant and gets its own resolution pass.
pub fn is_strict_vowel(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'A' | 'E' | 'I' | 'O' | 'U')
}
