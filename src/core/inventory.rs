//! Tile Inventory
//!
//! The multiset of tiles a wave's word submissions draw against. Every
//! tile kind always has an entry (zero-filled at construction) and no
//! count ever goes negative; the only mutation is decrement-if-positive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::tile::Tile;

/// A count per tile kind.
///
/// Cloned at the start of every resolution attempt so a failed attempt
/// leaves the canonical pool untouched; the clone is discarded either way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInventory {
    counts: BTreeMap<Tile, u32>,
}

impl TileInventory {
    /// Empty inventory with a zero entry for every tile kind.
    pub fn empty() -> Self {
        let counts = Tile::ALL.iter().map(|&t| (t, 0)).collect();
        Self { counts }
    }

    /// Tally a tile list into per-kind counts.
    pub fn from_tiles(tiles: &[Tile]) -> Self {
        let mut inventory = Self::empty();
        for &tile in tiles {
            *inventory
                .counts
                .get_mut(&tile)
                .expect("inventory entry missing for tile kind") += 1;
        }
        inventory
    }

    /// Current count for a tile kind.
    pub fn count(&self, tile: Tile) -> u32 {
        *self
            .counts
            .get(&tile)
            .expect("inventory entry missing for tile kind")
    }

    /// Sum of all counts.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// If the count for `tile` is positive, subtract one and return
    /// `true`; otherwise leave the inventory untouched and return `false`.
    pub fn decrement(&mut self, tile: Tile) -> bool {
        let count = self
            .counts
            .get_mut(&tile)
            .expect("inventory entry missing for tile kind");
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }
}
