//! Tile Scoring
//!
//! Pure damage computation over a resolved tile sequence: per-tile base
//! values by rarity tier plus a length bonus. Wildcards contribute no
//! base points and do not count toward the bonus multiplier, so
//! wildcard-heavy words are strictly weaker per letter.

use crate::core::tile::Tile;

/// Base score for a single tile, by rarity tier.
///
/// Tier 1 (common) = 1, tier 2 = 2, tier 3 = 3, tier 4 (rare) = 5.
/// All wildcard kinds are worth 0.
pub fn tile_value(tile: Tile) -> u32 {
    use Tile::*;
    match tile {
        E | S | I | A | R | N | T | O | L | C | D | U => 1,
        G | P | M | H | B | Y | F => 2,
        V | K | W => 3,
        Z | X | J | Q => 5,
        Wild | WildVowel | WildConsonant => 0,
    }
}

/// Score a resolved tile sequence.
///
/// `base + max(0, len - 3) * non_wild_count`: every tile past the third
/// multiplies the count of real letter tiles, rewarding longer words
/// disproportionately.
pub fn score_tiles(tiles: &[Tile]) -> u32 {
    let base: u32 = tiles.iter().map(|&t| tile_value(t)).sum();
    let non_wild = tiles.iter().filter(|t| !t.is_wild()).count() as u32;
    let bonus_length = tiles.len().saturating_sub(3) as u32;
    base + bonus_length * non_wild
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn every_kind_has_a_value_tier() {
        for tile in Tile::ALL {
            let v = tile_value(tile);
            if tile.is_wild() {
                assert_eq!(v, 0);
            } else {
                assert!(matches!(v, 1 | 2 | 3 | 5), "{tile:?} scored {v}");
            }
        }
    }

    #[test]
    fn short_word_has_no_bonus() {
        // B(2) + A(1) + T(1), length 3 ⇒ bonus 0.
        assert_eq!(score_tiles(&[Tile::B, Tile::A, Tile::T]), 4);
    }

    #[test]
    fn wildcard_only_word_scores_zero_base() {
        // Two wildcards: base 0, bonus max(0, 2-3) * 0 = 0.
        assert_eq!(score_tiles(&[Tile::Wild, Tile::Wild]), 0);

        // Even at bonus-eligible lengths the multiplier is zero.
        assert_eq!(
            score_tiles(&[Tile::Wild, Tile::WildVowel, Tile::WildConsonant, Tile::Wild]),
            0
        );
    }

    #[test]
    fn length_bonus_counts_non_wild_tiles() {
        // Q(5) + U(1) + I(1) + Z(5) = 12 base, bonus (4-3) * 4 = 4.
        assert_eq!(score_tiles(&[Tile::Q, Tile::U, Tile::I, Tile::Z]), 16);

        // Same word with a wildcard U: base 11, bonus (4-3) * 3 = 3.
        assert_eq!(score_tiles(&[Tile::Q, Tile::Wild, Tile::I, Tile::Z]), 14);
    }

    #[test]
    fn empty_sequence_scores_zero() {
        assert_eq!(score_tiles(&[]), 0);
    }

    #[test]
    fn appending_common_tile_strictly_increases_score() {
        // Monotonic in length for words already at length >= 3.
        let mut tiles = vec![Tile::T, Tile::O, Tile::E];
        for _ in 0..8 {
            let before = score_tiles(&tiles);
            tiles.push(Tile::E);
            assert!(score_tiles(&tiles) > before);
        }
    }

    fn arbitrary_tile() -> impl Strategy<Value = Tile> {
        (0..Tile::COUNT).prop_map(|i| Tile::ALL[i])
    }

    proptest! {
        #[test]
        fn score_never_below_base_sum(tiles in proptest::collection::vec(arbitrary_tile(), 0..20)) {
            let base: u32 = tiles.iter().map(|&t| tile_value(t)).sum();
            prop_assert!(score_tiles(&tiles) >= base);
        }

        #[test]
        fn appending_tier_one_tile_to_long_word_increases(
            tiles in proptest::collection::vec(arbitrary_tile(), 3..15),
        ) {
            // Appending a tier-1 letter to a resolved word of length >= 3
            // strictly increases the score.
            let mut longer = tiles.clone();
            longer.push(Tile::E);
            prop_assert!(score_tiles(&longer) > score_tiles(&tiles));
        }
    }
}
