//! Word Resolver
//!
//! Decides whether a word can be spelled from an inventory and, if so,
//! which concrete tiles spell it. Resolution runs three deterministic
//! passes over a working clone of the inventory:
//!
//! 1. **Exact pass** — each letter claims its own letter tile if one is
//!    available.
//! 2. **Non-Y wildcard pass** — unresolved non-Y letters claim the
//!    matching category wildcard first (`WildVowel`/`WildConsonant`),
//!    falling back to the generic `Wild`; if neither is available the
//!    word fails immediately.
//! 3. **Y pass** — unresolved Ys try `WildVowel`, then `WildConsonant`,
//!    then `Wild`, in that order.
//!
//! Y is ambiguous (vowel or consonant sound), so it resolves last, after
//! the unambiguous letters have claimed the specific wildcard categories;
//! otherwise a Y could starve an earlier letter of its only specific
//! wildcard. There is no backtracking across passes: a pathological
//! inventory can fail resolution even though some other assignment would
//! have succeeded. That is accepted behavior, not a bug.

use crate::core::inventory::TileInventory;
use crate::core::tile::{is_strict_vowel, Tile};

/// Resolve `word` against `inventory`, returning one concrete tile per
/// letter, or `None` if the word cannot be spelled.
///
/// Empty words and words containing any character outside A–Z
/// (case-insensitive) are rejected before any tile is considered. The
/// inventory itself is never mutated; callers consume the returned tiles
/// from the canonical pool on success.
///
/// # Determinism
///
/// Pure function: same word + same inventory ⇒ same assignment. Letters
/// are processed strictly left to right within each pass.
pub fn resolve_word(word: &str, inventory: &TileInventory) -> Option<Vec<Tile>> {
    if word.is_empty() {
        return None;
    }

    let letters: Vec<char> = word.chars().map(|c| c.to_ascii_uppercase()).collect();
    if letters.iter().any(|c| !c.is_ascii_uppercase()) {
        return None;
    }

    let mut pool = inventory.clone();

    // Pass 1: exact letter tiles.
    let mut slots: Vec<Option<Tile>> = letters
        .iter()
        .map(|&c| {
            let tile = Tile::from_letter(c).expect("letters validated above");
            pool.decrement(tile).then_some(tile)
        })
        .collect();

    // Pass 2: wildcards for unresolved non-Y letters.
    for (slot, &c) in slots.iter_mut().zip(&letters) {
        if slot.is_some() || c == 'Y' {
            continue;
        }
        let specific = if is_strict_vowel(c) {
            Tile::WildVowel
        } else {
            Tile::WildConsonant
        };
        if pool.decrement(specific) {
            *slot = Some(specific);
        } else if pool.decrement(Tile::Wild) {
            *slot = Some(Tile::Wild);
        } else {
            return None;
        }
    }

    // Pass 3: deferred Ys take whatever wildcard is left.
    for (slot, &c) in slots.iter_mut().zip(&letters) {
        if slot.is_some() {
            continue;
        }
        debug_assert_eq!(c, 'Y');
        let claimed = [Tile::WildVowel, Tile::WildConsonant, Tile::Wild]
            .into_iter()
            .find(|&w| pool.decrement(w));
        match claimed {
            Some(tile) => *slot = Some(tile),
            None => return None,
        }
    }

    Some(
        slots
            .into_iter()
            .map(|slot| slot.expect("unresolved slot after successful resolution"))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inventory(tiles: &[Tile]) -> TileInventory {
        TileInventory::from_tiles(tiles)
    }

    #[test]
    fn exact_tiles_only() {
        let inv = inventory(&[Tile::B, Tile::A, Tile::T]);
        assert_eq!(
            resolve_word("bat", &inv),
            Some(vec![Tile::B, Tile::A, Tile::T])
        );
    }

    #[test]
    fn rejects_empty_word() {
        let inv = inventory(&[Tile::A]);
        assert_eq!(resolve_word("", &inv), None);
    }

    #[test]
    fn rejects_non_alpha_before_tiles() {
        // Rejection happens regardless of inventory contents.
        let inv = inventory(&[Tile::Wild, Tile::Wild, Tile::Wild, Tile::Wild]);
        assert_eq!(resolve_word("ab3", &inv), None);
        assert_eq!(resolve_word("a b", &inv), None);
        assert_eq!(resolve_word("café", &inv), None);
    }

    #[test]
    fn case_insensitive() {
        let inv = inventory(&[Tile::O, Tile::X]);
        assert_eq!(resolve_word("Ox", &inv), Some(vec![Tile::O, Tile::X]));
    }

    #[test]
    fn insufficient_exact_tiles_fail() {
        let inv = inventory(&[Tile::B, Tile::A]);
        assert_eq!(resolve_word("bat", &inv), None);
    }

    #[test]
    fn specific_wildcard_preferred_over_generic() {
        let inv = inventory(&[Tile::WildVowel, Tile::Wild, Tile::B, Tile::T]);
        assert_eq!(
            resolve_word("bat", &inv),
            Some(vec![Tile::B, Tile::WildVowel, Tile::T])
        );
    }

    #[test]
    fn generic_wildcard_fallback() {
        let inv = inventory(&[Tile::Wild, Tile::B, Tile::T]);
        assert_eq!(
            resolve_word("bat", &inv),
            Some(vec![Tile::B, Tile::Wild, Tile::T])
        );
    }

    #[test]
    fn consonant_wildcard_for_consonants() {
        let inv = inventory(&[Tile::A, Tile::WildConsonant, Tile::T]);
        assert_eq!(
            resolve_word("bat", &inv),
            Some(vec![Tile::WildConsonant, Tile::A, Tile::T])
        );
    }

    #[test]
    fn wildcards_only() {
        let inv = inventory(&[Tile::Wild, Tile::Wild]);
        assert_eq!(
            resolve_word("ox", &inv),
            Some(vec![Tile::Wild, Tile::Wild])
        );
    }

    #[test]
    fn y_resolves_after_other_letters() {
        // One WildVowel, one Wild: the E (pass 2) takes the WildVowel,
        // the Y (pass 3) is left the generic Wild.
        let inv = inventory(&[Tile::WildVowel, Tile::Wild]);
        assert_eq!(
            resolve_word("ye", &inv),
            Some(vec![Tile::Wild, Tile::WildVowel])
        );
    }

    #[test]
    fn y_prefers_vowel_wildcard() {
        let inv = inventory(&[Tile::WildVowel, Tile::WildConsonant]);
        assert_eq!(resolve_word("y", &inv), Some(vec![Tile::WildVowel]));
    }

    #[test]
    fn y_falls_back_through_all_wildcards() {
        let inv = inventory(&[Tile::WildConsonant]);
        assert_eq!(resolve_word("y", &inv), Some(vec![Tile::WildConsonant]));

        let inv = inventory(&[Tile::Wild]);
        assert_eq!(resolve_word("y", &inv), Some(vec![Tile::Wild]));

        let inv = inventory(&[Tile::A]);
        assert_eq!(resolve_word("y", &inv), None);
    }

    #[test]
    fn no_backtracking_across_positions() {
        // A claims the only Wild in pass 2, leaving nothing for B.
        // No reassignment is attempted; the word simply fails.
        let inv = inventory(&[Tile::Wild]);
        assert_eq!(resolve_word("ab", &inv), None);
    }

    #[test]
    fn resolution_does_not_mutate_inventory() {
        let inv = inventory(&[Tile::B, Tile::A, Tile::T]);
        let before = inv.clone();
        resolve_word("bat", &inv).unwrap();
        resolve_word("zzz", &inv);
        assert_eq!(inv, before);
    }

    fn arbitrary_tile() -> impl Strategy<Value = Tile> {
        (0..Tile::COUNT).prop_map(|i| Tile::ALL[i])
    }

    proptest! {
        #[test]
        fn resolved_tiles_match_word_length_and_fit_inventory(
            word in "[a-zA-Z]{1,12}",
            tiles in proptest::collection::vec(arbitrary_tile(), 0..60),
        ) {
            let inv = TileInventory::from_tiles(&tiles);
            if let Some(resolved) = resolve_word(&word, &inv) {
                prop_assert_eq!(resolved.len(), word.chars().count());

                // Consuming the assignment from a clone never drives any
                // count negative.
                let mut clone = inv.clone();
                for &tile in &resolved {
                    prop_assert!(clone.decrement(tile), "over-consumed {:?}", tile);
                }
            }
        }

        #[test]
        fn garbage_input_never_resolves(
            word in "[a-zA-Z]*[ 0-9!][a-zA-Z0-9 ]*",
            tiles in proptest::collection::vec(arbitrary_tile(), 0..40),
        ) {
            let inv = TileInventory::from_tiles(&tiles);
            prop_assert_eq!(resolve_word(&word, &inv), None);
        }
    }
}
