//! Hands and the 34-slot count table every engine works on.

use crate::meld::Meld;
use crate::tile::{ALL_TILES, Tile, tile_from_index, tile_index};

/// Count of each tile value in a hand, indexed by [`tile_index`].
/// Entries are 0..4 and the total never exceeds 14.
pub type TileTable = [u8; 34];

/// A boolean set of tile values, indexed by [`tile_index`].
/// Used for useful-tile and waiting-tile results.
pub type UsefulTable = [bool; 34];

/// A player's hand: fixed (revealed) melds plus concealed tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    pub melds: Vec<Meld>,
    pub concealed: Vec<Tile>,
}

impl Hand {
    pub fn new(melds: Vec<Meld>, concealed: Vec<Tile>) -> Self {
        Hand { melds, concealed }
    }

    /// A fully concealed hand
    pub fn concealed(tiles: Vec<Tile>) -> Self {
        Hand {
            melds: Vec::new(),
            concealed: tiles,
        }
    }
}

/// Count a slice of tiles into a fresh table
pub fn tiles_to_table(tiles: &[Tile]) -> TileTable {
    let mut table = [0u8; 34];
    for &tile in tiles {
        table[tile_index(tile)] += 1;
    }
    table
}

/// Expand a count table back to tiles in canonical order
pub fn table_to_tiles(table: &TileTable) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(14);
    for idx in 0..34 {
        for _ in 0..table[idx] {
            tiles.push(tile_from_index(idx));
        }
    }
    tiles
}

/// Expand a hand into a count table: fixed melds restored to their
/// constituent tiles, plus the concealed tiles.
///
/// Fails when the hand shape is invalid: more than four melds, a
/// malformed meld, a total tile count that is not a legal pre-draw
/// (1/4/7/10/13) or post-draw (2/5/8/11/14) size, or more than four
/// copies of any tile.
pub fn hand_to_table(hand: &Hand) -> Result<TileTable, String> {
    if hand.melds.len() > 4 {
        return Err(format!("too many melds: {}", hand.melds.len()));
    }

    let total = hand.melds.len() * 3 + hand.concealed.len();
    if total % 3 == 0 || total > 14 {
        return Err(format!(
            "invalid hand size: {} melds + {} concealed tiles",
            hand.melds.len(),
            hand.concealed.len()
        ));
    }

    let mut table = tiles_to_table(&hand.concealed);
    for meld in &hand.melds {
        let tiles = meld
            .expand()
            .ok_or_else(|| format!("malformed meld anchored on {}", meld.tile))?;
        for tile in tiles {
            table[tile_index(tile)] += 1;
        }
    }

    for idx in 0..34 {
        if table[idx] > 4 {
            return Err(format!(
                "tile {} appears {} times (max 4)",
                ALL_TILES[idx], table[idx]
            ));
        }
    }

    Ok(table)
}

/// Count how many useful tiles remain unseen: for every tile marked in
/// `useful`, four copies exist minus however many are already visible in
/// `used`.
pub fn count_useful_tiles(used: &TileTable, useful: &UsefulTable) -> u8 {
    let mut count = 0;
    for idx in 0..34 {
        if useful[idx] {
            count += 4u8.saturating_sub(used[idx]);
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_tiles;
    use crate::tile::{Honor, Suit};

    #[test]
    fn table_roundtrip_is_canonical() {
        // Input order does not matter; expansion is canonical
        let tiles = parse_tiles("9m1m5p3z1m").unwrap();
        let table = tiles_to_table(&tiles);
        assert_eq!(table[tile_index(Tile::suited(Suit::Man, 1))], 2);

        let expanded = table_to_tiles(&table);
        assert_eq!(
            expanded,
            vec![
                Tile::suited(Suit::Man, 1),
                Tile::suited(Suit::Man, 1),
                Tile::suited(Suit::Man, 9),
                Tile::suited(Suit::Pin, 5),
                Tile::honor(Honor::West),
            ]
        );
    }

    #[test]
    fn hand_with_melds_expands() {
        // One fixed chow (2m3m4m) + 10 concealed tiles = 13 total
        let hand = Hand::new(
            vec![Meld::chow(Tile::suited(Suit::Man, 3)).from_offer(1)],
            parse_tiles("567m99p12345s").unwrap(),
        );
        let table = hand_to_table(&hand).unwrap();
        assert_eq!(table.iter().map(|&n| n as usize).sum::<usize>(), 13);
        assert_eq!(table[tile_index(Tile::suited(Suit::Man, 2))], 1);
        assert_eq!(table[tile_index(Tile::suited(Suit::Man, 4))], 1);
    }

    #[test]
    fn hand_rejects_bad_sizes() {
        // 12 tiles is neither a pre-draw nor a post-draw count
        let hand = Hand::concealed(parse_tiles("123456m123456p").unwrap());
        assert!(hand_to_table(&hand).is_err());

        // 14 tiles (post-draw) is accepted
        let hand = Hand::concealed(parse_tiles("123456789m12344p").unwrap());
        assert!(hand_to_table(&hand).is_ok());
    }

    #[test]
    fn hand_rejects_five_copies() {
        let hand = Hand::new(
            vec![Meld::kong(Tile::suited(Suit::Man, 1))],
            parse_tiles("1m23m456p789s11z").unwrap(),
        );
        assert!(hand_to_table(&hand).is_err());
    }

    #[test]
    fn hand_rejects_malformed_meld() {
        let hand = Hand::new(
            vec![Meld::chow(Tile::suited(Suit::Man, 9))],
            parse_tiles("567m99p123s456s").unwrap(),
        );
        assert!(hand_to_table(&hand).is_err());
    }

    #[test]
    fn useful_tile_counting() {
        let used = tiles_to_table(&parse_tiles("1112345678999m").unwrap());
        let mut useful = [false; 34];
        useful[tile_index(Tile::suited(Suit::Man, 1))] = true; // 3 used -> 1 left
        useful[tile_index(Tile::suited(Suit::Man, 5))] = true; // 1 used -> 3 left
        useful[tile_index(Tile::honor(Honor::East))] = true; // 0 used -> 4 left
        assert_eq!(count_useful_tiles(&used, &useful), 8);
    }
}
