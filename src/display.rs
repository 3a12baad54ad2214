//! Display utilities for pretty-printing tiles and analysis results.
//!
//! Supports both Unicode mahjong characters (🀇🀈🀉...) and ASCII fallback.

use crate::hand::UsefulTable;
use crate::tile::{ALL_TILES, Honor, Suit, Tile, tile_index};

/// Get the Unicode character for a tile with a trailing space for better rendering.
pub fn tile_to_unicode(tile: &Tile) -> String {
    match tile {
        Tile::Suited { suit, rank } => {
            let base = match suit {
                Suit::Man => 0x1F007, // 🀇 = 1-man
                Suit::Pin => 0x1F019, // 🀙 = 1-pin
                Suit::Sou => 0x1F010, // 🀐 = 1-sou
            };
            let c = char::from_u32(base + (*rank as u32) - 1).unwrap_or('?');
            format!("{c} ")
        }
        Tile::Honor(honor) => {
            let s = match honor {
                Honor::East => "🀀 ",
                Honor::South => "🀁 ",
                Honor::West => "🀂 ",
                Honor::North => "🀃 ",
                Honor::White => "🀆 ",
                Honor::Green => "🀅 ",
                Honor::Red => "🀄︎ ", // Includes variation selector + space
            };
            s.to_string()
        }
    }
}

/// Get a short ASCII representation of a tile
pub fn tile_to_ascii(tile: &Tile) -> String {
    match tile {
        Tile::Suited { suit, rank } => {
            let s = match suit {
                Suit::Man => 'm',
                Suit::Pin => 'p',
                Suit::Sou => 's',
            };
            format!("{}{}", rank, s)
        }
        Tile::Honor(honor) => honor_name(honor).to_string(),
    }
}

/// Short honor name for display
pub fn honor_name(honor: &Honor) -> &'static str {
    match honor {
        Honor::East => "E",
        Honor::South => "S",
        Honor::West => "W",
        Honor::North => "N",
        Honor::White => "Wh",
        Honor::Green => "Gr",
        Honor::Red => "Rd",
    }
}

/// Format a slice of tiles as Unicode characters
pub fn tiles_to_unicode(tiles: &[Tile]) -> String {
    tiles.iter().map(tile_to_unicode).collect()
}

/// Format a slice of tiles in compact notation, grouping runs of one
/// suit: `123m55p11z`
pub fn tiles_to_notation(tiles: &[Tile]) -> String {
    let mut result = String::new();
    let mut current_suit: Option<Suit> = None;
    let mut pending: Vec<u8> = Vec::new();

    let flush = |result: &mut String, suit: Option<Suit>, pending: &mut Vec<u8>| {
        if let Some(s) = suit {
            for rank in pending.iter() {
                result.push_str(&rank.to_string());
            }
            result.push(match s {
                Suit::Man => 'm',
                Suit::Pin => 'p',
                Suit::Sou => 's',
            });
            pending.clear();
        }
    };

    let mut honors: Vec<u8> = Vec::new();
    for tile in tiles {
        match tile {
            Tile::Suited { suit, rank } => {
                if current_suit != Some(*suit) {
                    flush(&mut result, current_suit, &mut pending);
                    current_suit = Some(*suit);
                }
                pending.push(*rank);
            }
            Tile::Honor(h) => {
                honors.push(*h as u8 + 1);
            }
        }
    }
    flush(&mut result, current_suit, &mut pending);

    if !honors.is_empty() {
        for n in honors {
            result.push_str(&n.to_string());
        }
        result.push('z');
    }

    result
}

/// The tiles marked in a useful/waiting table, in canonical order
pub fn table_tiles(table: &UsefulTable) -> Vec<Tile> {
    ALL_TILES
        .iter()
        .copied()
        .filter(|&t| table[tile_index(t)])
        .collect()
}

/// One-line shanten description
pub fn shanten_description(shanten: i8) -> String {
    match shanten {
        -1 => "complete hand".to_string(),
        0 => "waiting (one tile from winning)".to_string(),
        n if n == i8::MAX => "not reachable with this hand".to_string(),
        n => format!("{} exchanges from waiting", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_tiles;

    #[test]
    fn test_ascii_tiles() {
        assert_eq!(tile_to_ascii(&Tile::suited(Suit::Man, 5)), "5m");
        assert_eq!(tile_to_ascii(&Tile::honor(Honor::White)), "Wh");
    }

    #[test]
    fn test_compact_notation_groups_suits() {
        let tiles = parse_tiles("123m55p11z9s").unwrap();
        assert_eq!(tiles_to_notation(&tiles), "123m55p9s11z");
    }

    #[test]
    fn test_unicode_tiles() {
        assert_eq!(tile_to_unicode(&Tile::suited(Suit::Man, 1)), "🀇 ");
        assert_eq!(tile_to_unicode(&Tile::honor(Honor::East)), "🀀 ");
    }

    #[test]
    fn test_table_tiles_in_order() {
        let mut table = [false; 34];
        table[tile_index(Tile::honor(Honor::East))] = true;
        table[tile_index(Tile::suited(Suit::Man, 1))] = true;
        let tiles = table_tiles(&table);
        assert_eq!(tiles[0], Tile::suited(Suit::Man, 1));
        assert_eq!(tiles[1], Tile::honor(Honor::East));
    }
}
