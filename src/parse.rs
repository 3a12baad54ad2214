//! Text notation for tiles and hands.
//!
//! Notation:
//! - Numbered tiles: digits followed by a suit letter, `123m456p789s`
//! - Honors (numeric): `1z`=East .. `4z`=North, `5z`=White, `6z`=Green, `7z`=Red
//! - Honors (letters): `e`, `s`, `w`, `n`, `wh`, `g`, `r`
//! - Fixed melds: `(234m)` claimed chow, `(111p)` claimed pung,
//!   `(1111s)` claimed kong, `[1111m]` concealed kong

use crate::hand::Hand;
use crate::meld::{Meld, MeldKind};
use crate::tile::{Honor, Suit, Tile};

/// Try to parse an honor tile from letter notation at the given position.
/// Returns Some((Honor, chars_consumed)) if successful, None otherwise.
/// Supports: e/E (east), s/S (south), w/W (west), n/N (north)
///           wh/Wh/WH (white), g/G (green), r/R (red)
fn try_parse_honor_letter(chars: &[char], pos: usize) -> Option<(Honor, usize)> {
    if pos >= chars.len() {
        return None;
    }

    let ch = chars[pos].to_ascii_lowercase();

    // Check for two-character "wh" (white dragon) first to avoid conflict with "w" (west)
    if ch == 'w' && pos + 1 < chars.len() && chars[pos + 1].to_ascii_lowercase() == 'h' {
        return Some((Honor::White, 2));
    }

    match ch {
        'e' => Some((Honor::East, 1)),
        's' => Some((Honor::South, 1)),
        'w' => Some((Honor::West, 1)),
        'n' => Some((Honor::North, 1)),
        'g' => Some((Honor::Green, 1)),
        'r' => Some((Honor::Red, 1)),
        _ => None,
    }
}

fn honor_from_digit(n: u8) -> Result<Honor, String> {
    match n {
        1 => Ok(Honor::East),
        2 => Ok(Honor::South),
        3 => Ok(Honor::West),
        4 => Ok(Honor::North),
        5 => Ok(Honor::White),
        6 => Ok(Honor::Green),
        7 => Ok(Honor::Red),
        _ => Err(format!("Invalid honor number: {}", n)),
    }
}

/// Parse a run of tile notation with no meld brackets
pub fn parse_tiles(input: &str) -> Result<Vec<Tile>, String> {
    let mut tiles = Vec::new();
    let mut pending: Vec<u8> = Vec::new();

    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '1'..='9' => {
                pending.push(ch.to_digit(10).unwrap() as u8);
            }

            'm' if !pending.is_empty() => {
                for &n in &pending {
                    tiles.push(Tile::suited(Suit::Man, n));
                }
                pending.clear();
            }
            'p' if !pending.is_empty() => {
                for &n in &pending {
                    tiles.push(Tile::suited(Suit::Pin, n));
                }
                pending.clear();
            }
            's' if !pending.is_empty() => {
                for &n in &pending {
                    tiles.push(Tile::suited(Suit::Sou, n));
                }
                pending.clear();
            }

            'z' => {
                for &n in &pending {
                    tiles.push(Tile::honor(honor_from_digit(n)?));
                }
                pending.clear();
            }

            ' ' | '\t' | '\n' => {}

            // Try honor letter notation (e, s, w, n, wh, g, r)
            _ => {
                if !pending.is_empty() {
                    return Err(format!(
                        "Unexpected character '{}' - pending digits need a suit (m/p/s/z)",
                        ch
                    ));
                }

                if let Some((honor, consumed)) = try_parse_honor_letter(&chars, i) {
                    tiles.push(Tile::honor(honor));
                    i += consumed;
                    continue;
                }

                return Err(format!("Unexpected character: {}", ch));
            }
        }
        i += 1;
    }

    if !pending.is_empty() {
        return Err("Trailing numbers without suit suffix".to_string());
    }

    Ok(tiles)
}

/// Parse a single tile (CLI arguments like `-w 5m` or `-w wh`)
pub fn parse_single_tile(input: &str) -> Result<Tile, String> {
    let tiles = parse_tiles(input.trim())?;
    match tiles.as_slice() {
        [tile] => Ok(*tile),
        _ => Err(format!("Expected a single tile, got '{}'", input.trim())),
    }
}

/// Classify the tiles inside a meld bracket
fn meld_from_tiles(tiles: &[Tile], concealed: bool) -> Result<Meld, String> {
    let offer = if concealed { 0 } else { 1 };
    match tiles.len() {
        3 => {
            if tiles.iter().all(|&t| t == tiles[0]) {
                return Ok(Meld::pung(tiles[0]).from_offer(offer));
            }

            // A chow: three consecutive tiles of one suit, anchored on the middle
            let mut sorted = tiles.to_vec();
            sorted.sort();
            let is_chow = sorted[0].suit().is_some()
                && sorted.iter().all(|t| t.suit() == sorted[0].suit())
                && sorted[0].neighbor(1) == Some(sorted[1])
                && sorted[1].neighbor(1) == Some(sorted[2]);
            if is_chow {
                Ok(Meld::chow(sorted[1]).from_offer(offer))
            } else {
                Err("A 3-tile meld must be a pung or a consecutive chow".to_string())
            }
        }
        4 => {
            if tiles.iter().all(|&t| t == tiles[0]) {
                Ok(Meld::kong(tiles[0]).from_offer(offer))
            } else {
                Err("A kong must have 4 identical tiles".to_string())
            }
        }
        n => Err(format!("A meld must have 3 or 4 tiles, got {}", n)),
    }
}

/// Parse a full hand: concealed tiles plus any bracketed fixed melds
pub fn parse_hand(input: &str) -> Result<Hand, String> {
    let mut melds = Vec::new();
    let mut concealed = Vec::new();

    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut run_start = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '[' | '(' => {
                let run: String = chars[run_start..i].iter().collect();
                concealed.extend(parse_tiles(&run)?);

                let concealed_meld = ch == '[';
                let close = if concealed_meld { ']' } else { ')' };
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && chars[end] != close {
                    end += 1;
                }
                if end >= chars.len() {
                    return Err(format!("Unclosed bracket starting at position {}", i));
                }

                let meld_str: String = chars[start..end].iter().collect();
                let meld_tiles = parse_tiles(&meld_str)?;
                melds.push(meld_from_tiles(&meld_tiles, concealed_meld)?);

                i = end + 1;
                run_start = i;
            }
            ']' | ')' => {
                return Err(format!(
                    "Unexpected closing bracket '{}' at position {}",
                    ch, i
                ));
            }
            _ => {
                i += 1;
            }
        }
    }

    let run: String = chars[run_start..].iter().collect();
    concealed.extend(parse_tiles(&run)?);

    Ok(Hand::new(melds, concealed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_run() {
        let tiles = parse_tiles("123m456p789s11z").unwrap();
        assert_eq!(tiles.len(), 11);
        assert_eq!(tiles[0], Tile::suited(Suit::Man, 1));
        assert_eq!(tiles[9], Tile::honor(Honor::East));
    }

    #[test]
    fn parse_invalid_honor() {
        assert!(parse_tiles("89z").is_err());
    }

    #[test]
    fn parse_trailing_numbers() {
        assert!(parse_tiles("123").is_err());
    }

    // ===== Honor Letter Notation Tests =====

    #[test]
    fn parse_honor_letters() {
        let tiles = parse_tiles("eswnwhgr").unwrap();
        assert_eq!(
            tiles,
            vec![
                Tile::honor(Honor::East),
                Tile::honor(Honor::South),
                Tile::honor(Honor::West),
                Tile::honor(Honor::North),
                Tile::honor(Honor::White),
                Tile::honor(Honor::Green),
                Tile::honor(Honor::Red),
            ]
        );
    }

    #[test]
    fn parse_west_vs_white_disambiguation() {
        let tiles = parse_tiles("wwwhwh").unwrap();
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[0], Tile::honor(Honor::West));
        assert_eq!(tiles[1], Tile::honor(Honor::West));
        assert_eq!(tiles[2], Tile::honor(Honor::White));
        assert_eq!(tiles[3], Tile::honor(Honor::White));
    }

    #[test]
    fn parse_letter_south_vs_sou_suit() {
        // 's' after digits is the bamboo suit, bare 's' is the south wind
        let tiles = parse_tiles("123ss").unwrap();
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[2], Tile::suited(Suit::Sou, 3));
        assert_eq!(tiles[3], Tile::honor(Honor::South));
    }

    #[test]
    fn parse_single_tiles() {
        assert_eq!(
            parse_single_tile("5m").unwrap(),
            Tile::suited(Suit::Man, 5)
        );
        assert_eq!(parse_single_tile("wh").unwrap(), Tile::honor(Honor::White));
        assert!(parse_single_tile("55m").is_err());
        assert!(parse_single_tile("").is_err());
    }

    // ===== Meld Notation Tests =====

    #[test]
    fn parse_hand_with_chow_meld() {
        let hand = parse_hand("(234m)567m99p12345s").unwrap();
        assert_eq!(hand.melds.len(), 1);
        assert_eq!(hand.concealed.len(), 10);

        let meld = hand.melds[0];
        assert_eq!(meld.kind, MeldKind::Chow);
        assert_eq!(meld.tile, Tile::suited(Suit::Man, 3)); // anchored on the middle
        assert_eq!(meld.offer, 1);
    }

    #[test]
    fn parse_hand_with_unsorted_chow() {
        let hand = parse_hand("(423m)567m99p1234s").unwrap();
        assert_eq!(hand.melds[0].tile, Tile::suited(Suit::Man, 3));
    }

    #[test]
    fn parse_hand_with_kongs() {
        let hand = parse_hand("[1111m](5555z)567m99p1s").unwrap();
        assert_eq!(hand.melds.len(), 2);
        assert_eq!(hand.melds[0].kind, MeldKind::Kong);
        assert_eq!(hand.melds[0].offer, 0); // concealed
        assert_eq!(hand.melds[1].kind, MeldKind::Kong);
        assert_eq!(hand.melds[1].tile, Tile::honor(Honor::White));
        assert_eq!(hand.melds[1].offer, 1);
    }

    #[test]
    fn parse_hand_with_letter_honor_pung() {
        let hand = parse_hand("(eee)123m456p99s1s").unwrap();
        assert_eq!(hand.melds[0].kind, MeldKind::Pung);
        assert_eq!(hand.melds[0].tile, Tile::honor(Honor::East));
    }

    #[test]
    fn parse_rejects_bad_melds() {
        assert!(parse_hand("(12m)123m").is_err()); // too short
        assert!(parse_hand("(135m)123m").is_err()); // not consecutive
        assert!(parse_hand("(1234m)123m").is_err()); // kong of mixed tiles
        assert!(parse_hand("(123m123m").is_err()); // unclosed
        assert!(parse_hand(")123m").is_err());
    }
}
