use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three numbered suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Man, // Characters
    Pin, // Dots
    Sou, // Bamboo
}

/// The seven honor tiles: four winds and three dragons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Honor {
    // Winds
    East,
    South,
    West,
    North,
    // Dragons
    White,
    Green,
    Red,
}

/// A single mahjong tile, one of the 34 distinct symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tile {
    Suited { suit: Suit, rank: u8 }, // rank is 1..9
    Honor(Honor),
}

impl Tile {
    /// Create a numbered tile (e.g., 5-man)
    pub fn suited(suit: Suit, rank: u8) -> Self {
        Tile::Suited { suit, rank }
    }

    /// Create an honor tile
    pub fn honor(honor: Honor) -> Self {
        Tile::Honor(honor)
    }

    /// Is this a numbered (suited) tile?
    pub fn is_numbered(&self) -> bool {
        matches!(self, Tile::Suited { .. })
    }

    /// Is this an honor tile?
    pub fn is_honor(&self) -> bool {
        matches!(self, Tile::Honor(_))
    }

    /// Is this a terminal (1 or 9) or honor?
    pub fn is_terminal_or_honor(&self) -> bool {
        match self {
            Tile::Suited { rank, .. } => *rank == 1 || *rank == 9,
            Tile::Honor(_) => true,
        }
    }

    /// Get the suit if this is a numbered tile
    pub fn suit(&self) -> Option<Suit> {
        match self {
            Tile::Suited { suit, .. } => Some(*suit),
            Tile::Honor(_) => None,
        }
    }

    /// Get the rank (1..9) if this is a numbered tile
    pub fn rank(&self) -> Option<u8> {
        match self {
            Tile::Suited { rank, .. } => Some(*rank),
            Tile::Honor(_) => None,
        }
    }

    /// The tile `delta` steps away in the same suit, if it stays inside
    /// the 1..9 rank range. Honors have no neighbors.
    ///
    /// This is the only sanctioned way to step between adjacent tiles;
    /// it never crosses a suit boundary.
    pub fn neighbor(&self, delta: i8) -> Option<Tile> {
        match self {
            Tile::Suited { suit, rank } => {
                let r = *rank as i8 + delta;
                if (1..=9).contains(&r) {
                    Some(Tile::suited(*suit, r as u8))
                } else {
                    None
                }
            }
            Tile::Honor(_) => None,
        }
    }

    /// The canonical byte code: high nibble is the suit
    /// (1=m, 2=p, 3=s, 4=honor), low nibble is the rank
    /// (1..9 for suits, 1..7 for honors). Stable for persistence.
    pub fn code(&self) -> u8 {
        match self {
            Tile::Suited { suit, rank } => {
                let hi: u8 = match suit {
                    Suit::Man => 1,
                    Suit::Pin => 2,
                    Suit::Sou => 3,
                };
                (hi << 4) | *rank
            }
            Tile::Honor(honor) => 0x40 | (*honor as u8 + 1),
        }
    }

    /// Decode a canonical byte code. Returns None for anything that is
    /// not one of the 34 tile values.
    pub fn from_code(code: u8) -> Option<Tile> {
        let rank = code & 0x0F;
        match code >> 4 {
            1 if (1..=9).contains(&rank) => Some(Tile::suited(Suit::Man, rank)),
            2 if (1..=9).contains(&rank) => Some(Tile::suited(Suit::Pin, rank)),
            3 if (1..=9).contains(&rank) => Some(Tile::suited(Suit::Sou, rank)),
            4 => {
                let honor = match rank {
                    1 => Honor::East,
                    2 => Honor::South,
                    3 => Honor::West,
                    4 => Honor::North,
                    5 => Honor::White,
                    6 => Honor::Green,
                    7 => Honor::Red,
                    _ => return None,
                };
                Some(Tile::honor(honor))
            }
            _ => None,
        }
    }
}

/// Dense index of a tile in the canonical order (0..34).
/// Index 0-8: man 1-9, 9-17: pin 1-9, 18-26: sou 1-9, 27-33: honors.
pub fn tile_index(tile: Tile) -> usize {
    match tile {
        Tile::Suited { suit, rank } => {
            let base = match suit {
                Suit::Man => 0,
                Suit::Pin => 9,
                Suit::Sou => 18,
            };
            base + (rank as usize - 1)
        }
        Tile::Honor(honor) => 27 + honor as usize,
    }
}

/// Convert a dense index back to its tile. Inverse of [`tile_index`].
pub fn tile_from_index(idx: usize) -> Tile {
    if idx < 27 {
        let suit = match idx / 9 {
            0 => Suit::Man,
            1 => Suit::Pin,
            _ => Suit::Sou,
        };
        Tile::suited(suit, (idx % 9) as u8 + 1)
    } else {
        let honor = match idx - 27 {
            0 => Honor::East,
            1 => Honor::South,
            2 => Honor::West,
            3 => Honor::North,
            4 => Honor::White,
            5 => Honor::Green,
            _ => Honor::Red,
        };
        Tile::honor(honor)
    }
}

macro_rules! suited {
    ($suit:ident, $rank:expr) => {
        Tile::Suited {
            suit: Suit::$suit,
            rank: $rank,
        }
    };
}

/// Every distinct tile exactly once, in the canonical iteration order.
/// All tie-breaking in the engines follows this order.
pub const ALL_TILES: [Tile; 34] = [
    suited!(Man, 1),
    suited!(Man, 2),
    suited!(Man, 3),
    suited!(Man, 4),
    suited!(Man, 5),
    suited!(Man, 6),
    suited!(Man, 7),
    suited!(Man, 8),
    suited!(Man, 9),
    suited!(Pin, 1),
    suited!(Pin, 2),
    suited!(Pin, 3),
    suited!(Pin, 4),
    suited!(Pin, 5),
    suited!(Pin, 6),
    suited!(Pin, 7),
    suited!(Pin, 8),
    suited!(Pin, 9),
    suited!(Sou, 1),
    suited!(Sou, 2),
    suited!(Sou, 3),
    suited!(Sou, 4),
    suited!(Sou, 5),
    suited!(Sou, 6),
    suited!(Sou, 7),
    suited!(Sou, 8),
    suited!(Sou, 9),
    Tile::Honor(Honor::East),
    Tile::Honor(Honor::South),
    Tile::Honor(Honor::West),
    Tile::Honor(Honor::North),
    Tile::Honor(Honor::White),
    Tile::Honor(Honor::Green),
    Tile::Honor(Honor::Red),
];

/// The 13 terminal and honor tiles targeted by the thirteen-orphans shape.
pub const THIRTEEN_ORPHANS: [Tile; 13] = [
    suited!(Man, 1),
    suited!(Man, 9),
    suited!(Pin, 1),
    suited!(Pin, 9),
    suited!(Sou, 1),
    suited!(Sou, 9),
    Tile::Honor(Honor::East),
    Tile::Honor(Honor::South),
    Tile::Honor(Honor::West),
    Tile::Honor(Honor::North),
    Tile::Honor(Honor::White),
    Tile::Honor(Honor::Green),
    Tile::Honor(Honor::Red),
];

/// The six knitted straights: 1-4-7, 2-5-8 and 3-6-9 distributed one
/// rank class per suit, in every permutation of the three suits.
pub const KNITTED_STRAIGHTS: [[Tile; 9]; 6] = [
    // 147m 258p 369s
    [
        suited!(Man, 1),
        suited!(Man, 4),
        suited!(Man, 7),
        suited!(Pin, 2),
        suited!(Pin, 5),
        suited!(Pin, 8),
        suited!(Sou, 3),
        suited!(Sou, 6),
        suited!(Sou, 9),
    ],
    // 147m 369p 258s
    [
        suited!(Man, 1),
        suited!(Man, 4),
        suited!(Man, 7),
        suited!(Pin, 3),
        suited!(Pin, 6),
        suited!(Pin, 9),
        suited!(Sou, 2),
        suited!(Sou, 5),
        suited!(Sou, 8),
    ],
    // 258m 147p 369s
    [
        suited!(Man, 2),
        suited!(Man, 5),
        suited!(Man, 8),
        suited!(Pin, 1),
        suited!(Pin, 4),
        suited!(Pin, 7),
        suited!(Sou, 3),
        suited!(Sou, 6),
        suited!(Sou, 9),
    ],
    // 258m 369p 147s
    [
        suited!(Man, 2),
        suited!(Man, 5),
        suited!(Man, 8),
        suited!(Pin, 3),
        suited!(Pin, 6),
        suited!(Pin, 9),
        suited!(Sou, 1),
        suited!(Sou, 4),
        suited!(Sou, 7),
    ],
    // 369m 147p 258s
    [
        suited!(Man, 3),
        suited!(Man, 6),
        suited!(Man, 9),
        suited!(Pin, 1),
        suited!(Pin, 4),
        suited!(Pin, 7),
        suited!(Sou, 2),
        suited!(Sou, 5),
        suited!(Sou, 8),
    ],
    // 369m 258p 147s
    [
        suited!(Man, 3),
        suited!(Man, 6),
        suited!(Man, 9),
        suited!(Pin, 2),
        suited!(Pin, 5),
        suited!(Pin, 8),
        suited!(Sou, 1),
        suited!(Sou, 4),
        suited!(Sou, 7),
    ],
];

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tile::Suited { suit, rank } => {
                let s = match suit {
                    Suit::Man => 'm',
                    Suit::Pin => 'p',
                    Suit::Sou => 's',
                };
                write!(f, "{}{}", rank, s)
            }
            Tile::Honor(h) => {
                write!(f, "{}z", *h as u8 + 1)
            }
        }
    }
}
