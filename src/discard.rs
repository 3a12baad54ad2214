//! Discard enumeration: after drawing a tile, evaluate every possible
//! discard against every enabled winning shape.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

use crate::hand::{Hand, UsefulTable, table_to_tiles, tiles_to_table};
use crate::shanten::{
    basic_shanten, honors_and_knitted_shanten, knitted_straight_shanten, seven_pairs_shanten,
    thirteen_orphans_shanten,
};
use crate::tile::{Tile, tile_from_index, tile_index};

/// One of the five recognized winning shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Basic,
    SevenPairs,
    ThirteenOrphans,
    KnittedStraight,
    HonorsAndKnitted,
}

impl Shape {
    /// Human-readable shape name
    pub fn name(self) -> &'static str {
        match self {
            Shape::Basic => "Basic (4 melds + pair)",
            Shape::SevenPairs => "Seven Pairs",
            Shape::ThirteenOrphans => "Thirteen Orphans",
            Shape::KnittedStraight => "Knitted Straight",
            Shape::HonorsAndKnitted => "Honors and Knitted",
        }
    }

    /// The flag bit selecting this shape
    pub fn flag(self) -> ShapeFlags {
        match self {
            Shape::Basic => ShapeFlags::BASIC,
            Shape::SevenPairs => ShapeFlags::SEVEN_PAIRS,
            Shape::ThirteenOrphans => ShapeFlags::THIRTEEN_ORPHANS,
            Shape::KnittedStraight => ShapeFlags::KNITTED_STRAIGHT,
            Shape::HonorsAndKnitted => ShapeFlags::HONORS_AND_KNITTED,
        }
    }
}

/// A bitset of enabled shapes. A shape is evaluated only when its bit is
/// set and the current tile count supports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeFlags(u8);

impl ShapeFlags {
    pub const NONE: ShapeFlags = ShapeFlags(0);
    pub const BASIC: ShapeFlags = ShapeFlags(1);
    pub const SEVEN_PAIRS: ShapeFlags = ShapeFlags(1 << 1);
    pub const THIRTEEN_ORPHANS: ShapeFlags = ShapeFlags(1 << 2);
    pub const KNITTED_STRAIGHT: ShapeFlags = ShapeFlags(1 << 3);
    pub const HONORS_AND_KNITTED: ShapeFlags = ShapeFlags(1 << 4);
    pub const ALL: ShapeFlags = ShapeFlags(0b1_1111);

    /// Are all of `other`'s bits set?
    pub fn contains(self, other: ShapeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ShapeFlags {
    type Output = ShapeFlags;

    fn bitor(self, rhs: ShapeFlags) -> ShapeFlags {
        ShapeFlags(self.0 | rhs.0)
    }
}

impl Default for ShapeFlags {
    fn default() -> Self {
        ShapeFlags::ALL
    }
}

/// One enumeration result: the shanten and useful set of one shape after
/// one candidate discard
#[derive(Debug, Clone)]
pub struct DiscardResult {
    /// The tile given up (the drawn tile itself on the first round)
    pub discard: Tile,
    /// Which shape this row evaluates
    pub shape: Shape,
    /// Shanten after the discard; -1 when the drawn tile already
    /// completed this shape
    pub shanten: i8,
    /// Tiles that would lower the shanten further
    pub useful: UsefulTable,
}

/// Deliver one result. `drawn_round` marks the first round, where the
/// candidate discard is the drawn tile itself: a shanten of 0 whose
/// useful set contains that tile means the draw had already completed
/// the shape, reported as -1.
fn emit<F>(
    discard: Tile,
    drawn_round: bool,
    shanten: i8,
    useful: UsefulTable,
    shape: Shape,
    callback: &mut F,
) -> bool
where
    F: FnMut(&DiscardResult) -> bool,
{
    let shanten = if drawn_round && shanten == 0 && useful[tile_index(discard)] {
        -1
    } else {
        shanten
    };
    callback(&DiscardResult {
        discard,
        shape,
        shanten,
        useful,
    })
}

/// Evaluate every enabled shape for one candidate discard. Returns false
/// as soon as the callback cancels.
fn enum_one_discard<F>(
    standing: &[Tile],
    discard: Tile,
    shapes: ShapeFlags,
    drawn_round: bool,
    callback: &mut F,
) -> bool
where
    F: FnMut(&DiscardResult) -> bool,
{
    if shapes.contains(ShapeFlags::BASIC) {
        let mut useful = [false; 34];
        let shanten = basic_shanten(standing, Some(&mut useful));
        if !emit(discard, drawn_round, shanten, useful, Shape::Basic, callback) {
            return false;
        }
    }

    if standing.len() == 13 {
        if shapes.contains(ShapeFlags::SEVEN_PAIRS) {
            let mut useful = [false; 34];
            let shanten = seven_pairs_shanten(standing, Some(&mut useful));
            if !emit(discard, drawn_round, shanten, useful, Shape::SevenPairs, callback) {
                return false;
            }
        }

        if shapes.contains(ShapeFlags::THIRTEEN_ORPHANS) {
            let mut useful = [false; 34];
            let shanten = thirteen_orphans_shanten(standing, Some(&mut useful));
            if !emit(discard, drawn_round, shanten, useful, Shape::ThirteenOrphans, callback) {
                return false;
            }
        }

        if shapes.contains(ShapeFlags::HONORS_AND_KNITTED) {
            let mut useful = [false; 34];
            let shanten = honors_and_knitted_shanten(standing, Some(&mut useful));
            if !emit(discard, drawn_round, shanten, useful, Shape::HonorsAndKnitted, callback) {
                return false;
            }
        }
    }

    if standing.len() == 13 || standing.len() == 10 {
        if shapes.contains(ShapeFlags::KNITTED_STRAIGHT) {
            let mut useful = [false; 34];
            let shanten = knitted_straight_shanten(standing, Some(&mut useful));
            if !emit(discard, drawn_round, shanten, useful, Shape::KnittedStraight, callback) {
                return false;
            }
        }
    }

    true
}

/// Enumerate the outcome of every possible discard after drawing
/// `drawn_tile`.
///
/// The first round keeps the hand as it is and treats the drawn tile
/// itself as the discard. Every further round swaps one held tile value
/// for the drawn tile. Per round, one [`DiscardResult`] is delivered for
/// each enabled shape the tile count supports.
///
/// The callback's return value is the sole cancellation mechanism: the
/// first `false` stops the enumeration immediately.
pub fn enum_discards<F>(hand: &Hand, drawn_tile: Tile, shapes: ShapeFlags, mut callback: F)
where
    F: FnMut(&DiscardResult) -> bool,
{
    let standing = &hand.concealed;
    if !enum_one_discard(standing, drawn_tile, shapes, true, &mut callback) {
        return;
    }

    let mut table = tiles_to_table(standing);
    let drawn_idx = tile_index(drawn_tile);

    for idx in 0..34 {
        if table[idx] > 0 && idx != drawn_idx && table[drawn_idx] < 4 {
            table[idx] -= 1;
            table[drawn_idx] += 1;

            let swapped = table_to_tiles(&table);
            let keep_going =
                enum_one_discard(&swapped, tile_from_index(idx), shapes, false, &mut callback);

            table[drawn_idx] -= 1;
            table[idx] += 1;

            if !keep_going {
                return;
            }
        }
    }
}
