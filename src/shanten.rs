//! Shanten, waiting and winning engines for the five Chinese Official
//! winning shapes.
//!
//! Shanten is the minimum number of tile exchanges needed to reach a
//! winning hand:
//! - Shanten = -1: complete (winning) hand
//! - Shanten = 0: waiting (one tile away from winning)
//! - Shanten = 1+: that many exchanges away
//!
//! All engines work on the 34-slot count table. The table is mutated in
//! place during recursion and restored on every return path; callers
//! always get their table back bit-for-bit.

use crate::hand::{TileTable, UsefulTable, tiles_to_table};
use crate::tile::{KNITTED_STRAIGHTS, THIRTEEN_ORPHANS, Tile, tile_index};

/// Sentinel returned for invalid inputs (wrong tile counts, impossible
/// multiplicities). Never produced for a legal hand.
pub const SHANTEN_INVALID: i8 = i8::MAX;

/// At most 7 groups of two tiles fit in a 14-tile hand
const MAX_UNITS: usize = 7;
/// Cap on remembered search paths; sufficient for any legal 13-tile input
const MAX_PATHS: usize = 256;

/// Kind nibble of a search-path unit. Discriminants are part of the
/// unit's identity, so they must stay distinct and stable.
#[derive(Clone, Copy)]
#[repr(u16)]
enum UnitKind {
    Chow = 1,
    Pung = 2,
    Pair = 4,
    EdgeChow = 5,
    ClosedChow = 6,
    PartialPung = 7,
}

/// A search-path unit: kind in the high byte, dense tile index in the low
type PathUnit = u16;

fn make_unit(kind: UnitKind, idx: usize) -> PathUnit {
    ((kind as u16) << 8) | idx as u16
}

/// One branch of the basic-shape search: the units taken so far
#[derive(Clone, Copy)]
struct WorkPath {
    units: [PathUnit; MAX_UNITS],
    depth: usize,
}

impl WorkPath {
    const EMPTY: WorkPath = WorkPath {
        units: [0; MAX_UNITS],
        depth: 0,
    };
}

/// All fully-explored branches, kept as sorted unit sequences so that
/// equivalent configurations reached in a different order are pruned
struct WorkState {
    paths: [WorkPath; MAX_PATHS],
    count: usize,
}

impl WorkState {
    fn new() -> Self {
        WorkState {
            paths: [WorkPath::EMPTY; MAX_PATHS],
            count: 0,
        }
    }
}

/// Multiset inclusion over two ascending-sorted slices: does `sup`
/// contain every element of `sub`, multiplicity included?
fn sorted_includes(sup: &[PathUnit], sub: &[PathUnit]) -> bool {
    let mut i = 0;
    for &x in sub {
        loop {
            if i == sup.len() || sup[i] > x {
                return false;
            }
            if sup[i] == x {
                i += 1;
                break;
            }
            i += 1;
        }
    }
    true
}

/// Has an equivalent branch already been explored? The candidate unit has
/// just been placed at `path.units[path.depth]`; the branch is redundant
/// when some saved path's units are a superset of the candidate prefix.
fn branch_exists(state: &WorkState, fixed_cnt: usize, path: &WorkPath) -> bool {
    if state.count == 0 {
        return false;
    }

    let depth = path.depth + 1;
    let mut sorted = [0 as PathUnit; MAX_UNITS];
    let n = depth - fixed_cnt;
    sorted[..n].copy_from_slice(&path.units[fixed_cnt..depth]);
    sorted[..n].sort_unstable();

    state.paths[..state.count]
        .iter()
        .any(|p| sorted_includes(&p.units[fixed_cnt..p.depth], &sorted[..n]))
}

/// Remember a fully-explored branch, sorted for the inclusion test.
/// Overflow means the 256-path bound was wrong for this input, which is a
/// bug; in release the path is dropped, which only costs pruning.
fn save_path(state: &mut WorkState, fixed_cnt: usize, path: &WorkPath) {
    if state.count < MAX_PATHS {
        let saved = &mut state.paths[state.count];
        saved.depth = path.depth;
        saved.units = path.units;
        saved.units[fixed_cnt..path.depth].sort_unstable();
        state.count += 1;
    } else {
        debug_assert!(false, "work state overflow");
    }
}

/// Does this numbered tile have a within-distance-2 neighbor in the table?
fn has_chow_neighbor(table: &TileTable, idx: usize) -> bool {
    let rank = idx % 9 + 1;
    (rank < 9 && table[idx + 1] > 0)
        || (rank < 8 && table[idx + 2] > 0)
        || (rank > 1 && table[idx - 1] > 0)
        || (rank > 2 && table[idx - 2] > 0)
}

/// The recursive basic-shape search.
///
/// State: the count table, the pair flag, the number of complete groups
/// (`complete`, which starts at the fixed-meld count) and of partial
/// groups (`partial`). Every branch pushes one unit, decrements the
/// table, recurses, and restores both.
fn basic_shanten_recursive(
    table: &mut TileTable,
    fixed_cnt: usize,
    has_pair: bool,
    complete: usize,
    partial: usize,
    path: &mut WorkPath,
    state: &mut WorkState,
) -> i8 {
    if complete == 4 {
        if has_pair {
            return -1;
        }
        // the leftover tiles can still hold the eyes
        if table.iter().any(|&n| n >= 2) {
            return -1;
        }
        return 0;
    }

    // Upper bound reachable from this state
    let need = 4 - complete as i8 - partial as i8;
    let max_ret = if need > 0 {
        partial as i8 + need * 2 - if has_pair { 1 } else { 0 }
    } else {
        (if has_pair { 3 } else { 4 }) - complete as i8
    };

    let depth = complete + partial + has_pair as usize;
    path.depth = depth;

    let mut result = max_ret;

    if complete + partial > 4 {
        // more groups than a hand can use
        save_path(state, fixed_cnt, path);
        return max_ret;
    }

    for idx in 0..34 {
        if table[idx] < 1 {
            continue;
        }

        // Pair
        if !has_pair && table[idx] >= 2 {
            path.units[depth] = make_unit(UnitKind::Pair, idx);
            if branch_exists(state, fixed_cnt, path) {
                continue;
            }

            table[idx] -= 2;
            let ret =
                basic_shanten_recursive(table, fixed_cnt, true, complete, partial, path, state);
            result = result.min(ret);
            table[idx] += 2;
        }

        // Pung
        if table[idx] >= 3 {
            path.units[depth] = make_unit(UnitKind::Pung, idx);
            if branch_exists(state, fixed_cnt, path) {
                continue;
            }

            table[idx] -= 3;
            let ret = basic_shanten_recursive(
                table,
                fixed_cnt,
                has_pair,
                complete + 1,
                partial,
                path,
                state,
            );
            result = result.min(ret);
            table[idx] += 3;
        }

        // Chow (numbered tiles only)
        let numbered = idx < 27;
        let rank = idx % 9 + 1;
        if numbered && rank < 8 && table[idx + 1] > 0 && table[idx + 2] > 0 {
            path.units[depth] = make_unit(UnitKind::Chow, idx);
            if branch_exists(state, fixed_cnt, path) {
                continue;
            }

            table[idx] -= 1;
            table[idx + 1] -= 1;
            table[idx + 2] -= 1;
            let ret = basic_shanten_recursive(
                table,
                fixed_cnt,
                has_pair,
                complete + 1,
                partial,
                path,
                state,
            );
            result = result.min(ret);
            table[idx] += 1;
            table[idx + 1] += 1;
            table[idx + 2] += 1;
        }

        // Once a pair or complete group already improved on the bound,
        // partial groups cannot do better
        if result < max_ret {
            continue;
        }

        // Partial pung
        if table[idx] >= 2 {
            path.units[depth] = make_unit(UnitKind::PartialPung, idx);
            if branch_exists(state, fixed_cnt, path) {
                continue;
            }

            table[idx] -= 2;
            let ret = basic_shanten_recursive(
                table,
                fixed_cnt,
                has_pair,
                complete,
                partial + 1,
                path,
                state,
            );
            result = result.min(ret);
            table[idx] += 2;
        }

        // Partial chows (numbered tiles only)
        if numbered {
            // edge or open-ended shape
            if rank < 9 && table[idx + 1] > 0 {
                path.units[depth] = make_unit(UnitKind::EdgeChow, idx);
                if branch_exists(state, fixed_cnt, path) {
                    continue;
                }

                table[idx] -= 1;
                table[idx + 1] -= 1;
                let ret = basic_shanten_recursive(
                    table,
                    fixed_cnt,
                    has_pair,
                    complete,
                    partial + 1,
                    path,
                    state,
                );
                result = result.min(ret);
                table[idx] += 1;
                table[idx + 1] += 1;
            }
            // closed shape
            if rank < 8 && table[idx + 2] > 0 {
                path.units[depth] = make_unit(UnitKind::ClosedChow, idx);
                if branch_exists(state, fixed_cnt, path) {
                    continue;
                }

                table[idx] -= 1;
                table[idx + 2] -= 1;
                let ret = basic_shanten_recursive(
                    table,
                    fixed_cnt,
                    has_pair,
                    complete,
                    partial + 1,
                    path,
                    state,
                );
                result = result.min(ret);
                table[idx] += 1;
                table[idx + 2] += 1;
            }
        }
    }

    if result == max_ret {
        save_path(state, fixed_cnt, path);
    }

    result
}

/// Basic shanten over a prepared count table. `fixed_cnt` is the number
/// of groups already committed outside the table (fixed melds, or the
/// three melds a knitted straight stands in for).
///
/// When a useful table is supplied its marks are added, never cleared;
/// the public wrappers reset it first.
pub(crate) fn basic_shanten_from_table(
    table: &mut TileTable,
    fixed_cnt: usize,
    mut useful: Option<&mut UsefulTable>,
) -> i8 {
    let mut path = WorkPath::EMPTY;
    let mut state = WorkState::new();
    let result =
        basic_shanten_recursive(table, fixed_cnt, false, fixed_cnt, 0, &mut path, &mut state);

    let Some(useful) = useful.as_deref_mut() else {
        return result;
    };

    // Try every candidate draw and keep those that lower the shanten
    for idx in 0..34 {
        if table[idx] == 4 {
            continue;
        }
        if table[idx] == 0 {
            // an isolated honor or an unconnected numbered tile cannot help
            if idx >= 27 || !has_chow_neighbor(table, idx) {
                continue;
            }
        }

        table[idx] += 1;
        state.count = 0;
        let temp =
            basic_shanten_recursive(table, fixed_cnt, false, fixed_cnt, 0, &mut path, &mut state);
        if temp < result {
            useful[idx] = true;
        }
        table[idx] -= 1;
    }

    result
}

fn valid_standing_counts(standing: &[Tile]) -> Option<TileTable> {
    if !matches!(standing.len(), 1 | 4 | 7 | 10 | 13) {
        return None;
    }
    let table = tiles_to_table(standing);
    if table.iter().any(|&n| n > 4) {
        return None;
    }
    Some(table)
}

/// Shanten of the basic shape: four melds plus a pair.
///
/// `standing` holds the concealed tiles (1, 4, 7, 10 or 13 of them; each
/// fixed meld removes three). When `useful` is supplied it is rewritten
/// with the set of tiles whose draw would lower the shanten.
///
/// Returns [`SHANTEN_INVALID`] for an illegal tile count or multiplicity.
pub fn basic_shanten(standing: &[Tile], mut useful: Option<&mut UsefulTable>) -> i8 {
    let Some(mut table) = valid_standing_counts(standing) else {
        return SHANTEN_INVALID;
    };
    if let Some(u) = useful.as_deref_mut() {
        *u = [false; 34];
    }
    basic_shanten_from_table(&mut table, (13 - standing.len()) / 3, useful)
}

// ===== Basic-shape winning & waiting fast paths =====

/// Leaf: exactly one tile value remains and it forms the pair
fn win_leaf_pair(table: &TileTable) -> bool {
    let mut found_pair = false;
    for &n in table.iter() {
        match n {
            0 => {}
            2 if !found_pair => found_pair = true,
            _ => return false,
        }
    }
    found_pair
}

/// Strip complete pungs and chows; succeed iff the residue is a lone pair
pub(crate) fn is_basic_win_from_table(table: &mut TileTable, left: usize) -> bool {
    if left == 2 {
        return win_leaf_pair(table);
    }

    for idx in 0..34 {
        if table[idx] < 1 {
            continue;
        }

        if table[idx] >= 3 {
            table[idx] -= 3;
            let won = is_basic_win_from_table(table, left - 3);
            table[idx] += 3;
            if won {
                return true;
            }
        }

        let rank = idx % 9 + 1;
        if idx < 27 && rank < 8 && table[idx + 1] > 0 && table[idx + 2] > 0 {
            table[idx] -= 1;
            table[idx + 1] -= 1;
            table[idx + 2] -= 1;
            let won = is_basic_win_from_table(table, left - 3);
            table[idx] += 1;
            table[idx + 1] += 1;
            table[idx + 2] += 1;
            if won {
                return true;
            }
        }
    }

    false
}

/// Does `test_tile` complete the standing tiles into the basic shape?
pub fn is_basic_win(standing: &[Tile], test_tile: Tile) -> bool {
    let Some(mut table) = valid_standing_counts(standing) else {
        return false;
    };
    let idx = tile_index(test_tile);
    if table[idx] >= 4 {
        return false;
    }
    table[idx] += 1;
    is_basic_win_from_table(&mut table, standing.len() + 1)
}

/// Leaf at one tile: a lone-pair wait on that tile
fn wait_leaf_single(table: &TileTable, waiting: &mut Option<&mut UsefulTable>) -> bool {
    let mut found = None;
    for (idx, &n) in table.iter().enumerate() {
        match n {
            0 => {}
            1 if found.is_none() => found = Some(idx),
            _ => return false,
        }
    }
    match found {
        Some(idx) => {
            if let Some(w) = waiting.as_deref_mut() {
                w[idx] = true;
            }
            true
        }
        None => false,
    }
}

/// Leaf at two tiles: a second pair (either pair can become the pung) or
/// a partial chow wait
fn wait_leaf_taatsu(table: &TileTable, waiting: &mut Option<&mut UsefulTable>) -> bool {
    let mut ret = false;
    for idx in 0..34 {
        if table[idx] < 1 {
            continue;
        }

        if table[idx] > 1 {
            match waiting.as_deref_mut() {
                Some(w) => {
                    w[idx] = true;
                    ret = true;
                    continue;
                }
                None => return true,
            }
        }

        if idx < 27 {
            let rank = idx % 9 + 1;
            if rank > 1 && table[idx - 1] > 0 {
                // two adjacent tiles wait on both extensions
                match waiting.as_deref_mut() {
                    Some(w) => {
                        if rank < 9 {
                            w[idx + 1] = true;
                        }
                        if rank > 2 {
                            w[idx - 2] = true;
                        }
                        ret = true;
                        continue;
                    }
                    None => return true,
                }
            }
            if rank > 2 && table[idx - 2] > 0 {
                // gapped tiles wait on the middle
                match waiting.as_deref_mut() {
                    Some(w) => {
                        w[idx - 1] = true;
                        ret = true;
                        continue;
                    }
                    None => return true,
                }
            }
        }
    }
    ret
}

/// Leaf at four tiles: strip one pair as the eyes, then test the rest as
/// a two-tile wait
fn wait_leaf_with_pair(table: &mut TileTable, waiting: &mut Option<&mut UsefulTable>) -> bool {
    let mut ret = false;
    for idx in 0..34 {
        if table[idx] < 2 {
            continue;
        }
        table[idx] -= 2;
        if wait_leaf_taatsu(table, waiting) {
            ret = true;
        }
        table[idx] += 2;
        if ret && waiting.is_none() {
            return true;
        }
    }
    ret
}

/// Strip complete melds recursively; leaves at 1, 2 and 4 tiles decide
/// the wait. With a waiting table the walk continues past the first hit
/// so the table ends up fully populated.
pub(crate) fn is_basic_wait_from_table(
    table: &mut TileTable,
    left: usize,
    waiting: &mut Option<&mut UsefulTable>,
) -> bool {
    if left == 1 {
        return wait_leaf_single(table, waiting);
    }

    let mut ret = false;
    if left == 4 {
        ret = wait_leaf_with_pair(table, waiting);
        if ret && waiting.is_none() {
            return true;
        }
    }

    for idx in 0..34 {
        if table[idx] < 1 {
            continue;
        }

        if table[idx] >= 3 {
            table[idx] -= 3;
            if is_basic_wait_from_table(table, left - 3, waiting) {
                ret = true;
            }
            table[idx] += 3;
            if ret && waiting.is_none() {
                return true;
            }
        }

        let rank = idx % 9 + 1;
        if idx < 27 && rank < 8 && table[idx + 1] > 0 && table[idx + 2] > 0 {
            table[idx] -= 1;
            table[idx + 1] -= 1;
            table[idx + 2] -= 1;
            if is_basic_wait_from_table(table, left - 3, waiting) {
                ret = true;
            }
            table[idx] += 1;
            table[idx + 1] += 1;
            table[idx + 2] += 1;
            if ret && waiting.is_none() {
                return true;
            }
        }
    }

    ret
}

/// Is the hand one tile away from the basic shape? When `waiting` is
/// supplied it is rewritten with every completing tile.
pub fn is_basic_wait(standing: &[Tile], mut waiting: Option<&mut UsefulTable>) -> bool {
    let Some(mut table) = valid_standing_counts(standing) else {
        return false;
    };
    if let Some(w) = waiting.as_deref_mut() {
        *w = [false; 34];
    }
    is_basic_wait_from_table(&mut table, standing.len(), &mut waiting)
}

// ===== Seven pairs =====

/// Seven-pairs shanten: `6 - pairs`, where a tile value contributes at
/// most one pair regardless of multiplicity (a kong is not two pairs).
/// Useful tiles are the singleton values. Requires 13 standing tiles.
pub fn seven_pairs_shanten(standing: &[Tile], mut useful: Option<&mut UsefulTable>) -> i8 {
    if standing.len() != 13 {
        return SHANTEN_INVALID;
    }
    let table = tiles_to_table(standing);
    if table.iter().any(|&n| n > 4) {
        return SHANTEN_INVALID;
    }

    let mut pairs = 0i8;
    for &n in table.iter() {
        if n >= 2 {
            pairs += 1;
        }
    }

    if let Some(u) = useful.as_deref_mut() {
        for idx in 0..34 {
            u[idx] = table[idx] == 1;
        }
    }

    6 - pairs
}

/// Is the hand waiting for seven pairs?
pub fn is_seven_pairs_wait(standing: &[Tile], mut waiting: Option<&mut UsefulTable>) -> bool {
    let mut useful = [false; 34];
    let shanten = if waiting.is_some() {
        seven_pairs_shanten(standing, Some(&mut useful))
    } else {
        seven_pairs_shanten(standing, None)
    };
    if shanten == 0 {
        if let Some(w) = waiting.as_deref_mut() {
            *w = useful;
        }
        true
    } else {
        false
    }
}

/// Does `test_tile` complete seven pairs?
pub fn is_seven_pairs_win(standing: &[Tile], test_tile: Tile) -> bool {
    let mut useful = [false; 34];
    seven_pairs_shanten(standing, Some(&mut useful)) == 0 && useful[tile_index(test_tile)]
}

// ===== Thirteen orphans =====

/// Thirteen-orphans shanten: `12 - distinct targets` once a target pair
/// exists, `13 - distinct targets` otherwise. Requires 13 standing tiles.
pub fn thirteen_orphans_shanten(standing: &[Tile], mut useful: Option<&mut UsefulTable>) -> i8 {
    if standing.len() != 13 {
        return SHANTEN_INVALID;
    }
    let table = tiles_to_table(standing);
    if table.iter().any(|&n| n > 4) {
        return SHANTEN_INVALID;
    }

    let mut distinct = 0i8;
    let mut has_pair = false;
    for &target in &THIRTEEN_ORPHANS {
        let n = table[tile_index(target)];
        if n > 0 {
            distinct += 1;
            if n > 1 {
                has_pair = true;
            }
        }
    }

    if let Some(u) = useful.as_deref_mut() {
        *u = [false; 34];
        for &target in &THIRTEEN_ORPHANS {
            u[tile_index(target)] = true;
        }
        if has_pair {
            // with the pair settled, further copies of held targets are dead
            for &target in &THIRTEEN_ORPHANS {
                if table[tile_index(target)] > 0 {
                    u[tile_index(target)] = false;
                }
            }
        }
    }

    if has_pair { 12 - distinct } else { 13 - distinct }
}

/// Is the hand waiting for thirteen orphans?
pub fn is_thirteen_orphans_wait(standing: &[Tile], mut waiting: Option<&mut UsefulTable>) -> bool {
    let mut useful = [false; 34];
    let shanten = if waiting.is_some() {
        thirteen_orphans_shanten(standing, Some(&mut useful))
    } else {
        thirteen_orphans_shanten(standing, None)
    };
    if shanten == 0 {
        if let Some(w) = waiting.as_deref_mut() {
            *w = useful;
        }
        true
    } else {
        false
    }
}

/// Does `test_tile` complete thirteen orphans?
pub fn is_thirteen_orphans_win(standing: &[Tile], test_tile: Tile) -> bool {
    let mut useful = [false; 34];
    thirteen_orphans_shanten(standing, Some(&mut useful)) == 0 && useful[tile_index(test_tile)]
}

// ===== Knitted straight + melds + pair =====

/// Shanten of one specific knitted straight: its missing tiles, plus the
/// basic shanten of the residue with the straight credited as three
/// completed melds.
fn knitted_shanten_one(
    table: &TileTable,
    straight: &[Tile; 9],
    fixed_cnt: usize,
    mut useful: Option<&mut UsefulTable>,
) -> i8 {
    if let Some(u) = useful.as_deref_mut() {
        *u = [false; 34];
    }

    let mut residue = *table;
    let mut exist = 0i8;
    for &tile in straight {
        let idx = tile_index(tile);
        if residue[idx] > 0 {
            exist += 1;
            residue[idx] -= 1;
        } else if let Some(u) = useful.as_deref_mut() {
            u[idx] = true;
        }
    }

    let rest = basic_shanten_from_table(&mut residue, fixed_cnt + 3, useful);
    (9 - exist) + rest
}

/// Knitted-straight shanten: the best of the six straights, with
/// useful-tile sets merged across ties. Requires 13 or 10 standing tiles.
pub fn knitted_straight_shanten(standing: &[Tile], mut useful: Option<&mut UsefulTable>) -> i8 {
    if !matches!(standing.len(), 13 | 10) {
        return SHANTEN_INVALID;
    }
    let table = tiles_to_table(standing);
    if table.iter().any(|&n| n > 4) {
        return SHANTEN_INVALID;
    }

    if let Some(u) = useful.as_deref_mut() {
        *u = [false; 34];
    }

    let fixed_cnt = (13 - standing.len()) / 3;
    let mut best = SHANTEN_INVALID;
    let mut temp = [false; 34];

    for straight in &KNITTED_STRAIGHTS {
        let st = if useful.is_some() {
            knitted_shanten_one(&table, straight, fixed_cnt, Some(&mut temp))
        } else {
            knitted_shanten_one(&table, straight, fixed_cnt, None)
        };

        if st < best {
            best = st;
            if let Some(u) = useful.as_deref_mut() {
                *u = temp;
            }
        } else if st == best {
            if let Some(u) = useful.as_deref_mut() {
                for idx in 0..34 {
                    u[idx] |= temp[idx];
                }
            }
        }
    }

    best
}

fn knitted_straight_wait_from_table(
    table: &TileTable,
    left: usize,
    waiting: &mut Option<&mut UsefulTable>,
) -> bool {
    // Find the first straight missing at most one tile; two or more
    // missing can never be a wait
    let mut matched: Option<(&[Tile; 9], Option<usize>)> = None;
    for straight in &KNITTED_STRAIGHTS {
        let mut missing_cnt = 0;
        let mut missing_idx = 0;
        for &tile in straight {
            let idx = tile_index(tile);
            if table[idx] == 0 {
                missing_cnt += 1;
                if missing_cnt == 1 {
                    missing_idx = idx;
                }
            }
        }
        if missing_cnt < 2 {
            let missing = (missing_cnt == 1).then_some(missing_idx);
            matched = Some((straight, missing));
            break;
        }
    }

    let Some((straight, missing)) = matched else {
        return false;
    };

    let mut residue = *table;
    for &tile in straight {
        let idx = tile_index(tile);
        if residue[idx] > 0 {
            residue[idx] -= 1;
        }
    }

    match missing {
        // One knitted tile missing: the rest of the hand must already be
        // complete, and the missing tile is the single wait
        Some(missing_idx) => {
            let rest = if left == 10 { 2 } else { 5 };
            if is_basic_win_from_table(&mut residue, rest) {
                if let Some(w) = waiting.as_deref_mut() {
                    w[missing_idx] = true;
                }
                true
            } else {
                false
            }
        }
        // Straight complete: the residue decides the wait
        None => {
            if left == 10 {
                wait_leaf_single(&residue, waiting)
            } else {
                is_basic_wait_from_table(&mut residue, 4, waiting)
            }
        }
    }
}

/// Is the hand waiting for a knitted straight with melds and pair?
pub fn is_knitted_straight_wait(standing: &[Tile], mut waiting: Option<&mut UsefulTable>) -> bool {
    if !matches!(standing.len(), 13 | 10) {
        return false;
    }
    let table = tiles_to_table(standing);
    if table.iter().any(|&n| n > 4) {
        return false;
    }
    if let Some(w) = waiting.as_deref_mut() {
        *w = [false; 34];
    }
    knitted_straight_wait_from_table(&table, standing.len(), &mut waiting)
}

/// Does `test_tile` complete the knitted-straight shape?
pub fn is_knitted_straight_win(standing: &[Tile], test_tile: Tile) -> bool {
    let mut waiting = [false; 34];
    is_knitted_straight_wait(standing, Some(&mut waiting)) && waiting[tile_index(test_tile)]
}

// ===== Honors and knitted tiles =====

/// Shanten for one specific straight: all tiles are singletons drawn from
/// that straight's nine tiles and the seven honors.
fn honors_knitted_shanten_one(
    table: &TileTable,
    straight: &[Tile; 9],
    mut useful: Option<&mut UsefulTable>,
) -> i8 {
    if let Some(u) = useful.as_deref_mut() {
        *u = [false; 34];
    }

    let mut cnt = 0i8;
    for &tile in straight {
        let idx = tile_index(tile);
        if table[idx] > 0 {
            cnt += 1;
        } else if let Some(u) = useful.as_deref_mut() {
            u[idx] = true;
        }
    }
    for idx in 27..34 {
        if table[idx] > 0 {
            cnt += 1;
        } else if let Some(u) = useful.as_deref_mut() {
            u[idx] = true;
        }
    }

    13 - cnt
}

/// Honors-and-knitted shanten (the seven-star variant is the same shape
/// with all seven honors present): best of the six straights, useful sets
/// merged across ties. Requires 13 standing tiles.
pub fn honors_and_knitted_shanten(standing: &[Tile], mut useful: Option<&mut UsefulTable>) -> i8 {
    if standing.len() != 13 {
        return SHANTEN_INVALID;
    }
    let table = tiles_to_table(standing);
    if table.iter().any(|&n| n > 4) {
        return SHANTEN_INVALID;
    }

    if let Some(u) = useful.as_deref_mut() {
        *u = [false; 34];
    }

    let mut best = SHANTEN_INVALID;
    let mut temp = [false; 34];

    for straight in &KNITTED_STRAIGHTS {
        let st = if useful.is_some() {
            honors_knitted_shanten_one(&table, straight, Some(&mut temp))
        } else {
            honors_knitted_shanten_one(&table, straight, None)
        };

        if st < best {
            best = st;
            if let Some(u) = useful.as_deref_mut() {
                *u = temp;
            }
        } else if st == best {
            if let Some(u) = useful.as_deref_mut() {
                for idx in 0..34 {
                    u[idx] |= temp[idx];
                }
            }
        }
    }

    best
}

/// Is the hand waiting for honors-and-knitted?
pub fn is_honors_and_knitted_wait(standing: &[Tile], mut waiting: Option<&mut UsefulTable>) -> bool {
    let mut useful = [false; 34];
    let shanten = if waiting.is_some() {
        honors_and_knitted_shanten(standing, Some(&mut useful))
    } else {
        honors_and_knitted_shanten(standing, None)
    };
    if shanten == 0 {
        if let Some(w) = waiting.as_deref_mut() {
            *w = useful;
        }
        true
    } else {
        false
    }
}

/// Does `test_tile` complete honors-and-knitted?
pub fn is_honors_and_knitted_win(standing: &[Tile], test_tile: Tile) -> bool {
    let mut useful = [false; 34];
    honors_and_knitted_shanten(standing, Some(&mut useful)) == 0 && useful[tile_index(test_tile)]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_single_tile, parse_tiles};
    use crate::tile::ALL_TILES;

    fn tiles(notation: &str) -> Vec<Tile> {
        parse_tiles(notation).unwrap()
    }

    fn tile(notation: &str) -> Tile {
        parse_single_tile(notation).unwrap()
    }

    fn shanten(notation: &str) -> i8 {
        basic_shanten(&tiles(notation), None)
    }

    fn useful_tiles(table: &UsefulTable) -> Vec<Tile> {
        ALL_TILES
            .iter()
            .copied()
            .filter(|&t| table[tile_index(t)])
            .collect()
    }

    // ===== Basic Shanten Tests =====

    #[test]
    fn test_nine_gates_waits_on_everything() {
        // 1112345678999m: the classic nine-sided wait
        let mut useful = [false; 34];
        let s = basic_shanten(&tiles("1112345678999m"), Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("123456789m"));
    }

    #[test]
    fn test_three_sided_wait() {
        // 1234567m with two fixed melds: waits on 1m, 4m and 7m
        let mut useful = [false; 34];
        let s = basic_shanten(&tiles("1234567m"), Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("147m"));
    }

    #[test]
    fn test_pair_wait() {
        // Three melds plus a lone pung wait: 123m 456p 789s 111z + 2z
        let mut useful = [false; 34];
        let s = basic_shanten(&tiles("123m456p789s1112z"), Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("2z"));
    }

    #[test]
    fn test_shanpon_wait() {
        // 123m 456p 789s 11z 22z: either pair can become the pung
        let mut useful = [false; 34];
        let s = basic_shanten(&tiles("123m456p789s1122z"), Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("12z"));
    }

    #[test]
    fn test_disconnected_hand_high_shanten() {
        let s = shanten("147m147p147s1234z");
        assert!((4..=8).contains(&s), "expected high shanten, got {}", s);
    }

    #[test]
    fn test_single_tile_hand() {
        // Four fixed melds, one concealed tile: waiting to pair it
        let mut useful = [false; 34];
        let s = basic_shanten(&tiles("5m"), Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("5m"));
    }

    #[test]
    fn test_invalid_counts_are_rejected() {
        assert_eq!(shanten("12m"), SHANTEN_INVALID);
        assert_eq!(shanten("123m456p789s12345z"), SHANTEN_INVALID); // 14 tiles
        assert_eq!(basic_shanten(&[], None), SHANTEN_INVALID);
    }

    #[test]
    fn test_invalid_input_leaves_useful_untouched() {
        let mut useful = [true; 34];
        assert_eq!(basic_shanten(&tiles("12m"), Some(&mut useful)), SHANTEN_INVALID);
        assert!(useful.iter().all(|&u| u));
    }

    #[test]
    fn test_count_table_is_restored() {
        let mut table = tiles_to_table(&tiles("1123455678999m"));
        let before = table;
        let mut useful = [false; 34];
        basic_shanten_from_table(&mut table, 0, Some(&mut useful));
        assert_eq!(table, before);

        let mut table = tiles_to_table(&tiles("123m456p789s1122z"));
        let before = table;
        is_basic_wait_from_table(&mut table, 13, &mut None);
        assert_eq!(table, before);
    }

    #[test]
    fn test_order_insensitive() {
        let mut forward = tiles("123m456p789s1122z");
        let mut useful_fwd = [false; 34];
        let s_fwd = basic_shanten(&forward, Some(&mut useful_fwd));

        forward.reverse();
        let mut useful_rev = [false; 34];
        let s_rev = basic_shanten(&forward, Some(&mut useful_rev));

        assert_eq!(s_fwd, s_rev);
        assert_eq!(useful_fwd, useful_rev);
    }

    // ===== Basic Win & Wait Tests =====

    #[test]
    fn test_basic_win() {
        assert!(is_basic_win(&tiles("1234567m"), tile("4m")));
        assert!(is_basic_win(&tiles("1234567m"), tile("1m")));
        assert!(is_basic_win(&tiles("1234567m"), tile("7m")));
        assert!(!is_basic_win(&tiles("1234567m"), tile("5m")));

        assert!(is_basic_win(&tiles("123m456p789s1112z"), tile("2z")));
        assert!(!is_basic_win(&tiles("123m456p789s1112z"), tile("3z")));
    }

    #[test]
    fn test_basic_win_lone_pair() {
        assert!(is_basic_win(&tiles("1z"), tile("1z")));
        assert!(!is_basic_win(&tiles("1z"), tile("2z")));
    }

    #[test]
    fn test_basic_wait_populates_table() {
        let mut waiting = [false; 34];
        assert!(is_basic_wait(&tiles("1234567m"), Some(&mut waiting)));
        assert_eq!(useful_tiles(&waiting), tiles("147m"));
    }

    #[test]
    fn test_basic_wait_short_circuit() {
        assert!(is_basic_wait(&tiles("1112345678999m"), None));
        assert!(!is_basic_wait(&tiles("147m147p147s1234z"), None));
    }

    #[test]
    fn test_win_wait_coherence() {
        // is_basic_win(H, t) holds exactly for the tiles the waiting table marks
        for hand in ["1112345678999m", "1234567m", "123m456p789s1122z"] {
            let standing = tiles(hand);
            let mut waiting = [false; 34];
            assert!(is_basic_wait(&standing, Some(&mut waiting)));
            for &t in &ALL_TILES {
                assert_eq!(
                    is_basic_win(&standing, t),
                    waiting[tile_index(t)],
                    "win/wait mismatch for {} on {}",
                    hand,
                    t
                );
            }
        }
    }

    // ===== Seven Pairs Tests =====

    #[test]
    fn test_seven_pairs_wait() {
        let mut useful = [false; 34];
        let s = seven_pairs_shanten(&tiles("1122334455667m"), Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("7m"));
        assert!(is_seven_pairs_wait(&tiles("1122334455667m"), None));
        assert!(is_seven_pairs_win(&tiles("1122334455667m"), tile("7m")));
        assert!(!is_seven_pairs_win(&tiles("1122334455667m"), tile("1m")));
    }

    #[test]
    fn test_seven_pairs_kong_is_one_pair() {
        // 1111m is one pair, not two: five pair values here, shanten 1
        let mut useful = [false; 34];
        let s = seven_pairs_shanten(&tiles("1111223344556m"), Some(&mut useful));
        assert_eq!(s, 1);
        assert_eq!(useful_tiles(&useful), tiles("6m"));
    }

    #[test]
    fn test_seven_pairs_rejects_wrong_count() {
        assert_eq!(seven_pairs_shanten(&tiles("1122m"), None), SHANTEN_INVALID);
    }

    // ===== Thirteen Orphans Tests =====

    #[test]
    fn test_thirteen_orphans_one_away() {
        // Pair of 1m, missing the red dragon
        let standing = tiles("119m19p19s123456z");
        let mut useful = [false; 34];
        let s = thirteen_orphans_shanten(&standing, Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("7z"));
        assert!(is_thirteen_orphans_wait(&standing, None));
        assert!(is_thirteen_orphans_win(&standing, tile("7z")));
        assert!(!is_thirteen_orphans_win(&standing, tile("1m")));
    }

    #[test]
    fn test_thirteen_orphans_thirteen_sided_wait() {
        // All thirteen targets once each: any of them completes the hand
        let standing = tiles("19m19p19s1234567z");
        let mut useful = [false; 34];
        let s = thirteen_orphans_shanten(&standing, Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful).len(), 13);
        assert!(is_thirteen_orphans_win(&standing, tile("9s")));
    }

    #[test]
    fn test_thirteen_orphans_far_away() {
        let s = thirteen_orphans_shanten(&tiles("2345678m234567p"), None);
        assert_eq!(s, 13);
    }

    // ===== Knitted Straight Tests =====

    #[test]
    fn test_knitted_straight_pair_wait() {
        // Full 147m 258p 369s plus EE SS: waiting to pung either pair
        let standing = tiles("147m258p369s1122z");
        let mut useful = [false; 34];
        let s = knitted_straight_shanten(&standing, Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("12z"));

        let mut waiting = [false; 34];
        assert!(is_knitted_straight_wait(&standing, Some(&mut waiting)));
        assert_eq!(useful_tiles(&waiting), tiles("12z"));
        assert!(is_knitted_straight_win(&standing, tile("1z")));
        assert!(is_knitted_straight_win(&standing, tile("2z")));
        assert!(!is_knitted_straight_win(&standing, tile("5m")));
    }

    #[test]
    fn test_knitted_straight_missing_tile_wait() {
        // 147m 258p 36s + 111z EE: only 9s is missing from the straight
        let standing = tiles("147m258p36s11122z");
        let mut waiting = [false; 34];
        assert!(is_knitted_straight_wait(&standing, Some(&mut waiting)));
        assert_eq!(useful_tiles(&waiting), tiles("9s"));
        assert!(is_knitted_straight_win(&standing, tile("9s")));
    }

    #[test]
    fn test_knitted_straight_ten_tiles() {
        // One fixed meld; the nine knitted tiles plus a lone pair tile
        let standing = tiles("147m258p369s1z");
        let mut useful = [false; 34];
        let s = knitted_straight_shanten(&standing, Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("1z"));

        let mut waiting = [false; 34];
        assert!(is_knitted_straight_wait(&standing, Some(&mut waiting)));
        assert_eq!(useful_tiles(&waiting), tiles("1z"));
    }

    #[test]
    fn test_knitted_straight_two_missing_is_not_waiting() {
        let standing = tiles("147m258p3s111222z");
        assert!(!is_knitted_straight_wait(&standing, None));
    }

    #[test]
    fn test_knitted_straight_rejects_wrong_count() {
        assert_eq!(
            knitted_straight_shanten(&tiles("147m258p"), None),
            SHANTEN_INVALID
        );
        assert!(!is_knitted_straight_wait(&tiles("147m258p"), None));
    }

    #[test]
    fn test_knitted_straight_prefers_best_permutation() {
        // 147m 369p 258s is the second permutation; one tile short of it
        // plus a complete set of eyes and a pung
        let standing = tiles("147m369p25s11122z");
        let mut waiting = [false; 34];
        assert!(is_knitted_straight_wait(&standing, Some(&mut waiting)));
        assert_eq!(useful_tiles(&waiting), tiles("8s"));
    }

    // ===== Honors and Knitted Tests =====

    #[test]
    fn test_honors_and_knitted_waiting() {
        // Nine knitted tiles plus four winds: any missing honor completes
        let standing = tiles("147m258p369s1234z");
        let mut useful = [false; 34];
        let s = honors_and_knitted_shanten(&standing, Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("567z"));

        assert!(is_honors_and_knitted_wait(&standing, None));
        assert!(is_honors_and_knitted_win(&standing, tile("5z")));
        assert!(!is_honors_and_knitted_win(&standing, tile("1z")));
    }

    #[test]
    fn test_honors_and_knitted_seven_star_shape() {
        // All seven honors plus six knitted tiles: waits on the last three
        let standing = tiles("147m258p1234567z");
        let mut useful = [false; 34];
        let s = honors_and_knitted_shanten(&standing, Some(&mut useful));
        assert_eq!(s, 0);
        assert_eq!(useful_tiles(&useful), tiles("369s"));
    }

    #[test]
    fn test_honors_and_knitted_duplicates_hurt() {
        // A duplicated honor wastes a slot
        let standing = tiles("147m258p369s1123z");
        let s = honors_and_knitted_shanten(&standing, None);
        assert_eq!(s, 1);
    }

    #[test]
    fn test_honors_and_knitted_rejects_wrong_count() {
        assert_eq!(
            honors_and_knitted_shanten(&tiles("147m"), None),
            SHANTEN_INVALID
        );
    }

    // ===== Cross-Shape Properties =====

    #[test]
    fn test_useful_tiles_actually_reduce_shanten() {
        let standing = tiles("123m456p78s11223z");
        let mut useful = [false; 34];
        let s = basic_shanten(&standing, Some(&mut useful));
        assert_eq!(s, 1);

        for &t in &ALL_TILES {
            if !useful[tile_index(t)] {
                continue;
            }
            let mut with_draw = standing.clone();
            with_draw.push(t);
            // after the draw, the best discard must leave the hand one
            // step closer to winning
            let mut best = SHANTEN_INVALID;
            for drop_pos in 0..with_draw.len() {
                let mut next = with_draw.clone();
                next.remove(drop_pos);
                best = best.min(basic_shanten(&next, None));
            }
            assert!(
                best < s,
                "useful tile {} did not reduce shanten from {}",
                t,
                s
            );
        }
    }

    #[test]
    fn test_shanten_bounds() {
        // 13-tile basic shanten stays within [-1, 8]; it cannot actually
        // reach -1 before the 14th tile
        for hand in [
            "1112345678999m",
            "147m147p147s1234z",
            "1122334455667m",
            "19m19p19s1234567z",
        ] {
            let s = shanten(hand);
            assert!((0..=8).contains(&s), "{} out of bounds: {}", hand, s);
        }
    }
}
