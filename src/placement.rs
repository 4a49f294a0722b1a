//! Arrangement of bits in an Aztec symbol.
//!
//! Both directions of the codec need the same geometry: where the
//! bull's eye rings, orientation marks, mode message and reference grid
//! sit, and in which order the data spiral visits its modules. The
//! encoder walks these positions to write bits, the decoder walks them
//! to read bits, so everything position related lives here once.
//!
//! Coordinates are computed relative to the centre module. Data
//! positions for full symbols are generated in a grid-less space and
//! then stepped past the reference grid rows and columns, fifteen data
//! offsets fitting between consecutive grid lines.

use crate::bit_matrix::BitMatrix;
use crate::symbol_size::SymbolSize;
use crate::DecodeError;

/// Mode message ring positions, clockwise from the top edge.
///
/// Compact symbols use seven modules per side. Full symbols use ten,
/// split in two runs of five around the reference grid cell in the
/// middle of each side.
pub(crate) fn mode_message_positions(compact: bool, center: usize) -> Vec<(usize, usize)> {
    let c = center as i32;
    let h: i32 = if compact { 5 } else { 7 };
    let offsets: Vec<i32> = if compact {
        (-3..=3).collect()
    } else {
        (-5..=5).filter(|&i| i != 0).collect()
    };

    let mut positions = Vec::with_capacity(4 * offsets.len());
    for &i in &offsets {
        positions.push(((c + i) as usize, (c - h) as usize)); // top, left to right
    }
    for &i in &offsets {
        positions.push(((c + h) as usize, (c + i) as usize)); // right, downwards
    }
    for &i in offsets.iter().rev() {
        positions.push(((c + i) as usize, (c + h) as usize)); // bottom, right to left
    }
    for &i in offsets.iter().rev() {
        positions.push(((c - h) as usize, (c + i) as usize)); // left, upwards
    }
    positions
}

/// Step a grid-less offset past the reference grid lines at ±16k.
fn grid_offset(d: i32) -> i32 {
    let a = d.abs();
    (a + (a - 1).div_euclid(15)) * d.signum()
}

/// The data spiral: layer positions from the outermost layer inwards,
/// one entry per stored bit.
///
/// Each layer is a two-module thick ring, visited block by block
/// (top, right, bottom, left), emitting the outer module before the
/// inner one at every step. In full symbols the centre row and column
/// belong to the reference grid and are skipped, as are the grid lines
/// further out (by coordinate stepping).
pub(crate) fn data_positions(symbol: &SymbolSize) -> Vec<(usize, usize)> {
    let c = (symbol.side() / 2) as i32;
    let compact = symbol.is_compact();
    let half = symbol.half_core() as i32;

    let mut positions = Vec::with_capacity(symbol.total_bits());
    {
        let mut emit = |u: i32, v: i32| {
            if !compact && (u == 0 || v == 0) {
                return;
            }
            let (du, dv) = if compact {
                (u, v)
            } else {
                (grid_offset(u), grid_offset(v))
            };
            positions.push(((c + du) as usize, (c + dv) as usize));
        };

        for k in (1..=symbol.layers() as i32).rev() {
            let o = half + 2 * (k - 1) + 2;
            let i = o - 1;
            for x in -o..=o - 2 {
                emit(x, -o);
                emit(x, -i);
            }
            for y in -o..=o - 2 {
                emit(o, y);
                emit(i, y);
            }
            for x in (-o + 2..=o).rev() {
                emit(x, o);
                emit(x, i);
            }
            for y in (-o + 2..=o).rev() {
                emit(-o, y);
                emit(-i, y);
            }
        }
    }
    debug_assert_eq!(positions.len(), symbol.total_bits());
    positions
}

/// Draw the bull's eye, orientation marks and (for full symbols) the
/// reference grid.
pub(crate) fn draw_function_patterns(matrix: &mut BitMatrix, symbol: &SymbolSize) {
    let side = symbol.side();
    let c = (side / 2) as i32;
    let h = symbol.half_core() as i32;
    let set = |m: &mut BitMatrix, x: i32, y: i32, v: bool| m.set(x as usize, y as usize, v);

    if !symbol.is_compact() {
        // reference grid: alternating modules on all rows and columns
        // 16k from the centre, leaving the finder core alone
        for y in 0..side as i32 {
            for x in 0..side as i32 {
                let (dx, dy) = (x - c, y - c);
                if dx.rem_euclid(16) != 0 && dy.rem_euclid(16) != 0 {
                    continue;
                }
                if dx.abs().max(dy.abs()) < h {
                    continue;
                }
                set(matrix, x, y, (dx + dy).rem_euclid(2) == 0);
            }
        }
    }

    // bull's eye, ring by ring
    let rings = if symbol.is_compact() { 4 } else { 6 };
    for ring in 0..=rings {
        let dark = ring % 2 == 0;
        for i in -ring..=ring {
            set(matrix, c + i, c - ring, dark);
            set(matrix, c + i, c + ring, dark);
            set(matrix, c - ring, c + i, dark);
            set(matrix, c + ring, c + i, dark);
        }
    }

    // orientation marks on the mode message ring corners; the bottom
    // right corner stays light
    for (dx, dy) in [(-h, -h), (-h + 1, -h), (-h, -h + 1)] {
        set(matrix, c + dx, c + dy, true);
    }
    for (dx, dy) in [(h, -h), (h - 1, -h), (h, -h + 1)] {
        set(matrix, c + dx, c + dy, true);
    }
    set(matrix, c - h, c + h, true);
}

fn rings_match(matrix: &BitMatrix, c: i32, rings: i32) -> bool {
    for ring in 0..=rings {
        let dark = ring % 2 == 0;
        for i in -ring..=ring {
            let cells = [
                (c + i, c - ring),
                (c + i, c + ring),
                (c - ring, c + i),
                (c + ring, c + i),
            ];
            if cells
                .iter()
                .any(|&(x, y)| matrix.get(x as usize, y as usize) != dark)
            {
                return false;
            }
        }
    }
    true
}

/// Check the bull's eye and tell the symbol family apart. A full
/// finder has seven rings, a compact one five; the full pattern is
/// checked first since it subsumes the compact one.
pub(crate) fn detect_symbol(matrix: &BitMatrix) -> Result<bool, DecodeError> {
    let (w, h) = matrix.dimensions();
    if w != h || w < 15 {
        return Err(DecodeError::FinderNotFound);
    }
    let c = (w / 2) as i32;
    if !matrix.get(c as usize, c as usize) {
        return Err(DecodeError::FinderNotFound);
    }
    if rings_match(matrix, c, 6) {
        Ok(false)
    } else if rings_match(matrix, c, 4) {
        Ok(true)
    } else {
        Err(DecodeError::FinderNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn all_symbols() -> impl Iterator<Item = SymbolSize> {
        SymbolSize::candidates()
    }

    #[test]
    fn spiral_covers_exactly_the_capacity() {
        for symbol in all_symbols() {
            let positions = data_positions(&symbol);
            assert_eq!(
                positions.len(),
                symbol.total_bits(),
                "capacity mismatch for {symbol:?}"
            );
            let unique: HashSet<_> = positions.iter().collect();
            assert_eq!(unique.len(), positions.len(), "overlap in {symbol:?}");
            let side = symbol.side();
            assert!(positions.iter().all(|&(x, y)| x < side && y < side));
        }
    }

    #[test]
    fn spiral_avoids_the_reference_grid() {
        for symbol in all_symbols().filter(|s| !s.is_compact()) {
            let c = (symbol.side() / 2) as i32;
            for (x, y) in data_positions(&symbol) {
                let (dx, dy) = (x as i32 - c, y as i32 - c);
                assert!(dx.rem_euclid(16) != 0 && dy.rem_euclid(16) != 0);
            }
        }
    }

    #[test]
    fn spiral_starts_at_the_outer_top_left() {
        let symbol = SymbolSize::new(true, 1);
        let positions = data_positions(&symbol);
        // side 15, outermost layer touches the border
        assert_eq!(positions[0], (0, 0));
        assert_eq!(positions[1], (0, 1));
        assert_eq!(positions[2], (1, 0));
    }

    #[test]
    fn mode_message_lengths() {
        assert_eq!(mode_message_positions(true, 7).len(), 28);
        assert_eq!(mode_message_positions(false, 15).len(), 40);
    }

    #[test]
    fn mode_message_sits_on_its_ring() {
        for (compact, center) in [(true, 7usize), (false, 15usize)] {
            let h = if compact { 5 } else { 7 };
            let positions = mode_message_positions(compact, center);
            let unique: HashSet<_> = positions.iter().collect();
            assert_eq!(unique.len(), positions.len());
            for &(x, y) in &positions {
                let (dx, dy) = (
                    x as i32 - center as i32,
                    y as i32 - center as i32,
                );
                assert_eq!(dx.abs().max(dy.abs()), h);
                assert!(dx.abs().min(dy.abs()) < h, "corner in mode message");
            }
        }
    }

    #[test]
    fn mode_message_and_data_are_disjoint() {
        for symbol in [SymbolSize::new(true, 2), SymbolSize::new(false, 3)] {
            let center = symbol.side() / 2;
            let mode: HashSet<_> = mode_message_positions(symbol.is_compact(), center)
                .into_iter()
                .collect();
            for position in data_positions(&symbol) {
                assert!(!mode.contains(&position));
            }
        }
    }

    #[test]
    fn function_patterns_are_detected() {
        for symbol in [SymbolSize::new(true, 1), SymbolSize::new(true, 4)] {
            let mut matrix = BitMatrix::square(symbol.side());
            draw_function_patterns(&mut matrix, &symbol);
            assert_eq!(detect_symbol(&matrix), Ok(true));
        }
        for symbol in [SymbolSize::new(false, 1), SymbolSize::new(false, 6)] {
            let mut matrix = BitMatrix::square(symbol.side());
            draw_function_patterns(&mut matrix, &symbol);
            assert_eq!(detect_symbol(&matrix), Ok(false));
        }
    }

    #[test]
    fn blank_matrix_has_no_finder() {
        let matrix = BitMatrix::square(15);
        assert_eq!(detect_symbol(&matrix), Err(DecodeError::FinderNotFound));
    }
}
