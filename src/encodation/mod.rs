//! High-level encodation of a byte stream into the five-mode bit stream.
//!
//! Aztec text compaction switches between five character modes with
//! latch codes (permanent) and shift codes (one character), has special
//! five-bit codes for frequent two-byte punctuation, and falls back to
//! a binary shift for bytes no mode covers. Rather than scanning
//! greedily with a look-ahead, the encoder runs a shortest-path search
//! over the (position, mode) graph: per input byte every candidate
//! (direct code, shifted code, punctuation pair) is an edge, and latch
//! transitions are relaxed within each position until settled. The
//! cheapest path measured in emitted bits wins, and multi-step latch
//! routes (upper to punctuation via mixed, lower to upper via digit)
//! fall out of the relaxation on their own.

pub(crate) mod char_table;

use arrayvec::ArrayVec;

use crate::bits::push_bits;
use self::char_table::{Mode, ALL_MODES};

/// Longest run a single binary shift can cover: a 5-bit length, or the
/// extended 11-bit form holding length minus 31.
const MAX_BINARY_RUN: usize = 31 + 2047;

#[derive(Debug, Clone, Copy)]
enum Emit {
    /// One code read directly in the state's mode.
    Char { mode: Mode, code: u8 },
    /// A shift followed by one code in the shifted-to mode.
    Shifted { target: Mode, code: u8 },
    /// A binary shift covering `len` input bytes.
    Binary { len: usize },
}

#[derive(Debug, Clone, Copy)]
enum Link {
    Start,
    /// Latched over from another mode at the same input position.
    Latch { from: Mode },
    /// Consumed input starting at `pos` in mode `from`.
    Step { pos: usize, from: Mode, emit: Emit },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    cost: usize,
    link: Link,
}

/// Encode `data` as an Aztec high-level bit stream, starting in upper
/// mode. The result is minimal in bit count over all mode plans.
pub(crate) fn encode(data: &[u8]) -> Vec<bool> {
    let mut dp: Vec<[Option<Node>; 5]> = vec![[None; 5]; data.len() + 1];
    dp[0][Mode::Upper.index()] = Some(Node {
        cost: 0,
        link: Link::Start,
    });

    for pos in 0..=data.len() {
        relax_latches(&mut dp[pos]);
        if pos == data.len() {
            break;
        }
        let byte = data[pos];
        if char_table::modes_for_byte(byte).is_empty() {
            binary_edges(data, &mut dp, pos);
        } else {
            character_edges(data, &mut dp, pos);
        }
    }

    let end = &dp[data.len()];
    let final_mode = ALL_MODES
        .iter()
        .copied()
        .min_by_key(|m| end[m.index()].map(|n| n.cost).unwrap_or(usize::MAX))
        .unwrap();
    emit(data, &dp, final_mode)
}

/// Settle permanent mode switches within one position. Only strict
/// improvements are taken, so the loop terminates.
fn relax_latches(column: &mut [Option<Node>; 5]) {
    loop {
        let mut changed = false;
        for &from in &ALL_MODES {
            let Some(node) = column[from.index()] else {
                continue;
            };
            for &to in &ALL_MODES {
                let Some((_, width)) = char_table::latch(from, to) else {
                    continue;
                };
                let cost = node.cost + width;
                if column[to.index()].map_or(true, |n| cost < n.cost) {
                    column[to.index()] = Some(Node {
                        cost,
                        link: Link::Latch { from },
                    });
                    changed = true;
                }
            }
        }
        if !changed {
            return;
        }
    }
}

fn offer(slot: &mut Option<Node>, node: Node) {
    if slot.map_or(true, |n| node.cost < n.cost) {
        *slot = Some(node);
    }
}

/// Edges for a byte at least one mode can encode: direct codes, shifted
/// codes and the two-byte punctuation pairs.
fn character_edges(data: &[u8], dp: &mut [[Option<Node>; 5]], pos: usize) {
    let byte = data[pos];
    let pair = data
        .get(pos + 1)
        .and_then(|&next| char_table::pair_code(byte, next));

    for &mode in &ALL_MODES {
        let Some(node) = dp[pos][mode.index()] else {
            continue;
        };

        if let Some(code) = char_table::char_code(mode, byte) {
            let step = Node {
                cost: node.cost + mode.bit_width(),
                link: Link::Step {
                    pos,
                    from: mode,
                    emit: Emit::Char { mode, code },
                },
            };
            offer(&mut dp[pos + 1][mode.index()], step);
        }

        for &target in &ALL_MODES {
            let Some((_, shift_width)) = char_table::shift(mode, target) else {
                continue;
            };
            if let Some(code) = char_table::char_code(target, byte) {
                let step = Node {
                    cost: node.cost + shift_width + target.bit_width(),
                    link: Link::Step {
                        pos,
                        from: mode,
                        emit: Emit::Shifted { target, code },
                    },
                };
                offer(&mut dp[pos + 1][mode.index()], step);
            }
        }

        if let Some(code) = pair {
            if mode == Mode::Punct {
                let step = Node {
                    cost: node.cost + Mode::Punct.bit_width(),
                    link: Link::Step {
                        pos,
                        from: mode,
                        emit: Emit::Char {
                            mode: Mode::Punct,
                            code,
                        },
                    },
                };
                offer(&mut dp[pos + 2][mode.index()], step);
            } else if let Some((_, shift_width)) = char_table::shift(mode, Mode::Punct) {
                let step = Node {
                    cost: node.cost + shift_width + Mode::Punct.bit_width(),
                    link: Link::Step {
                        pos,
                        from: mode,
                        emit: Emit::Shifted {
                            target: Mode::Punct,
                            code,
                        },
                    },
                };
                offer(&mut dp[pos + 2][mode.index()], step);
            }
        }
    }
}

/// Edge over the maximal run of bytes without a direct code anywhere.
/// Modes without a binary shift latch to upper first and stay there.
fn binary_edges(data: &[u8], dp: &mut [[Option<Node>; 5]], pos: usize) {
    let run = data[pos..]
        .iter()
        .take_while(|&&b| char_table::modes_for_byte(b).is_empty())
        .count()
        .min(MAX_BINARY_RUN);
    let length_bits = if run > 31 { 5 + 11 } else { 5 };

    for &mode in &ALL_MODES {
        let Some(node) = dp[pos][mode.index()] else {
            continue;
        };
        let (header, end_mode) = binary_header(mode);
        let header_bits: usize = header.iter().map(|&(_, w)| w).sum();
        let step = Node {
            cost: node.cost + header_bits + length_bits + 8 * run,
            link: Link::Step {
                pos,
                from: mode,
                emit: Emit::Binary { len: run },
            },
        };
        offer(&mut dp[pos + run][end_mode.index()], step);
    }
}

/// The codes announcing a binary shift from `mode`, and the mode left
/// active afterwards.
fn binary_header(mode: Mode) -> (ArrayVec<[(u8, usize); 2]>, Mode) {
    let mut header = ArrayVec::new();
    let end_mode = match char_table::binary_shift_code(mode) {
        Some(code) => {
            header.push(code);
            mode
        }
        None => {
            header.push(char_table::latch(mode, Mode::Upper).unwrap());
            header.push(char_table::binary_shift_code(Mode::Upper).unwrap());
            Mode::Upper
        }
    };
    (header, end_mode)
}

/// Walk the winning path backwards, then write its bits.
fn emit(data: &[u8], dp: &[[Option<Node>; 5]], final_mode: Mode) -> Vec<bool> {
    let mut path = Vec::new();
    let mut pos = data.len();
    let mut mode = final_mode;
    loop {
        let node = dp[pos][mode.index()].expect("broken encodation path");
        match node.link {
            Link::Start => break,
            Link::Latch { from } => {
                path.push((mode, node.link));
                mode = from;
            }
            Link::Step { pos: from_pos, from, .. } => {
                path.push((mode, node.link));
                pos = from_pos;
                mode = from;
            }
        }
    }
    path.reverse();

    let mut bits = Vec::new();
    for (to_mode, link) in path {
        match link {
            Link::Start => unreachable!(),
            Link::Latch { from } => {
                let (code, width) = char_table::latch(from, to_mode).unwrap();
                push_bits(&mut bits, code as usize, width);
            }
            Link::Step { pos, from, emit } => match emit {
                Emit::Char { mode, code } => {
                    push_bits(&mut bits, code as usize, mode.bit_width());
                }
                Emit::Shifted { target, code } => {
                    let (shift_code, shift_width) = char_table::shift(from, target).unwrap();
                    push_bits(&mut bits, shift_code as usize, shift_width);
                    push_bits(&mut bits, code as usize, target.bit_width());
                }
                Emit::Binary { len } => {
                    let (header, _) = binary_header(from);
                    for (code, width) in header {
                        push_bits(&mut bits, code as usize, width);
                    }
                    if len > 31 {
                        push_bits(&mut bits, 0, 5);
                        push_bits(&mut bits, len - 31, 11);
                    } else {
                        push_bits(&mut bits, len, 5);
                    }
                    for &byte in &data[pos..pos + len] {
                        push_bits(&mut bits, byte as usize, 8);
                    }
                }
            },
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codes(seq: &[(usize, usize)]) -> Vec<bool> {
        let mut bits = Vec::new();
        for &(width, code) in seq {
            push_bits(&mut bits, code, width);
        }
        bits
    }

    #[test]
    fn upper_text_is_all_direct_codes() {
        let expected: Vec<(usize, usize)> = [9, 6, 13, 13, 16, 1, 24, 16, 19, 13, 5]
            .iter()
            .map(|&c| (5, c))
            .collect();
        assert_eq!(encode(b"HELLO WORLD"), codes(&expected));
    }

    #[test]
    fn lowercase_latches_once() {
        let expected: Vec<(usize, usize)> =
            [28, 9, 6, 13, 13, 16].iter().map(|&c| (5, c)).collect();
        assert_eq!(encode(b"hello"), codes(&expected));
    }

    #[test]
    fn digits_latch_to_digit_mode() {
        let mut expected = vec![(5usize, 30usize)];
        expected.extend([3, 4, 5, 6, 7].iter().map(|&c| (4, c)));
        assert_eq!(encode(b"12345"), codes(&expected));
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(encode(b""), Vec::<bool>::new());
    }

    #[test]
    fn punctuation_pair_beats_two_characters() {
        // ". " costs one shifted punctuation code, not two characters
        let bits = encode(b"A. B");
        let expected = codes(&[(5, 2), (5, 0), (5, 3), (5, 3)]);
        assert_eq!(bits, expected);
    }

    #[test]
    fn unmapped_byte_takes_binary_shift() {
        let expected = codes(&[(5, 31), (5, 1), (8, 0x80)]);
        assert_eq!(encode(&[0x80]), expected);
    }

    #[test]
    fn binary_shift_from_digit_latches_to_upper() {
        let mut expected = codes(&[(5, 30), (4, 3)]);
        expected.extend(codes(&[(4, 14), (5, 31), (5, 1), (8, 0x00)]));
        assert_eq!(encode(&[b'1', 0x00]), expected);
    }

    #[test]
    fn long_binary_run_uses_extended_length() {
        let payload = vec![0xAAu8; 100];
        let bits = encode(&payload);
        let mut expected = codes(&[(5, 31), (5, 0), (11, 100 - 31)]);
        for _ in 0..100 {
            push_bits(&mut expected, 0xAA, 8);
        }
        assert_eq!(bits, expected);
    }

    #[test]
    fn mixed_case_uses_shift_for_single_upper() {
        // one capital inside lowercase text: shift, no latch chain
        let bits = encode(b"abCd");
        let expected = codes(&[(5, 28), (5, 2), (5, 3), (5, 28), (5, 4), (5, 5)]);
        assert_eq!(bits, expected);
    }
}
