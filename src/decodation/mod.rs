//! Data decodation. This comes after error correction and bit unstuffing.
//!
//! It performs the inverse of the `encodation` module: the bit stream is
//! read code by code, tracking the active mode through latches, shifts,
//! binary shifts and the FLG(n) escape. Trailing padding cannot be told
//! apart from data by length alone, so running out of bits mid-read is
//! the regular end of the stream, not an error.

use crate::bits::BitReader;
use crate::encodation::char_table::{self as table, Decoded, Mode, ALL_MODES};

enum Op {
    Character(Decoded),
    Latch(Mode),
    Shift(Mode),
    Binary,
    Flg,
    /// A code with no meaning in this mode; nothing is emitted.
    Skip,
}

fn classify(mode: Mode, code: u8) -> Op {
    if mode == Mode::Punct && code == table::FLG_CODE.0 {
        return Op::Flg;
    }
    if table::binary_shift_code(mode).map(|(c, _)| c) == Some(code) {
        return Op::Binary;
    }
    for &target in &ALL_MODES {
        if table::shift(mode, target).map(|(c, _)| c) == Some(code) {
            return Op::Shift(target);
        }
        if table::latch(mode, target).map(|(c, _)| c) == Some(code) {
            return Op::Latch(target);
        }
    }
    match table::code_to_char(mode, code) {
        Some(decoded) => Op::Character(decoded),
        None => Op::Skip,
    }
}

fn push(out: &mut Vec<u8>, decoded: Decoded) {
    match decoded {
        Decoded::Byte(b) => out.push(b),
        Decoded::Pair(a, b) => {
            out.push(a);
            out.push(b);
        }
    }
}

/// Decode a high-level bit stream back into bytes, starting in upper
/// mode.
pub(crate) fn decode(bits: &[bool]) -> Vec<u8> {
    let mut reader = BitReader::new(bits);
    let mut out = Vec::new();
    let mut mode = Mode::Upper;

    while let Some(code) = reader.take(mode.bit_width()) {
        let ok = match classify(mode, code as u8) {
            Op::Character(decoded) => {
                push(&mut out, decoded);
                true
            }
            Op::Latch(to) => {
                mode = to;
                true
            }
            Op::Shift(to) => read_shifted(&mut reader, to, &mut out),
            Op::Binary => read_binary(&mut reader, &mut out),
            Op::Flg => read_flg(&mut reader, &mut out),
            Op::Skip => true,
        };
        if !ok {
            break;
        }
    }
    out
}

/// One character in the shifted-to mode, then back to the saved mode.
fn read_shifted(reader: &mut BitReader, target: Mode, out: &mut Vec<u8>) -> bool {
    let Some(code) = reader.take(target.bit_width()) else {
        return false;
    };
    if target == Mode::Punct && code as u8 == table::FLG_CODE.0 {
        return read_flg(reader, out);
    }
    if let Some(decoded) = table::code_to_char(target, code as u8) {
        push(out, decoded);
    }
    true
}

fn read_binary(reader: &mut BitReader, out: &mut Vec<u8>) -> bool {
    let Some(len) = reader.take(5) else {
        return false;
    };
    let len = if len == 0 {
        // extended form for runs longer than 31 bytes
        match reader.take(11) {
            Some(extension) => extension + 31,
            None => return false,
        }
    } else {
        len
    };
    for _ in 0..len {
        let Some(byte) = reader.take(8) else {
            return false;
        };
        out.push(byte as u8);
    }
    true
}

/// FLG(n): n = 0 is a group separator byte, n in 1..=6 announces that
/// many ECI digit codes, which are read over and dropped. n = 7 is
/// reserved and ignored.
fn read_flg(reader: &mut BitReader, out: &mut Vec<u8>) -> bool {
    let Some(n) = reader.take(3) else {
        return false;
    };
    match n {
        0 => out.push(0x1D),
        1..=6 => {
            if reader.take(4 * n).is_none() {
                return false;
            }
        }
        _ => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::push_bits;
    use crate::encodation;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(b"HELLO WORLD" as &[u8])]
    #[test_case(b"hello")]
    #[test_case(b"12345")]
    #[test_case(b"")]
    #[test_case(b"Punct. Pairs, and: pairs")]
    #[test_case(b"mixed CASE 123, \x1b\x07~|")]
    #[test_case(b"3.14159265358979")]
    #[test_case(b"http://example.com/?q=aztec")]
    fn encode_decode_round_trip(data: &[u8]) {
        assert_eq!(decode(&encodation::encode(data)), data);
    }

    #[test]
    fn binary_round_trips() {
        let mut data: Vec<u8> = (0u8..=255).collect();
        data.extend(b" interleaved TEXT ");
        data.extend(vec![0xEE; 60]);
        assert_eq!(decode(&encodation::encode(&data)), data);
    }

    #[test]
    fn flg_zero_yields_group_separator() {
        // shift to punctuation, FLG(0)
        let mut bits = Vec::new();
        push_bits(&mut bits, 0, 5);
        push_bits(&mut bits, 0, 5);
        push_bits(&mut bits, 0, 3);
        assert_eq!(decode(&bits), vec![0x1D]);
    }

    #[test]
    fn flg_eci_digits_are_skipped() {
        // latch U→M→P, FLG(2) with two digit codes, then 'A' after
        // latching back up
        let mut bits = Vec::new();
        for (code, width) in [(29, 5), (30, 5), (0, 5), (2, 3), (3, 4), (4, 4), (31, 5), (2, 5)] {
            push_bits(&mut bits, code, width);
        }
        assert_eq!(decode(&bits), b"A");
    }

    #[test]
    fn truncated_stream_ends_silently() {
        let mut bits = encodation::encode(b"WORDS");
        bits.truncate(12); // mid-code
        assert_eq!(decode(&bits), b"WO");
    }

    #[test]
    fn padding_ones_decode_to_nothing() {
        let mut bits = encodation::encode(b"AB");
        for _ in 0..5 {
            bits.push(true);
        }
        // the all-ones tail reads as a binary shift whose length field
        // runs off the stream
        assert_eq!(decode(&bits), b"AB");
    }
}
