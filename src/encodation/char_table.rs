//! Static character, latch and shift tables for the five text modes.
//!
//! Every table in this module is a direct transcription of the Aztec
//! code tables: per-mode character codes, the two-byte punctuation
//! pairs, and the codes that switch modes either permanently (latch)
//! or for a single character (shift). Code 0 is special everywhere:
//! a shift to punctuation in Upper, Lower, Mixed and Digit, and the
//! FLG(n) escape inside punctuation mode.

use flagset::{flags, FlagSet};

flags! {
    /// The five character modes. Digit codes are 4 bits wide, all
    /// other modes use 5 bits.
    pub enum Mode: u8 {
        Upper,
        Lower,
        Mixed,
        Punct,
        Digit,
    }
}

/// All modes in a fixed order, usable as array index via [`Mode::index`].
pub const ALL_MODES: [Mode; 5] = [Mode::Upper, Mode::Lower, Mode::Mixed, Mode::Punct, Mode::Digit];

/// FLG(n) lives on code 0 of punctuation mode.
pub const FLG_CODE: (u8, usize) = (0, 5);

/// Characters on punctuation codes 6..=30.
const PUNCT_CHARS: &[u8; 25] = b"!\"#$%&'()*+,-./:;<=>?[]{}";

/// Characters on mixed codes 20..=27.
const MIXED_HIGH: [u8; 8] = [b'@', b'\\', b'^', b'_', b'`', b'|', b'~', 0x7F];

impl Mode {
    pub fn bit_width(self) -> usize {
        match self {
            Mode::Digit => 4,
            _ => 5,
        }
    }

    /// Fixed position between 0 and 4, used to index per-mode arrays.
    pub fn index(self) -> usize {
        match self {
            Mode::Upper => 0,
            Mode::Lower => 1,
            Mode::Mixed => 2,
            Mode::Punct => 3,
            Mode::Digit => 4,
        }
    }
}

/// The code for `byte` when read directly in `mode`, if it has one.
pub fn char_code(mode: Mode, byte: u8) -> Option<u8> {
    let code = match (mode, byte) {
        (Mode::Upper | Mode::Lower | Mode::Mixed | Mode::Digit, b' ') => 1,
        (Mode::Upper, b'A'..=b'Z') => byte - b'A' + 2,
        (Mode::Lower, b'a'..=b'z') => byte - b'a' + 2,
        (Mode::Mixed, 0x01..=0x0D) => byte + 1,
        (Mode::Mixed, 0x1B..=0x1F) => byte - 0x1B + 15,
        (Mode::Mixed, _) => MIXED_HIGH.iter().position(|&c| c == byte)? as u8 + 20,
        (Mode::Punct, b'\r') => 1,
        (Mode::Punct, _) => PUNCT_CHARS.iter().position(|&c| c == byte)? as u8 + 6,
        (Mode::Digit, b'0'..=b'9') => byte - b'0' + 2,
        (Mode::Digit, b',') => 12,
        (Mode::Digit, b'.') => 13,
        _ => return None,
    };
    Some(code)
}

/// The punctuation code for a two-byte pair, if the pair has one.
pub fn pair_code(b1: u8, b2: u8) -> Option<u8> {
    match (b1, b2) {
        (b'\r', b'\n') => Some(2),
        (b'.', b' ') => Some(3),
        (b',', b' ') => Some(4),
        (b':', b' ') => Some(5),
        _ => None,
    }
}

/// A decoded character code: most map to one byte, the punctuation
/// pairs to two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Byte(u8),
    Pair(u8, u8),
}

/// Inverse of [`char_code`] / [`pair_code`]. `None` for codes that are
/// mode switches rather than characters.
pub fn code_to_char(mode: Mode, code: u8) -> Option<Decoded> {
    use Decoded::{Byte, Pair};
    let decoded = match (mode, code) {
        (Mode::Upper | Mode::Lower | Mode::Mixed | Mode::Digit, 1) => Byte(b' '),
        (Mode::Upper, 2..=27) => Byte(b'A' + code - 2),
        (Mode::Lower, 2..=27) => Byte(b'a' + code - 2),
        (Mode::Mixed, 2..=14) => Byte(code - 1),
        (Mode::Mixed, 15..=19) => Byte(code - 15 + 0x1B),
        (Mode::Mixed, 20..=27) => Byte(MIXED_HIGH[code as usize - 20]),
        (Mode::Punct, 1) => Byte(b'\r'),
        (Mode::Punct, 2) => Pair(b'\r', b'\n'),
        (Mode::Punct, 3) => Pair(b'.', b' '),
        (Mode::Punct, 4) => Pair(b',', b' '),
        (Mode::Punct, 5) => Pair(b':', b' '),
        (Mode::Punct, 6..=30) => Byte(PUNCT_CHARS[code as usize - 6]),
        (Mode::Digit, 2..=11) => Byte(b'0' + code - 2),
        (Mode::Digit, 12) => Byte(b','),
        (Mode::Digit, 13) => Byte(b'.'),
        _ => return None,
    };
    Some(decoded)
}

/// Which modes can encode `byte` directly.
pub fn modes_for_byte(byte: u8) -> FlagSet<Mode> {
    let mut modes = FlagSet::default();
    for &mode in &ALL_MODES {
        if char_code(mode, byte).is_some() {
            modes |= mode;
        }
    }
    modes
}

/// The code and width for a permanent switch from `from` to `to`,
/// where a single latch exists. Multi-step routes (like upper to
/// punctuation via mixed) are chains of these.
pub fn latch(from: Mode, to: Mode) -> Option<(u8, usize)> {
    let (code, width) = match (from, to) {
        (Mode::Upper, Mode::Lower) => (28, 5),
        (Mode::Upper, Mode::Mixed) => (29, 5),
        (Mode::Upper, Mode::Digit) => (30, 5),
        (Mode::Lower, Mode::Mixed) => (29, 5),
        (Mode::Lower, Mode::Digit) => (30, 5),
        (Mode::Mixed, Mode::Lower) => (28, 5),
        (Mode::Mixed, Mode::Upper) => (29, 5),
        (Mode::Mixed, Mode::Punct) => (30, 5),
        (Mode::Punct, Mode::Upper) => (31, 5),
        (Mode::Digit, Mode::Upper) => (14, 4),
        _ => return None,
    };
    Some((code, width))
}

/// The code and width for a one-character switch from `from` to `to`.
pub fn shift(from: Mode, to: Mode) -> Option<(u8, usize)> {
    let (code, width) = match (from, to) {
        (Mode::Upper | Mode::Lower | Mode::Mixed, Mode::Punct) => (0, 5),
        (Mode::Digit, Mode::Punct) => (0, 4),
        (Mode::Lower, Mode::Upper) => (28, 5),
        (Mode::Digit, Mode::Upper) => (15, 4),
        _ => return None,
    };
    Some((code, width))
}

/// The binary-shift code for `mode`. Punctuation and digit mode have
/// none; the encoder latches to upper first.
pub fn binary_shift_code(mode: Mode) -> Option<(u8, usize)> {
    match mode {
        Mode::Upper | Mode::Lower | Mode::Mixed => Some((31, 5)),
        Mode::Punct | Mode::Digit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn codes_round_trip_through_both_tables() {
        for &mode in &ALL_MODES {
            for byte in 0..=255u8 {
                if let Some(code) = char_code(mode, byte) {
                    assert_eq!(code_to_char(mode, code), Some(Decoded::Byte(byte)));
                }
            }
        }
        for (pair, code) in [
            ((b'\r', b'\n'), 2),
            ((b'.', b' '), 3),
            ((b',', b' '), 4),
            ((b':', b' '), 5),
        ] {
            assert_eq!(pair_code(pair.0, pair.1), Some(code));
            assert_eq!(
                code_to_char(Mode::Punct, code),
                Some(Decoded::Pair(pair.0, pair.1))
            );
        }
    }

    #[test]
    fn known_code_values() {
        assert_eq!(char_code(Mode::Upper, b'H'), Some(9));
        assert_eq!(char_code(Mode::Upper, b' '), Some(1));
        assert_eq!(char_code(Mode::Lower, b'z'), Some(27));
        assert_eq!(char_code(Mode::Digit, b'1'), Some(3));
        assert_eq!(char_code(Mode::Mixed, 0x1D), Some(17));
        assert_eq!(char_code(Mode::Punct, b'!'), Some(6));
        assert_eq!(char_code(Mode::Punct, b'}'), Some(30));
        assert_eq!(char_code(Mode::Punct, b'a'), None);
    }

    #[test]
    fn byte_mode_membership() {
        assert_eq!(modes_for_byte(b' ').bits().count_ones(), 4);
        assert!(!modes_for_byte(b' ').contains(Mode::Punct));
        assert_eq!(modes_for_byte(b'A'), FlagSet::from(Mode::Upper));
        assert_eq!(modes_for_byte(b','), Mode::Punct | Mode::Digit);
        assert!(modes_for_byte(0x00).is_empty());
        assert!(modes_for_byte(0x80).is_empty());
        assert!(modes_for_byte(0xFF).is_empty());
    }

    #[test]
    fn switch_table_widths() {
        assert_eq!(latch(Mode::Upper, Mode::Digit), Some((30, 5)));
        assert_eq!(latch(Mode::Digit, Mode::Upper), Some((14, 4)));
        assert_eq!(latch(Mode::Upper, Mode::Punct), None);
        assert_eq!(latch(Mode::Lower, Mode::Upper), None);
        assert_eq!(shift(Mode::Digit, Mode::Punct), Some((0, 4)));
        assert_eq!(shift(Mode::Lower, Mode::Upper), Some((28, 5)));
        assert_eq!(shift(Mode::Upper, Mode::Digit), None);
        assert_eq!(binary_shift_code(Mode::Mixed), Some((31, 5)));
        assert_eq!(binary_shift_code(Mode::Digit), None);
    }
}
