//! Symbol families, sizing formulas and automatic symbol selection.
//!
//! Aztec has two families: compact symbols with 1..=4 data layers
//! around a small bull's eye, and full symbols with 1..=32 layers, a
//! larger bull's eye and a reference grid. Everything about a symbol
//! (module side length, codeword width, bit capacity) derives from the
//! family and the layer count.

use crate::bits;
use crate::{EncodeError, EncodeOptions};

/// One concrete symbol geometry: family plus layer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolSize {
    compact: bool,
    layers: usize,
}

impl SymbolSize {
    pub(crate) fn new(compact: bool, layers: usize) -> Self {
        debug_assert!(layers >= 1 && layers <= if compact { 4 } else { 32 });
        Self { compact, layers }
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Module side length.
    pub fn side(&self) -> usize {
        if self.compact {
            11 + 4 * self.layers
        } else {
            let grid_growth = (self.layers.saturating_sub(4) + 14) / 15;
            27 + 4 * self.layers + 2 * grid_growth
        }
    }

    /// Width of a data codeword in bits, which also picks the payload's
    /// Reed-Solomon field.
    pub fn word_size(&self) -> usize {
        match (self.compact, self.layers) {
            (true, 1..=2) | (false, 1..=2) => 6,
            (true, _) | (false, 3..=8) => 8,
            (false, 9..=22) => 10,
            (false, _) => 12,
        }
    }

    /// Bit capacity of the data spiral.
    pub fn total_bits(&self) -> usize {
        if self.compact {
            (88 + 16 * self.layers) * self.layers
        } else {
            (112 + 16 * self.layers) * self.layers
        }
    }

    /// Number of codewords (data plus check) the symbol holds.
    pub fn total_codewords(&self) -> usize {
        self.total_bits() / self.word_size()
    }

    /// Finder core half-width: the mode message ring sits at this
    /// offset from the centre.
    pub(crate) fn half_core(&self) -> usize {
        if self.compact {
            5
        } else {
            7
        }
    }

    /// Bits of the layer and codeword-count fields in the mode message.
    pub(crate) fn mode_field_widths(&self) -> (usize, usize) {
        if self.compact {
            (2, 6)
        } else {
            (5, 11)
        }
    }

    /// Check codewords protecting the mode message (always GF(16)).
    pub(crate) fn mode_check_words(&self) -> usize {
        if self.compact {
            5
        } else {
            6
        }
    }

    /// All symbols, smallest module side first.
    pub(crate) fn candidates() -> impl Iterator<Item = SymbolSize> {
        let compact = (1..=4).map(|layers| SymbolSize::new(true, layers));
        let full = (1..=32).map(|layers| SymbolSize::new(false, layers));
        compact.chain(full)
    }
}

/// Pick the smallest symbol that fits `raw_bits` with the requested
/// check-codeword share, and return it with the stuffed and padded
/// stream. The stream depends only on the codeword width, so it is
/// reused across candidates of equal width.
pub(crate) fn select_symbol(
    raw_bits: &[bool],
    options: &EncodeOptions,
) -> Result<(SymbolSize, Vec<bool>), EncodeError> {
    let mut stuffed: Option<(usize, Vec<bool>)> = None;

    for symbol in SymbolSize::candidates() {
        if symbol.layers() < options.min_layers {
            continue;
        }
        if let Some(compact) = options.compact {
            if symbol.is_compact() != compact {
                continue;
            }
        }

        let word_size = symbol.word_size();
        if stuffed.as_ref().map(|&(w, _)| w) != Some(word_size) {
            let mut stream = bits::stuff(raw_bits, word_size);
            bits::pad(&mut stream, word_size);
            stuffed = Some((word_size, stream));
        }
        let stream = &stuffed.as_ref().unwrap().1;

        let data_words = stream.len() / word_size;
        let total_words = symbol.total_codewords();
        let Some(check_words) = total_words.checked_sub(data_words) else {
            continue;
        };
        let required = ((total_words as f32 * options.error_correction).ceil() as usize).max(3);
        if check_words < required {
            continue;
        }
        // the codeword count must fit its mode message field; the
        // all-ones field value is taken by the empty symbol
        if data_words >= 1 << symbol.mode_field_widths().1 {
            continue;
        }
        return Ok((symbol, stream.clone()));
    }
    Err(EncodeError::DataTooLarge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compact_table() {
        let sides = [15, 19, 23, 27];
        let word_sizes = [6, 6, 8, 8];
        let total_bits = [104, 250, 408, 608];
        for layers in 1..=4 {
            let symbol = SymbolSize::new(true, layers);
            assert_eq!(symbol.side(), sides[layers - 1]);
            assert_eq!(symbol.word_size(), word_sizes[layers - 1]);
            assert_eq!(symbol.total_bits(), total_bits[layers - 1]);
        }
    }

    #[test]
    fn full_table() {
        for layers in 1..=32 {
            let symbol = SymbolSize::new(false, layers);
            let expected_word_size = match layers {
                1..=2 => 6,
                3..=8 => 8,
                9..=22 => 10,
                _ => 12,
            };
            assert_eq!(symbol.word_size(), expected_word_size);
            assert_eq!(symbol.total_bits(), (112 + 16 * layers) * layers);
        }
        assert_eq!(SymbolSize::new(false, 1).side(), 31);
        assert_eq!(SymbolSize::new(false, 4).side(), 43);
        // the reference grid widens the symbol from five layers up
        assert_eq!(SymbolSize::new(false, 5).side(), 49);
        assert_eq!(SymbolSize::new(false, 19).side(), 105);
        assert_eq!(SymbolSize::new(false, 20).side(), 111);
        assert_eq!(SymbolSize::new(false, 32).side(), 159);
    }

    #[test]
    fn candidates_grow_monotonically() {
        let sides: Vec<usize> = SymbolSize::candidates().map(|s| s.side()).collect();
        assert_eq!(sides.len(), 36);
        for pair in sides.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn selection_prefers_smallest_side() {
        let bits = vec![false; 30];
        let (symbol, stream) = select_symbol(&bits, &EncodeOptions::default()).unwrap();
        assert_eq!(symbol, SymbolSize::new(true, 1));
        assert_eq!(stream.len() % symbol.word_size(), 0);
    }

    #[test]
    fn selection_honours_min_layers_and_family() {
        let bits = vec![false; 30];
        let options = EncodeOptions {
            min_layers: 3,
            ..EncodeOptions::default()
        };
        let (symbol, _) = select_symbol(&bits, &options).unwrap();
        assert_eq!(symbol, SymbolSize::new(true, 3));

        let options = EncodeOptions {
            compact: Some(false),
            ..EncodeOptions::default()
        };
        let (symbol, _) = select_symbol(&bits, &options).unwrap();
        assert_eq!(symbol, SymbolSize::new(false, 1));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        // more raw bits than the largest compact symbol can hold
        let bits = vec![false; 20_000];
        let options = EncodeOptions {
            compact: Some(true),
            ..EncodeOptions::default()
        };
        assert_eq!(
            select_symbol(&bits, &options),
            Err(EncodeError::DataTooLarge)
        );
    }
}
