//! Encoding and decoding of Aztec 2D barcodes on binary module grids.
//!
//! The crate covers the data side of the symbology: text compaction
//! over the five character modes, bit stuffing, Reed-Solomon error
//! correction and the symbol layout with its bull's eye finder, mode
//! message and data spiral. Turning a matrix into pixels (or camera
//! pixels into a matrix) is left to its callers; [`decode`] expects an
//! already rectified, canonically oriented module grid.
//!
//! ```
//! use aztec::{decode, encode};
//!
//! let code = encode(b"AZTEC").unwrap();
//! assert!(code.compact());
//! assert_eq!(code.size(), code.matrix().dimensions().0);
//! assert_eq!(decode(code.matrix()).unwrap(), b"AZTEC");
//! ```

mod bit_matrix;
mod bits;
mod decodation;
mod encodation;
pub mod errorcode;
mod placement;
mod symbol_size;

pub mod data;

use std::fmt;

use bits::push_bits;
use errorcode::{ErrorDecodingError, GaloisField};

pub use bit_matrix::BitMatrix;
pub use symbol_size::SymbolSize;

/// Error when building a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// No symbol size fits the data with the requested check share.
    DataTooLarge,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DataTooLarge => f.write_str("data too large for any symbol size"),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Error when reading a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The centre of the matrix holds no valid bull's eye.
    FinderNotFound,
    /// The mode message is unreadable or inconsistent.
    ModeMessageDecodeFailed,
    /// More damaged codewords than the check codewords can repair.
    TooManyErrors,
    /// The matrix is too small for the symbol its mode message claims.
    TruncatedBitstream,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Self::FinderNotFound => "finder pattern not found",
            Self::ModeMessageDecodeFailed => "mode message decoding failed",
            Self::TooManyErrors => "too many errors to correct",
            Self::TruncatedBitstream => "matrix truncates the symbol",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for DecodeError {}

impl From<ErrorDecodingError> for DecodeError {
    fn from(_: ErrorDecodingError) -> Self {
        DecodeError::TooManyErrors
    }
}

/// Options for [`encode_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    /// Share of the symbol's codewords reserved for error correction,
    /// at least three codewords in any case.
    pub error_correction: f32,
    /// Smallest number of data layers to consider.
    pub min_layers: usize,
    /// Force the compact (`Some(true)`) or full (`Some(false)`)
    /// family; `None` picks the smaller fitting symbol.
    pub compact: Option<bool>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            error_correction: 0.23,
            min_layers: 1,
            compact: None,
        }
    }
}

/// A finished Aztec symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    matrix: BitMatrix,
    symbol: SymbolSize,
    data_codewords: usize,
}

impl Code {
    /// The module grid, dark modules reading `true`.
    pub fn matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    pub fn compact(&self) -> bool {
        self.symbol.is_compact()
    }

    pub fn layers(&self) -> usize {
        self.symbol.layers()
    }

    /// Data codeword width in bits (6, 8, 10 or 12).
    pub fn codeword_size(&self) -> usize {
        self.symbol.word_size()
    }

    pub fn data_codewords(&self) -> usize {
        self.data_codewords
    }

    /// Module side length of the square symbol.
    pub fn size(&self) -> usize {
        self.symbol.side()
    }
}

/// Encode `data` with default options.
pub fn encode(data: &[u8]) -> Result<Code, EncodeError> {
    encode_with(data, &EncodeOptions::default())
}

/// Encode `data` into the smallest symbol admitted by `options`.
pub fn encode_with(data: &[u8], options: &EncodeOptions) -> Result<Code, EncodeError> {
    let raw = encodation::encode(data);
    let (symbol, stream) = symbol_size::select_symbol(&raw, options)?;
    let word_size = symbol.word_size();
    let gf = GaloisField::for_word_size(word_size);

    let data_words = bits::to_codewords(&stream, word_size);
    let check_len = symbol.total_codewords() - data_words.len();
    let check_words = errorcode::encode_check(gf, &data_words, check_len);

    // the spiral is filled back to front: zero bits first so the
    // payload ends exactly on the last spiral position
    let mut symbol_bits = vec![false; symbol.total_bits() % word_size];
    symbol_bits.extend(bits::from_codewords(&data_words, word_size));
    symbol_bits.extend(bits::from_codewords(&check_words, word_size));
    debug_assert_eq!(symbol_bits.len(), symbol.total_bits());

    let mut matrix = BitMatrix::square(symbol.side());
    placement::draw_function_patterns(&mut matrix, &symbol);
    let center = symbol.side() / 2;
    let mode_bits = mode_message(&symbol, data_words.len());
    for ((x, y), bit) in placement::mode_message_positions(symbol.is_compact(), center)
        .into_iter()
        .zip(mode_bits)
    {
        matrix.set(x, y, bit);
    }
    for ((x, y), bit) in placement::data_positions(&symbol).into_iter().zip(symbol_bits) {
        matrix.set(x, y, bit);
    }

    Ok(Code {
        matrix,
        symbol,
        data_codewords: data_words.len(),
    })
}

/// Decode a symbol back into the encoded bytes.
///
/// The matrix must be square, sized like an Aztec symbol and in
/// canonical orientation.
pub fn decode(matrix: &BitMatrix) -> Result<Vec<u8>, DecodeError> {
    let compact = placement::detect_symbol(matrix)?;
    let side = matrix.dimensions().0;
    let center = side / 2;

    // mode message: read, correct, split into its two fields
    let mode_bits: Vec<bool> = placement::mode_message_positions(compact, center)
        .into_iter()
        .map(|(x, y)| matrix.get(x, y))
        .collect();
    let mut mode_words = bits::to_codewords(&mode_bits, 4);
    let check_len = if compact { 5 } else { 6 };
    let gf16 = GaloisField::for_word_size(4);
    errorcode::decode(gf16, &mut mode_words, check_len)
        .map_err(|_| DecodeError::ModeMessageDecodeFailed)?;
    let field_bits = bits::from_codewords(&mode_words[..mode_words.len() - check_len], 4);

    let mut reader = bits::BitReader::new(&field_bits);
    let (layer_bits, word_bits) = if compact { (2, 6) } else { (5, 11) };
    let layers = reader.take(layer_bits).unwrap() + 1;
    let words_field = reader.take(word_bits).unwrap();
    let data_words = (words_field + 1) & ((1 << word_bits) - 1);

    let symbol = SymbolSize::new(compact, layers);
    if symbol.side() != side {
        return Err(DecodeError::TruncatedBitstream);
    }
    if data_words > symbol.total_codewords() {
        return Err(DecodeError::ModeMessageDecodeFailed);
    }

    // payload: spiral bits, minus the alignment prefix, through error
    // correction, unstuffing and text decodation
    let word_size = symbol.word_size();
    let spiral_bits: Vec<bool> = placement::data_positions(&symbol)
        .into_iter()
        .map(|(x, y)| matrix.get(x, y))
        .collect();
    let prefix = symbol.total_bits() % word_size;
    let mut codewords = bits::to_codewords(&spiral_bits[prefix..], word_size);
    let gf = GaloisField::for_word_size(word_size);
    errorcode::decode(gf, &mut codewords, symbol.total_codewords() - data_words)?;

    let stuffed = bits::from_codewords(&codewords[..data_words], word_size);
    let unstuffed = bits::unstuff(&stuffed, word_size);
    Ok(decodation::decode(&unstuffed))
}

/// The mode message: layer count and data codeword count, both stored
/// minus one, Reed-Solomon protected over GF(16). 28 bits for compact
/// symbols, 40 for full ones.
fn mode_message(symbol: &SymbolSize, data_words: usize) -> Vec<bool> {
    let (layer_bits, word_bits) = symbol.mode_field_widths();
    let mask = (1 << word_bits) - 1;
    let mut field_bits = Vec::with_capacity(layer_bits + word_bits);
    push_bits(&mut field_bits, symbol.layers() - 1, layer_bits);
    push_bits(&mut field_bits, data_words.wrapping_sub(1) & mask, word_bits);

    let words = bits::to_codewords(&field_bits, 4);
    let gf16 = GaloisField::for_word_size(4);
    let check = errorcode::encode_check(gf16, &words, symbol.mode_check_words());

    let mut out = bits::from_codewords(&words, 4);
    out.extend(bits::from_codewords(&check, 4));
    out
}
