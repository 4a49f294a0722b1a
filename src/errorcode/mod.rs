//! Reed-Solomon error correction codes.
//!
//! Every Aztec symbol carries two Reed-Solomon protected blocks: the
//! mode message (always over GF(16)) and the payload (over the field
//! matching the symbol's codeword width). Encoding appends `K` check
//! codewords; decoding is syndrome based and runs the classic four
//! steps: syndromes, Berlekamp-Massey for the error locator, Chien
//! search for the locations and Forney's formula for the magnitudes.
//!
//! Codewords are passed around as `u16` slices in descending degree
//! order, the first codeword being the highest power of x.

mod decoding;
mod galois;

pub use decoding::{decode, ErrorDecodingError};
pub use galois::{GaloisError, GaloisField};

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Coefficients of the generator polynomial g(x) = ∏ (x − α^i) for
/// i = 1..=check_len, in descending degree order. The leading
/// coefficient is always 1.
pub fn generator_poly(gf: &GaloisField, check_len: usize) -> Vec<u16> {
    let mut g = Vec::with_capacity(check_len + 1);
    g.push(1u16);
    for i in 1..=check_len {
        let root = gf.exp(i);
        g.push(0);
        // multiply by (x − α^i); in characteristic 2 that is (x + α^i)
        for j in (1..g.len()).rev() {
            let scaled = gf.mul(g[j - 1], root);
            g[j] = gf.add(g[j], scaled);
        }
    }
    g
}

/// Compute the `check_len` Reed-Solomon check codewords for `data`.
///
/// The check part is the remainder of data(x) · x^K divided by the
/// generator polynomial. The division never materialises the quotient:
/// each incoming codeword determines the factor that clears the current
/// top term, and the remainder register shifts one place per step.
pub fn encode_check(gf: &GaloisField, data: &[u16], check_len: usize) -> Vec<u16> {
    let g = generator_poly(gf, check_len);
    let mut rem = vec![0u16; check_len];
    for &d in data {
        let factor = gf.add(rem[0], d);
        for j in 0..check_len {
            let next = if j + 1 < check_len { rem[j + 1] } else { 0 };
            rem[j] = gf.add(next, gf.mul(factor, g[j + 1]));
        }
    }
    rem
}

#[test]
fn generator_poly_gf16() {
    // worked out by hand from the GF(16) log table
    let gf = GaloisField::for_word_size(4);
    assert_eq!(generator_poly(gf, 5), vec![1, 11, 4, 6, 2, 1]);
    assert_eq!(generator_poly(gf, 1), vec![1, 2]);
}

#[test]
fn generator_poly_is_monic_with_expected_roots() {
    for word_size in [4, 6, 8, 10, 12] {
        let gf = GaloisField::for_word_size(word_size);
        let g = generator_poly(gf, 6);
        assert_eq!(g.len(), 7);
        assert_eq!(g[0], 1);
        for i in 1..=6 {
            let x = gf.exp(i);
            let value = g.iter().fold(0, |acc, &c| gf.add(gf.mul(acc, x), c));
            assert_eq!(value, 0, "α^{i} is not a root");
        }
    }
}

#[test]
fn remainder_of_single_codeword() {
    // x divided by (x + α) leaves remainder α
    let gf = GaloisField::for_word_size(4);
    assert_eq!(encode_check(gf, &[1], 1), vec![2]);
    // zero data has a zero remainder, padded to length
    assert_eq!(encode_check(gf, &[0, 0, 0], 5), vec![0; 5]);
}

#[test]
fn encoded_word_is_divisible_by_generator() {
    let gf = GaloisField::for_word_size(6);
    let data = [9u16, 50, 1, 41, 47, 2];
    let check = encode_check(gf, &data, 7);
    assert_eq!(check.len(), 7);
    // data ++ check evaluates to zero at every generator root
    let codeword: Vec<u16> = data.iter().chain(check.iter()).cloned().collect();
    for i in 1..=7 {
        let x = gf.exp(i);
        let value = codeword.iter().fold(0, |acc, &c| gf.add(gf.mul(acc, x), c));
        assert_eq!(value, 0);
    }
}
