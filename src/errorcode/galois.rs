//! Arithmetic in the Galois fields used by the Reed-Solomon codes.
//!
//! Aztec symbols use five different fields: GF(16) for the mode message
//! and GF(2^p) for p in {6, 8, 10, 12} for the payload, depending on the
//! codeword width of the symbol. An element is represented as a `u16`
//! whose bits are the coefficients of a polynomial over GF(2), reduced
//! modulo a fixed primitive polynomial.
//!
//! With the polynomials chosen here, x (the value 2) generates the
//! multiplicative group: its first 2^p − 1 powers enumerate every
//! non-zero element. Multiplication and division therefore reduce to
//! adding or subtracting discrete logarithms, looked up in two tables
//! that are computed once per field and shared by all callers.

use std::fmt;
use std::sync::LazyLock;

/// Invalid field operation. These indicate corrupted input when they
/// surface during decoding; valid encode paths never hit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaloisError {
    DivisionByZero,
    UndefinedInverse,
    UndefinedLog,
}

impl fmt::Display for GaloisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Self::DivisionByZero => "division by zero field element",
            Self::UndefinedInverse => "zero has no multiplicative inverse",
            Self::UndefinedLog => "discrete log of zero is undefined",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for GaloisError {}

/// One of the finite fields GF(2^p), p in {4, 6, 8, 10, 12}.
pub struct GaloisField {
    word_size: usize,
    /// 2^p − 1, the order of the multiplicative group.
    max: usize,
    exp: Vec<u16>,
    log: Vec<u16>,
}

static GF16: LazyLock<GaloisField> = LazyLock::new(|| GaloisField::new(4, 0b1_0011));
static GF64: LazyLock<GaloisField> = LazyLock::new(|| GaloisField::new(6, 0b100_0011));
static GF256: LazyLock<GaloisField> = LazyLock::new(|| GaloisField::new(8, 0b1_0010_1101));
static GF1024: LazyLock<GaloisField> = LazyLock::new(|| GaloisField::new(10, 0b100_0000_1001));
static GF4096: LazyLock<GaloisField> = LazyLock::new(|| GaloisField::new(12, 0b1_0000_0110_1001));

impl GaloisField {
    /// The field whose elements are `word_size`-bit codewords.
    ///
    /// Panics for a word size no Aztec symbol uses.
    pub fn for_word_size(word_size: usize) -> &'static GaloisField {
        match word_size {
            4 => &GF16,
            6 => &GF64,
            8 => &GF256,
            10 => &GF1024,
            12 => &GF4096,
            _ => panic!("no field defined for {word_size}-bit codewords"),
        }
    }

    fn new(word_size: usize, primitive_poly: u32) -> Self {
        let order = 1usize << word_size;
        let mut exp = vec![0u16; order - 1];
        let mut log = vec![0u16; order];
        let mut p: u32 = 1;
        for (i, e) in exp.iter_mut().enumerate() {
            *e = p as u16;
            log[p as usize] = i as u16;
            p <<= 1;
            if p & order as u32 != 0 {
                p ^= primitive_poly;
                p &= order as u32 - 1;
            }
        }
        Self {
            word_size,
            max: order - 1,
            exp,
            log,
        }
    }

    pub fn word_size(&self) -> usize {
        self.word_size
    }

    /// Addition is coefficient-wise, so XOR. Every element is its own
    /// additive inverse, which makes subtraction the same operation.
    pub fn add(&self, a: u16, b: u16) -> u16 {
        a ^ b
    }

    pub fn sub(&self, a: u16, b: u16) -> u16 {
        self.add(a, b)
    }

    pub fn mul(&self, a: u16, b: u16) -> u16 {
        if a == 0 || b == 0 {
            return 0;
        }
        let i = self.log[a as usize] as usize + self.log[b as usize] as usize;
        self.exp[i % self.max]
    }

    pub fn div(&self, a: u16, b: u16) -> Result<u16, GaloisError> {
        if b == 0 {
            return Err(GaloisError::DivisionByZero);
        }
        if a == 0 {
            return Ok(0);
        }
        let i = self.max + self.log[a as usize] as usize - self.log[b as usize] as usize;
        Ok(self.exp[i % self.max])
    }

    pub fn inv(&self, a: u16) -> Result<u16, GaloisError> {
        if a == 0 {
            return Err(GaloisError::UndefinedInverse);
        }
        let i = self.max - self.log[a as usize] as usize;
        Ok(self.exp[i % self.max])
    }

    pub fn pow(&self, a: u16, n: usize) -> u16 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        self.exp[self.log[a as usize] as usize * n % self.max]
    }

    /// The n-th power of the generator, n taken modulo 2^p − 1.
    pub fn exp(&self, n: usize) -> u16 {
        self.exp[n % self.max]
    }

    pub fn log(&self, a: u16) -> Result<usize, GaloisError> {
        if a == 0 {
            return Err(GaloisError::UndefinedLog);
        }
        Ok(self.log[a as usize] as usize)
    }
}
