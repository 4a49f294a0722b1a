//! Data part de- and encoding (exposure of some internal functionality).
//!
//! The bit stream inside an Aztec symbol is the high-level encodation
//! of the payload bytes, before stuffing and error correction are
//! applied. These functions run that inner layer on its own, which is
//! useful for inspecting mode selection or for building custom symbol
//! pipelines.

use crate::{decodation, encodation};

/// Encode bytes into the high-level bit stream, starting in upper mode.
pub fn encode_data(data: &[u8]) -> Vec<bool> {
    encodation::encode(data)
}

/// Decode a high-level bit stream back into bytes.
///
/// Trailing bits that do not complete a read are treated as padding
/// and ignored.
pub fn decode_data(bits: &[bool]) -> Vec<u8> {
    decodation::decode(bits)
}
