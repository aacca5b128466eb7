//! Sequence codec
//!
//! Packs nucleotide strings into 2 bits per symbol.
//!
//! ## Packed Format
//! ```text
//!   bit  7 6   5 4   3 2   1 0
//!       ┌─────┬─────┬─────┬─────┐
//!       │ s0  │ s1  │ s2  │ s3  │    A=00 C=01 G=10 T=11
//!       └─────┴─────┴─────┴─────┘
//! ```
//! A trailing partial group leaves its unused low bits zero, so the packed
//! bytes alone do not carry the symbol count; callers keep it in a `Handle`.

/// Symbols packed into one byte
pub const SYMBOLS_PER_BYTE: usize = 4;

const ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Number of bytes needed to pack `length` symbols
pub fn packed_len(length: usize) -> usize {
    length.div_ceil(SYMBOLS_PER_BYTE)
}

/// Check that a sequence is non-empty and uses only A, C, G and T
pub fn is_valid_sequence(sequence: &str) -> bool {
    !sequence.is_empty() && sequence.bytes().all(|b| ALPHABET.contains(&b))
}

/// Encode a sequence into packed bytes
///
/// Symbols outside the alphabet contribute zero bits; input is expected to
/// be validated upstream.
pub fn encode(sequence: &str) -> Vec<u8> {
    let symbols = sequence.as_bytes();
    let mut packed = vec![0u8; packed_len(symbols.len())];

    for (i, &symbol) in symbols.iter().enumerate() {
        let code = match symbol {
            b'A' => 0b00,
            b'C' => 0b01,
            b'G' => 0b10,
            b'T' => 0b11,
            _ => continue,
        };
        let shift = 6 - 2 * (i % SYMBOLS_PER_BYTE);
        packed[i / SYMBOLS_PER_BYTE] |= code << shift;
    }

    packed
}

/// Decode `length` symbols from packed bytes
///
/// Reads at most as many symbols as `bytes` holds.
pub fn decode(bytes: &[u8], length: usize) -> String {
    let length = length.min(bytes.len() * SYMBOLS_PER_BYTE);
    let mut sequence = String::with_capacity(length);

    for i in 0..length {
        let shift = 6 - 2 * (i % SYMBOLS_PER_BYTE);
        let code = (bytes[i / SYMBOLS_PER_BYTE] >> shift) & 0b11;
        sequence.push(ALPHABET[code as usize] as char);
    }

    sequence
}
