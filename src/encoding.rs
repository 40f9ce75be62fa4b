//! Byte-sequence utilities
//!
//! Big-endian variable-width integers and the one-byte XOR string codec
//! used for every name and text value stored in the dictionary.

/// Key every stored string byte is XORed with
pub const STRING_XOR_KEY: u8 = 0x5A;

/// Decode an unsigned big-endian integer of any width.
///
/// Inputs longer than 8 bytes keep only their low (trailing) 8 bytes.
/// An empty input decodes to 0.
pub fn decode_varuint(bytes: &[u8]) -> u64 {
    let start = bytes.len().saturating_sub(8);
    bytes[start..]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Encode an integer as the shortest big-endian byte string (at least one byte)
pub fn encode_varuint(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take(7).take_while(|&&b| b == 0).count();
    bytes[skip..].to_vec()
}

/// De-obfuscate a stored string
pub fn decode_string(bytes: &[u8]) -> String {
    let plain: Vec<u8> = bytes.iter().map(|b| b ^ STRING_XOR_KEY).collect();
    String::from_utf8_lossy(&plain).into_owned()
}

/// Obfuscate a string the way the file stores it
pub fn encode_string(text: &str) -> Vec<u8> {
    text.bytes().map(|b| b ^ STRING_XOR_KEY).collect()
}

