//! Conversions between messages, digests and integers

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use crate::types::DecodedMessage;

/// Interpret raw bytes as a big-endian unsigned integer
pub fn bytes_to_integer(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Minimal big-endian encoding of `value` (zero encodes as a single `0x00`)
pub fn integer_to_bytes(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}

/// Encode a text message as the integer of its UTF-8 bytes
pub fn encode_message(message: &str) -> BigUint {
    bytes_to_integer(message.as_bytes())
}

/// SHA-256 of `message`, read as a big-endian integer
pub fn digest_to_integer(message: &[u8]) -> BigUint {
    let hash = Sha256::digest(message);
    bytes_to_integer(&hash)
}

/// Render a plaintext integer as text when every byte is printable ASCII, else as a numeral
pub fn decode_message(value: &BigUint) -> DecodedMessage {
    let bytes = integer_to_bytes(value);

    if bytes.iter().all(|b| (32..=126).contains(b)) {
        // Printable ASCII is valid UTF-8
        if let Ok(text) = String::from_utf8(bytes) {
            return DecodedMessage::Text(text);
        }
    }

    DecodedMessage::Number(value.clone())
}
