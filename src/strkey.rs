// ============================================================================
// LUMEN-BRIDGE - StrKey Encoding/Decoding
// ============================================================================
// Stellar "StrKey" account addresses: version byte + raw Ed25519 key + CRC16
// checksum, base32-encoded without padding. A well-formed address is 56
// characters and starts with 'G'.

use crate::error::PaymentError;
use crate::Result;

/// StrKey version byte for account IDs (G... addresses)
const VERSION_ACCOUNT_ID: u8 = 6 << 3;

/// CRC16-CCITT polynomial (XModem variant used by Stellar)
const CRC16_POLY: u16 = 0x1021;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Structural validation of a public-key address.
///
/// Checks prefix, length, base32 alphabet, version byte, and checksum.
/// Performs no network I/O.
pub fn is_valid_address(address: &str) -> bool {
    decode_public_key(address).is_ok()
}

/// Encode raw Ed25519 public key bytes as a Stellar G... address
pub fn encode_public_key(key_bytes: &[u8]) -> Result<String> {
    if key_bytes.len() != 32 {
        return Err(PaymentError::KeyConversionError(format!(
            "Expected 32 bytes, got {}",
            key_bytes.len()
        )));
    }

    // Payload: version byte + key bytes + checksum (little-endian)
    let mut payload = Vec::with_capacity(35);
    payload.push(VERSION_ACCOUNT_ID);
    payload.extend_from_slice(key_bytes);

    let checksum = crc16(&payload);
    payload.push((checksum & 0xFF) as u8);
    payload.push((checksum >> 8) as u8);

    Ok(base32_encode(&payload))
}

/// Decode a Stellar G... address to raw Ed25519 public key bytes
pub fn decode_public_key(address: &str) -> Result<[u8; 32]> {
    if !address.starts_with('G') {
        return Err(PaymentError::InvalidStellarAddress(
            "Must start with 'G'".to_string(),
        ));
    }

    if address.len() != 56 {
        return Err(PaymentError::InvalidStellarAddress(format!(
            "Expected 56 chars, got {}",
            address.len()
        )));
    }

    let decoded = base32_decode(address)?;

    if decoded.len() != 35 {
        return Err(PaymentError::InvalidStellarAddress(
            "Invalid decoded length".to_string(),
        ));
    }

    if decoded[0] != VERSION_ACCOUNT_ID {
        return Err(PaymentError::InvalidStellarAddress(
            "Invalid version byte".to_string(),
        ));
    }

    let stored_checksum = (decoded[33] as u16) | ((decoded[34] as u16) << 8);
    let calculated_checksum = crc16(&decoded[0..33]);

    if stored_checksum != calculated_checksum {
        return Err(PaymentError::InvalidStellarAddress(
            "Checksum mismatch".to_string(),
        ));
    }

    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&decoded[1..33]);
    Ok(key_bytes)
}

// ============================================================================
// BASE32 (RFC 4648, no padding)
// ============================================================================

const BASE32_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn base32_encode(data: &[u8]) -> String {
    let mut result = String::new();
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in data {
        buffer = (buffer << 8) | (byte as u64);
        bits_in_buffer += 8;

        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let index = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[index] as char);
        }
    }

    if bits_in_buffer > 0 {
        let index = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[index] as char);
    }

    result
}

fn base32_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for c in encoded.chars() {
        let value = match c {
            'A'..='Z' => (c as u8) - b'A',
            '2'..='7' => (c as u8) - b'2' + 26,
            _ => {
                return Err(PaymentError::InvalidStellarAddress(format!(
                    "Invalid base32 character: {}",
                    c
                )))
            }
        };

        buffer = (buffer << 5) | (value as u64);
        bits_in_buffer += 5;

        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            result.push(((buffer >> bits_in_buffer) & 0xFF) as u8);
        }
    }

    Ok(result)
}

// ============================================================================
// CRC16-CCITT
// ============================================================================

fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;

    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

// ============================================================================
// TESTS
// ============================================================================
