// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ChaCha20-Poly1305 Encryption/Decryption
//!
//! Authenticated encryption for envelope payloads. The 16-byte Poly1305 tag
//! is appended to the ciphertext.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};

use super::CryptoError;

/// ChaCha20-Poly1305 nonce size
pub const NONCE_LEN: usize = 12;

/// Poly1305 authentication tag size
pub const TAG_LEN: usize = 16;

/// Decrypt data using ChaCha20-Poly1305 AEAD
///
/// # Arguments
///
/// * `ciphertext` - Encrypted data (includes authentication tag)
/// * `nonce` - 12-byte nonce
/// * `aad` - Additional authenticated data (can be empty)
/// * `key` - 32-byte encryption key
///
/// # Errors
///
/// - `Decode` if the nonce, key or ciphertext has the wrong size
/// - `Authentication` if the tag does not verify (tampered data or wrong key)
pub fn decrypt_with_aead(
    ciphertext: &[u8],
    nonce: &[u8],
    aad: &[u8],
    key: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    validate_sizes(nonce, key)?;

    if ciphertext.len() < TAG_LEN {
        return Err(CryptoError::decode(
            "ciphertext",
            format!("expected at least {} bytes, got {}", TAG_LEN, ciphertext.len()),
        ));
    }

    let cipher = ChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| CryptoError::decode("key", e))?;

    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
        .map_err(|_| CryptoError::Authentication {
            operation: "aead_open".to_string(),
        })
}

/// Encrypt data using ChaCha20-Poly1305 AEAD
///
/// Returns the ciphertext with the 16-byte authentication tag appended.
///
/// **CRITICAL**: Never reuse the same nonce with the same key.
pub fn encrypt_with_aead(
    plaintext: &[u8],
    nonce: &[u8],
    aad: &[u8],
    key: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    validate_sizes(nonce, key)?;

    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|e| CryptoError::EncryptionFailed {
        reason: format!("failed to create cipher: {}", e),
    })?;

    cipher
        .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|e| CryptoError::EncryptionFailed {
            reason: format!("aead seal failed: {}", e),
        })
}

fn validate_sizes(nonce: &[u8], key: &[u8]) -> Result<(), CryptoError> {
    if nonce.len() != NONCE_LEN {
        return Err(CryptoError::decode(
            "nonce",
            format!("expected {} bytes, got {}", NONCE_LEN, nonce.len()),
        ));
    }

    if key.len() != 32 {
        return Err(CryptoError::decode(
            "key",
            format!("expected 32 bytes, got {}", key.len()),
        ));
    }

    Ok(())
}
