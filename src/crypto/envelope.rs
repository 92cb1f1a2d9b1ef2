// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope wire format
//!
//! ```text
//! offset 0,  len 33 : ephemeral public key, compressed SEC1 point
//! offset 33, len 12 : nonce
//! offset 45, len N  : ciphertext
//! offset 45+N,len16 : Poly1305 tag
//! ```
//!
//! The whole buffer is base64-encoded (standard alphabet, padded) for transport.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use k256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey};

use super::ecdh::{parse_public_key, COMPRESSED_POINT_LEN};
use super::encryption::{NONCE_LEN, TAG_LEN};
use super::CryptoError;

const TAG_COMPRESSED_EVEN: u8 = 0x02;
const TAG_COMPRESSED_ODD: u8 = 0x03;

/// Sealed message: ephemeral key, nonce and ciphertext with trailing tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub ephemeral_public_key: PublicKey,
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the authentication tag appended
    pub ciphertext: Vec<u8>,
    /// The 33 header bytes exactly as framed
    header: [u8; COMPRESSED_POINT_LEN],
}

impl Envelope {
    /// Smallest possible envelope: empty plaintext
    pub const MIN_LEN: usize = COMPRESSED_POINT_LEN + NONCE_LEN + TAG_LEN;

    pub fn new(ephemeral_public_key: PublicKey, nonce: [u8; NONCE_LEN], ciphertext: Vec<u8>) -> Self {
        let mut header = [0u8; COMPRESSED_POINT_LEN];
        header.copy_from_slice(ephemeral_public_key.to_encoded_point(true).as_bytes());

        Self {
            ephemeral_public_key,
            nonce,
            ciphertext,
            header,
        }
    }

    /// Compressed ephemeral key as it appears on the wire, also bound as
    /// AEAD associated data
    pub fn ephemeral_key_bytes(&self) -> [u8; COMPRESSED_POINT_LEN] {
        self.header
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(COMPRESSED_POINT_LEN + NONCE_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < Self::MIN_LEN {
            return Err(CryptoError::decode(
                "envelope",
                format!("expected at least {} bytes, got {}", Self::MIN_LEN, bytes.len()),
            ));
        }

        let (point, rest) = bytes.split_at(COMPRESSED_POINT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        // Only the compressed SEC1 tags; 0x05 (compact) also decodes in k256
        if !matches!(point[0], TAG_COMPRESSED_EVEN | TAG_COMPRESSED_ODD) {
            return Err(CryptoError::decode(
                "ephemeral_public_key",
                format!("expected compressed point tag, got 0x{:02x}", point[0]),
            ));
        }

        let ephemeral_public_key = parse_public_key(point, "ephemeral_public_key")?;

        let mut header = [0u8; COMPRESSED_POINT_LEN];
        header.copy_from_slice(point);
        let mut nonce_arr = [0u8; NONCE_LEN];
        nonce_arr.copy_from_slice(nonce);

        Ok(Self {
            ephemeral_public_key,
            nonce: nonce_arr,
            ciphertext: ciphertext.to_vec(),
            header,
        })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Self::from_bytes(&bytes)
    }
}
