// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ECDSA signing with vault keys
//!
//! Produces the fixed-width raw form downstream verifiers expect:
//!
//! ```text
//! signature = r (32 bytes, big-endian, left-padded) ‖ s (32 bytes, big-endian, left-padded)
//! ```
//!
//! The digest is signed as-is (no hashing here). Nonces are deterministic
//! (RFC 6979), so the same key and digest always give the same signature.

use std::fmt;
use std::str::FromStr;

use k256::ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey};
use k256::SecretKey;
use tracing::debug;

use super::CryptoError;
use crate::vault::KeyVault;

/// Raw signature length: r ‖ s
pub const RAW_SIGNATURE_LEN: usize = 64;

/// ECDSA accepts prehashes of at least half the field size
pub const MIN_DIGEST_LEN: usize = 16;

/// How `s` is treated after signing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureNormalization {
    /// Emit whatever the ECDSA implementation produced
    #[default]
    PassThrough,
    /// Force `s` into the lower half of the curve order
    LowS,
}

impl FromStr for SignatureNormalization {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "pass-through" => Ok(SignatureNormalization::PassThrough),
            "low-s" | "lows" => Ok(SignatureNormalization::LowS),
            other => Err(CryptoError::decode(
                "signature_normalization",
                format!("unknown normalization '{}'", other),
            )),
        }
    }
}

impl fmt::Display for SignatureNormalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureNormalization::PassThrough => f.write_str("passthrough"),
            SignatureNormalization::LowS => f.write_str("low-s"),
        }
    }
}

/// Signs digests with key pairs held in a [`KeyVault`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Signer {
    normalization: SignatureNormalization,
}

impl Signer {
    pub fn new(normalization: SignatureNormalization) -> Self {
        Self { normalization }
    }

    pub fn normalization(&self) -> SignatureNormalization {
        self.normalization
    }

    /// Sign `digest` with the spending key at `index` (`-1` = pending)
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` / `NoPendingKeys` if `index` addresses nothing
    /// - `Signing` if the digest is too short or the signer fails
    pub fn sign(
        &self,
        vault: &KeyVault,
        digest: &[u8],
        index: i64,
    ) -> Result<[u8; RAW_SIGNATURE_LEN], CryptoError> {
        let keys = vault.key_pair(index)?;
        self.sign_with_key(keys.private_key(), digest)
    }

    /// Sign `digest` with an explicit secret key
    pub fn sign_with_key(
        &self,
        secret: &SecretKey,
        digest: &[u8],
    ) -> Result<[u8; RAW_SIGNATURE_LEN], CryptoError> {
        if digest.len() < MIN_DIGEST_LEN {
            return Err(CryptoError::Signing {
                reason: format!(
                    "digest must be at least {} bytes, got {}",
                    MIN_DIGEST_LEN,
                    digest.len()
                ),
            });
        }

        let signing_key = SigningKey::from(secret);
        let signature: Signature = signing_key
            .sign_prehash(digest)
            .map_err(|e| CryptoError::Signing {
                reason: e.to_string(),
            })?;

        let signature = match self.normalization {
            SignatureNormalization::PassThrough => signature,
            SignatureNormalization::LowS => signature.normalize_s().unwrap_or(signature),
        };

        let der = signature.to_der();
        debug!("Signed {}-byte digest ({} byte DER)", digest.len(), der.as_bytes().len());

        der_to_raw(der.as_bytes())
    }
}

/// Convert a DER-encoded ECDSA signature into raw `r ‖ s`
///
/// Rejects components wider than 32 bytes and left-pads narrower ones.
pub fn der_to_raw(der: &[u8]) -> Result<[u8; RAW_SIGNATURE_LEN], CryptoError> {
    let signature = Signature::from_der(der)
        .map_err(|e| CryptoError::decode("der_signature", e))?;

    let (r, s) = signature.split_bytes();
    let mut raw = [0u8; RAW_SIGNATURE_LEN];
    raw[..32].copy_from_slice(&r);
    raw[32..].copy_from_slice(&s);
    Ok(raw)
}
