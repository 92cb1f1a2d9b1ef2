// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static Identity
//!
//! The module's long-term decryption key and the backend's long-term
//! encryption key. Both are loaded once from hex configuration and never
//! change for the life of the process.
//!
//! ## Security Considerations
//!
//! - The private key is NEVER logged or serialized
//! - `Debug` output only shows the public halves
//! - `k256::SecretKey` zeroizes its scalar on drop

use std::fmt;

use k256::{PublicKey, SecretKey};
use tracing::info;
use zeroize::Zeroizing;

use super::ecdh::{compressed_public_key, parse_public_key, parse_secret_key};
use super::CryptoError;

/// Long-term key material for the envelope channel
#[derive(Clone)]
pub struct StaticIdentity {
    decryption_key: SecretKey,
    counterparty_key: PublicKey,
}

impl StaticIdentity {
    pub fn new(decryption_key: SecretKey, counterparty_key: PublicKey) -> Self {
        Self {
            decryption_key,
            counterparty_key,
        }
    }

    /// Build the identity from hex strings (an optional `0x` prefix is accepted)
    ///
    /// # Errors
    ///
    /// - Either value is not valid hex
    /// - The private key is not a 32-byte non-zero scalar below the curve order
    /// - The public key is not a valid SEC1 point
    pub fn from_hex(
        decryption_private_key_hex: &str,
        counterparty_public_key_hex: &str,
    ) -> Result<Self, CryptoError> {
        let priv_bytes = Zeroizing::new(decode_hex("decryption_private_key", decryption_private_key_hex)?);
        let decryption_key = parse_secret_key(&priv_bytes, "decryption_private_key")?;

        let pub_bytes = decode_hex("encryption_public_key", counterparty_public_key_hex)?;
        let counterparty_key = parse_public_key(&pub_bytes, "encryption_public_key")?;

        // Log success WITHOUT logging the actual key
        info!(
            "Static identity loaded (own public key {})",
            hex::encode(compressed_public_key(&decryption_key))
        );

        Ok(Self::new(decryption_key, counterparty_key))
    }

    /// Key used to open inbound envelopes
    pub fn decryption_key(&self) -> &SecretKey {
        &self.decryption_key
    }

    /// Key inbound envelopes are addressed to
    pub fn public_key(&self) -> PublicKey {
        self.decryption_key.public_key()
    }

    /// Backend key outbound envelopes are sealed to
    pub fn counterparty_key(&self) -> &PublicKey {
        &self.counterparty_key
    }
}

impl fmt::Debug for StaticIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticIdentity")
            .field("public_key", &hex::encode(compressed_public_key(&self.decryption_key)))
            .field("counterparty_key", &self.counterparty_key)
            .finish_non_exhaustive()
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, CryptoError> {
    let trimmed = value.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if stripped.is_empty() {
        return Err(CryptoError::decode(field, "empty hex string"));
    }
    hex::decode(stripped).map_err(|e| CryptoError::decode(field, format!("invalid hex: {}", e)))
}
