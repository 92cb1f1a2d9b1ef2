// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Key pairs held by the vault and their public projections

use std::fmt;

use k256::SecretKey;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::ecdh::{compressed_public_key, parse_secret_key, COMPRESSED_POINT_LEN, SCALAR_LEN};
use crate::crypto::CryptoError;

/// A spending key and its blinding key
///
/// Immutable once built. Both scalars zeroize on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private: SecretKey,
    blinding: SecretKey,
}

impl KeyPair {
    pub fn new(private: SecretKey, blinding: SecretKey) -> Self {
        Self { private, blinding }
    }

    /// Parse two 32-byte scalars
    ///
    /// Fails if either scalar is zero (which would map to the point at
    /// infinity), not 32 bytes, or not below the curve order.
    pub fn from_bytes(private: &[u8], blinding: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            private: parse_secret_key(private, "spend_private_key")?,
            blinding: parse_secret_key(blinding, "blinding_private_key")?,
        })
    }

    pub fn private_key(&self) -> &SecretKey {
        &self.private
    }

    pub fn blinding_key(&self) -> &SecretKey {
        &self.blinding
    }

    pub fn private_bytes(&self) -> Zeroizing<[u8; SCALAR_LEN]> {
        scalar_bytes(&self.private)
    }

    pub fn blinding_bytes(&self) -> Zeroizing<[u8; SCALAR_LEN]> {
        scalar_bytes(&self.blinding)
    }

    pub fn public_key(&self) -> [u8; COMPRESSED_POINT_LEN] {
        compressed_public_key(&self.private)
    }

    pub fn public_blinding_key(&self) -> [u8; COMPRESSED_POINT_LEN] {
        compressed_public_key(&self.blinding)
    }
}

fn scalar_bytes(secret: &SecretKey) -> Zeroizing<[u8; SCALAR_LEN]> {
    let mut out = Zeroizing::new([0u8; SCALAR_LEN]);
    out.copy_from_slice(&secret.to_bytes());
    out
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key()))
            .field("public_blinding_key", &hex::encode(self.public_blinding_key()))
            .finish_non_exhaustive()
    }
}

/// Non-secret view of a vault key pair plus the output it controls
///
/// Serializes as `{N, TxId, Vout, PubKey, PubBlind}` with base64 points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicDescriptor {
    #[serde(rename = "N")]
    pub index: usize,
    pub tx_id: String,
    pub vout: u32,
    #[serde(rename = "PubKey", with = "base64_bytes")]
    pub public_key: Vec<u8>,
    #[serde(rename = "PubBlind", with = "base64_bytes")]
    pub public_blind_key: Vec<u8>,
}

impl PublicDescriptor {
    pub fn derive(index: usize, tx_id: &str, vout: u32, keys: &KeyPair) -> Self {
        Self {
            index,
            tx_id: tx_id.to_string(),
            vout,
            public_key: keys.public_key().to_vec(),
            public_blind_key: keys.public_blinding_key().to_vec(),
        }
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
