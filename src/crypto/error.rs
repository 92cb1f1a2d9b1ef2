// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! One error type for the channel, the vault and the signer.
//!
//! ## Error Variants
//!
//! - **Decode**: malformed base64/hex/point/DER input, or an envelope that
//!   failed to open for any reason
//! - **Authentication**: AEAD tag mismatch (never leaves `CryptoChannel`, see below)
//! - **IndexOutOfRange**: vault lookup or signing with a bad index
//! - **NoPendingKeys**: the pending slot was addressed while empty
//! - **DuplicatePromotion**: the pending key pair is already stored in the vault
//!   under `PromotionPolicy::RejectDuplicates`
//! - **Encoding**: structured payload could not be serialized
//! - **Signing**: the underlying ECDSA signer failed
//! - **InvalidKey**: a scalar or point is not valid on secp256k1
//! - **KeyDerivationFailed**: ECDH or HKDF failed
//! - **EncryptionFailed**: AEAD sealing or the random source failed
//!
//! ## Oracle Resistance
//!
//! `CryptoChannel::decrypt` maps every failure (bad base64, short input,
//! invalid point, tag mismatch, codec mismatch) onto the same
//! [`CryptoError::envelope`] value. The specific cause is only emitted as a
//! `tracing::debug!` event.

use thiserror::Error;

/// Comprehensive error type for all cryptographic and vault operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Input could not be decoded
    #[error("Decode failed for {field}: {reason}")]
    Decode {
        /// Which input failed (e.g. "envelope", "digest", "routing")
        field: String,
        /// Specific failure reason
        reason: String,
    },

    /// AEAD authentication tag did not verify
    #[error("Authentication failed during {operation}")]
    Authentication {
        /// Which operation was being performed
        operation: String,
    },

    /// Vault index does not address a stored key pair
    #[error("Vault index {index} out of range (vault holds {len} entries)")]
    IndexOutOfRange { index: i64, len: usize },

    /// The pending slot is empty
    #[error("No pending key pair")]
    NoPendingKeys,

    /// The pending key pair is already stored
    #[error("Pending key pair is already stored in the vault")]
    DuplicatePromotion,

    /// Structured payload could not be serialized
    #[error("Encoding failed: {reason}")]
    Encoding { reason: String },

    /// Signature production failed
    #[error("Signing failed: {reason}")]
    Signing { reason: String },

    /// Invalid cryptographic key
    #[error("Invalid key ({key_type}): {reason}")]
    InvalidKey {
        /// Type of key that failed (e.g. "ephemeral_public_key", "spend_private_key")
        key_type: String,
        /// Specific failure reason
        reason: String,
    },

    /// Key derivation failed (ECDH or HKDF)
    #[error("Key derivation failed during {operation}: {reason}")]
    KeyDerivationFailed { operation: String, reason: String },

    /// Envelope sealing failed
    #[error("Encryption failed: {reason}")]
    EncryptionFailed { reason: String },
}

impl CryptoError {
    /// The single error every failed envelope decryption reports
    pub fn envelope() -> Self {
        CryptoError::Decode {
            field: "envelope".to_string(),
            reason: "malformed or unauthenticated envelope".to_string(),
        }
    }

    pub fn decode(field: &str, reason: impl ToString) -> Self {
        CryptoError::Decode {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_key(key_type: &str, reason: impl ToString) -> Self {
        CryptoError::InvalidKey {
            key_type: key_type.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this is a decode-class failure (malformed input of any kind)
    pub fn is_decode(&self) -> bool {
        matches!(self, CryptoError::Decode { .. })
    }
}

// Conversion from hex decode errors
impl From<hex::FromHexError> for CryptoError {
    fn from(err: hex::FromHexError) -> Self {
        CryptoError::decode("hex_field", format!("hex decode error: {}", err))
    }
}

// Conversion from base64 decode errors
impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        CryptoError::decode("base64_field", format!("base64 decode error: {}", err))
    }
}

// Conversion from k256 errors (elliptic curve operations)
impl From<k256::elliptic_curve::Error> for CryptoError {
    fn from(err: k256::elliptic_curve::Error) -> Self {
        CryptoError::invalid_key("unknown", format!("k256 error: {}", err))
    }
}

// JSON results handed back to the host
impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::Encoding {
            reason: format!("json error: {}", err),
        }
    }
}
