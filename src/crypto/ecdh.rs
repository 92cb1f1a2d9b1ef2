// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ECDH Key Exchange Implementation
//!
//! Elliptic Curve Diffie-Hellman over secp256k1. Both directions of the
//! envelope (ephemeral-to-static when sealing, static-to-ephemeral when
//! opening) funnel through [`derive_symmetric_key`], so the two sides always
//! agree on the key schedule:
//!
//! ```text
//! shared_x  = x-coordinate(ECDH(secret, peer_public))
//! ikm       = SHA-256(shared_x)
//! key       = HKDF-SHA256(salt = none, ikm, info = "") -> 32 bytes
//! ```

use hkdf::Hkdf;
use k256::{
    ecdh::SharedSecret, elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey,
};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::CryptoError;

/// Length of a compressed SEC1 point
pub const COMPRESSED_POINT_LEN: usize = 33;

/// Length of a secp256k1 scalar
pub const SCALAR_LEN: usize = 32;

/// Length of the derived symmetric key
pub const SYMMETRIC_KEY_LEN: usize = 32;

/// Parse a 32-byte big-endian scalar into a secret key
///
/// Rejects the zero scalar and values at or above the curve order.
pub fn parse_secret_key(bytes: &[u8], key_type: &str) -> Result<SecretKey, CryptoError> {
    if bytes.len() != SCALAR_LEN {
        return Err(CryptoError::invalid_key(
            key_type,
            format!("expected {} bytes, got {}", SCALAR_LEN, bytes.len()),
        ));
    }

    SecretKey::from_slice(bytes)
        .map_err(|_| CryptoError::invalid_key(key_type, "scalar is zero or exceeds curve order"))
}

/// Parse a SEC1-encoded public key (33 bytes compressed or 65 bytes uncompressed)
pub fn parse_public_key(bytes: &[u8], key_type: &str) -> Result<PublicKey, CryptoError> {
    if bytes.len() != COMPRESSED_POINT_LEN && bytes.len() != 65 {
        return Err(CryptoError::invalid_key(
            key_type,
            format!("expected 33 or 65 bytes, got {}", bytes.len()),
        ));
    }

    PublicKey::from_sec1_bytes(bytes)
        .map_err(|_| CryptoError::invalid_key(key_type, "not a valid curve point"))
}

/// Compressed SEC1 encoding of the public point for `secret`
pub fn compressed_public_key(secret: &SecretKey) -> [u8; COMPRESSED_POINT_LEN] {
    let point = secret.public_key().to_encoded_point(true);
    let mut out = [0u8; COMPRESSED_POINT_LEN];
    out.copy_from_slice(point.as_bytes());
    out
}

/// Derive the envelope key from a static secret and the peer's public point
pub fn derive_shared_key(
    secret: &SecretKey,
    peer_public: &PublicKey,
) -> Result<Zeroizing<[u8; SYMMETRIC_KEY_LEN]>, CryptoError> {
    let shared = k256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer_public.as_affine());
    derive_symmetric_key(&shared)
}

/// Hash the ECDH x-coordinate and expand it into a symmetric key
///
/// The raw shared point is never used as key material directly.
pub fn derive_symmetric_key(
    shared: &SharedSecret,
) -> Result<Zeroizing<[u8; SYMMETRIC_KEY_LEN]>, CryptoError> {
    let mut ikm = Zeroizing::new([0u8; 32]);
    ikm.copy_from_slice(&Sha256::digest(shared.raw_secret_bytes()));

    let hkdf = Hkdf::<Sha256>::new(None, &*ikm);
    let mut derived_key = Zeroizing::new([0u8; SYMMETRIC_KEY_LEN]);
    hkdf.expand(&[], &mut *derived_key)
        .map_err(|e| CryptoError::KeyDerivationFailed {
            operation: "hkdf_expand".to_string(),
            reason: e.to_string(),
        })?;

    Ok(derived_key)
}
