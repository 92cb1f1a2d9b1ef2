// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Envelope channel between the front-end and the backend
//!
//! ## Protocol Flow
//!
//! Sealing (outbound request):
//! 1. Encode the record with the structured codec
//! 2. Draw a fresh ephemeral secp256k1 key and a fresh 12-byte nonce
//! 3. ECDH(ephemeral, backend static key) -> SHA-256 -> HKDF-SHA256 -> 32-byte key
//! 4. ChaCha20-Poly1305 seal, binding the ephemeral key as associated data
//! 5. `ephemeral ‖ nonce ‖ ciphertext‖tag`, base64
//!
//! Opening (inbound payload) mirrors the steps with the module's static key.
//! Every failure while opening is reported as [`CryptoError::envelope`];
//! the precise cause only reaches `tracing::debug!`.

use k256::SecretKey;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use super::ecdh::{derive_shared_key, SCALAR_LEN};
use super::encryption::{decrypt_with_aead, encrypt_with_aead, NONCE_LEN};
use super::{CryptoError, Envelope, StaticIdentity};
use crate::codec::{CborCodec, StructuredCodec};

/// ECIES-style envelope encryption bound to one [`StaticIdentity`]
#[derive(Debug, Clone)]
pub struct CryptoChannel<C = CborCodec> {
    identity: StaticIdentity,
    codec: C,
}

impl CryptoChannel<CborCodec> {
    pub fn new(identity: StaticIdentity) -> Self {
        Self::with_codec(identity, CborCodec)
    }
}

impl<C: StructuredCodec> CryptoChannel<C> {
    pub fn with_codec(identity: StaticIdentity, codec: C) -> Self {
        Self { identity, codec }
    }

    pub fn identity(&self) -> &StaticIdentity {
        &self.identity
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Encode `message` and seal it to the backend key, returning base64
    pub fn encrypt<T: Serialize>(&self, message: &T) -> Result<String, CryptoError> {
        let plaintext = Zeroizing::new(self.codec.encode(message)?);
        Ok(self.seal(&plaintext, &mut OsRng)?.to_base64())
    }

    /// Seal raw bytes to the backend key
    pub fn seal<R: RngCore + CryptoRng>(
        &self,
        plaintext: &[u8],
        rng: &mut R,
    ) -> Result<Envelope, CryptoError> {
        let ephemeral = random_secret(rng)?;
        let key = derive_shared_key(&ephemeral, self.identity.counterparty_key())?;

        let mut nonce = [0u8; NONCE_LEN];
        rng.try_fill_bytes(&mut nonce)
            .map_err(|e| CryptoError::EncryptionFailed {
                reason: format!("random source failed: {}", e),
            })?;

        let mut envelope = Envelope::new(ephemeral.public_key(), nonce, Vec::new());
        envelope.ciphertext =
            encrypt_with_aead(plaintext, &nonce, &envelope.ephemeral_key_bytes(), &*key)?;

        Ok(envelope)
    }

    /// Open a base64 envelope and decode the plaintext into `T`
    pub fn decrypt<T: DeserializeOwned>(&self, encoded: &str) -> Result<T, CryptoError> {
        let plaintext = Zeroizing::new(self.open(encoded)?);
        self.codec.decode(&plaintext).map_err(|e| {
            debug!("Envelope payload did not decode: {}", e);
            CryptoError::envelope()
        })
    }

    /// Open a base64 envelope, returning the raw plaintext
    pub fn open(&self, encoded: &str) -> Result<Vec<u8>, CryptoError> {
        self.try_open(encoded).map_err(|e| {
            debug!("Envelope rejected: {}", e);
            CryptoError::envelope()
        })
    }

    fn try_open(&self, encoded: &str) -> Result<Vec<u8>, CryptoError> {
        let envelope = Envelope::from_base64(encoded)?;
        let key = derive_shared_key(
            self.identity.decryption_key(),
            &envelope.ephemeral_public_key,
        )?;

        decrypt_with_aead(
            &envelope.ciphertext,
            &envelope.nonce,
            &envelope.ephemeral_key_bytes(),
            &*key,
        )
    }
}

/// Scalar draws before the random source is declared broken
const MAX_SCALAR_DRAWS: usize = 16;

/// Draw a secret scalar, surfacing random-source failures instead of panicking
fn random_secret<R: RngCore + CryptoRng>(rng: &mut R) -> Result<SecretKey, CryptoError> {
    let mut bytes = Zeroizing::new([0u8; SCALAR_LEN]);
    for _ in 0..MAX_SCALAR_DRAWS {
        rng.try_fill_bytes(&mut *bytes)
            .map_err(|e| CryptoError::EncryptionFailed {
                reason: format!("random source failed: {}", e),
            })?;

        // Out-of-range draws happen with probability ~2^-128
        if let Ok(secret) = SecretKey::from_slice(&*bytes) {
            return Ok(secret);
        }
    }

    Err(CryptoError::EncryptionFailed {
        reason: format!("no valid scalar after {} draws", MAX_SCALAR_DRAWS),
    })
}
