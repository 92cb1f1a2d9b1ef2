// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-End Encryption Module
//!
//! Cryptographic primitives shared by the front-end and the backend:
//!
//! - **ECDH**: Ephemeral-static key exchange using secp256k1
//! - **Encryption**: ChaCha20-Poly1305 AEAD for envelope payloads
//! - **Envelope**: `ephemeral ‖ nonce ‖ ciphertext‖tag` wire format
//! - **Channel**: sealing outbound requests, opening inbound payloads
//! - **Identity**: the static key pair loaded at startup
//! - **Signer**: raw `r ‖ s` ECDSA signatures from vault keys
//!
//! ## Security Considerations
//!
//! - A fresh ephemeral key and nonce are drawn for every envelope
//! - The ECDH x-coordinate is hashed and run through HKDF before use
//! - Envelope open failures are indistinguishable from each other
//! - Static and vault secrets are never logged

pub mod channel;
pub mod ecdh;
pub mod encryption;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod signer;

pub use channel::CryptoChannel;
pub use ecdh::{derive_shared_key, derive_symmetric_key};
pub use encryption::{decrypt_with_aead, encrypt_with_aead};
pub use envelope::Envelope;
pub use error::CryptoError;
pub use identity::StaticIdentity;
pub use signer::{der_to_raw, SignatureNormalization, Signer};
