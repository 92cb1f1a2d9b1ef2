// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod bridge;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod messages;
pub mod vault;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use bridge::WalletBridge;
pub use codec::{CborCodec, JsonCodec, StructuredCodec};
pub use config::BridgeConfig;
pub use crypto::{CryptoChannel, CryptoError, Envelope, SignatureNormalization, Signer, StaticIdentity};
pub use messages::{Addresses, InboundAddresses, InboundKeyMaterial, Request, WalletInfo};
pub use vault::{KeyPair, KeyVault, PromotionPolicy, PublicDescriptor, Routing, PENDING_INDEX};
