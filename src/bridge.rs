// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Host-facing operations
//!
//! [`WalletBridge`] is the context object behind every exported function:
//! it owns the envelope channel, the key vault and the signer, so nothing
//! lives in globals and several bridges can coexist (tests do this).
//!
//! | Operation           | Input                         | Output                      |
//! |---------------------|-------------------------------|-----------------------------|
//! | `encrypt_request`   | request, optional arg         | base64 envelope             |
//! | `decrypt_utxos`     | base64 envelope, selector     | JSON array of descriptors   |
//! | `decrypt_addresses` | base64 envelope               | JSON addresses object       |
//! | `decrypt_info`      | base64 envelope               | JSON wallet info object     |
//! | `decrypt_string`    | base64 envelope               | plain string                |
//! | `get_blinding_key`  | index (-1 = pending)          | base64 scalar               |
//! | `get_private_key`   | index (-1 = pending)          | base64 scalar               |
//! | `save_new_keys`     |                               | new index                   |
//! | `sign`              | hex digest, index             | hex 64-byte signature       |

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::BridgeConfig;
use crate::crypto::{CryptoChannel, CryptoError, Signer, StaticIdentity};
use crate::messages::{InboundAddresses, InboundKeyMaterial, Request, WalletInfo};
use crate::vault::{KeyVault, Routing};

pub struct WalletBridge {
    channel: CryptoChannel,
    vault: KeyVault,
    signer: Signer,
}

impl WalletBridge {
    pub fn new(channel: CryptoChannel, vault: KeyVault, signer: Signer) -> Self {
        Self {
            channel,
            vault,
            signer,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Result<Self, CryptoError> {
        Ok(Self::new(
            CryptoChannel::new(config.identity()?),
            KeyVault::with_policy(config.promotion_policy),
            Signer::new(config.signature_normalization),
        ))
    }

    /// Bridge with default vault and signer settings
    pub fn with_identity(identity: StaticIdentity) -> Self {
        Self::new(CryptoChannel::new(identity), KeyVault::new(), Signer::default())
    }

    pub fn channel(&self) -> &CryptoChannel {
        &self.channel
    }

    pub fn vault(&self) -> &KeyVault {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut KeyVault {
        &mut self.vault
    }

    /// Seal a request stamped with the current time
    pub fn encrypt_request(&self, request: &str, arg: Option<&str>) -> Result<String, CryptoError> {
        self.encrypt_request_at(request, arg, chrono::Utc::now().timestamp())
    }

    pub fn encrypt_request_at(
        &self,
        request: &str,
        arg: Option<&str>,
        timestamp: i64,
    ) -> Result<String, CryptoError> {
        self.channel.encrypt(&Request {
            request: request.to_string(),
            arg: arg.unwrap_or_default().to_string(),
            timestamp,
        })
    }

    /// Open a key-material envelope and route it by host selector
    /// (`"wallet"`, `"new"` or `"utxos"`)
    pub fn decrypt_utxos(&mut self, envelope: &str, selector: &str) -> Result<String, CryptoError> {
        let routing: Routing = selector.parse()?;
        let material: Vec<InboundKeyMaterial> = self.channel.decrypt(envelope)?;
        let descriptors = self.vault.ingest(&material, routing)?;
        Ok(serde_json::to_string(&descriptors)?)
    }

    pub fn decrypt_addresses(&mut self, envelope: &str) -> Result<String, CryptoError> {
        let inbound: InboundAddresses = self.channel.decrypt(envelope)?;
        let addresses = self.vault.ingest_addresses(&inbound)?;
        Ok(serde_json::to_string(&addresses)?)
    }

    pub fn decrypt_info(&self, envelope: &str) -> Result<String, CryptoError> {
        let info: WalletInfo = self.channel.decrypt(envelope)?;
        Ok(serde_json::to_string(&info)?)
    }

    pub fn decrypt_string(&self, envelope: &str) -> Result<String, CryptoError> {
        self.channel.decrypt(envelope)
    }

    pub fn get_blinding_key(&self, index: i64) -> Result<String, CryptoError> {
        let key = self.vault.get_blinding_key(index)?;
        Ok(STANDARD.encode(&*key))
    }

    pub fn get_private_key(&self, index: i64) -> Result<String, CryptoError> {
        let key = self.vault.get_private_key(index)?;
        Ok(STANDARD.encode(&*key))
    }

    /// Promote the pending key pair; returns its new index
    pub fn save_new_keys(&mut self) -> Result<usize, CryptoError> {
        self.vault.promote_pending()
    }

    pub fn sign(&self, digest_hex: &str, index: i64) -> Result<String, CryptoError> {
        let digest = hex::decode(digest_hex.trim())
            .map_err(|e| CryptoError::decode("digest", e))?;
        let signature = self.signer.sign(&self.vault, &digest, index)?;
        Ok(hex::encode(signature))
    }
}
