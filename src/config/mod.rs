// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bridge configuration
//!
//! | Variable                  | Required | Default            |
//! |---------------------------|----------|--------------------|
//! | `DECRYPTION_PRIV_KEY`     | yes      |                    |
//! | `ENCRYPTION_PUB_KEY`      | yes      |                    |
//! | `SIGNATURE_NORMALIZATION` | no       | `passthrough`      |
//! | `PROMOTION_POLICY`        | no       | `allow-duplicates` |
//!
//! Native builds read a `.env` file first. In the browser the host passes
//! the two keys to `init` directly.

use std::fmt;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::crypto::{CryptoError, SignatureNormalization, StaticIdentity};
use crate::vault::PromotionPolicy;

pub const DECRYPTION_KEY_ENV: &str = "DECRYPTION_PRIV_KEY";
pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_PUB_KEY";
pub const SIGNATURE_NORMALIZATION_ENV: &str = "SIGNATURE_NORMALIZATION";
pub const PROMOTION_POLICY_ENV: &str = "PROMOTION_POLICY";

#[derive(Clone)]
pub struct BridgeConfig {
    /// Hex secp256k1 scalar used to open inbound envelopes
    pub decryption_private_key: String,
    /// Hex SEC1 point of the backend, outbound envelopes are sealed to it
    pub encryption_public_key: String,
    pub signature_normalization: SignatureNormalization,
    pub promotion_policy: PromotionPolicy,
}

impl BridgeConfig {
    pub fn new(decryption_private_key: impl Into<String>, encryption_public_key: impl Into<String>) -> Self {
        Self {
            decryption_private_key: decryption_private_key.into(),
            encryption_public_key: encryption_public_key.into(),
            signature_normalization: SignatureNormalization::default(),
            promotion_policy: PromotionPolicy::default(),
        }
    }

    pub fn with_signature_normalization(mut self, normalization: SignatureNormalization) -> Self {
        self.signature_normalization = normalization;
        self
    }

    pub fn with_promotion_policy(mut self, policy: PromotionPolicy) -> Self {
        self.promotion_policy = policy;
        self
    }

    /// Load from the process environment (and `.env` on native targets)
    pub fn from_env() -> Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        dotenv::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            let value = lookup(name).ok_or_else(|| anyhow!("{} environment variable not set", name))?;
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(anyhow!("{} is empty", name));
            }
            Ok(value)
        };

        let mut config = Self::new(required(DECRYPTION_KEY_ENV)?, required(ENCRYPTION_KEY_ENV)?);

        if let Some(value) = lookup(SIGNATURE_NORMALIZATION_ENV) {
            config.signature_normalization = value
                .parse()
                .with_context(|| format!("invalid {}", SIGNATURE_NORMALIZATION_ENV))?;
        }

        if let Some(value) = lookup(PROMOTION_POLICY_ENV) {
            config.promotion_policy = value
                .parse()
                .with_context(|| format!("invalid {}", PROMOTION_POLICY_ENV))?;
        }

        info!(
            "Bridge configuration loaded (signatures: {}, promotion: {:?})",
            config.signature_normalization, config.promotion_policy
        );

        Ok(config)
    }

    /// Parse the configured keys into a [`StaticIdentity`]
    pub fn identity(&self) -> Result<StaticIdentity, CryptoError> {
        StaticIdentity::from_hex(&self.decryption_private_key, &self.encryption_public_key)
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("decryption_private_key", &"<redacted>")
            .field("encryption_public_key", &self.encryption_public_key)
            .field("signature_normalization", &self.signature_normalization)
            .field("promotion_policy", &self.promotion_policy)
            .finish()
    }
}
