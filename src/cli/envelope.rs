// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use tracing::info;

use crate::bridge::WalletBridge;
use crate::config::{BridgeConfig, DECRYPTION_KEY_ENV, ENCRYPTION_KEY_ENV};

/// Static keys shared by the envelope commands
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex private key for opening envelopes (or DECRYPTION_PRIV_KEY)
    #[arg(long, env = DECRYPTION_KEY_ENV, hide_env_values = true)]
    pub decryption_key: Option<String>,

    /// Hex public key envelopes are sealed to (or ENCRYPTION_PUB_KEY)
    #[arg(long, env = ENCRYPTION_KEY_ENV)]
    pub encryption_key: Option<String>,
}

impl KeyArgs {
    fn into_bridge(self) -> Result<WalletBridge> {
        let decryption_key = self.decryption_key.ok_or_else(|| {
            anyhow!("Decryption key required. Use --decryption-key or set {}", DECRYPTION_KEY_ENV)
        })?;
        let encryption_key = self.encryption_key.ok_or_else(|| {
            anyhow!("Encryption key required. Use --encryption-key or set {}", ENCRYPTION_KEY_ENV)
        })?;

        let config = BridgeConfig::new(decryption_key, encryption_key);
        WalletBridge::from_config(&config).context("invalid static keys")
    }
}

/// Arguments for encrypt-request command
#[derive(Args, Debug)]
pub struct EncryptRequestArgs {
    /// Request name (e.g. wallet, new, utxos)
    #[arg(long)]
    pub request: String,

    /// Optional request argument
    #[arg(long)]
    pub arg: Option<String>,

    #[command(flatten)]
    pub keys: KeyArgs,
}

/// Arguments for decrypt-string command
#[derive(Args, Debug)]
pub struct DecryptStringArgs {
    /// Base64 envelope
    pub envelope: String,

    #[command(flatten)]
    pub keys: KeyArgs,
}

pub fn encrypt_request(args: EncryptRequestArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let bridge = args.keys.into_bridge()?;
    let envelope = bridge.encrypt_request(&args.request, args.arg.as_deref())?;

    info!("Sealed '{}' request", args.request);
    println!("{}", envelope);
    Ok(())
}

pub fn decrypt_string(args: DecryptStringArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let bridge = args.keys.into_bridge()?;
    let value = bridge
        .decrypt_string(&args.envelope)
        .context("failed to open envelope")?;

    println!("{}", value);
    Ok(())
}
