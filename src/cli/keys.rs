// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use k256::SecretKey;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::crypto::ecdh::{compressed_public_key, parse_secret_key};
use crate::crypto::Signer;

/// Arguments for sign command
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Hex digest to sign
    #[arg(long)]
    pub digest: String,

    /// Hex private key
    #[arg(long)]
    pub private_key: String,
}

/// (private key hex, compressed public key hex)
fn generate_key_pair() -> (Zeroizing<String>, String) {
    let secret = SecretKey::random(&mut OsRng);
    let private_hex = Zeroizing::new(hex::encode(secret.to_bytes()));
    (private_hex, hex::encode(compressed_public_key(&secret)))
}

fn decode_hex(value: &str, what: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim().trim_start_matches("0x"))
        .with_context(|| format!("{} is not valid hex", what))
}

pub fn keygen() -> Result<()> {
    let (private_hex, public_hex) = generate_key_pair();

    println!("🔑 Generated secp256k1 key pair");
    println!("  Private key: {}", private_hex.as_str());
    println!("  Public key:  {}", public_hex);
    Ok(())
}

pub fn sign(args: SignArgs) -> Result<()> {
    let key_bytes = Zeroizing::new(decode_hex(&args.private_key, "private key")?);
    let secret = parse_secret_key(&key_bytes, "private_key")?;
    let digest = decode_hex(&args.digest, "digest")?;

    let signature = Signer::default().sign_with_key(&secret, &digest)?;
    println!("{}", hex::encode(signature));
    Ok(())
}
