// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod envelope;
pub mod keys;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Wallet crypto bridge CLI
#[derive(Parser, Debug)]
#[command(name = "bridge-cli")]
#[command(version)]
#[command(about = "Developer tools for the wallet crypto bridge", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a static secp256k1 key pair
    Keygen,

    /// Seal a request envelope for the backend
    EncryptRequest(envelope::EncryptRequestArgs),

    /// Open an envelope carrying a plain string
    DecryptString(envelope::DecryptStringArgs),

    /// Sign a digest with a raw private key
    Sign(keys::SignArgs),
}

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Keygen => keys::keygen(),
        Commands::EncryptRequest(args) => envelope::encrypt_request(args),
        Commands::DecryptString(args) => envelope::decrypt_string(args),
        Commands::Sign(args) => keys::sign(args),
    }
}

/// Log filter from a `RUST_LOG` value; unset, empty or unparsable values log at info
pub fn log_filter(value: Option<&str>) -> EnvFilter {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|e| {
            eprintln!("⚠️  Ignoring RUST_LOG '{}': {}", directives, e);
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }),
        None => EnvFilter::new(DEFAULT_LOG_FILTER),
    }
}
