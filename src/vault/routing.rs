// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::fmt;
use std::str::FromStr;

use crate::crypto::CryptoError;

/// Where freshly decrypted key material goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Routing {
    /// Drop every stored entry, then store the new key pairs from index 0
    ReplaceAll,
    /// Park the first key pair in the pending slot; stored entries are untouched
    AppendPending,
    /// Store every key pair after the existing entries
    AppendAll,
}

impl Routing {
    /// Selector string the host passes for this routing
    pub fn selector(&self) -> &'static str {
        match self {
            Routing::ReplaceAll => "wallet",
            Routing::AppendPending => "new",
            Routing::AppendAll => "utxos",
        }
    }
}

impl FromStr for Routing {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wallet" => Ok(Routing::ReplaceAll),
            "new" => Ok(Routing::AppendPending),
            "utxos" => Ok(Routing::AppendAll),
            other => Err(CryptoError::decode(
                "routing",
                format!("unknown selector '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Routing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

/// What promoting the same pending key pair twice does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromotionPolicy {
    /// Every promotion appends, duplicates included
    #[default]
    AllowDuplicates,
    /// Promotion fails when an identical key pair is already stored
    RejectDuplicates,
}

impl FromStr for PromotionPolicy {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow-duplicates" | "allow" => Ok(PromotionPolicy::AllowDuplicates),
            "reject-duplicates" | "reject" => Ok(PromotionPolicy::RejectDuplicates),
            other => Err(CryptoError::decode(
                "promotion_policy",
                format!("unknown policy '{}'", other),
            )),
        }
    }
}
