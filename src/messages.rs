// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Records exchanged with the backend inside envelopes
//!
//! Field names serialize in PascalCase because the front-end reads the JSON
//! projections (`N`, `TxId`, `PubKey`, ...) directly.

use serde::{Deserialize, Serialize};

use crate::vault::PublicDescriptor;

/// Outbound request to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request {
    pub request: String,
    #[serde(default)]
    pub arg: String,
    /// Unix seconds at the time the request was built
    pub timestamp: i64,
}

/// One key pair as delivered by the backend, with the output it controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboundKeyMaterial {
    pub tx_id: String,
    pub vout: u32,
    /// 32-byte spending scalar
    pub private: Vec<u8>,
    /// 32-byte blinding scalar
    pub blinding: Vec<u8>,
}

/// Deposit key material plus the change addresses for a new swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboundAddresses {
    pub deposit: InboundKeyMaterial,
    #[serde(rename = "ChangeBTC")]
    pub change_btc: String,
    pub change_token: String,
}

/// Public projection of [`InboundAddresses`] returned to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Addresses {
    pub deposit: PublicDescriptor,
    #[serde(rename = "ChangeBTC")]
    pub change_btc: String,
    pub change_token: String,
}

/// Trading limits and fees published by the backend
///
/// Amounts are in satoshis; `fee_rate_ppm` is parts per million.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WalletInfo {
    pub token: String,
    pub token_id: String,
    pub token_name: String,
    pub ticker: String,
    #[serde(rename = "MaxBuyBTC")]
    pub max_buy_btc: u64,
    pub max_buy_token: u64,
    #[serde(rename = "MinBuyBTC")]
    pub min_buy_btc: u64,
    pub min_buy_token: u64,
    #[serde(rename = "FeeRatePPM")]
    pub fee_rate_ppm: u64,
    pub fee_base_sats: u64,
}
