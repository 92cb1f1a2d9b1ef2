// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! # WASM Bindings
//!
//! Browser exports over one [`WalletBridge`]. Call `init` first.
//!
//! Nothing here throws: failures are logged with `tracing::warn!` and
//! surface in JavaScript as `undefined` (or `false`).
//!
//! ```javascript
//! import init, * as bridge from 'wallet-crypto-bridge';
//!
//! await init();
//! bridge.init(decryptionPrivKeyHex, encryptionPubKeyHex);
//! const utxos = JSON.parse(bridge.decryptUTXOs(payload, "wallet"));
//! const sig = bridge.sign(sighashHex, utxos[0].N);
//! ```

use std::cell::RefCell;

use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use crate::bridge::WalletBridge;
use crate::config::BridgeConfig;
use crate::crypto::{CryptoError, SignatureNormalization};
use crate::vault::PromotionPolicy;

// WASM is single-threaded; the bridge never leaves this thread.
thread_local! {
    static BRIDGE: RefCell<Option<WalletBridge>> = RefCell::new(None);
}

fn with_bridge<T>(
    operation: &str,
    f: impl FnOnce(&mut WalletBridge) -> Result<T, CryptoError>,
) -> Option<T> {
    BRIDGE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(bridge) = slot.as_mut() else {
            warn!("{} called before init", operation);
            return None;
        };

        match f(bridge) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{} failed: {}", operation, e);
                None
            }
        }
    })
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Install the static key pair. Returns `false` if either key is invalid.
///
/// Calling `init` again replaces the bridge and drops every vault key.
#[wasm_bindgen]
pub fn init(decryption_private_key: &str, encryption_public_key: &str) -> bool {
    init_with_options(decryption_private_key, encryption_public_key, None, None)
}

/// Like `init`, also choosing `"passthrough"`/`"low-s"` signatures and
/// `"allow-duplicates"`/`"reject-duplicates"` promotion
#[wasm_bindgen(js_name = initWithOptions)]
pub fn init_with_options(
    decryption_private_key: &str,
    encryption_public_key: &str,
    signature_normalization: Option<String>,
    promotion_policy: Option<String>,
) -> bool {
    console_error_panic_hook::set_once();
    // Already installed on re-init
    let _ = tracing_wasm::try_set_as_global_default();

    let mut config = BridgeConfig::new(decryption_private_key, encryption_public_key);

    if let Some(value) = signature_normalization {
        match value.parse::<SignatureNormalization>() {
            Ok(normalization) => config.signature_normalization = normalization,
            Err(e) => {
                warn!("init rejected: {}", e);
                return false;
            }
        }
    }

    if let Some(value) = promotion_policy {
        match value.parse::<PromotionPolicy>() {
            Ok(policy) => config.promotion_policy = policy,
            Err(e) => {
                warn!("init rejected: {}", e);
                return false;
            }
        }
    }

    match WalletBridge::from_config(&config) {
        Ok(bridge) => {
            BRIDGE.with(|cell| *cell.borrow_mut() = Some(bridge));
            info!("Wallet bridge initialized");
            true
        }
        Err(e) => {
            warn!("init rejected: {}", e);
            false
        }
    }
}

// ============================================================================
// ENVELOPES
// ============================================================================

#[wasm_bindgen(js_name = encryptRequest)]
pub fn encrypt_request(request: &str, arg: Option<String>) -> Option<String> {
    with_bridge("encryptRequest", |bridge| bridge.encrypt_request(request, arg.as_deref()))
}

/// `target` is `"wallet"`, `"new"` or `"utxos"`
#[wasm_bindgen(js_name = decryptUTXOs)]
pub fn decrypt_utxos(base64_data: &str, target: &str) -> Option<String> {
    with_bridge("decryptUTXOs", |bridge| bridge.decrypt_utxos(base64_data, target))
}

#[wasm_bindgen(js_name = decryptAddresses)]
pub fn decrypt_addresses(base64_data: &str) -> Option<String> {
    with_bridge("decryptAddresses", |bridge| bridge.decrypt_addresses(base64_data))
}

#[wasm_bindgen(js_name = decryptInfo)]
pub fn decrypt_info(base64_data: &str) -> Option<String> {
    with_bridge("decryptInfo", |bridge| bridge.decrypt_info(base64_data))
}

#[wasm_bindgen(js_name = decryptString)]
pub fn decrypt_string(base64_data: &str) -> Option<String> {
    with_bridge("decryptString", |bridge| bridge.decrypt_string(base64_data))
}

// ============================================================================
// VAULT
// ============================================================================

/// `n = -1` reads the pending key pair
#[wasm_bindgen(js_name = getBlindingKey)]
pub fn get_blinding_key(n: i32) -> Option<String> {
    with_bridge("getBlindingKey", |bridge| bridge.get_blinding_key(n.into()))
}

/// `n = -1` reads the pending key pair
#[wasm_bindgen(js_name = getPrivateKey)]
pub fn get_private_key(n: i32) -> Option<String> {
    with_bridge("getPrivateKey", |bridge| bridge.get_private_key(n.into()))
}

#[wasm_bindgen(js_name = saveNewKeys)]
pub fn save_new_keys() -> bool {
    with_bridge("saveNewKeys", |bridge| bridge.save_new_keys()).is_some()
}

#[wasm_bindgen(js_name = clearVault)]
pub fn clear_vault() -> bool {
    with_bridge("clearVault", |bridge| {
        bridge.vault_mut().clear();
        Ok(())
    })
    .is_some()
}

// ============================================================================
// SIGNING
// ============================================================================

/// Hex digest in, hex `r ‖ s` out
#[wasm_bindgen]
pub fn sign(digest_hex: &str, n: i32) -> Option<String> {
    with_bridge("sign", |bridge| bridge.sign(digest_hex, n.into()))
}
