// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Key Vault
//!
//! In-memory home for every spending/blinding key pair the front-end holds.
//! Keys arrive only through [`KeyVault::ingest`] (decrypted backend
//! payloads) and leave only as public descriptors, base64 scalars handed to
//! the host on request, or signatures.
//!
//! ## State
//!
//! - `entries`: dense, insertion-ordered, index `N` never changes once assigned
//! - `pending`: at most one key pair parked until [`KeyVault::promote_pending`]
//!
//! Index `-1` addresses the pending slot in every lookup.
//!
//! **Security**: Keys are stored in memory only and never persisted.

mod keys;
mod routing;

pub use keys::{KeyPair, PublicDescriptor};
pub use routing::{PromotionPolicy, Routing};

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::ecdh::SCALAR_LEN;
use crate::crypto::CryptoError;
use crate::messages::{Addresses, InboundAddresses, InboundKeyMaterial};

/// Index that selects the pending key pair
pub const PENDING_INDEX: i64 = -1;

/// Key pair stored at a stable position, with the output it spends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEntry {
    pub index: usize,
    pub tx_id: String,
    pub vout: u32,
    pub keys: KeyPair,
}

impl VaultEntry {
    pub fn descriptor(&self) -> PublicDescriptor {
        PublicDescriptor::derive(self.index, &self.tx_id, self.vout, &self.keys)
    }
}

#[derive(Debug, Clone)]
struct PendingSlot {
    tx_id: String,
    vout: u32,
    keys: KeyPair,
}

/// Ordered key pairs plus one pending slot
#[derive(Debug, Default)]
pub struct KeyVault {
    entries: Vec<VaultEntry>,
    pending: Option<PendingSlot>,
    policy: PromotionPolicy,
}

impl KeyVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PromotionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> PromotionPolicy {
        self.policy
    }

    /// Route decrypted key material into the vault
    ///
    /// Returns one public descriptor per stored key pair, never secrets.
    /// All scalars are validated before anything is stored: on error the
    /// vault is exactly as it was.
    pub fn ingest(
        &mut self,
        material: &[InboundKeyMaterial],
        routing: Routing,
    ) -> Result<Vec<PublicDescriptor>, CryptoError> {
        match routing {
            Routing::AppendPending => {
                let first = material.first().ok_or_else(|| {
                    CryptoError::decode("key_material", "no key pair to park as pending")
                })?;
                if material.len() > 1 {
                    debug!("Pending routing ignores {} extra key pairs", material.len() - 1);
                }

                let keys = KeyPair::from_bytes(&first.private, &first.blinding)?;
                let descriptor = PublicDescriptor::derive(0, &first.tx_id, first.vout, &keys);
                self.pending = Some(PendingSlot {
                    tx_id: first.tx_id.clone(),
                    vout: first.vout,
                    keys,
                });
                info!("🔑 Pending key pair set (vault holds {} entries)", self.entries.len());

                Ok(vec![descriptor])
            }
            Routing::ReplaceAll | Routing::AppendAll => {
                let parsed = material
                    .iter()
                    .map(|m| KeyPair::from_bytes(&m.private, &m.blinding))
                    .collect::<Result<Vec<_>, _>>()?;

                if routing == Routing::ReplaceAll {
                    self.entries.clear();
                }

                let base = self.entries.len();
                let mut descriptors = Vec::with_capacity(parsed.len());
                for (offset, (inbound, keys)) in material.iter().zip(parsed).enumerate() {
                    let entry = VaultEntry {
                        index: base + offset,
                        tx_id: inbound.tx_id.clone(),
                        vout: inbound.vout,
                        keys,
                    };
                    descriptors.push(entry.descriptor());
                    self.entries.push(entry);
                }

                info!(
                    "🔑 Stored {} key pairs via '{}' (vault holds {} entries)",
                    descriptors.len(),
                    routing,
                    self.entries.len()
                );

                Ok(descriptors)
            }
        }
    }

    /// Park the deposit key pair as pending and project the addresses record
    pub fn ingest_addresses(&mut self, inbound: &InboundAddresses) -> Result<Addresses, CryptoError> {
        let mut descriptors = self.ingest(std::slice::from_ref(&inbound.deposit), Routing::AppendPending)?;
        let deposit = descriptors.pop().ok_or_else(|| CryptoError::decode("key_material", "empty deposit"))?;

        Ok(Addresses {
            deposit,
            change_btc: inbound.change_btc.clone(),
            change_token: inbound.change_token.clone(),
        })
    }

    /// Append the pending key pair at the next free index
    ///
    /// The pending slot is not cleared. Under
    /// [`PromotionPolicy::AllowDuplicates`] repeated calls append the same
    /// key pair again; under [`PromotionPolicy::RejectDuplicates`] promotion
    /// fails whenever an identical key pair is already stored, including one
    /// that was re-delivered through a later pending ingest.
    pub fn promote_pending(&mut self) -> Result<usize, CryptoError> {
        let slot = self.pending.as_ref().ok_or(CryptoError::NoPendingKeys)?;

        if self.policy == PromotionPolicy::RejectDuplicates
            && self.entries.iter().any(|entry| entry.keys == slot.keys)
        {
            return Err(CryptoError::DuplicatePromotion);
        }

        let index = self.entries.len();
        let entry = VaultEntry {
            index,
            tx_id: slot.tx_id.clone(),
            vout: slot.vout,
            keys: slot.keys.clone(),
        };
        self.entries.push(entry);

        info!("🔑 Pending key pair promoted to index {}", index);
        Ok(index)
    }

    /// Key pair at `index`, or the pending key pair for `-1`
    pub fn key_pair(&self, index: i64) -> Result<&KeyPair, CryptoError> {
        if index == PENDING_INDEX {
            return self
                .pending
                .as_ref()
                .map(|slot| &slot.keys)
                .ok_or(CryptoError::NoPendingKeys);
        }

        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries.get(i))
            .map(|entry| &entry.keys)
            .ok_or(CryptoError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn get_private_key(&self, index: i64) -> Result<Zeroizing<[u8; SCALAR_LEN]>, CryptoError> {
        Ok(self.key_pair(index)?.private_bytes())
    }

    pub fn get_blinding_key(&self, index: i64) -> Result<Zeroizing<[u8; SCALAR_LEN]>, CryptoError> {
        Ok(self.key_pair(index)?.blinding_bytes())
    }

    pub fn entries(&self) -> &[VaultEntry] {
        &self.entries
    }

    pub fn descriptors(&self) -> Vec<PublicDescriptor> {
        self.entries.iter().map(VaultEntry::descriptor).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop every key pair, pending included
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.pending = None;
        info!("🗑️  Cleared key vault (count: {})", count);
    }
}
