//! Tests for routing decrypted key material into the vault

use k256::SecretKey;
use rand::rngs::OsRng;
use wallet_crypto_bridge::crypto::ecdh::compressed_public_key;
use wallet_crypto_bridge::{
    CryptoError, InboundKeyMaterial, KeyVault, PromotionPolicy, Routing, PENDING_INDEX,
};

fn material(tx_id: &str, vout: u32) -> (InboundKeyMaterial, SecretKey, SecretKey) {
    let private = SecretKey::random(&mut OsRng);
    let blinding = SecretKey::random(&mut OsRng);
    let inbound = InboundKeyMaterial {
        tx_id: tx_id.to_string(),
        vout,
        private: private.to_bytes().to_vec(),
        blinding: blinding.to_bytes().to_vec(),
    };
    (inbound, private, blinding)
}

#[test]
fn test_append_all_assigns_sequential_indices() {
    let mut vault = KeyVault::new();
    let (m1, p1, b1) = material("aa", 0);
    let (m2, p2, b2) = material("bb", 1);

    let descriptors = vault.ingest(&[m1, m2], Routing::AppendAll).unwrap();

    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].index, 0);
    assert_eq!(descriptors[1].index, 1);
    assert_eq!(descriptors[0].public_key, compressed_public_key(&p1).to_vec());
    assert_eq!(descriptors[0].public_blind_key, compressed_public_key(&b1).to_vec());
    assert_eq!(descriptors[1].public_key, compressed_public_key(&p2).to_vec());
    assert_eq!(descriptors[1].public_blind_key, compressed_public_key(&b2).to_vec());

    assert_eq!(&vault.get_private_key(0).unwrap()[..], &p1.to_bytes()[..]);
    assert_eq!(&vault.get_blinding_key(1).unwrap()[..], &b2.to_bytes()[..]);
}

#[test]
fn test_append_all_continues_after_existing() {
    let mut vault = KeyVault::new();
    let (m1, _, _) = material("aa", 0);
    let (m2, _, _) = material("bb", 0);
    let (m3, _, _) = material("cc", 0);

    vault.ingest(&[m1], Routing::AppendAll).unwrap();
    let descriptors = vault.ingest(&[m2, m3], Routing::AppendAll).unwrap();

    let indices: Vec<usize> = descriptors.iter().map(|d| d.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert_eq!(vault.len(), 3);
}

#[test]
fn test_replace_all_restarts_at_zero() {
    let mut vault = KeyVault::new();
    let (m1, _, _) = material("aa", 0);
    let (m2, _, _) = material("bb", 0);
    let (m3, p3, _) = material("cc", 0);

    vault.ingest(&[m1, m2], Routing::AppendAll).unwrap();
    let descriptors = vault.ingest(&[m3], Routing::ReplaceAll).unwrap();

    assert_eq!(descriptors[0].index, 0);
    assert_eq!(vault.len(), 1);
    assert_eq!(&vault.get_private_key(0).unwrap()[..], &p3.to_bytes()[..]);
    assert!(matches!(
        vault.get_private_key(1),
        Err(CryptoError::IndexOutOfRange { index: 1, len: 1 })
    ));
}

#[test]
fn test_pending_is_isolated_from_entries() {
    let mut vault = KeyVault::new();
    let (stored, _, _) = material("aa", 0);
    let (fresh, p_new, b_new) = material("bb", 2);

    vault.ingest(&[stored], Routing::AppendAll).unwrap();
    vault.ingest(&[fresh], Routing::AppendPending).unwrap();

    assert_eq!(vault.len(), 1, "Pending keys are not stored entries");
    assert!(vault.has_pending());
    assert_eq!(&vault.get_private_key(PENDING_INDEX).unwrap()[..], &p_new.to_bytes()[..]);
    assert_eq!(&vault.get_blinding_key(PENDING_INDEX).unwrap()[..], &b_new.to_bytes()[..]);
}

#[test]
fn test_promote_pending_appends() {
    let mut vault = KeyVault::new();
    let (stored, _, _) = material("aa", 0);
    let (fresh, p_new, _) = material("bb", 3);

    vault.ingest(&[stored], Routing::AppendAll).unwrap();
    vault.ingest(&[fresh], Routing::AppendPending).unwrap();

    assert_eq!(vault.promote_pending().unwrap(), 1);
    assert_eq!(vault.len(), 2);
    assert_eq!(&vault.get_private_key(1).unwrap()[..], &p_new.to_bytes()[..]);

    let entry = &vault.entries()[1];
    assert_eq!(entry.tx_id, "bb");
    assert_eq!(entry.vout, 3);
}

#[test]
fn test_promote_without_pending_fails() {
    let mut vault = KeyVault::new();
    assert_eq!(vault.promote_pending(), Err(CryptoError::NoPendingKeys));
    assert!(matches!(vault.get_private_key(PENDING_INDEX), Err(CryptoError::NoPendingKeys)));
}

#[test]
fn test_duplicate_promotion_policies() {
    let (fresh, _, _) = material("bb", 0);

    let mut allow = KeyVault::with_policy(PromotionPolicy::AllowDuplicates);
    allow.ingest(std::slice::from_ref(&fresh), Routing::AppendPending).unwrap();
    assert_eq!(allow.promote_pending().unwrap(), 0);
    assert_eq!(allow.promote_pending().unwrap(), 1);

    let mut reject = KeyVault::with_policy(PromotionPolicy::RejectDuplicates);
    reject.ingest(std::slice::from_ref(&fresh), Routing::AppendPending).unwrap();
    assert_eq!(reject.promote_pending().unwrap(), 0);
    assert_eq!(reject.promote_pending(), Err(CryptoError::DuplicatePromotion));
    assert_eq!(reject.len(), 1);
}

#[test]
fn test_redelivered_pending_keys_not_promoted_twice() {
    let (fresh, _, _) = material("bb", 0);

    let mut vault = KeyVault::with_policy(PromotionPolicy::RejectDuplicates);
    vault.ingest(std::slice::from_ref(&fresh), Routing::AppendPending).unwrap();
    assert_eq!(vault.promote_pending().unwrap(), 0);

    vault.ingest(std::slice::from_ref(&fresh), Routing::AppendPending).unwrap();
    assert_eq!(vault.promote_pending(), Err(CryptoError::DuplicatePromotion));
    assert_eq!(vault.len(), 1);

    // A different key pair is still accepted
    let (other, _, _) = material("cc", 1);
    vault.ingest(&[other], Routing::AppendPending).unwrap();
    assert_eq!(vault.promote_pending().unwrap(), 1);
}

#[test]
fn test_invalid_scalar_leaves_vault_untouched() {
    let mut vault = KeyVault::new();
    let (good, p1, _) = material("aa", 0);
    vault.ingest(&[good.clone()], Routing::AppendAll).unwrap();

    let bad = InboundKeyMaterial {
        tx_id: "bad".to_string(),
        vout: 0,
        private: vec![0u8; 32],
        blinding: vec![1u8; 32],
    };

    assert!(vault.ingest(&[good.clone(), bad.clone()], Routing::ReplaceAll).is_err());
    assert!(vault.ingest(&[bad], Routing::AppendAll).is_err());

    assert_eq!(vault.len(), 1);
    assert_eq!(&vault.get_private_key(0).unwrap()[..], &p1.to_bytes()[..]);
}

#[test]
fn test_out_of_range_indices() {
    let mut vault = KeyVault::new();
    let (m1, _, _) = material("aa", 0);
    vault.ingest(&[m1], Routing::AppendAll).unwrap();

    assert!(matches!(vault.key_pair(1), Err(CryptoError::IndexOutOfRange { .. })));
    assert!(matches!(vault.key_pair(-2), Err(CryptoError::IndexOutOfRange { .. })));
    assert!(matches!(vault.key_pair(i64::MAX), Err(CryptoError::IndexOutOfRange { .. })));
}

#[test]
fn test_clear_drops_everything() {
    let mut vault = KeyVault::new();
    let (m1, _, _) = material("aa", 0);
    let (m2, _, _) = material("bb", 0);
    vault.ingest(&[m1], Routing::AppendAll).unwrap();
    vault.ingest(&[m2], Routing::AppendPending).unwrap();

    vault.clear();

    assert!(vault.is_empty());
    assert!(!vault.has_pending());
}

#[test]
fn test_selectors() {
    assert_eq!("wallet".parse::<Routing>().unwrap(), Routing::ReplaceAll);
    assert_eq!("new".parse::<Routing>().unwrap(), Routing::AppendPending);
    assert_eq!("utxos".parse::<Routing>().unwrap(), Routing::AppendAll);
    assert!("Wallet".parse::<Routing>().is_err());
}
