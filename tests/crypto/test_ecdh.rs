//! Tests for the envelope key agreement
//!
//! Both ends of an envelope must derive the same symmetric key from
//! (ephemeral secret, static public) and (static secret, ephemeral public).

use k256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey};
use rand::rngs::OsRng;
use wallet_crypto_bridge::crypto::ecdh::{compressed_public_key, parse_public_key, parse_secret_key};
use wallet_crypto_bridge::crypto::{derive_shared_key, CryptoError};

#[test]
fn test_derive_shared_key_both_sides_agree() {
    let static_secret = SecretKey::random(&mut OsRng);
    let ephemeral_secret = SecretKey::random(&mut OsRng);

    let sender_key = derive_shared_key(&ephemeral_secret, &static_secret.public_key()).unwrap();
    let receiver_key = derive_shared_key(&static_secret, &ephemeral_secret.public_key()).unwrap();

    assert_eq!(*sender_key, *receiver_key, "Both sides must derive the same key");
    assert_eq!(sender_key.len(), 32, "Symmetric key must be 32 bytes");
}

#[test]
fn test_derive_shared_key_deterministic() {
    let a = SecretKey::random(&mut OsRng);
    let b = SecretKey::random(&mut OsRng);

    let first = derive_shared_key(&a, &b.public_key()).unwrap();
    let second = derive_shared_key(&a, &b.public_key()).unwrap();
    assert_eq!(*first, *second, "Derivation should be deterministic");
}

#[test]
fn test_different_peers_give_different_keys() {
    let a = SecretKey::random(&mut OsRng);
    let b = SecretKey::random(&mut OsRng);
    let c = SecretKey::random(&mut OsRng);

    let ab = derive_shared_key(&a, &b.public_key()).unwrap();
    let ac = derive_shared_key(&a, &c.public_key()).unwrap();
    assert_ne!(*ab, *ac);
}

#[test]
fn test_key_is_not_raw_x_coordinate() {
    let a = SecretKey::random(&mut OsRng);
    let b = SecretKey::random(&mut OsRng);

    let shared = k256::ecdh::diffie_hellman(a.to_nonzero_scalar(), b.public_key().as_affine());
    let derived = derive_shared_key(&a, &b.public_key()).unwrap();

    assert_ne!(&derived[..], shared.raw_secret_bytes().as_slice());
}

#[test]
fn test_parse_public_key_accepts_both_encodings() {
    let secret = SecretKey::random(&mut OsRng);
    let compressed = compressed_public_key(&secret);
    let uncompressed = secret.public_key().to_encoded_point(false);

    let a = parse_public_key(&compressed, "test").unwrap();
    let b = parse_public_key(uncompressed.as_bytes(), "test").unwrap();
    assert_eq!(a, b);
    assert_eq!(a, secret.public_key());
}

#[test]
fn test_parse_public_key_rejects_bad_input() {
    // Wrong size
    assert!(matches!(
        parse_public_key(&[0u8; 20], "test"),
        Err(CryptoError::InvalidKey { .. })
    ));

    // Right size, not on the curve
    let mut not_a_point = [0xffu8; 33];
    not_a_point[0] = 0x02;
    assert!(parse_public_key(&not_a_point, "test").is_err());
}

#[test]
fn test_parse_secret_key_rejects_zero_and_order() {
    assert!(parse_secret_key(&[0u8; 32], "test").is_err());

    // secp256k1 group order n
    let order = hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141").unwrap();
    assert!(parse_secret_key(&order, "test").is_err());

    assert!(parse_secret_key(&[1u8; 31], "test").is_err());
    assert!(parse_secret_key(&[1u8; 32], "test").is_ok());
}

#[test]
fn test_compressed_public_key_shape() {
    let secret = SecretKey::random(&mut OsRng);
    let compressed = compressed_public_key(&secret);

    assert!(compressed[0] == 0x02 || compressed[0] == 0x03);
    assert_eq!(PublicKey::from_sec1_bytes(&compressed).unwrap(), secret.public_key());
}
