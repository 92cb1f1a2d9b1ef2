//! Tests for sealing and opening envelopes between the front-end and backend

use base64::{engine::general_purpose::STANDARD, Engine as _};
use k256::SecretKey;
use rand::rngs::OsRng;
use wallet_crypto_bridge::crypto::{CryptoChannel, CryptoError, Envelope, StaticIdentity};
use wallet_crypto_bridge::{JsonCodec, Request};

/// (front-end channel, backend channel) sealed to each other
fn channel_pair() -> (CryptoChannel, CryptoChannel) {
    let frontend = SecretKey::random(&mut OsRng);
    let backend = SecretKey::random(&mut OsRng);

    let frontend_identity = StaticIdentity::new(frontend.clone(), backend.public_key());
    let backend_identity = StaticIdentity::new(backend, frontend.public_key());

    (CryptoChannel::new(frontend_identity), CryptoChannel::new(backend_identity))
}

#[test]
fn test_request_roundtrip() {
    let (frontend, backend) = channel_pair();

    let request = Request {
        request: "ping".to_string(),
        arg: String::new(),
        timestamp: 1_700_000_000,
    };

    let envelope = frontend.encrypt(&request).unwrap();
    let opened: Request = backend.decrypt(&envelope).unwrap();

    assert_eq!(opened, request);
}

#[test]
fn test_backend_payload_roundtrip() {
    let (frontend, backend) = channel_pair();

    let envelope = backend.encrypt(&"deposit confirmed".to_string()).unwrap();
    let opened: String = frontend.decrypt(&envelope).unwrap();

    assert_eq!(opened, "deposit confirmed");
}

#[test]
fn test_envelope_shape() {
    let (frontend, _) = channel_pair();

    let encoded = frontend.encrypt(&"x".to_string()).unwrap();
    let bytes = STANDARD.decode(&encoded).unwrap();

    assert!(bytes.len() >= Envelope::MIN_LEN);
    assert_eq!(Envelope::MIN_LEN, 61);
    assert!(bytes[0] == 0x02 || bytes[0] == 0x03, "Compressed point prefix");
    assert!(k256::PublicKey::from_sec1_bytes(&bytes[..33]).is_ok());
}

#[test]
fn test_fresh_ephemeral_and_nonce_per_envelope() {
    let (frontend, _) = channel_pair();

    let a = Envelope::from_base64(&frontend.encrypt(&"same".to_string()).unwrap()).unwrap();
    let b = Envelope::from_base64(&frontend.encrypt(&"same".to_string()).unwrap()).unwrap();

    assert_ne!(a.ephemeral_public_key, b.ephemeral_public_key);
    assert_ne!(a.nonce, b.nonce);
    assert_ne!(a.ciphertext, b.ciphertext);
}

#[test]
fn test_sender_cannot_open_own_envelope() {
    let (frontend, _) = channel_pair();

    let envelope = frontend.encrypt(&"outbound".to_string()).unwrap();
    let result: Result<String, _> = frontend.decrypt(&envelope);
    assert_eq!(result.unwrap_err(), CryptoError::envelope());
}

#[test]
fn test_wrong_recipient_rejected() {
    let (_, backend) = channel_pair();
    let (stranger, _) = channel_pair();

    let envelope = backend.encrypt(&"for the front-end".to_string()).unwrap();
    let result: Result<String, _> = stranger.decrypt(&envelope);
    assert!(result.is_err());
}

#[test]
fn test_failures_are_indistinguishable() {
    let (frontend, backend) = channel_pair();
    let envelope = backend.encrypt(&"payload".to_string()).unwrap();

    let mut tampered = STANDARD.decode(&envelope).unwrap();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;

    let cases = [
        "not base64 at all!".to_string(),
        STANDARD.encode([0u8; 10]),
        STANDARD.encode([0u8; 80]),
        STANDARD.encode(&tampered),
    ];

    for case in cases {
        let result: Result<String, _> = frontend.decrypt(&case);
        assert_eq!(result.unwrap_err(), CryptoError::envelope(), "case {}", case);
    }

    // Authenticates but is the wrong shape
    let wrong_type = backend.encrypt(&42u64).unwrap();
    let result: Result<Request, _> = frontend.decrypt(&wrong_type);
    assert_eq!(result.unwrap_err(), CryptoError::envelope());
}

#[test]
fn test_parity_flip_rejected() {
    let (frontend, backend) = channel_pair();
    let envelope = backend.encrypt(&"payload".to_string()).unwrap();

    // 0x02 <-> 0x03 negates the point but keeps its x-coordinate
    let mut bytes = STANDARD.decode(&envelope).unwrap();
    bytes[0] ^= 0x01;

    let result: Result<String, _> = frontend.decrypt(&STANDARD.encode(&bytes));
    assert!(result.is_err());
}

#[test]
fn test_compact_point_tag_rejected() {
    let (frontend, backend) = channel_pair();

    // 0x05 (compact) decodes to a point in k256, but is not a compressed tag
    for _ in 0..64 {
        let envelope = backend.encrypt(&"payload".to_string()).unwrap();
        let mut bytes = STANDARD.decode(&envelope).unwrap();
        bytes[0] = 0x05;

        let result: Result<String, _> = frontend.decrypt(&STANDARD.encode(&bytes));
        assert_eq!(result.unwrap_err(), CryptoError::envelope());
    }
}

#[test]
fn test_surrounding_whitespace_tolerated() {
    let (frontend, backend) = channel_pair();
    let envelope = backend.encrypt(&"trimmed".to_string()).unwrap();

    let opened: String = frontend.decrypt(&format!("  {}\n", envelope)).unwrap();
    assert_eq!(opened, "trimmed");
}

#[test]
fn test_json_codec_channel() {
    let frontend = SecretKey::random(&mut OsRng);
    let backend = SecretKey::random(&mut OsRng);

    let sender = CryptoChannel::with_codec(
        StaticIdentity::new(backend.clone(), frontend.public_key()),
        JsonCodec,
    );
    let receiver = CryptoChannel::with_codec(
        StaticIdentity::new(frontend, backend.public_key()),
        JsonCodec,
    );

    let plaintext = receiver.open(&sender.encrypt(&vec![1u32, 2, 3]).unwrap()).unwrap();
    assert_eq!(plaintext, b"[1,2,3]");
}
