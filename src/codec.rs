// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Structured payload codecs
//!
//! Envelopes carry typed records. The channel only ever sees bytes; the
//! codec turns a record into bytes before sealing and back into the caller's
//! expected type after opening.

use serde::{de::DeserializeOwned, Serialize};

use crate::crypto::CryptoError;

/// Encodes typed values to bytes and back
pub trait StructuredCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CryptoError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CryptoError>;
}

/// Self-describing CBOR codec used on the wire
#[derive(Debug, Clone, Copy, Default)]
pub struct CborCodec;

impl StructuredCodec for CborCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CryptoError> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).map_err(|e| CryptoError::Encoding {
            reason: format!("cbor encode: {}", e),
        })?;
        Ok(buf)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CryptoError> {
        let mut reader = bytes;
        let value = ciborium::from_reader(&mut reader)
            .map_err(|e| CryptoError::decode("payload", format!("cbor decode: {}", e)))?;

        if !reader.is_empty() {
            return Err(CryptoError::decode(
                "payload",
                format!("{} trailing bytes after cbor item", reader.len()),
            ));
        }

        Ok(value)
    }
}

/// JSON codec, handy when debugging payloads by eye
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl StructuredCodec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CryptoError> {
        serde_json::to_vec(value).map_err(|e| CryptoError::Encoding {
            reason: format!("json encode: {}", e),
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CryptoError> {
        serde_json::from_slice(bytes)
            .map_err(|e| CryptoError::decode("payload", format!("json decode: {}", e)))
    }
}
