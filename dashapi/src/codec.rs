//! gzip-compressed JSON, the encoding of every `payload` form field.

use crate::errors::CodecError;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

pub fn encode_payload<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    serde_json::to_writer(&mut encoder, value)?;
    encoder.flush()?;
    Ok(encoder.finish()?)
}

/// Decompresses the whole stream, checksum included, before parsing.
///
/// A JSON `null` decodes to the record's default, like a nil pointer sent by
/// the dashboard client.
pub fn decode_payload<T: DeserializeOwned + Default>(payload: &[u8]) -> Result<T, CodecError> {
    if payload.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut decoder = GzDecoder::new(payload);
    let mut json = Vec::new();
    decoder.read_to_end(&mut json)?;

    let value: Option<T> = serde_json::from_slice(&json)?;
    Ok(value.unwrap_or_default())
}
