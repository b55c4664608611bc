// src/connection/codec.rs

//! A `tokio_util::codec` decoder that turns raw socket bytes into UTF-8 text chunks.

use crate::core::MpdError;
use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// Emits the longest valid UTF-8 prefix of the buffer as a chunk.
///
/// A multi-byte sequence cut off by a read boundary stays in the buffer until
/// the rest arrives. Chunks carry no line alignment; that is the reassembler's job.
#[derive(Debug, Default)]
pub struct Utf8ChunkCodec;

impl Decoder for Utf8ChunkCodec {
    type Item = String;
    type Error = MpdError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let valid_len = match std::str::from_utf8(&src[..]) {
            Ok(_) => src.len(),
            // `error_len() == None` means the input ended mid-sequence.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(MpdError::Protocol(format!(
                    "invalid UTF-8 at byte {} of response",
                    e.valid_up_to()
                )));
            }
        };

        if valid_len == 0 {
            return Ok(None);
        }

        let chunk = src.split_to(valid_len);
        match String::from_utf8(chunk.to_vec()) {
            Ok(text) => Ok(Some(text)),
            Err(e) => Err(MpdError::Internal(format!("UTF-8 prefix re-check failed: {e}"))),
        }
    }
}
