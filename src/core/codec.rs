//! Purpose: Map between tagged wire envelopes and `Shape` values.
//! Exports: `ShapeCodec`.
//! Role: General-purpose codec shared by the single and batch endpoints.
//! Invariants: Built once at startup and only read afterwards; safe to share
//! across concurrent requests without locking.
//! Invariants: Discriminator matching is exact-string; unknown kinds fail
//! with `UnknownVariant`, malformed JSON with `InvalidPayload`.

use serde_json::error::Category;

use crate::core::error::{Error, ErrorKind};
use crate::core::shape::{KIND_TAGS, Shape, ShapeResult};

#[derive(Clone, Debug)]
pub struct ShapeCodec {
    kind_hint: String,
}

impl ShapeCodec {
    pub fn new() -> Self {
        Self {
            kind_hint: format!("Expected \"$kind\" to be one of: {}.", KIND_TAGS.join(", ")),
        }
    }

    pub fn decode_shape(&self, bytes: &[u8]) -> Result<Shape, Error> {
        serde_json::from_slice(bytes).map_err(|err| self.map_decode_error(err))
    }

    pub fn decode_batch(&self, bytes: &[u8]) -> Result<Vec<Shape>, Error> {
        serde_json::from_slice(bytes).map_err(|err| self.map_decode_error(err))
    }

    pub fn decode_result(&self, bytes: &[u8]) -> Result<ShapeResult, Error> {
        serde_json::from_slice(bytes).map_err(|err| self.map_decode_error(err))
    }

    pub fn encode_shape(&self, shape: &Shape) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(shape).map_err(encode_error)
    }

    pub fn encode_result(&self, result: &ShapeResult) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(result).map_err(encode_error)
    }

    pub fn encode_results(&self, results: &[ShapeResult]) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(results).map_err(encode_error)
    }

    // serde reports discriminator and field violations as data errors, with
    // syntax/eof reserved for bodies that are not JSON at all.
    fn map_decode_error(&self, err: serde_json::Error) -> Error {
        match err.classify() {
            Category::Data => Error::new(ErrorKind::UnknownVariant)
                .with_message(err.to_string())
                .with_hint(self.kind_hint.clone()),
            _ => Error::new(ErrorKind::InvalidPayload)
                .with_message("request body is not valid JSON")
                .with_source(err),
        }
    }
}

impl Default for ShapeCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("failed to encode JSON")
        .with_source(err)
}
