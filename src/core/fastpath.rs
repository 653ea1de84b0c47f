//! Purpose: Single-buffer decode/encode path for the latency-sensitive endpoint.
//! Exports: `decode_shape`, `encode_result`.
//! Role: Optimized route bypassing tree-based JSON parsing; shares the wire
//! contract with `core::codec` byte for byte.
//! Invariants: The caller delivers the complete payload as one contiguous
//! buffer; the whole buffer must hold exactly one envelope.
//! Invariants: Encoding is permissive about HTML-risky characters (`<`, `>`,
//! `&` pass through unescaped) and never rejects valid text.

use crate::core::error::{Error, ErrorKind};
use crate::core::shape::{KIND_TAGS, Shape, ShapeResult};
use crate::json::parse::{self, ParseFailureCategory};

pub fn decode_shape(buf: &[u8]) -> Result<Shape, Error> {
    if buf.is_empty() {
        return Err(Error::new(ErrorKind::EmptyBody).with_message("empty request body"));
    }
    parse::from_slice(buf).map_err(map_parse_error)
}

fn map_parse_error(err: simd_json::Error) -> Error {
    match parse::categorize_error(&err) {
        ParseFailureCategory::Data => Error::new(ErrorKind::UnknownVariant)
            .with_message(err.to_string())
            .with_hint(format!(
                "Expected \"$kind\" to be one of: {}.",
                KIND_TAGS.join(", ")
            )),
        _ => Error::new(ErrorKind::InvalidPayload)
            .with_message("invalid shape JSON")
            .with_hint(parse::hint_for_error(&err, "shapes.fast"))
            .with_source(err),
    }
}

pub fn encode_result(result: &ShapeResult) -> Result<Vec<u8>, Error> {
    // Streaming serializer straight into the output buffer; no intermediate
    // Value tree is built.
    let mut out = Vec::with_capacity(96);
    serde_json::to_writer(&mut out, result).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode result")
            .with_source(err)
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{decode_shape, encode_result};
    use crate::core::codec::ShapeCodec;
    use crate::core::error::ErrorKind;
    use crate::core::shape::{Shape, ShapeResult};

    #[test]
    fn empty_buffer_is_empty_body() {
        let err = decode_shape(b"").expect_err("zero-length input");
        assert_eq!(err.kind(), ErrorKind::EmptyBody);
    }

    #[test]
    fn malformed_json_is_invalid_payload() {
        let err = decode_shape(b"{not json").expect_err("malformed");
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
        assert!(err.hint().is_some_and(|hint| hint.contains("parse category:")));
    }

    #[test]
    fn unknown_discriminator_is_unknown_variant() {
        let err = decode_shape(br#"{"$kind":"hexagon","x":1}"#).expect_err("unregistered kind");
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    }

    #[test]
    fn missing_fields_are_unknown_variant() {
        let err = decode_shape(br#"{"$kind":"rect","width":3}"#).expect_err("height missing");
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let err = decode_shape(br#"{"$kind":"circle","radius":1}{"#)
            .expect_err("buffer must hold exactly one envelope");
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
    }

    #[test]
    fn decodes_every_variant() {
        let cases: [(&[u8], Shape); 3] = [
            (
                br#"{"$kind":"circle","radius":2.5}"#,
                Shape::Circle { radius: 2.5 },
            ),
            (
                br#"{"$kind":"rect","width":3,"height":4}"#,
                Shape::Rectangle {
                    width: 3.0,
                    height: 4.0,
                },
            ),
            (
                br#"{"$kind":"tri","base":6,"height":5}"#,
                Shape::Triangle {
                    base: 6.0,
                    height: 5.0,
                },
            ),
        ];
        for (bytes, expected) in cases {
            assert_eq!(decode_shape(bytes).expect("decode"), expected);
        }
    }

    #[test]
    fn encode_agrees_with_standard_codec_byte_for_byte() {
        let result = ShapeResult {
            shape_type: "Rectangle".to_string(),
            area: 12.0,
            processed_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let fast = encode_result(&result).expect("fast encode");
        let standard = ShapeCodec::new().encode_result(&result).expect("encode");
        assert_eq!(fast, standard);
    }

    #[test]
    fn html_risky_characters_pass_through_unescaped() {
        let result = ShapeResult {
            shape_type: "<Circle> & friends".to_string(),
            area: 1.0,
            processed_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let bytes = encode_result(&result).expect("encode");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.contains("<Circle> & friends"));
        assert!(!text.contains("\\u003c"));
    }
}
