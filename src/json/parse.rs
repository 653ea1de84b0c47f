//! Purpose: Provide the fast-path JSON decode entrypoint and failure triage.
//! Exports: `from_slice`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Parser boundary that centralizes simd-json usage details.
//! Invariants: Input buffers are copied once to satisfy simd-json's mutable-slice API.
//! Invariants: Category labels are stable; diagnostics never echo payload bytes.
//! Notes: Error-kind mapping is done by callsites so domain context stays explicit.

use serde::de::DeserializeOwned;

pub(crate) fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, simd_json::Error> {
    let mut bytes = input.to_vec();
    simd_json::serde::from_slice(&mut bytes)
}

/// Coarse triage of parse failures. `Data` marks serde-level violations
/// (unknown variant, missing or mistyped field) inside structurally valid
/// JSON; every other category is a structural failure of the buffer itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    NumericRange,
    Utf8,
    DepthLimit,
    Data,
    Unknown,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::NumericRange => "numeric-range",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub(crate) fn categorize_error(err: &simd_json::Error) -> ParseFailureCategory {
    categorize_message(&err.to_string())
}

pub(crate) fn categorize_message(message: &str) -> ParseFailureCategory {
    let lower = message.to_ascii_lowercase();
    // serde's own data-error phrasing is stable across backends.
    if lower.contains("unknown variant")
        || lower.contains("missing field")
        || lower.contains("invalid type")
        || lower.contains("invalid value")
        || lower.contains("duplicate field")
        || lower.contains("invalid length")
    {
        return ParseFailureCategory::Data;
    }
    if lower.contains("utf-8") || lower.contains("utf8") {
        return ParseFailureCategory::Utf8;
    }
    if lower.contains("out of range") || lower.contains("overflow") {
        return ParseFailureCategory::NumericRange;
    }
    if lower.contains("recursion") || lower.contains("depth") || lower.contains("nesting") {
        return ParseFailureCategory::DepthLimit;
    }
    if lower.contains("syntax")
        || lower.contains("expected")
        || lower.contains("unexpected")
        || lower.contains("eof")
        || lower.contains("trailing")
        || lower.contains("invalid")
    {
        return ParseFailureCategory::Syntax;
    }
    ParseFailureCategory::Unknown
}

pub(crate) fn hint_for_error(err: &simd_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}",
        categorize_error(err).label()
    )
}
