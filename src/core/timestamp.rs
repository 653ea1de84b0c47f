//! Purpose: Timestamp formatting shared by result envelopes and stubs.
//! Exports: `now_rfc3339`, `unix_seconds`.
//! Role: Default representation is an RFC3339 UTC string; `unix_seconds` is a
//! reusable serde converter for fields carried as integer epoch seconds.
//! Invariants: `unix_seconds` decode accepts only a numeric token; encode
//! always emits a signed integer with sub-second fractions truncated toward
//! the epoch.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const EPOCH_RFC3339: &str = "1970-01-01T00:00:00Z";

pub fn now_rfc3339() -> String {
    format_rfc3339(OffsetDateTime::now_utc())
}

pub fn format_rfc3339(value: OffsetDateTime) -> String {
    // Rfc3339 formatting of an in-range UTC timestamp does not fail; keep the
    // envelope total rather than propagating a formatter error.
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| EPOCH_RFC3339.to_string())
}

pub mod unix_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.unix_timestamp())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i64::deserialize(deserializer)?;
        OffsetDateTime::from_unix_timestamp(seconds).map_err(serde::de::Error::custom)
    }
}
