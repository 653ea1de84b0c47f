//! Purpose: Invoice and price record stubs backing the sample endpoints.
//! Exports: `Invoice`, `LineItem`, `PriceQuery`, `PriceResponse`.
//! Role: Hardcoded sample data only; no business logic, no persistence.
//! Invariants: Wire fields are camelCase; absent optional fields are omitted
//! from output, matching the envelope policy used across the crate.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::core::timestamp::format_rfc3339;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuery {
    pub product_id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub price: f64,
    pub currency: String,
    pub valid_until: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Invoice {
    /// Sample invoice returned for any requested id.
    pub fn sample(id: &str) -> Self {
        Self {
            id: id.to_string(),
            issued_date: Some(format_rfc3339(OffsetDateTime::now_utc() - Duration::days(7))),
            amount: 1299.99,
            currency: default_currency(),
            items: vec![LineItem {
                description: "Professional Services".to_string(),
                quantity: 10,
                unit_price: 129.99,
            }],
        }
    }
}

impl PriceResponse {
    /// Sample quote, valid for 30 days from now.
    pub fn sample() -> Self {
        Self {
            price: 99.99,
            currency: default_currency(),
            valid_until: format_rfc3339(OffsetDateTime::now_utc() + Duration::days(30)),
        }
    }
}
