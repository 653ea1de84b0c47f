//! Purpose: Define the closed shape union and its result envelope.
//! Exports: `Shape`, `ShapeResult`, `KIND_TAGS`.
//! Role: Wire-facing sum type shared by both codec paths and the dispatcher.
//! Invariants: The `$kind` tag set is closed; adding a variant is a breaking
//! change that every `match` below surfaces at compile time.
//! Invariants: `ShapeResult` times are RFC3339 UTC strings.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Wire tags accepted by the `$kind` discriminator, in declaration order.
pub const KIND_TAGS: [&str; 3] = ["circle", "rect", "tri"];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$kind")]
pub enum Shape {
    #[serde(rename = "circle")]
    Circle { radius: f64 },
    #[serde(rename = "rect")]
    Rectangle { width: f64, height: f64 },
    #[serde(rename = "tri")]
    Triangle { base: f64, height: f64 },
}

impl Shape {
    /// Area is total over the union: negative or zero dimensions produce a
    /// mathematically consistent result, never an error.
    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle { radius } => PI * radius * radius,
            Shape::Rectangle { width, height } => width * height,
            Shape::Triangle { base, height } => 0.5 * base * height,
        }
    }

    /// Human-readable variant name used in result envelopes. Distinct from
    /// the wire tag returned by [`Shape::kind_tag`].
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "Circle",
            Shape::Rectangle { .. } => "Rectangle",
            Shape::Triangle { .. } => "Triangle",
        }
    }

    pub fn kind_tag(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Rectangle { .. } => "rect",
            Shape::Triangle { .. } => "tri",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeResult {
    #[serde(rename = "type")]
    pub shape_type: String,
    pub area: f64,
    pub processed_at: String,
}
