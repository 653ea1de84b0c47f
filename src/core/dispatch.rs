//! Purpose: Resolve decoded shapes into timestamped result envelopes.
//! Exports: `dispatch`, `dispatch_batch`.
//! Role: The only producer of `ShapeResult`; non-failing by contract.
//! Invariants: Batch dispatch preserves input order and treats elements
//! independently; decode failures never reach this module.

use crate::core::shape::{Shape, ShapeResult};
use crate::core::timestamp::now_rfc3339;

pub fn dispatch(shape: &Shape) -> ShapeResult {
    ShapeResult {
        shape_type: shape.type_name().to_string(),
        area: shape.area(),
        processed_at: now_rfc3339(),
    }
}

pub fn dispatch_batch(shapes: &[Shape]) -> Vec<ShapeResult> {
    shapes.iter().map(dispatch).collect()
}
